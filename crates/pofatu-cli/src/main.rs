//! Pofatu dataset CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use pofatu_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use pofatu_cli::commands::{open_dataset, run_check, run_dump, run_flatten, run_stats};
use pofatu_cli::logging::{LogConfig, LogFormat, init_logging};
use pofatu_cli::summary::{print_check, print_stats};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Command::Dump(args) => {
            let dataset = open_dataset(&cli.source)?;
            run_dump(&dataset, args, &mut io::stdout().lock())?;
            Ok(0)
        }
        Command::Check(args) => {
            let dataset = open_dataset(&cli.source)?;
            let report = run_check(&dataset, args)?;
            print_check(&report);
            Ok(if report.has_problems() { 1 } else { 0 })
        }
        Command::Stats(args) => {
            let dataset = open_dataset(&cli.source)?;
            let report = run_stats(&dataset)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_stats(&report);
            }
            Ok(0)
        }
        Command::Flatten => {
            for path in run_flatten(&cli.source)? {
                println!("{}", path.display());
            }
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
