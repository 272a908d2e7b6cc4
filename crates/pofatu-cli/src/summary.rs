use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{CheckReport, StatsReport};

pub fn print_stats(report: &StatsReport) {
    println!("{}", stats_table(report));
    if !report.parameters.is_empty() {
        println!("{}", parameter_table(report));
    }
}

pub fn stats_table(report: &StatsReport) -> Table {
    let counts = &report.counts;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Entity"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in [
        ("Contributions", counts.contributions),
        ("References", counts.references),
        ("Methods", counts.methods),
        ("Method references", counts.method_references),
        ("Samples", counts.samples),
        ("Analyses", counts.analyses),
        ("Measurements", counts.measurements),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Merged compositional rows")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} -> {}",
            report.merge.merged_rows, report.merge.groups
        )),
    ]);
    table.add_row(vec![
        Cell::new("Merge conflicts")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(counts.conflicts, Color::Yellow),
    ]);
    table
}

fn parameter_table(report: &StatsReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Parameter"), header_cell("Measurements")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (parameter, count) in &report.parameters {
        table.add_row(vec![Cell::new(parameter), Cell::new(count)]);
    }
    table
}

pub fn print_check(report: &CheckReport) {
    if !report.bibliography_checked {
        println!("Bibliography empty or missing: citation checks skipped");
    }
    if report.problems.is_empty() {
        println!("No problems found");
    } else {
        println!("{}", problem_table(report));
        println!("{} problem(s)", report.problems.len());
    }
    for drift in &report.drift {
        println!(
            "Vocabulary '{}': missing from sheet [{}], not built in [{}]",
            drift.vocabulary,
            drift.missing_from_sheet.join(", "),
            drift.unknown_terms.join(", ")
        );
    }
    if report.merge.conflicts > 0 {
        println!(
            "{} merge conflict(s) in compositional data, see warnings",
            report.merge.conflicts
        );
    }
}

pub fn problem_table(report: &CheckReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    let mut problems: Vec<_> = report.problems.iter().collect();
    problems.sort_by(|a, b| (a.kind, &a.subject).cmp(&(b.kind, &b.subject)));
    for problem in problems {
        table.add_row(vec![
            Cell::new(problem.kind.label()).fg(Color::Yellow),
            Cell::new(&problem.subject),
            Cell::new(&problem.message),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
