//! CLI library components for the Pofatu dataset tools.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
