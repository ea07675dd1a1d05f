use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::logging::ColorOption;

/// Report names which are declared again while still in scope.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct CliArgs {
    /// Files to check ('-' or nothing reads standard input)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Use colors in diagnostic messages
    #[arg(long, value_name = "when", default_value_t = ColorOption::Auto)]
    pub color: ColorOption,

    /// Number of errors to print before exiting (0 for no limit)
    #[arg(long, value_name = "number", default_value_t = 20)]
    pub error_limit: usize,

    /// Hash names by content instead of address for reproducible lookups
    #[arg(long)]
    pub deterministic: bool,

    /// Print lookup statistics for each file
    #[arg(long)]
    pub stats: bool,

    /// Print timing information
    #[arg(long)]
    pub print_timing: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Returns the maximum log level for the verbosity.
    pub fn log_level(&self) -> log::Level {
        match self.verbose {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}
