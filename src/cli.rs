//! CLI argument parsing for reaction-time

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reaction-time")]
#[command(version)]
#[command(about = "Psychomotor vigilance test with personal history tracking", long_about = None)]
pub struct Cli {
    /// Number of trials to run, 1 to 1000 (default: 5)
    #[arg(short = 'n', long = "trials", value_name = "N")]
    pub trials: Option<usize>,

    /// History log location (default: ~/reaction_time_log.csv)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load settings from a TOML file (flags override file values)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
