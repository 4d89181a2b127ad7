use clap::Parser;
use std::path::PathBuf;

/// Inspect an editorial timeline document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON timeline document
    #[arg(value_name = "FILE")]
    pub file_path: PathBuf,

    /// Print every clip's range in the timeline
    #[arg(short = 'r', long = "ranges")]
    pub ranges: bool,

    /// Re-serialize, re-read and verify the result is equivalent
    #[arg(long = "check")]
    pub check: bool,

    /// Write normalized JSON to stdout
    #[arg(short = 'd', long = "dump")]
    pub dump: bool,

    /// Compact (single-line) JSON for --dump
    #[arg(long = "compact")]
    pub compact: bool,

    /// Fail on unknown schemas instead of passing them through
    #[arg(long = "strict")]
    pub strict: bool,

    /// Write log output to a file instead of stderr
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    pub fn read_options(&self) -> crate::ReadOptions {
        crate::ReadOptions { strict_schemas: self.strict }
    }

    pub fn write_options(&self) -> crate::WriteOptions {
        if self.compact { crate::WriteOptions::compact() } else { crate::WriteOptions::default() }
    }
}
