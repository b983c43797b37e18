//! Cli — command-line flags.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::conf::MergeConfig;

/// Merge multiple log files, from different sources, preserving order
#[derive(Debug, Parser)]
#[command(name = "logmerge", version)]
#[command(about = "Merge multiple log files, from different sources, preserving order")]
pub struct Cli {
    /// Prefixes applied to the entries of each log, in order
    #[arg(short, long = "prefix", value_name = "PREFIX", num_args = 1..)]
    pub prefix: Vec<String>,

    /// Suppress automatic generation of prefixes
    #[arg(long)]
    pub no_prefix: bool,

    /// Regex capturing the entire timestamp in one group
    #[arg(short, long)]
    pub regex: Option<String>,

    /// strftime format of the captured timestamp
    #[arg(short, long)]
    pub format: Option<String>,

    /// Color-code log output (terminal only)
    #[arg(short, long)]
    pub colorize: bool,

    /// Merge the server logs of an exported JAMF Cloud log folder or zip file
    #[arg(short, long, value_name = "BUNDLE")]
    pub jamfcloud: Option<PathBuf>,

    /// Output filename prefix [default: merged]
    #[arg(short, long, value_name = "PREFIX")]
    pub output: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    pub logfiles: Vec<PathBuf>,
}

impl Cli {
    /// Layer the flags given on the command line over `config`.
    ///
    /// A regex or format flag replaces the configured grammar as a pair.
    pub fn apply_to(&self, config: &mut MergeConfig) {
        if !self.prefix.is_empty() {
            config.prefixes = self.prefix.clone();
        }
        if self.no_prefix {
            config.no_prefix = true;
        }
        if self.colorize {
            config.colorize = true;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.regex.is_some() || self.format.is_some() {
            config.timestamp.regex = self.regex.clone();
            config.timestamp.format = self.format.clone();
        }
    }
}
