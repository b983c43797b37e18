//! Run — resolve configuration, open sources, merge into the output file.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::cli::Cli;
use crate::bundle;
use crate::conf::{ConfigError, MergeConfig};
use crate::merge::MergeEngine;
use crate::output::{output_path, MergeSink};
use crate::render::Palette;
use crate::source::SourceId;

/// Execute one command-line invocation. Returns the file written.
pub fn run(cli: &Cli) -> Result<PathBuf> {
    let mut config = MergeConfig::load()?;
    cli.apply_to(&mut config);

    // Holds an extracted archive until the merge has read it
    let bundle = cli.jamfcloud.as_deref().map(bundle::discover).transpose()?;
    let logfiles = match &bundle {
        Some(bundle) => bundle.logs().to_vec(),
        None => cli.logfiles.clone(),
    };

    if config.colorize && !io::stdout().is_terminal() {
        debug!("stdout is not a terminal, colorize disabled");
        config.colorize = false;
    }

    let path = merge_files(&config, &logfiles)?;
    println!("Merged logs saved to {}", path.display());
    Ok(path)
}

/// Merge `logfiles` into a fresh `<output>.log` according to `config`.
pub fn merge_files(config: &MergeConfig, logfiles: &[PathBuf]) -> Result<PathBuf> {
    if logfiles.len() < 2 {
        return Err(ConfigError::NotEnoughLogs(logfiles.len()).into());
    }
    config.validate()?;

    let recognizer = config.timestamp.recognizer()?;
    let mut engine = MergeEngine::open(logfiles, recognizer)?;

    let ids: Vec<SourceId> = logfiles.iter().map(|p| SourceId::from(p.as_path())).collect();
    let palette = Palette::assign(&ids, &config.prefixes, config.no_prefix, config.colorize);

    let path = output_path(&config.output);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut sink = MergeSink::new(BufWriter::new(file), palette);

    let summary = sink.drain(&mut engine)?;
    engine.close();

    for (id, stats) in engine.stats() {
        info!(
            source = %id,
            entries = stats.entries,
            lines = stats.lines,
            dropped = stats.leading_dropped,
            "source merged"
        );
    }
    info!(
        entries = summary.entries,
        lines = summary.lines,
        output = %path.display(),
        "merge complete"
    );

    Ok(path)
}
