// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::Path;

use self::cli::Cli;
use self::config::{load_user_config, resolve_config, AUTHOR, VERSION};
use self::formatter::DumpWriter;
use self::models::{DumpSummary, FilterConfig};
use self::scanner::Scanner;

/// Parses arguments, resolves the filter config and writes the dump.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    if args.version {
        println!("project-dump {VERSION}");
        println!("Developed by {AUTHOR}");
        return Ok(());
    }

    // 2. Resolve Configuration
    let user_config = load_user_config(args.config.as_deref())?;
    let config = resolve_config(&args, user_config);

    // 3. Walk and write
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let summary = dump(&current_dir, &config)?;

    log::info!(
        "Wrote {} file(s) to '{}' ({} unreadable)",
        summary.files_written,
        config.output_filename,
        summary.read_errors
    );
    println!(
        "Done! Open '{}' and copy everything to the AI.",
        config.output_filename
    );

    Ok(())
}

/// Writes every selected file under `root` into the output file. The output
/// path is resolved against `root`.
pub fn dump(root: &Path, config: &FilterConfig) -> Result<DumpSummary> {
    let output_path = root.join(&config.output_filename);
    let mut writer = DumpWriter::create(&output_path)?;

    let scanner = Scanner::new(root.to_path_buf(), config).with_output_path(&output_path);
    for entry in scanner.scan() {
        writer.write_entry(&entry?)?;
    }

    writer.finish()
}
