use clap::Parser;
use std::path::PathBuf;

use crate::app::config::AUTHOR;
use crate::app::models::ProfileName;

#[derive(Parser, Debug)]
#[command(
    name = "project-dump",
    about = "Project Dump - Aggregate project files into a single text file for AI analysis",
    after_help = format!("Developed by {AUTHOR}"),
    disable_version_flag = true
)]
pub struct Cli {
    /// Show version information and exit
    #[arg(long)]
    pub version: bool,

    /// Output filename (default: dump.txt)
    #[arg(long)]
    pub filename: Option<String>,

    /// Comma-separated list of file extensions to include (e.g., .py,.js,.txt)
    #[arg(long)]
    pub extensions: Option<String>,

    /// Comma-separated list of directories to skip (e.g., build,.git,node_modules)
    #[arg(long)]
    pub skip_dirs: Option<String>,

    /// Use a predefined profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileName>,

    /// Include common hidden directories (.git, .idea, .vscode, etc.)
    #[arg(long)]
    pub include_hidden_dirs: bool,

    /// Include hidden files (files starting with .)
    #[arg(long)]
    pub include_hidden_files: bool,

    /// Comma-separated list of prefixes to ignore (default: .env)
    #[arg(long)]
    pub ignore_starts_with: Option<String>,

    /// Comma-separated list of suffixes to ignore (default: .env)
    #[arg(long)]
    pub ignore_ends_with: Option<String>,

    /// TOML file with default settings; flags given on the command line win
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
