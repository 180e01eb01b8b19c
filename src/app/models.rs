use clap::ValueEnum;
use std::collections::HashSet;
use std::path::PathBuf;

/// Names of the built-in profiles accepted by `--profile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileName {
    Php,
    Godot,
    Idf,
}

/// A built-in bundle of extensions and skip-dirs for one kind of project.
#[derive(Debug)]
pub struct Profile {
    pub extensions: &'static [&'static str],
    pub skip_dirs: &'static [&'static str],
}

/// The filter rules for a single run, resolved once from flags or a profile.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Empty means every file passes the extension check.
    pub extensions: HashSet<String>,
    pub skip_dirs: HashSet<String>,
    pub ignore_prefixes: Vec<String>,
    pub ignore_suffixes: Vec<String>,
    pub include_hidden_dirs: bool,
    pub include_hidden_files: bool,
    pub output_filename: String,
}

/// A file selected by the scanner.
#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path as written in the dump header, e.g. `./src/main.c`.
    pub relative_path: String,
}

/// Counters collected while writing the dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub files_written: usize,
    pub read_errors: usize,
}
