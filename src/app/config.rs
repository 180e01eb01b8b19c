use crate::app::cli::Cli;
use crate::app::models::{FilterConfig, Profile, ProfileName};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = "Mauro Baptista - Benja Tech";

pub const DEFAULT_OUTPUT: &str = "dump.txt";
pub const DEFAULT_IGNORE: &[&str] = &[".env"];

/// Tooling directories pruned unless `--include-hidden-dirs` is given.
pub const COMMON_SKIP_DIRS: &[&str] = &[
    ".git",
    ".idea",
    ".vscode",
    ".DS_Store",
    "__pycache__",
    ".pytest_cache",
    "node_modules",
];

const PHP: Profile = Profile {
    extensions: &[".php"],
    skip_dirs: &["vendor", "node_modules"],
};

const GODOT: Profile = Profile {
    extensions: &[".gd"],
    skip_dirs: &["addons"],
};

const IDF: Profile = Profile {
    extensions: &[".c", ".h", ".cmake", ".projbuild", ".txt"],
    skip_dirs: &[
        "build",
        ".git",
        ".idea",
        ".vscode",
        "managed_components",
        "cmake-build-debug-esp-idf",
    ],
};

impl ProfileName {
    pub fn profile(self) -> &'static Profile {
        match self {
            ProfileName::Php => &PHP,
            ProfileName::Godot => &GODOT,
            ProfileName::Idf => &IDF,
        }
    }
}

/// Per-user defaults read from `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub filename: Option<String>,
    pub ignore_starts_with: Option<Vec<String>>,
    pub ignore_ends_with: Option<Vec<String>>,
    #[serde(default)]
    pub include_hidden_dirs: bool,
    #[serde(default)]
    pub include_hidden_files: bool,
}

/// Loads the file passed with `--config`. Without one, only flags and
/// built-in defaults apply.
pub fn load_user_config(explicit: Option<&Path>) -> Result<UserConfig> {
    match explicit {
        Some(path) => load_config_file(path),
        None => Ok(UserConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<UserConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;

    let parsed: UserConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {:?}", path))?;

    log::debug!("Loaded config from {:?}", path);
    Ok(parsed)
}

/// Splits a comma-separated flag value, trimming tokens and dropping empty ones.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Ignore lists: CLI flag > config file > `.env`.
fn resolve_ignore_list(flag: Option<&str>, from_file: Option<Vec<String>>) -> Vec<String> {
    match (flag, from_file) {
        (Some(value), _) => split_csv(value),
        (None, Some(items)) => clean_list(items),
        (None, None) => DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn resolve_config(cli: &Cli, user: UserConfig) -> FilterConfig {
    let (extensions, mut skip_dirs): (HashSet<String>, HashSet<String>) = match cli.profile {
        Some(name) => {
            if cli.extensions.is_some() || cli.skip_dirs.is_some() {
                log::warn!(
                    "--profile {:?} given; ignoring --extensions and --skip-dirs",
                    name
                );
            }
            let profile = name.profile();
            (
                profile.extensions.iter().map(|s| s.to_string()).collect(),
                profile.skip_dirs.iter().map(|s| s.to_string()).collect(),
            )
        }
        None => (
            cli.extensions.as_deref().map(split_csv).unwrap_or_default().into_iter().collect(),
            cli.skip_dirs.as_deref().map(split_csv).unwrap_or_default().into_iter().collect(),
        ),
    };

    let include_hidden_dirs = cli.include_hidden_dirs || user.include_hidden_dirs;
    let include_hidden_files = cli.include_hidden_files || user.include_hidden_files;

    if !include_hidden_dirs {
        skip_dirs.extend(COMMON_SKIP_DIRS.iter().map(|s| s.to_string()));
    }

    let config = FilterConfig {
        extensions,
        skip_dirs,
        ignore_prefixes: resolve_ignore_list(
            cli.ignore_starts_with.as_deref(),
            user.ignore_starts_with,
        ),
        ignore_suffixes: resolve_ignore_list(cli.ignore_ends_with.as_deref(), user.ignore_ends_with),
        include_hidden_dirs,
        include_hidden_files,
        output_filename: cli
            .filename
            .clone()
            .or(user.filename)
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
    };

    log::info!(
        "Resolved config: {} extension(s), {} skip-dir(s), hidden dirs {}, hidden files {}, output '{}'",
        config.extensions.len(),
        config.skip_dirs.len(),
        config.include_hidden_dirs,
        config.include_hidden_files,
        config.output_filename
    );

    config
}
