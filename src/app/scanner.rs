use crate::app::models::{FileEntry, FilterConfig};
use anyhow::Result;
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Files whose name ends with this are dumped whatever the extension list says.
const ALWAYS_INCLUDED_SUFFIX: &str = "Kconfig";

pub struct Scanner {
    root: PathBuf,
    config: FilterConfig,
    output_path: Option<PathBuf>,
}

impl Scanner {
    pub fn new(root: PathBuf, config: &FilterConfig) -> Self {
        Self {
            root,
            config: config.clone(),
            output_path: None,
        }
    }

    /// Excludes the file at `path` by identity as well as by name. The file
    /// has to exist already for this to take effect.
    pub fn with_output_path(mut self, path: &Path) -> Self {
        self.output_path = fs::canonicalize(path).ok();
        self
    }

    /// Pre-order walk of the root yielding every selected file. A directory's
    /// own files come first, then its subdirectories, each group in file name
    /// order. Directories in `skip_dirs` are pruned before they are read. A
    /// walk error ends the dump.
    pub fn scan(&self) -> impl Iterator<Item = Result<FileEntry>> + '_ {
        let skip_dirs = self.config.skip_dirs.clone();

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_path(|a, b| {
                (a.is_dir(), a.file_name()).cmp(&(b.is_dir(), b.file_name()))
            })
            .filter_entry(move |entry| !is_pruned(entry, &skip_dirs))
            .build();

        walker.filter_map(move |result| match result {
            Ok(entry) => self.process_entry(&entry).map(Ok),
            Err(err) => Some(Err(
                anyhow::Error::new(err).context("Failed to walk directory tree")
            )),
        })
    }

    fn process_entry(&self, entry: &DirEntry) -> Option<FileEntry> {
        if entry.depth() == 0 {
            return None;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() || (file_type.is_symlink() && path.is_dir()) {
            return None;
        }

        let name = entry.file_name().to_string_lossy();
        if !accepts_file_name(&self.config, &name) || self.is_output_file(path) {
            return None;
        }

        let relative = diff_paths(path, &self.root)?;
        let relative_path = Path::new(".").join(relative).to_string_lossy().into_owned();

        log::debug!("Selected {}", relative_path);
        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path,
        })
    }

    /// Catches links to the output file under any name.
    fn is_output_file(&self, path: &Path) -> bool {
        match &self.output_path {
            Some(output) => fs::canonicalize(path).map_or(false, |p| &p == output),
            None => false,
        }
    }
}

fn is_pruned(entry: &DirEntry, skip_dirs: &HashSet<String>) -> bool {
    if entry.depth() == 0 || !entry.file_type().map_or(false, |ft| ft.is_dir()) {
        return false;
    }

    let pruned = skip_dirs.contains(entry.file_name().to_string_lossy().as_ref());
    if pruned {
        log::debug!("Skipping directory {}", entry.path().display());
    }
    pruned
}

/// Name-based inclusion rules. All of them must pass.
pub fn accepts_file_name(config: &FilterConfig, name: &str) -> bool {
    if name == config.output_filename {
        return false;
    }
    if config
        .ignore_prefixes
        .iter()
        .any(|prefix| name.starts_with(prefix.as_str()))
    {
        return false;
    }
    if config
        .ignore_suffixes
        .iter()
        .any(|suffix| name.ends_with(suffix.as_str()))
    {
        return false;
    }
    if !config.include_hidden_files && name.starts_with('.') {
        return false;
    }

    config.extensions.is_empty()
        || config.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
        || name.ends_with(ALWAYS_INCLUDED_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::COMMON_SKIP_DIRS;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use tempfile::tempdir;

    fn config() -> FilterConfig {
        FilterConfig {
            extensions: HashSet::new(),
            skip_dirs: COMMON_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_prefixes: vec![".env".to_string()],
            ignore_suffixes: vec![".env".to_string()],
            include_hidden_dirs: false,
            include_hidden_files: false,
            output_filename: "dump.txt".to_string(),
        }
    }

    fn touch(root: &Path, relative: &str) -> io::Result<()> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        writeln!(file, "content of {}", relative)
    }

    fn scan_paths(root: &Path, config: &FilterConfig) -> Vec<String> {
        Scanner::new(root.to_path_buf(), config)
            .scan()
            .map(|entry| entry.unwrap().relative_path)
            .collect()
    }

    #[test]
    fn empty_extension_list_selects_every_visible_file() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "a.py")?;
        touch(dir.path(), "b.txt")?;
        touch(dir.path(), "src/lib.rs")?;
        touch(dir.path(), ".hidden")?;
        touch(dir.path(), ".git/config")?;

        let paths = scan_paths(dir.path(), &config());
        assert_eq!(paths, vec!["./a.py", "./b.txt", "./src/lib.rs"]);
        Ok(())
    }

    #[test]
    fn extension_filter_with_custom_skip_dir() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "a.py")?;
        touch(dir.path(), "b.txt")?;
        touch(dir.path(), "skip/c.py")?;
        touch(dir.path(), ".git/d.py")?;

        let mut config = config();
        config.extensions.insert(".py".to_string());
        config.skip_dirs.insert("skip".to_string());

        assert_eq!(scan_paths(dir.path(), &config), vec!["./a.py"]);
        Ok(())
    }

    #[test]
    fn skip_dirs_prune_at_any_depth() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "pkg/node_modules/lib/index.js")?;
        touch(dir.path(), "pkg/main.js")?;

        assert_eq!(scan_paths(dir.path(), &config()), vec!["./pkg/main.js"]);
        Ok(())
    }

    #[test]
    fn skip_dir_names_do_not_apply_to_files() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "build")?;

        let mut config = config();
        config.skip_dirs.insert("build".to_string());

        assert_eq!(scan_paths(dir.path(), &config), vec!["./build"]);
        Ok(())
    }

    #[test]
    fn hidden_dirs_outside_common_set_are_walked() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), ".github/workflow.yml")?;
        touch(dir.path(), ".git/HEAD")?;

        assert_eq!(
            scan_paths(dir.path(), &config()),
            vec!["./.github/workflow.yml"]
        );
        Ok(())
    }

    #[test]
    fn include_hidden_files_keeps_dotfiles_but_not_ignored_ones() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), ".gitignore")?;
        touch(dir.path(), ".env")?;
        touch(dir.path(), ".env.local")?;
        touch(dir.path(), "prod.env")?;

        let mut config = config();
        config.include_hidden_files = true;

        assert_eq!(scan_paths(dir.path(), &config), vec!["./.gitignore"]);
        Ok(())
    }

    #[test]
    fn kconfig_is_always_included() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "main.c")?;
        touch(dir.path(), "sdkconfig.cmake")?;
        touch(dir.path(), "Kconfig")?;
        touch(dir.path(), "components/Kconfig")?;
        touch(dir.path(), "notes.md")?;

        let mut config = config();
        config.extensions = [".c", ".cmake"].iter().map(|s| s.to_string()).collect();

        assert_eq!(
            scan_paths(dir.path(), &config),
            vec!["./Kconfig", "./main.c", "./sdkconfig.cmake", "./components/Kconfig"]
        );
        Ok(())
    }

    #[test]
    fn output_file_is_excluded_by_name() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "dump.txt")?;
        touch(dir.path(), "nested/dump.txt")?;
        touch(dir.path(), "keep.txt")?;

        assert_eq!(scan_paths(dir.path(), &config()), vec!["./keep.txt"]);
        Ok(())
    }

    #[test]
    fn output_file_is_excluded_by_path() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "out/context.txt")?;
        touch(dir.path(), "other/context.txt")?;

        let mut config = config();
        config.output_filename = "out/context.txt".to_string();
        let output = dir.path().join("out/context.txt");

        let paths: Vec<String> = Scanner::new(dir.path().to_path_buf(), &config)
            .with_output_path(&output)
            .scan()
            .map(|entry| entry.unwrap().relative_path)
            .collect();

        assert_eq!(paths, vec!["./other/context.txt"]);
        Ok(())
    }

    #[test]
    fn files_come_before_subdirectories() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "z.txt")?;
        touch(dir.path(), "m/inner.txt")?;
        touch(dir.path(), "m/b/deep.txt")?;
        touch(dir.path(), "m/a.txt")?;
        touch(dir.path(), "a/x.txt")?;
        touch(dir.path(), "b.txt")?;

        assert_eq!(
            scan_paths(dir.path(), &config()),
            vec![
                "./b.txt",
                "./z.txt",
                "./a/x.txt",
                "./m/a.txt",
                "./m/inner.txt",
                "./m/b/deep.txt",
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_root_is_a_walk_error() {
        let dir = tempdir().unwrap();
        let config = config();
        let scanner = Scanner::new(dir.path().join("missing"), &config);

        let results: Vec<Result<FileEntry>> = scanner.scan().collect();
        assert!(results.iter().any(|r| r.is_err()));
    }

    #[test]
    fn ignore_rules_combine_with_extensions() {
        let mut config = config();
        config.extensions.insert(".py".to_string());
        config.ignore_prefixes.push("test_".to_string());
        config.ignore_suffixes.push("_pb2.py".to_string());

        assert!(accepts_file_name(&config, "app.py"));
        assert!(!accepts_file_name(&config, "test_app.py"));
        assert!(!accepts_file_name(&config, "messages_pb2.py"));
        assert!(!accepts_file_name(&config, "app.js"));
        assert!(!accepts_file_name(&config, ".envrc"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_to_files_are_selected_and_symlinked_dirs_are_not_followed() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "real/file.txt")?;
        std::os::unix::fs::symlink(
            dir.path().join("real/file.txt"),
            dir.path().join("link.txt"),
        )?;
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linked_dir"))?;

        assert_eq!(
            scan_paths(dir.path(), &config()),
            vec!["./link.txt", "./real/file.txt"]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn links_to_output_file_are_excluded() -> io::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "dump.txt")?;
        touch(dir.path(), "a.txt")?;
        std::os::unix::fs::symlink(dir.path().join("dump.txt"), dir.path().join("z_link.txt"))?;

        let paths: Vec<String> = Scanner::new(dir.path().to_path_buf(), &config())
            .with_output_path(&dir.path().join("dump.txt"))
            .scan()
            .map(|entry| entry.unwrap().relative_path)
            .collect();

        assert_eq!(paths, vec!["./a.txt"]);
        Ok(())
    }
}
