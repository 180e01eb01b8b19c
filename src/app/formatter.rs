use crate::app::models::{DumpSummary, FileEntry};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DELIMITER: &str = "====================";

/// Owns the output file for the whole run and appends one block per file.
pub struct DumpWriter {
    out: BufWriter<File>,
    path: PathBuf,
    summary: DumpSummary,
}

impl DumpWriter {
    /// Creates or truncates the output file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {:?}", path))?;

        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            summary: DumpSummary::default(),
        })
    }

    /// Writes the header block and the file content. A file that cannot be
    /// read as UTF-8 gets an inline error line instead of content.
    pub fn write_entry(&mut self, entry: &FileEntry) -> Result<()> {
        write!(
            self.out,
            "\n{DELIMITER}\nFILE: {}\n{DELIMITER}\n",
            entry.relative_path
        )
        .with_context(|| format!("Failed to write to {:?}", self.path))?;

        match fs::read_to_string(&entry.path) {
            Ok(content) => {
                self.out
                    .write_all(content.as_bytes())
                    .and_then(|_| self.out.write_all(b"\n"))
                    .with_context(|| format!("Failed to write to {:?}", self.path))?;
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", entry.relative_path, e);
                self.summary.read_errors += 1;
                writeln!(self.out, "Error reading file: {}", e)
                    .with_context(|| format!("Failed to write to {:?}", self.path))?;
            }
        }

        self.summary.files_written += 1;
        Ok(())
    }

    /// Flushes everything to disk and closes the file.
    pub fn finish(mut self) -> Result<DumpSummary> {
        self.out
            .flush()
            .with_context(|| format!("Failed to flush {:?}", self.path))?;
        self.out
            .get_ref()
            .sync_all()
            .with_context(|| format!("Failed to sync {:?}", self.path))?;
        Ok(self.summary)
    }
}
