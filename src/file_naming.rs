//! Output path computation from a file name template.
//!
//! [`FileNamer`] owns the session counters: the start timestamp captured
//! when it is created and an index that advances on every computed path.
//! Placeholders are plain text replacements of their first occurrence; a
//! template without placeholders always yields the same path.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Placeholder replaced with the session start time in epoch milliseconds.
pub const TIMESTAMP_TOKEN: &str = "*timestamp*";
/// Placeholder replaced with the current file index.
pub const INDEX_TOKEN: &str = "*index*";

/// Default file name template. `*start-timestamp*` is not a placeholder,
/// so the default name is used literally.
pub const DEFAULT_FILE_NAME: &str = "logFile_*start-timestamp*.json";

/// Computes target paths for the append store.
#[derive(Debug)]
pub struct FileNamer {
    output_dir: PathBuf,
    pattern: String,
    start_timestamp: i64,
    next_index: u64,
}

impl FileNamer {
    /// Create a namer whose session starts now.
    pub fn new(output_dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self::with_start_timestamp(
            output_dir,
            pattern,
            chrono::Utc::now().timestamp_millis(),
        )
    }

    /// Create a namer with an explicit session start time.
    pub fn with_start_timestamp(
        output_dir: impl Into<PathBuf>,
        pattern: impl Into<String>,
        start_timestamp: i64,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            pattern: pattern.into(),
            start_timestamp,
            next_index: 0,
        }
    }

    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    /// Index the next call to [`compute_path`](Self::compute_path) will use.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Render the template and advance the index.
    pub fn compute_path(&mut self) -> PathBuf {
        let timestamp = self.start_timestamp.to_string();
        let name = self
            .pattern
            .replacen(TIMESTAMP_TOKEN, &timestamp, 1)
            .replacen(INDEX_TOKEN, &self.next_index.to_string(), 1);
        self.next_index += 1;
        self.output_dir.join(name)
    }
}

/// Create `dir` and any missing parents. An empty path means the current
/// working directory and is left alone.
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Remove a stale log file left at `path`. A missing file is not an error.
pub fn remove_stale_file(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
