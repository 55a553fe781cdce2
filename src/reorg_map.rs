//! The reorganization plan and its CSV serialization.
//!
//! A [`ReorgMap`] collects one [`FileRecord`] per discovered script, keeps
//! them sorted by source path and writes them as a two-column table
//! (`current_path,proposed_path`). The table is written to a temporary
//! sibling first and renamed into place, so a failed run never leaves a
//! truncated plan behind.

use crate::config::ConfigError;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Header row of the emitted table.
pub const TABLE_HEADER: [&str; 2] = ["current_path", "proposed_path"];

/// Proposed move for a single file.
///
/// Built once by the classifier and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    relative_path: String,
    destination: String,
    source_path: PathBuf,
    destination_path: PathBuf,
}

impl FileRecord {
    /// Creates a record for `relative_path` under `root`.
    pub fn new(root: &Path, relative_path: String, destination: String) -> Self {
        let source_path = root.join(&relative_path);
        let destination_path = root.join(&destination);
        Self {
            relative_path,
            destination,
            source_path,
            destination_path,
        }
    }

    /// Current location relative to the scanned root, `/`-separated.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Proposed location relative to the scanned root, `/`-separated.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Current location as written to the table, e.g. `Assets/Scripts/UI/Menu.cs`.
    pub fn current_path(&self, base_folder: &str) -> String {
        format!("{}/{}", base_folder, self.relative_path)
    }

    /// Proposed location as written to the table.
    pub fn proposed_path(&self, base_folder: &str) -> String {
        format!("{}/{}", base_folder, self.destination)
    }
}

/// Errors that can occur while planning a reorganization.
#[derive(Debug)]
pub enum ReorgError {
    /// The scanned root is missing, not a directory, or cannot be listed, or a
    /// script below it has a path that is not valid UTF-8.
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The output table could not be written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Two discovered files resolved to the same source path.
    DuplicateSource { relative_path: String },
    /// The embedded rule set is broken.
    Config(ConfigError),
}

impl std::fmt::Display for ReorgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filesystem { path, source } => {
                write!(f, "Cannot read source folder {}: {}", path.display(), source)
            }
            Self::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Self::DuplicateSource { relative_path } => {
                write!(f, "Source path planned twice: {}", relative_path)
            }
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReorgError {}

impl From<ConfigError> for ReorgError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for planning operations.
pub type ReorgResult<T> = Result<T, ReorgError>;

/// All proposed moves for one run, keyed and ordered by source path.
#[derive(Debug, Clone)]
pub struct ReorgMap {
    base_folder: String,
    records: BTreeMap<String, FileRecord>,
}

impl ReorgMap {
    /// Creates an empty plan whose table paths are prefixed with `base_folder`.
    pub fn new(base_folder: impl Into<String>) -> Self {
        Self {
            base_folder: base_folder.into(),
            records: BTreeMap::new(),
        }
    }

    /// Adds a record. Returns `false` and keeps the existing record if the
    /// source path is already planned.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        if self.records.contains_key(record.relative_path()) {
            return false;
        }
        self.records
            .insert(record.relative_path().to_string(), record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending source-path order.
    pub fn entries(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    /// Table rows in ascending source-path order.
    pub fn rows(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.entries().map(|record| {
            (
                record.current_path(&self.base_folder),
                record.proposed_path(&self.base_folder),
            )
        })
    }

    /// Writes the table to `output_path`, replacing any previous plan.
    ///
    /// The rows go to `<output_path>.tmp` and the file is renamed over
    /// `output_path` only once it is complete and synced. On failure the
    /// temporary file is removed and the previous plan, if any, is untouched.
    ///
    /// # Errors
    ///
    /// Returns `ReorgError::Io` if the table cannot be created, written or
    /// moved into place.
    pub fn save(&self, output_path: &Path) -> ReorgResult<()> {
        let temp_path = temp_path_for(output_path);

        if let Err(e) = self.write_table(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, output_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ReorgError::Io {
                path: output_path.to_path_buf(),
                source: e,
            }
        })
    }

    fn write_table(&self, path: &Path) -> ReorgResult<()> {
        let io_error = |source: std::io::Error| ReorgError::Io {
            path: path.to_path_buf(),
            source,
        };
        let csv_error = |e: csv::Error| io_error(std::io::Error::other(e));

        let file = File::create(path).map_err(io_error)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        writer.write_record(TABLE_HEADER).map_err(csv_error)?;
        for (current, proposed) in self.rows() {
            writer.write_record([current, proposed]).map_err(csv_error)?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| io_error(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
        file.sync_all().map_err(io_error)?;
        Ok(())
    }
}

fn temp_path_for(output_path: &Path) -> PathBuf {
    let mut name = OsString::from(output_path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
