//! Data models for the source aggregator.
//!
//! This module contains the core data structures used throughout
//! the application for representing scanned files and reports.

use std::fmt;
use std::path::PathBuf;

/// Outcome of probing a file's leading bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileClass {
    /// No NUL byte in the probed prefix.
    Text,
    /// A NUL byte appeared in the probed prefix.
    Binary,
    /// The file could not be opened or read; holds the I/O error message.
    Unreadable(String),
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileClass::Text => write!(f, "text"),
            FileClass::Binary => write!(f, "binary"),
            FileClass::Unreadable(reason) => write!(f, "unreadable ({})", reason),
        }
    }
}

/// A source file that has been read into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the file.
    pub absolute_path: PathBuf,
    /// Path relative to the scan root, using the platform separator.
    pub relative_path: String,
    /// File size in bytes.
    pub size: u64,
    /// Full UTF-8 content.
    pub content: String,
}

/// Counters collected while building a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Files whose content made it into the report.
    pub included: usize,
    /// Files skipped because the probe found a NUL byte.
    pub skipped_binary: usize,
    /// Files skipped because the probe could not read them.
    pub skipped_unreadable: usize,
    /// Sum of the included files' content lengths, in bytes.
    pub total_bytes: usize,
}

/// The aggregated report: every included file, in traversal order.
#[derive(Debug, Clone)]
pub struct Report {
    /// Root the relative paths are computed against.
    pub root: PathBuf,
    /// Included files in the order they were encountered.
    pub files: Vec<SourceFile>,
    /// Counters for the console summary.
    pub summary: ReportSummary,
}

impl Report {
    /// Creates an empty report for the given root.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            files: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Appends a file and updates the counters.
    pub fn push(&mut self, file: SourceFile) {
        self.summary.included += 1;
        self.summary.total_bytes += file.content.len();
        self.files.push(file);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
