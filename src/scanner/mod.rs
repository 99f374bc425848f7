//! File scanner for discovering and filtering source files.
//!
//! This module walks the scan root, applies the selection rule
//! (extension, reserved names, binary probe) and returns the eligible
//! files in traversal order.

use crate::cli::UnreadablePolicy;
use crate::error::AggregateError;
use crate::models::FileClass;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Number of leading bytes inspected by the binary probe.
pub const BINARY_PROBE_LEN: usize = 1024;

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include, without the dot (e.g., ["cs"])
    pub extensions: Vec<String>,
    /// File names that are never included
    pub reserved_names: Vec<String>,
    /// Directory names pruned from the walk
    pub excludes: Vec<String>,
    /// Visit entries in file-name order
    pub sort: bool,
    /// What to do with files the probe cannot read
    pub on_unreadable: UnreadablePolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::ScannerConfig::default())
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            reserved_names: config.reserved_names.clone(),
            excludes: config.excludes.clone(),
            sort: config.sort,
            on_unreadable: config.on_unreadable,
        }
    }
}

impl ScanConfig {
    /// Reject settings that could only ever produce an empty report.
    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("At least one non-empty file extension must be configured".to_string());
        }
        Ok(())
    }

    /// Reserve the report's own file name so a previous report is never
    /// folded into the next one.
    pub fn reserve(mut self, name: &str) -> Self {
        if !self.reserved_names.iter().any(|n| n == name) {
            self.reserved_names.push(name.to_string());
        }
        self
    }
}

/// An eligible file found by the scanner.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute (root-joined) path
    pub absolute_path: PathBuf,
    /// Relative path from the scan root
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

/// Everything a scan produced: eligible files plus skip counters.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub files: Vec<ScannedFile>,
    pub skipped_binary: usize,
    pub skipped_unreadable: usize,
}

/// Probe the first [`BINARY_PROBE_LEN`] bytes of a file.
///
/// The handle is dropped before returning, whichever branch is taken.
pub fn classify(path: &Path) -> FileClass {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return FileClass::Unreadable(e.to_string()),
    };

    let mut prefix = Vec::with_capacity(BINARY_PROBE_LEN);
    if let Err(e) = file.take(BINARY_PROBE_LEN as u64).read_to_end(&mut prefix) {
        return FileClass::Unreadable(e.to_string());
    }

    if prefix.contains(&0) {
        FileClass::Binary
    } else {
        FileClass::Text
    }
}

/// File scanner for discovering source files.
pub struct FileScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Check a file name against the extension and reserved-name rules.
    pub fn matches_name(&self, name: &str) -> bool {
        if self.config.reserved_names.iter().any(|r| r == name) {
            return false;
        }

        // Suffix match on the whole name, so ".cs" on its own counts too.
        self.config.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }

    /// Apply the selection rule to one path.
    ///
    /// Returns `None` when the name rules exclude the path or it resolves to
    /// a directory (a symlinked directory named like a source file),
    /// otherwise the probe result. Only `Some(FileClass::Text)` is eligible.
    pub fn eligibility(&self, path: &Path) -> Option<FileClass> {
        let name = path.file_name()?.to_string_lossy();
        if !self.matches_name(&name) || path.is_dir() {
            return None;
        }

        Some(classify(path))
    }

    /// Walk the root and collect every eligible file, in traversal order.
    pub fn scan(&self) -> Result<ScanOutcome, AggregateError> {
        let mut files = Vec::new();
        let mut outcome = self.walk(|file| {
            files.push(file);
            Ok(())
        })?;

        outcome.files = files;
        Ok(outcome)
    }

    /// Walk the root and hand each eligible file to `visit` as soon as it is
    /// found.
    ///
    /// The first error, from `visit` or from the unreadable policy, stops the
    /// walk before any later entry is probed. The returned outcome only
    /// carries the skip counters.
    pub fn walk<F>(&self, mut visit: F) -> Result<ScanOutcome, AggregateError>
    where
        F: FnMut(ScannedFile) -> Result<(), AggregateError>,
    {
        let mut outcome = ScanOutcome::default();

        let mut walker = WalkDir::new(&self.root).min_depth(1);
        if self.config.sort {
            walker = walker.sort_by_file_name();
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping entry that cannot be walked: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            match self.eligibility(path) {
                None => continue,
                Some(FileClass::Text) => {}
                Some(FileClass::Binary) => {
                    debug!("Skipping binary file: {}", path.display());
                    outcome.skipped_binary += 1;
                    continue;
                }
                Some(FileClass::Unreadable(reason)) => match self.config.on_unreadable {
                    UnreadablePolicy::Skip => {
                        warn!("Error reading file {}: {}", path.display(), reason);
                        outcome.skipped_unreadable += 1;
                        continue;
                    }
                    UnreadablePolicy::Fail => {
                        return Err(AggregateError::Unreadable {
                            path: path.to_path_buf(),
                            reason,
                        });
                    }
                },
            }

            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            let rel_path = path.strip_prefix(&self.root).unwrap_or(path);

            visit(ScannedFile {
                absolute_path: path.to_path_buf(),
                path: rel_path.to_string_lossy().to_string(),
                size,
            })?;
        }

        Ok(outcome)
    }

    /// Excluded directories are pruned below the root; the root itself never is.
    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}
