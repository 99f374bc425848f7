//! Error types for the aggregation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before the report is persisted.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The binary probe could not open or read the file and the
    /// unreadable-file policy is `fail`.
    #[error("Cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// The file passed the binary probe but is not valid UTF-8.
    #[error("File is not valid UTF-8 text: {}", path.display())]
    Decode { path: PathBuf },

    /// Reading the full file contents failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the final report failed.
    #[error("Failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
