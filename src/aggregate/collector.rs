//! Walk-and-collect: read every eligible file into a report.
//!
//! A single pass: each entry is probed, read and appended before the walk
//! moves on to the next one. Nothing is written here; persisting is left
//! to the caller so a failed run never touches an existing report.

use crate::error::AggregateError;
use crate::models::{Report, SourceFile};
use crate::scanner::{FileScanner, ScanConfig, ScannedFile};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Walk `root` and collect every eligible file into a [`Report`].
///
/// Stops at the first file that cannot be read in full or is not valid
/// UTF-8; entries after it are never probed. Files the binary probe cannot
/// open are handled according to [`ScanConfig::on_unreadable`].
pub fn walk_and_collect(root: &Path, config: &ScanConfig) -> Result<Report, AggregateError> {
    let scanner = FileScanner::new(root.to_path_buf(), config.clone());
    let mut report = Report::new(root.to_path_buf());

    let outcome = scanner.walk(|file| {
        report.push(read_source_file(file)?);
        Ok(())
    })?;

    report.summary.skipped_binary = outcome.skipped_binary;
    report.summary.skipped_unreadable = outcome.skipped_unreadable;

    debug!(
        "Collected {} files ({} binary, {} unreadable skipped)",
        report.summary.included, outcome.skipped_binary, outcome.skipped_unreadable
    );

    Ok(report)
}

/// Read one scanned file as UTF-8 text.
fn read_source_file(file: ScannedFile) -> Result<SourceFile, AggregateError> {
    info!("Reading file: {}", file.absolute_path.display());
    let content = read_text(&file.absolute_path)?;

    Ok(SourceFile {
        absolute_path: file.absolute_path,
        relative_path: file.path,
        size: file.size,
        content,
    })
}

/// Read a whole file and decode it as UTF-8, without newline translation.
pub fn read_text(path: &Path) -> Result<String, AggregateError> {
    let bytes = fs::read(path).map_err(|source| AggregateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|_| AggregateError::Decode {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> ScanConfig {
        let mut config = ScanConfig::default().reserve("source.md");
        config.sort = true;
        config
    }

    #[test]
    fn test_collects_text_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.cs"), "X").unwrap();
        fs::write(dir.path().join("b.cs"), b"\0binary").unwrap();
        fs::write(dir.path().join("notes.txt"), "notes").unwrap();

        let report = walk_and_collect(dir.path(), &config()).unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].relative_path, "a.cs");
        assert_eq!(report.files[0].content, "X");
        assert_eq!(report.summary.included, 1);
        assert_eq!(report.summary.skipped_binary, 1);
        assert_eq!(report.summary.total_bytes, 1);
    }

    #[test]
    fn test_one_entry_per_file_with_relative_paths() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src").join("Models")).unwrap();
        fs::write(dir.path().join("Program.cs"), "class Program {}").unwrap();
        fs::write(dir.path().join("src").join("Startup.cs"), "class Startup {}").unwrap();
        fs::write(
            dir.path().join("src").join("Models").join("User.cs"),
            "class User {}",
        )
        .unwrap();

        let report = walk_and_collect(dir.path(), &config()).unwrap();

        let mut got: Vec<String> = report
            .files
            .iter()
            .map(|f| f.relative_path.replace('\\', "/"))
            .collect();
        got.sort();
        assert_eq!(got, vec!["Program.cs", "src/Models/User.cs", "src/Startup.cs"]);
    }

    #[test]
    fn test_reserved_names_are_never_collected() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig {
            extensions: vec!["md".to_string(), "py".to_string()],
            ..config()
        };
        fs::write(dir.path().join("source.md"), "old report").unwrap();
        fs::write(dir.path().join("sourcefiles.py"), "import os").unwrap();
        fs::write(dir.path().join("README.md"), "readme").unwrap();

        let report = walk_and_collect(dir.path(), &config).unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].relative_path, "README.md");
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("latin1.cs"), b"caf\xe9").unwrap();

        let err = walk_and_collect(dir.path(), &config()).unwrap_err();
        match err {
            AggregateError::Decode { path } => assert!(path.ends_with("latin1.cs")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_decode_failure_stops_before_later_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.cs"), b"caf\xe9").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("z.cs"))
            .unwrap();

        let mut config = config();
        config.on_unreadable = crate::cli::UnreadablePolicy::Fail;

        let err = walk_and_collect(dir.path(), &config).unwrap_err();
        match err {
            AggregateError::Decode { path } => assert!(path.ends_with("a.cs")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_failure_is_read_error() {
        let dir = TempDir::new().unwrap();

        let err = read_text(dir.path()).unwrap_err();
        match err {
            AggregateError::Read { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_content_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let content = "\u{feff}line one\r\nline two\n";
        fs::write(dir.path().join("crlf.cs"), content).unwrap();

        let report = walk_and_collect(dir.path(), &config()).unwrap();
        assert_eq!(report.files[0].content, content);
    }

    #[test]
    fn test_empty_tree_gives_empty_report() {
        let dir = TempDir::new().unwrap();
        let report = walk_and_collect(dir.path(), &config()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summary.included, 0);
    }
}
