//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SourceMd - concatenate a source tree into one Markdown file
///
/// Walks a directory, picks every text file with a target extension and
/// writes them all into a single report, one fenced block per file.
///
/// Examples:
///   sourcemd
///   sourcemd --root ./MyProject --extensions cs,fs
///   sourcemd --exclude bin,obj --sort --output snapshot.md
///   sourcemd --dry-run
///   sourcemd --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory to scan
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Relative paths are resolved against the scan root.
    /// Default: source.md, or source.json with --format json
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// File extensions to include (comma-separated, without the dot)
    ///
    /// Example: --extensions cs,fs
    #[arg(
        short,
        long,
        value_name = "EXTS",
        value_delimiter = ',',
        env = "SOURCEMD_EXTENSIONS"
    )]
    pub extensions: Option<Vec<String>>,

    /// File names that are never included (comma-separated)
    ///
    /// The report's own file name is always reserved.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub reserved: Option<Vec<String>>,

    /// Directory names to skip during the walk (comma-separated)
    ///
    /// Example: --exclude "bin,obj,node_modules"
    #[arg(long, value_name = "DIRS", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Visit files in name order for reproducible output
    #[arg(long)]
    pub sort: bool,

    /// What to do with files that cannot be read (skip, fail)
    #[arg(long, value_name = "POLICY")]
    pub on_unreadable: Option<UnreadablePolicy>,

    /// Output format (markdown, json)
    ///
    /// Without --output, JSON reports are written to source.json.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sourcemd.toml in the scan root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list the files that would be included and exit
    ///
    /// Nothing is read past the binary probe and no report is written.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .sourcemd.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Policy for files the binary probe cannot open or read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Log a warning and leave the file out (default)
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.iter().all(|e| e.trim().is_empty()) {
                return Err("At least one extension must be given".to_string());
            }
        }

        if let Some(ref root) = self.root {
            if !root.exists() {
                return Err(format!("Root directory does not exist: {}", root.display()));
            }
            if !root.is_dir() {
                return Err(format!("Root path is not a directory: {}", root.display()));
            }
        }

        if let Some(ref output) = self.output {
            if output.file_name().is_none() {
                return Err(format!("Output path has no file name: {}", output.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
impl Args {
    /// Arguments equivalent to running with only `--root`.
    pub fn for_root(root: PathBuf) -> Self {
        Args {
            root: Some(root),
            output: None,
            extensions: None,
            reserved: None,
            exclude: None,
            sort: false,
            on_unreadable: None,
            format: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_comma_separated_lists() {
        let args = Args::try_parse_from([
            "sourcemd",
            "--extensions",
            "cs,fs",
            "--exclude",
            "bin,obj",
            "--format",
            "json",
            "--on-unreadable",
            "fail",
        ])
        .unwrap();
        assert_eq!(args.extensions, Some(vec!["cs".to_string(), "fs".to_string()]));
        assert_eq!(args.exclude, Some(vec!["bin".to_string(), "obj".to_string()]));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.on_unreadable, Some(UnreadablePolicy::Fail));
    }

    #[test]
    fn test_validation_missing_root() {
        let args = Args::for_root(PathBuf::from("/definitely/not/here"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = Args::for_root(std::env::temp_dir());
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_extensions() {
        let mut args = Args::for_root(std::env::temp_dir());
        args.extensions = Some(vec![String::new()]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::for_root(std::env::temp_dir());
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
