//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sourcemd.toml` files.

use crate::cli::{OutputFormat, UnreadablePolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the scan root.
pub const CONFIG_FILE_NAME: &str = ".sourcemd.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report file path, relative to the scan root unless absolute.
    ///
    /// Unset means `source.md`, or `source.json` for the JSON format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// File scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// File extensions to include, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File names never included, in addition to the report's own name.
    #[serde(default = "default_reserved_names")]
    pub reserved_names: Vec<String>,

    /// Directory names pruned from the walk.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Visit directory entries in file-name order.
    #[serde(default)]
    pub sort: bool,

    /// What to do with files the binary probe cannot read.
    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            reserved_names: default_reserved_names(),
            excludes: Vec::new(),
            sort: false,
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

fn default_reserved_names() -> Vec<String> {
    vec!["sourcefiles.py".to_string()]
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format of the report.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// The report path, falling back to a name that matches the format.
    pub fn output(&self) -> String {
        match self.general.output {
            Some(ref output) => output.clone(),
            None => match self.report.format {
                OutputFormat::Markdown => "source.md".to_string(),
                OutputFormat::Json => "source.json".to_string(),
            },
        }
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the scan root.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_root(root: &Path) -> Result<Option<Self>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.to_string_lossy().to_string());
        }

        if let Some(ref extensions) = args.extensions {
            self.scanner.extensions = extensions.clone();
        }
        if let Some(ref reserved) = args.reserved {
            self.scanner.reserved_names = reserved.clone();
        }
        if let Some(ref excludes) = args.exclude {
            self.scanner.excludes = excludes.clone();
        }
        if let Some(policy) = args.on_unreadable {
            self.scanner.on_unreadable = policy;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags only ever switch sorting on
        if args.sort {
            self.scanner.sort = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, None);
        assert_eq!(config.output(), "source.md");
        assert_eq!(config.scanner.extensions, vec!["cs"]);
        assert_eq!(config.scanner.reserved_names, vec!["sourcefiles.py"]);
        assert!(config.scanner.excludes.is_empty());
        assert!(!config.scanner.sort);
        assert_eq!(config.scanner.on_unreadable, UnreadablePolicy::Skip);
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "all_sources.md"

[scanner]
extensions = ["cs", "fs"]
excludes = ["bin", "obj"]
sort = true
on_unreadable = "fail"

[report]
format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.output(), "all_sources.md");
        assert_eq!(config.scanner.extensions, vec!["cs", "fs"]);
        assert_eq!(config.scanner.excludes, vec!["bin", "obj"]);
        assert_eq!(config.scanner.reserved_names, vec!["sourcefiles.py"]);
        assert!(config.scanner.sort);
        assert_eq!(config.scanner.on_unreadable, UnreadablePolicy::Fail);
        assert_eq!(config.report.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_root() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_root(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[scanner]\nextensions = [\"vb\"]\n",
        )
        .unwrap();
        let config = Config::load_from_root(dir.path()).unwrap().unwrap();
        assert_eq!(config.scanner.extensions, vec!["vb"]);
    }

    #[test]
    fn test_load_invalid_config_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[scanner\n").unwrap();
        assert!(Config::load_from_root(dir.path()).is_err());
    }

    #[test]
    fn test_merge_only_explicit_args() {
        let mut config: Config =
            toml::from_str("[scanner]\nextensions = [\"fs\"]\nsort = true\n").unwrap();
        let mut args = Args::for_root(PathBuf::from("."));
        args.output = Some(PathBuf::from("out.md"));
        args.format = Some(OutputFormat::Json);

        config.merge_with_args(&args);

        assert_eq!(config.output(), "out.md");
        assert_eq!(config.scanner.extensions, vec!["fs"]);
        assert!(config.scanner.sort);
        assert_eq!(config.report.format, OutputFormat::Json);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.scanner.extensions, vec!["cs"]);
        assert_eq!(parsed.output(), "source.md");
    }

    #[test]
    fn test_json_format_defaults_to_json_output() {
        let mut config = Config::default();
        config.report.format = OutputFormat::Json;
        assert_eq!(config.output(), "source.json");

        let mut args = Args::for_root(PathBuf::from("."));
        args.output = Some(PathBuf::from("dump.md"));
        config.merge_with_args(&args);
        assert_eq!(config.output(), "dump.md");

        let explicit: Config =
            toml::from_str("[general]\noutput = \"source.md\"\n[report]\nformat = \"json\"\n")
                .unwrap();
        assert_eq!(explicit.output(), "source.md");
    }
}
