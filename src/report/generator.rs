//! Report generation.
//!
//! This module renders the aggregated files as the Markdown source dump
//! (or JSON) and writes it to disk.

use crate::cli::OutputFormat;
use crate::error::AggregateError;
use crate::models::{Report, SourceFile};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Append one file block to the report buffer.
///
/// Layout: `\<relative_path>:`, a fenced body holding the raw content,
/// then a blank line.
pub fn push_file_block(buffer: &mut String, relative_path: &str, content: &str) {
    buffer.push('\\');
    buffer.push_str(relative_path);
    buffer.push_str(":\n```\n");
    buffer.push_str(content);
    buffer.push_str("\n```\n\n");
}

/// Generate the Markdown source dump.
pub fn generate_markdown_report(report: &Report) -> String {
    let capacity = report
        .files
        .iter()
        .map(|f| f.relative_path.len() + f.content.len() + 12)
        .sum();
    let mut output = String::with_capacity(capacity);

    for file in &report.files {
        push_file_block(&mut output, &file.relative_path, &file.content);
    }

    output
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    path: &'a str,
    content: &'a str,
}

impl<'a> From<&'a SourceFile> for JsonEntry<'a> {
    fn from(file: &'a SourceFile) -> Self {
        Self {
            path: &file.relative_path,
            content: &file.content,
        }
    }
}

/// Generate a JSON report: an array of `{ "path", "content" }` objects.
pub fn generate_json_report(report: &Report) -> Result<String> {
    let entries: Vec<JsonEntry<'_>> = report.files.iter().map(JsonEntry::from).collect();
    serde_json::to_string_pretty(&entries).map_err(Into::into)
}

/// Render the report in the requested format.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Write the rendered report, replacing any existing file.
pub fn persist(content: &str, path: &Path) -> Result<(), AggregateError> {
    std::fs::write(path, content).map_err(|source| AggregateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
