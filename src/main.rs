//! SourceMd - source tree to single Markdown file
//!
//! A CLI tool that walks a directory, picks every text file with a
//! target extension and concatenates them into one report, one fenced
//! block per file, for pasting into reviews or LLM prompts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, unreadable or undecodable file, write failure)

mod aggregate;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::ReportSummary;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    // Initialize logging
    init_logging(&args);

    info!("SourceMd v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .sourcemd.toml.
fn handle_init_config(args: &Args) -> Result<()> {
    let dir = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to customize extensions, excludes, output and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation. Returns the process exit code.
fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let root = resolve_root(args.root.as_deref())?;
    info!("Root directory: {}", root.display());

    let mut config = load_config(&args, &root)?;
    config.merge_with_args(&args);

    let output_path = resolve_output(&root, &config.output());
    let output_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("Output path has no file name: {}", output_path.display()))?;

    let scan_config = scanner::ScanConfig::from(&config.scanner).reserve(&output_name);
    scan_config.validate().map_err(anyhow::Error::msg)?;
    debug!("Scan config: {:?}", scan_config);

    if args.dry_run {
        return handle_dry_run(&root, &scan_config);
    }

    // Nothing is written until every file has been read.
    let report = aggregate::walk_and_collect(&root, &scan_config)?;
    for file in &report.files {
        debug!(
            "Included {} ({} bytes, {})",
            file.relative_path,
            file.size,
            file.absolute_path.display()
        );
    }
    if report.is_empty() {
        warn!(
            "No files matching {:?} under {}, writing an empty report",
            scan_config.extensions,
            report.root.display()
        );
    } else {
        info!(
            "Collected {} files under {}",
            report.summary.included,
            report.root.display()
        );
    }

    let rendered = report::render(&report, config.report.format)?;
    report::persist(&rendered, &output_path)?;

    info!(
        "Wrote {} bytes to {}",
        rendered.len(),
        output_path.display()
    );

    if !args.quiet {
        print_summary(&report.summary, &output_path, start_time.elapsed().as_secs_f64());
    }

    Ok(0)
}

/// Handle --dry-run: list eligible files, write nothing.
fn handle_dry_run(root: &Path, scan_config: &scanner::ScanConfig) -> Result<i32> {
    println!("\n🔍 Dry run: scanning files (nothing is written)...\n");

    let file_scanner = scanner::FileScanner::new(root.to_path_buf(), scan_config.clone());
    let outcome = file_scanner.scan()?;

    if outcome.files.is_empty() {
        println!("   No matching source files found.");
    } else {
        println!("   Found {} files that would be included:\n", outcome.files.len());
        for file in &outcome.files {
            println!("     📄 {} ({} bytes)", file.path, file.size);
        }
        println!("\n   Total: {} files", outcome.files.len());
    }

    if outcome.skipped_binary > 0 || outcome.skipped_unreadable > 0 {
        println!(
            "   Skipped: {} binary, {} unreadable",
            outcome.skipped_binary, outcome.skipped_unreadable
        );
    }

    println!("\n✅ Dry run complete. No report was written.");
    Ok(0)
}

fn print_summary(summary: &ReportSummary, output_path: &Path, duration: f64) {
    println!("\n📊 Summary:");
    println!("   Files included: {}", summary.included);
    if summary.skipped_binary > 0 || summary.skipped_unreadable > 0 {
        println!(
            "   Skipped: {} binary | {} unreadable",
            summary.skipped_binary, summary.skipped_unreadable
        );
    }
    println!("   Content: {} bytes", summary.total_bytes);
    println!("   Duration: {:.2}s", duration);
    println!("\n✅ Report saved to: {}", output_path.display());
}

/// Resolve the scan root: the given directory, or the working directory.
fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    Ok(match root {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

/// Relative output paths are anchored at the scan root.
fn resolve_output(root: &Path, output: &str) -> PathBuf {
    let path = Path::new(output);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args, root: &Path) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try the scan root
    match Config::load_from_root(root) {
        Ok(Some(config)) => {
            info!("Loaded config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
