//! Batch command - check every matching document in a directory
//!
//! Files are scored in parallel. A file that cannot be read is reported and
//! skipped; the rest of the batch still runs.

use super::setup::{self, Session};
use super::SessionArgs;
use crate::input::read_document;
use crate::paths::report_paths;
use crate::reporters::{self, file_extension, ComplianceReport, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the summary written next to the per-file reports
pub const SUMMARY_FILE: &str = "compliance_summary.json";

/// One row of the batch summary
#[derive(Debug, Serialize)]
struct BatchEntry {
    file: String,
    score: Option<f64>,
    /// PASS, FAIL or ERROR
    status: &'static str,
    report: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchSummary<'a> {
    directory: String,
    pattern: &'a str,
    min_score: f64,
    total: usize,
    passed: usize,
    failed: usize,
    errors: usize,
    results: &'a [BatchEntry],
}

/// Run the batch command
pub fn run(
    args: &SessionArgs,
    directory: &Path,
    pattern: &str,
    output_dir: &Path,
    format: Option<&str>,
    min_score: Option<f64>,
    fail_on_noncompliant: bool,
) -> Result<()> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let session = Session::load(args)?;
    let min_score = session.min_score(min_score);
    let format = session.format(format, None)?;

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid file pattern '{}'", pattern))?
        .compile_matcher();

    let files = collect_files(directory, &matcher);
    if files.is_empty() {
        anyhow::bail!(
            "No files matching pattern '{}' found in {}",
            pattern,
            directory.display()
        );
    }
    debug!("Batch: {} files match '{}'", files.len(), pattern);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓▒░  "),
    );
    bar.set_message("Checking policies...");

    let reports = report_paths(output_dir, &files, file_extension(format));
    let entries: Vec<BatchEntry> = files
        .par_iter()
        .zip(&reports)
        .map(|(relative, report)| {
            let entry = check_file(&session, directory, relative, report, format, min_score);
            bar.inc(1);
            entry
        })
        .collect();
    bar.finish_and_clear();

    for entry in &entries {
        println!("\n{} {}", style("Analyzing:").bold(), entry.file);
        match (&entry.error, entry.score) {
            (Some(error), _) => {
                eprintln!(
                    "{} Error processing {}: {}",
                    style("✘").red(),
                    entry.file,
                    error
                );
            }
            (None, Some(score)) => {
                let status = if entry.status == "PASS" {
                    style(entry.status).green().bold()
                } else {
                    style(entry.status).red().bold()
                };
                println!("  Score: {:.2} ({})", score, status);
                if let Some(report) = &entry.report {
                    println!("  Report saved to: {}", style(report).cyan());
                }
            }
            (None, None) => {}
        }
    }

    let summary = BatchSummary {
        directory: directory.display().to_string(),
        pattern,
        min_score,
        total: entries.len(),
        passed: count(&entries, "PASS"),
        failed: count(&entries, "FAIL"),
        errors: count(&entries, "ERROR"),
        results: &entries,
    };
    let summary_path = output_dir.join(SUMMARY_FILE);
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    println!(
        "\n{} passed, {} failed, {} errors",
        style(summary.passed).green(),
        style(summary.failed).red(),
        summary.errors
    );
    println!(
        "{} All reports saved to: {}",
        style("✓").green(),
        style(output_dir.display()).cyan()
    );

    if fail_on_noncompliant && (summary.failed > 0 || summary.errors > 0) {
        eprintln!(
            "Failing due to --fail-on-noncompliant: {} of {} documents not compliant",
            summary.failed + summary.errors,
            summary.total
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Files under `directory` whose relative path matches, sorted
fn collect_files(directory: &Path, matcher: &GlobMatcher) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(directory).standard_filters(false).build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(directory)
                .ok()
                .map(Path::to_path_buf)
        })
        .filter(|relative| matcher.is_match(relative))
        .collect();

    files.sort();
    files
}

/// Score one file and write its report to `report`; failures become an ERROR entry
fn check_file(
    session: &Session,
    directory: &Path,
    relative: &Path,
    report: &Path,
    format: OutputFormat,
    min_score: f64,
) -> BatchEntry {
    let file = relative.display().to_string();
    match score_and_write(session, directory, relative, report, format, min_score) {
        Ok((score, status, report)) => BatchEntry {
            file,
            score: Some(score),
            status,
            report: Some(report),
            error: None,
        },
        Err(e) => {
            warn!("Batch: {} failed: {:#}", file, e);
            BatchEntry {
                file,
                score: None,
                status: "ERROR",
                report: None,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

fn score_and_write(
    session: &Session,
    directory: &Path,
    relative: &Path,
    path: &Path,
    format: OutputFormat,
    min_score: f64,
) -> Result<(f64, &'static str, String)> {
    let text = read_document(&directory.join(relative))?;
    let outcome = session.checker.check(&text, min_score);
    setup::report_history_status(&outcome.history);

    let document = relative.display().to_string();
    let report = ComplianceReport::new(&outcome.result, min_score).with_document(&document);
    let rendered = reporters::render(&report, format)?;

    setup::write_report(path, &rendered, format)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((outcome.result.score, outcome.result.status(), name))
}

fn count(entries: &[BatchEntry], status: &str) -> usize {
    entries.iter().filter(|e| e.status == status).count()
}
