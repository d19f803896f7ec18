//! Check command - score a single policy document

use super::setup::{self, Session};
use super::SessionArgs;
use crate::history::DEFAULT_RECENT_LIMIT;
use crate::input::read_document;
use crate::models::Trend;
use crate::reporters::{self, ComplianceReport, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::warn;

/// Run the check command.
///
/// Without `--output` the report goes to stdout in the chosen format. With it,
/// stdout gets the text summary and the file gets the chosen format.
pub fn run(
    args: &SessionArgs,
    policy_file: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    min_score: Option<f64>,
    fail_on_noncompliant: bool,
) -> Result<()> {
    let session = Session::load(args)?;
    let min_score = session.min_score(min_score);
    let format = session.format(format, output)?;

    let text = read_document(policy_file)
        .with_context(|| format!("Failed to read policy file {}", policy_file.display()))?;

    let outcome = session.checker.check(&text, min_score);
    setup::report_history_status(&outcome.history);

    let trend = session
        .checker
        .trend(DEFAULT_RECENT_LIMIT)
        .unwrap_or_else(|e| {
            warn!("Could not load history trend: {}", e);
            Trend::default()
        });

    let document = policy_file.display().to_string();
    let report = ComplianceReport::new(&outcome.result, min_score)
        .with_document(&document)
        .with_trend(&trend);

    let console_format = if output.is_some() {
        OutputFormat::Text
    } else {
        format
    };
    let rendered = reporters::render(&report, console_format)?;
    println!("{}", setup::for_terminal(&rendered));

    if let Some(path) = output {
        let rendered = reporters::render(&report, format)?;
        setup::write_report(path, &rendered, format)?;
        println!(
            "{} Detailed report saved to: {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    if fail_on_noncompliant && !outcome.result.is_compliant {
        eprintln!(
            "Failing due to --fail-on-noncompliant: score {:.2} is below {:.2}",
            outcome.result.score, min_score
        );
        std::process::exit(1);
    }

    Ok(())
}
