//! Compare command - score two documents side by side
//!
//! Comparisons are read-only: neither document is recorded in history.

use super::setup::{self, Session};
use super::SessionArgs;
use crate::compare::compare_results;
use crate::input::read_document;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the compare command
pub fn run(
    args: &SessionArgs,
    policy1: &Path,
    policy2: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    min_score: Option<f64>,
) -> Result<()> {
    let session = Session::load(args)?;
    let min_score = session.min_score(min_score);
    let format = session.format(format, output)?;
    let scorer = session.checker.scorer();

    let left = read_document(policy1)
        .with_context(|| format!("Failed to read policy file {}", policy1.display()))?;
    let right = read_document(policy2)
        .with_context(|| format!("Failed to read policy file {}", policy2.display()))?;

    let comparison = compare_results(
        &label(policy1),
        scorer.score(&left, min_score),
        &label(policy2),
        scorer.score(&right, min_score),
    );

    let console_format = if output.is_some() {
        OutputFormat::Text
    } else {
        format
    };
    let rendered = reporters::render_comparison(&comparison, console_format)?;
    println!("{}", setup::for_terminal(&rendered));

    if let Some(path) = output {
        let rendered = reporters::render_comparison(&comparison, format)?;
        setup::write_report(path, &rendered, format)?;
        println!(
            "{} Comparison report saved to: {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    Ok(())
}

/// File name for column headers, falling back to the full path
fn label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_uses_file_name() {
        assert_eq!(label(Path::new("policies/v1/draft.txt")), "draft.txt");
        assert_eq!(label(Path::new("..")), "..");
    }
}
