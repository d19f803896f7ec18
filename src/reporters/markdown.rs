//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments on policy changes
//! - Compliance wikis
//! - Review checklists

use super::ComplianceReport;
use crate::compare::Comparison;
use crate::models::{ComplianceResult, Trend};
use anyhow::Result;
use chrono::Local;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &ComplianceReport<'_>) -> Result<String> {
    let result = report.result;
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str(&render_category_scores(result));
    md.push('\n');

    md.push_str(&render_evidence(result));
    md.push('\n');

    if result.co_occurring_pairs().next().is_some() {
        md.push_str(&render_proximity(result));
        md.push('\n');
    }

    if let Some(trend) = report.chartable_trend() {
        md.push_str(&render_trend(trend));
        md.push('\n');
    }

    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &ComplianceReport<'_>) -> String {
    let status_emoji = if report.result.is_compliant {
        "✅"
    } else {
        "❌"
    };
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let document = report
        .document
        .map(|d| format!("Document: `{}`\n\n", d))
        .unwrap_or_default();

    format!(
        r#"# {} Policy Compliance Report

**Status: {}** | **Score: {:.2}**

{}Generated: {}
"#,
        status_emoji,
        report.result.status(),
        report.result.score,
        document,
        timestamp
    )
}

fn render_summary(report: &ComplianceReport<'_>) -> String {
    let result = report.result;
    format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| **Overall Score** | {:.2} |
| **Minimum Score** | {:.2} |
| **Status** | {} |
| **Patterns Matched** | {} |
| **Categories Below Threshold** | {} |
"#,
        result.score,
        report.min_score,
        result.status(),
        result.matched_pattern_count(),
        result.failed_categories.len()
    )
}

fn render_category_scores(result: &ComplianceResult) -> String {
    let mut md = String::from("## Category Scores\n\n| Category | Score | Status |\n|----------|-------|--------|\n");
    for (category, score) in &result.category_scores {
        let status = if result.failed_categories.contains(category) {
            "⚠️ Below threshold"
        } else {
            "✓"
        };
        md.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            escape_cell(category),
            score,
            status
        ));
    }
    md
}

fn render_evidence(result: &ComplianceResult) -> String {
    let mut md = String::from("## Evidence\n\n");
    if result.found_patterns.is_empty() {
        md.push_str("No compliance patterns were found in this document.\n");
        return md;
    }

    for (category, evidence) in &result.found_patterns {
        md.push_str(&format!("### {}\n\n", category));
        for e in evidence {
            md.push_str(&format!("- {} (`{}`)\n", e.matched, e.pattern));
        }
        md.push('\n');
    }
    md
}

fn render_proximity(result: &ComplianceResult) -> String {
    let mut md = String::from(
        "## Co-occurring Concepts\n\n| Pattern Pair | Proximity |\n|--------------|-----------|\n",
    );
    for (pair, score) in result.co_occurring_pairs() {
        md.push_str(&format!("| {} | {:.2} |\n", escape_cell(pair), score));
    }
    md
}

fn render_trend(trend: &Trend) -> String {
    let mut md = String::from("## Historical Trend\n\n| Checked | Overall |");
    for category in trend.category_scores.keys() {
        md.push_str(&format!(" {} |", escape_cell(category)));
    }
    md.push_str("\n|---------|---------|");
    for _ in trend.category_scores.keys() {
        md.push_str("---------|");
    }
    md.push('\n');

    for (i, (timestamp, overall)) in trend
        .timestamps
        .iter()
        .zip(&trend.overall_scores)
        .enumerate()
    {
        md.push_str(&format!("| {} | {:.2} |", timestamp, overall));
        for scores in trend.category_scores.values() {
            match scores.get(i).copied().flatten() {
                Some(score) => md.push_str(&format!(" {:.2} |", score)),
                None => md.push_str(" - |"),
            }
        }
        md.push('\n');
    }
    md
}

fn render_footer() -> String {
    "---\n\n*Generated by govcheck. Scores reflect pattern presence, not a legal assessment.*\n"
        .to_string()
}

/// Render a comparison as Markdown tables
pub fn render_comparison(comparison: &Comparison) -> Result<String> {
    let left = &comparison.left;
    let right = &comparison.right;
    let mut md = String::from("# Policy Compliance Comparison\n\n");

    md.push_str(&format!(
        r#"| Metric | {} | {} |
|--------|------|------|
| Overall Score | {:.2} | {:.2} |
| Status | {} | {} |

Score change: **{:+.2}**

"#,
        escape_cell(&left.label),
        escape_cell(&right.label),
        left.result.score,
        right.result.score,
        left.result.status(),
        right.result.status(),
        comparison.score_delta()
    ));

    md.push_str("## Category Analysis\n\n| Category | Before | After | Difference |\n|----------|--------|-------|------------|\n");
    for delta in &comparison.categories {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&delta.category),
            optional(delta.left, |s| format!("{:.2}", s)),
            optional(delta.right, |s| format!("{:.2}", s)),
            optional(delta.delta(), |d| format!("{:+.2}", d)),
        ));
    }
    md.push('\n');

    md.push_str("## Pattern Matches\n\n| Pattern | Before | After |\n|---------|--------|-------|\n");
    for presence in &comparison.patterns {
        md.push_str(&format!(
            "| `{}` | {} | {} |\n",
            escape_cell(&presence.pattern),
            if presence.in_left { "✓" } else { "✘" },
            if presence.in_right { "✓" } else { "✘" },
        ));
    }

    Ok(md)
}

fn optional(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "-".to_string())
}

/// Pipes would split a table cell
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
