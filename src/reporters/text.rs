//! Text (terminal) reporter with colors and formatting

use super::ComplianceReport;
use crate::compare::Comparison;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Render report as formatted terminal output
pub fn render(report: &ComplianceReport<'_>) -> Result<String> {
    let result = report.result;
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}Policy Compliance Check{RESET}"));
    if let Some(document) = report.document {
        out.push_str(&format!("  {DIM}{document}{RESET}"));
    }
    out.push('\n');
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Overall Score: {BOLD}{:.2}{RESET}  {DIM}(min {:.2}){RESET}  Status: {}\n\n",
        result.score,
        report.min_score,
        status_badge(result.is_compliant)
    ));

    // Categories with evidence
    out.push_str(&format!("{BOLD}CATEGORIES{RESET}\n"));
    for (category, score) in &result.category_scores {
        let flag = if result.failed_categories.contains(category) {
            format!("  {RED}below threshold{RESET}")
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<28} {}{}\n",
            category,
            format_score(*score),
            flag
        ));
        if let Some(evidence) = result.found_patterns.get(category) {
            for e in evidence {
                out.push_str(&format!("    {DIM}-{RESET} {}\n", e.matched));
            }
        }
    }
    out.push('\n');

    // Proximity
    let pairs: Vec<(&str, f64)> = result.co_occurring_pairs().collect();
    if !pairs.is_empty() {
        out.push_str(&format!("{BOLD}CO-OCCURRING CONCEPTS{RESET}\n"));
        for (pair, score) in pairs {
            out.push_str(&format!("  {:.2}  {}\n", score, pair));
        }
        out.push('\n');
    }

    // Trend
    if let Some(trend) = report.chartable_trend() {
        let first = trend.overall_scores.first().copied().unwrap_or_default();
        let last = trend.overall_scores.last().copied().unwrap_or_default();
        out.push_str(&format!(
            "{BOLD}TREND{RESET} {DIM}(last {} checks){RESET}\n",
            trend.len()
        ));
        out.push_str(&format!(
            "  {:.2} -> {:.2}  ({})\n\n",
            first,
            last,
            format_delta(last - first)
        ));
    }

    if result.is_compliant {
        out.push_str(&format!(
            "{DIM}Document meets the minimum compliance score.{RESET}\n"
        ));
    } else {
        out.push_str(&format!(
            "{DIM}Address the lowest-scoring categories to reach {:.2}.{RESET}\n",
            report.min_score
        ));
    }

    Ok(out)
}

/// Render a comparison as a side-by-side terminal table
pub fn render_comparison(comparison: &Comparison) -> Result<String> {
    let left = &comparison.left;
    let right = &comparison.right;
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Policy Comparison{RESET}\n"));
    out.push_str(&format!("  1. {}\n  2. {}\n", left.label, right.label));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Overall Score: {:.2} ({}) -> {:.2} ({})  {}\n\n",
        left.result.score,
        status_badge(left.result.is_compliant),
        right.result.score,
        status_badge(right.result.is_compliant),
        format_delta(comparison.score_delta())
    ));

    out.push_str(&format!("{BOLD}CATEGORIES{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  {:<28} {:>6} {:>6} {:>7}{RESET}\n",
        "CATEGORY", "1", "2", "DIFF"
    ));
    for delta in &comparison.categories {
        out.push_str(&format!(
            "  {:<28} {:>6} {:>6} {:>7}\n",
            delta.category,
            optional_score(delta.left),
            optional_score(delta.right),
            delta
                .delta()
                .map(format_delta)
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    out.push('\n');

    if !comparison.patterns.is_empty() {
        out.push_str(&format!("{BOLD}PATTERN MATCHES{RESET}\n"));
        for presence in &comparison.patterns {
            out.push_str(&format!(
                "  {}  {}  {}\n",
                mark(presence.in_left),
                mark(presence.in_right),
                presence.pattern
            ));
        }
    }

    Ok(out)
}

fn status_badge(is_compliant: bool) -> String {
    if is_compliant {
        format!("{GREEN}{BOLD}PASS{RESET}")
    } else {
        format!("{RED}{BOLD}FAIL{RESET}")
    }
}

fn format_score(score: f64) -> String {
    let color = if score >= 0.8 {
        GREEN
    } else if score >= 0.5 {
        YELLOW
    } else {
        RED
    };
    format!("{color}{:.2}{RESET}", score)
}

fn format_delta(delta: f64) -> String {
    let color = if delta > 0.0 {
        GREEN
    } else if delta < 0.0 {
        RED
    } else {
        DIM
    };
    format!("{color}{:+.2}{RESET}", delta)
}

fn optional_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "-".to_string())
}

fn mark(present: bool) -> String {
    if present {
        format!("{GREEN}✓{RESET}")
    } else {
        format!("{RED}✘{RESET}")
    }
}
