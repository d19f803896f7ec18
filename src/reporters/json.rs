//! JSON reporter
//!
//! Outputs the full ComplianceResult as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use super::ComplianceReport;
use crate::compare::Comparison;
use crate::models::{ComplianceResult, Trend};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<&'a str>,
    min_score: f64,
    status: &'static str,
    #[serde(flatten)]
    result: &'a ComplianceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    trend: Option<&'a Trend>,
}

/// Render report as JSON
pub fn render(report: &ComplianceReport<'_>) -> Result<String> {
    let json = JsonReport {
        document: report.document,
        min_score: report.min_score,
        status: report.result.status(),
        result: report.result,
        trend: report.trend,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[derive(Serialize)]
struct JsonComparison<'a> {
    #[serde(flatten)]
    comparison: &'a Comparison,
    score_delta: f64,
}

/// Render a comparison as JSON, including the overall delta
pub fn render_comparison(comparison: &Comparison) -> Result<String> {
    let json = JsonComparison {
        comparison,
        score_delta: comparison.score_delta(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
