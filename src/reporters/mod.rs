//! Output reporters for compliance results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown
//! - `html` - Standalone HTML report with an inline trend chart
//!
//! Rendering only ever reads a finished [`ComplianceResult`]; a failed render
//! leaves the result untouched.

mod html;
mod json;
mod markdown;
mod text;

use crate::compare::Comparison;
use crate::models::{ComplianceResult, Trend};
use anyhow::{anyhow, Result};
use std::path::Path;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
    Html,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown, html",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

impl OutputFormat {
    /// Infer the format from an output file's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    }
}

/// Everything a single-document report shows
#[derive(Debug, Clone, Copy)]
pub struct ComplianceReport<'a> {
    pub result: &'a ComplianceResult,
    /// Document name shown in the header
    pub document: Option<&'a str>,
    pub min_score: f64,
    /// Recent history; charted only with two or more points
    pub trend: Option<&'a Trend>,
}

impl<'a> ComplianceReport<'a> {
    pub fn new(result: &'a ComplianceResult, min_score: f64) -> Self {
        Self {
            result,
            document: None,
            min_score,
            trend: None,
        }
    }

    pub fn with_document(mut self, document: &'a str) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_trend(mut self, trend: &'a Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Trend to chart, if there is enough of it
    pub(crate) fn chartable_trend(&self) -> Option<&'a Trend> {
        self.trend.filter(|t| t.is_chartable())
    }
}

/// Render a compliance report in the specified format
pub fn render(report: &ComplianceReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
        OutputFormat::Html => html::render(report),
    }
}

/// Render a two-document comparison in the specified format
pub fn render_comparison(comparison: &Comparison, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_comparison(comparison),
        OutputFormat::Json => json::render_comparison(comparison),
        OutputFormat::Markdown => markdown::render_comparison(comparison),
        OutputFormat::Html => html::render_comparison(comparison),
    }
}

/// Strip terminal colors for files and pipes
pub fn plain(rendered: &str) -> String {
    console::strip_ansi_codes(rendered).into_owned()
}
