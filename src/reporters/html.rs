//! HTML reporter with embedded styles and charts
//!
//! Generates a standalone HTML report that can be viewed in any browser.
//! Includes:
//! - Overall score and PASS/FAIL badge
//! - Category score progress bars with matched evidence
//! - Proximity table for co-occurring concepts
//! - Inline SVG trend chart when history has two or more points

use super::ComplianceReport;
use crate::compare::Comparison;
use crate::models::{ComplianceResult, Trend};
use anyhow::Result;
use chrono::Local;

/// Trend chart size in SVG user units
const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 200.0;
const CHART_PADDING: f64 = 24.0;
/// Number of `.series-N` colors in the stylesheet
const CATEGORY_COLORS: usize = 4;

/// Render report as standalone HTML
pub fn render(report: &ComplianceReport<'_>) -> Result<String> {
    let result = report.result;
    let mut html = String::new();

    html.push_str(&render_head("Policy Compliance Report"));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header("Policy Compliance Report", report.document));
    html.push_str("<div class=\"content\">\n");

    html.push_str(&render_status_section(result, report.min_score));
    html.push_str(&render_category_scores(result));

    if result.co_occurring_pairs().next().is_some() {
        html.push_str(&render_proximity(result));
    }

    if let Some(trend) = report.chartable_trend() {
        html.push_str(&render_trend(trend));
    }

    html.push_str("</div>\n"); // content
    html.push_str(&render_footer());
    html.push_str("</div>\n</body>\n</html>");

    Ok(html)
}

fn render_head(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>
{CSS}
    </style>
</head>
"#,
        html_escape(title)
    )
}

fn render_header(title: &str, document: Option<&str>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let document = document
        .map(|d| format!("    <p class=\"document\">{}</p>\n", html_escape(d)))
        .unwrap_or_default();
    format!(
        r#"<div class="header">
    <h1>{}</h1>
{}    <p class="timestamp">Generated {}</p>
</div>
"#,
        html_escape(title),
        document,
        timestamp
    )
}

fn render_status_section(result: &ComplianceResult, min_score: f64) -> String {
    let (class, description) = if result.is_compliant {
        ("status-pass", "Document meets the minimum compliance score")
    } else {
        ("status-fail", "Document is below the minimum compliance score")
    };

    format!(
        r#"<div class="status-section">
    <div class="status-badge {}">{}</div>
    <div class="score">Overall Score: {:.2} (minimum {:.2})</div>
    <p class="status-description">{}</p>
</div>
"#,
        class,
        result.status(),
        result.score,
        min_score,
        description
    )
}

fn render_category_scores(result: &ComplianceResult) -> String {
    let mut html = String::from(
        "<div class=\"section\">\n    <h2 class=\"section-title\">Category Scores</h2>\n    <div class=\"metrics-grid\">\n",
    );

    for (category, score) in &result.category_scores {
        let below = if result.failed_categories.contains(category) {
            "<span class=\"below\">below threshold</span>"
        } else {
            ""
        };
        let evidence = result
            .found_patterns
            .get(category)
            .map(|items| {
                items
                    .iter()
                    .map(|e| {
                        format!(
                            "<li title=\"{}\">{}</li>",
                            html_escape(&e.pattern),
                            html_escape(&e.matched)
                        )
                    })
                    .collect::<String>()
            })
            .unwrap_or_default();

        html.push_str(&format!(
            r#"        <div class="metric-card">
            <h3>{} {}</h3>
            <div class="metric-value">{:.2}</div>
            <div class="metric-bar">
                <div class="metric-bar-fill {}" style="width: {:.0}%"></div>
            </div>
            <ul class="evidence">{}</ul>
        </div>
"#,
            html_escape(category),
            below,
            score,
            bar_class(*score),
            (score * 100.0).clamp(0.0, 100.0),
            evidence
        ));
    }

    html.push_str("    </div>\n</div>\n");
    html
}

fn render_proximity(result: &ComplianceResult) -> String {
    let mut html = String::from(
        "<div class=\"section\">\n    <h2 class=\"section-title\">Co-occurring Concepts</h2>\n    <table>\n        <tr><th>Pattern Pair</th><th>Proximity</th></tr>\n",
    );
    for (pair, score) in result.co_occurring_pairs() {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{:.2}</td></tr>\n",
            html_escape(pair),
            score
        ));
    }
    html.push_str("    </table>\n</div>\n");
    html
}

fn render_trend(trend: &Trend) -> String {
    let mut html = String::from(
        "<div class=\"section\">\n    <h2 class=\"section-title\">Historical Trend</h2>\n",
    );
    html.push_str(&trend_svg(trend));

    html.push_str("    <table>\n        <tr><th>Checked</th><th>Overall</th>");
    for category in trend.category_scores.keys() {
        html.push_str(&format!("<th>{}</th>", html_escape(category)));
    }
    html.push_str("</tr>\n");
    for (i, (timestamp, score)) in trend
        .timestamps
        .iter()
        .zip(&trend.overall_scores)
        .enumerate()
    {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{:.2}</td>",
            html_escape(timestamp),
            score
        ));
        for series in trend.category_scores.values() {
            match series.get(i).copied().flatten() {
                Some(score) => html.push_str(&format!("<td>{:.2}</td>", score)),
                None => html.push_str("<td>-</td>"),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("    </table>\n</div>\n");
    html
}

/// Overall score as a line with points, one thinner line per category.
/// Oldest on the left; a category missing from a check breaks its line.
fn trend_svg(trend: &Trend) -> String {
    let scores = &trend.overall_scores;
    // Scores above 1 are possible with unnormalized weights
    let top = scores.iter().copied().fold(1.0_f64, f64::max);
    let inner_w = CHART_WIDTH - 2.0 * CHART_PADDING;
    let inner_h = CHART_HEIGHT - 2.0 * CHART_PADDING;
    let step = inner_w / (scores.len().max(2) - 1) as f64;
    let point = |i: usize, score: f64| {
        let x = CHART_PADDING + step * i as f64;
        let y = CHART_PADDING + inner_h * (1.0 - score.max(0.0) / top);
        (x, y)
    };

    let points: Vec<(f64, f64)> = scores
        .iter()
        .enumerate()
        .map(|(i, score)| point(i, *score))
        .collect();

    let dots: String = points
        .iter()
        .map(|(x, y)| format!("<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\"/>", x, y))
        .collect();

    let mut category_lines = String::new();
    for (n, (category, series)) in trend.category_scores.iter().enumerate() {
        let segments = series
            .iter()
            .enumerate()
            .collect::<Vec<_>>()
            .split(|(_, score)| score.is_none())
            .filter(|run| !run.is_empty())
            .map(|run| {
                polyline_points(
                    run.iter()
                        .filter_map(|(i, score)| score.map(|s| point(*i, s.min(top)))),
                )
            })
            .collect::<Vec<_>>();
        for segment in segments {
            category_lines.push_str(&format!(
                "        <polyline points=\"{}\" class=\"trend-category series-{}\"><title>{}</title></polyline>\n",
                segment,
                n % CATEGORY_COLORS,
                html_escape(category)
            ));
        }
    }

    format!(
        r#"    <svg class="trend" viewBox="0 0 {w} {h}" role="img" aria-label="Score trend">
        <line x1="{p}" y1="{base:.1}" x2="{right:.1}" y2="{base:.1}" class="axis"/>
{category_lines}        <polyline points="{polyline}" class="trend-line"><title>Overall</title></polyline>
        <g class="trend-points">{dots}</g>
    </svg>
"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        p = CHART_PADDING,
        base = CHART_HEIGHT - CHART_PADDING,
        right = CHART_WIDTH - CHART_PADDING,
        category_lines = category_lines,
        polyline = polyline_points(points.into_iter()),
        dots = dots
    )
}

fn polyline_points(points: impl Iterator<Item = (f64, f64)>) -> String {
    points
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_footer() -> String {
    r#"<div class="footer">
    <p>Generated by govcheck. Scores reflect pattern presence, not a legal assessment.</p>
</div>
"#
    .to_string()
}

/// Render a comparison as standalone HTML
pub fn render_comparison(comparison: &Comparison) -> Result<String> {
    let left = &comparison.left;
    let right = &comparison.right;
    let mut html = String::new();

    html.push_str(&render_head("Policy Compliance Comparison"));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header("Policy Compliance Comparison", None));
    html.push_str("<div class=\"content\">\n");

    html.push_str(&format!(
        r#"<div class="section">
    <table>
        <tr><th>Metric</th><th>{}</th><th>{}</th></tr>
        <tr><td>Overall Score</td><td>{:.2}</td><td>{:.2}</td></tr>
        <tr><td>Status</td><td>{}</td><td>{}</td></tr>
    </table>
    <p class="score">Score change: {:+.2}</p>
</div>
"#,
        html_escape(&left.label),
        html_escape(&right.label),
        left.result.score,
        right.result.score,
        left.result.status(),
        right.result.status(),
        comparison.score_delta()
    ));

    html.push_str("<div class=\"section\">\n    <h2 class=\"section-title\">Category Analysis</h2>\n    <table>\n        <tr><th>Category</th><th>Before</th><th>After</th><th>Difference</th></tr>\n");
    for delta in &comparison.categories {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&delta.category),
            delta.left.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".into()),
            delta.right.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".into()),
            delta.delta().map(|d| format!("{:+.2}", d)).unwrap_or_else(|| "-".into()),
        ));
    }
    html.push_str("    </table>\n</div>\n");

    html.push_str("<div class=\"section\">\n    <h2 class=\"section-title\">Pattern Matches</h2>\n    <table>\n        <tr><th>Pattern</th><th>Before</th><th>After</th></tr>\n");
    for presence in &comparison.patterns {
        html.push_str(&format!(
            "        <tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&presence.pattern),
            if presence.in_left { "✓" } else { "✘" },
            if presence.in_right { "✓" } else { "✘" },
        ));
    }
    html.push_str("    </table>\n</div>\n");

    html.push_str("</div>\n");
    html.push_str(&render_footer());
    html.push_str("</div>\n</body>\n</html>");
    Ok(html)
}

fn bar_class(score: f64) -> &'static str {
    if score >= 0.8 {
        "bar-good"
    } else if score >= 0.5 {
        "bar-moderate"
    } else {
        "bar-poor"
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --primary-color: #0f766e;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --card-background: white;
    --border-color: #e2e8f0;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: var(--text-color);
    background: var(--background-color);
    padding: 2rem;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    background: var(--card-background);
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    overflow: hidden;
}

.header {
    background: linear-gradient(135deg, #0f766e 0%, #0369a1 100%);
    color: white;
    padding: 2.5rem 2rem;
    text-align: center;
}

.header h1 { font-size: 2.25rem; margin-bottom: 0.5rem; }
.header .document { font-family: monospace; opacity: 0.95; }
.header .timestamp { opacity: 0.9; font-size: 0.95rem; }

.content { padding: 2rem; }

.status-section {
    text-align: center;
    padding: 2rem;
    background: #f1f5f9;
    border-radius: 8px;
    margin-bottom: 2rem;
}

.status-badge {
    display: inline-block;
    font-size: 2.5rem;
    font-weight: bold;
    padding: 0.5rem 2rem;
    border-radius: 12px;
    margin-bottom: 1rem;
    color: white;
}

.status-pass { background: #10b981; }
.status-fail { background: #ef4444; }

.score { font-size: 1.25rem; color: #64748b; margin-bottom: 0.5rem; }
.status-description { color: #64748b; font-style: italic; }

.section { margin-bottom: 2rem; }
.section-title {
    font-size: 1.5rem;
    margin-bottom: 1rem;
    padding-bottom: 0.5rem;
    border-bottom: 2px solid var(--border-color);
}

.metrics-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
    gap: 1rem;
}

.metric-card {
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 1.5rem;
}

.metric-card h3 { font-size: 0.9rem; color: #64748b; margin-bottom: 0.5rem; text-transform: uppercase; }
.metric-value { font-size: 2rem; font-weight: bold; margin-bottom: 0.5rem; }
.below { color: #dc2626; font-size: 0.75rem; margin-left: 0.5rem; }

.metric-bar { height: 8px; background: #e2e8f0; border-radius: 4px; overflow: hidden; }
.metric-bar-fill { height: 100%; border-radius: 4px; }
.bar-good { background: #10b981; }
.bar-moderate { background: #f59e0b; }
.bar-poor { background: #ef4444; }

.evidence { margin-top: 0.75rem; padding-left: 1.25rem; color: #475569; font-size: 0.9rem; }

table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
th, td { padding: 0.5rem 0.75rem; border: 1px solid var(--border-color); text-align: left; }
th { background: #f1f5f9; }

.trend { width: 100%; max-width: 600px; height: auto; margin-bottom: 1rem; }
.trend .axis { stroke: #cbd5e1; stroke-width: 1; }
.trend .trend-line { fill: none; stroke: var(--primary-color); stroke-width: 2; }
.trend .trend-points circle { fill: var(--primary-color); }
.trend .trend-category { fill: none; stroke-width: 1.5; stroke-dasharray: 4 3; }
.trend .series-0 { stroke: #16a34a; }
.trend .series-1 { stroke: #d97706; }
.trend .series-2 { stroke: #9333ea; }
.trend .series-3 { stroke: #0891b2; }

.footer {
    text-align: center;
    padding: 2rem;
    color: #64748b;
    border-top: 1px solid var(--border-color);
}

@media (max-width: 768px) {
    body { padding: 1rem; }
    .header { padding: 2rem 1rem; }
    .header h1 { font-size: 1.75rem; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{test_comparison, test_result, test_trend};
    use crate::scoring::ComplianceScorer;

    #[test]
    fn test_html_render_escapes_document_name() {
        let result = test_result();
        let report = ComplianceReport::new(&result, 0.6).with_document("<policy & co>.txt");
        let html = render(&report).expect("render HTML");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;policy &amp; co&gt;.txt"));
        assert!(html.contains("status-pass"));
        assert!(html.contains("Fairness &amp; Privacy"));
        assert!(html.contains("Co-occurring Concepts"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_html_trend_chart() {
        let result = test_result();
        let trend = test_trend();
        let html = render(&ComplianceReport::new(&result, 0.6).with_trend(&trend)).unwrap();
        assert!(html.contains("<svg class=\"trend\""));
        assert_eq!(html.matches("<circle").count(), 3);
    }

    #[test]
    fn test_html_trend_charts_each_category() {
        let result = test_result();
        let trend = test_trend();
        let html = render(&ComplianceReport::new(&result, 0.6).with_trend(&trend)).unwrap();
        assert_eq!(html.matches("class=\"trend-category").count(), 3);
        assert!(html.contains("<title>Fairness &amp; Privacy</title>"));
        assert!(html.contains("<th>Risk Management</th>"));
    }

    #[test]
    fn test_html_trend_breaks_line_for_missing_category() {
        let trend = Trend {
            timestamps: vec!["t1".into(), "t2".into(), "t3".into(), "t4".into()],
            overall_scores: vec![0.2, 0.4, 0.6, 0.8],
            category_scores: [(
                "Data Protection".to_string(),
                vec![Some(0.5), None, Some(0.7), Some(0.9)],
            )]
            .into_iter()
            .collect(),
        };
        let svg = trend_svg(&trend);
        assert_eq!(svg.matches("class=\"trend-category").count(), 2);

        let table = render_trend(&trend);
        assert!(table.contains("<td>t2</td><td>0.40</td><td>-</td>"));
        assert!(table.contains("<td>t4</td><td>0.80</td><td>0.90</td>"));
    }

    #[test]
    fn test_single_point_trend_not_charted() {
        let result = ComplianceScorer::standard().score("transparent", 0.6);
        let trend = Trend {
            timestamps: vec![result.timestamp.clone()],
            overall_scores: vec![result.score],
            category_scores: Default::default(),
        };
        let html = render(&ComplianceReport::new(&result, 0.6).with_trend(&trend)).unwrap();
        assert!(!html.contains("Historical Trend"));
        assert!(html.contains("status-fail"));
        assert!(html.contains("below threshold"));
    }

    #[test]
    fn test_html_comparison() {
        let html = render_comparison(&test_comparison()).unwrap();
        assert!(html.contains("<th>draft.txt</th><th>final.txt</th>"));
        assert!(html.contains("Score change: +0.61"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
