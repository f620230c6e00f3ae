//! Terminal rendering

use super::{format_usd, ChartSeries, Dashboard};
use std::fmt::Write;

const LABEL_WIDTH: usize = 18;

/// Render the dashboard as plain text
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let header = format!("{}  ({})", dashboard.title, dashboard.date.format("%Y-%m-%d"));
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "=".repeat(header.chars().count()));

    for metric in &dashboard.metrics {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", metric.label, metric.value);
    }

    let prediction = &dashboard.prediction;
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Predicted Price", prediction.predicted_price);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Change", prediction.percent_change);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Recommendation", prediction.recommendation_text);

    let _ = writeln!(out);
    for chart in &dashboard.charts {
        let _ = writeln!(out, "{}", chart_summary(chart));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", dashboard.footnote);
    out
}

/// One-line range summary standing in for a chart
fn chart_summary(chart: &ChartSeries) -> String {
    let closes = chart.points.iter().map(|p| p.close);
    match (closes.clone().min(), closes.max(), chart.points.last()) {
        (Some(low), Some(high), Some(last)) => format!(
            "{}: low {}, high {}, last {} on {}",
            chart.title,
            format_usd(low),
            format_usd(high),
            format_usd(last.close),
            last.date.format("%Y-%m-%d"),
        ),
        _ => format!("{}: no data", chart.title),
    }
}
