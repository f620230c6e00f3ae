//! HTML rendering with inline SVG line charts drawn by plotters

use super::{ChartSeries, Dashboard, TITLE};
use crate::error::PipelineError;
use chrono::NaiveDate;
use plotters::prelude::*;
use std::error::Error;
use std::fmt::Write;

const CHART_WIDTH: u32 = 720;
const CHART_HEIGHT: u32 = 320;
const GRID_COLOUR: RGBColor = RGBColor(230, 230, 230);

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;background:#fafafa;color:#222}\
.cards{display:flex;gap:1rem;flex-wrap:wrap}\
.card{padding:1rem 1.5rem;border-radius:8px;background:#fff;box-shadow:0 1px 3px rgba(0,0,0,.15)}\
.card .label{font-size:.85rem;color:#666}.card .value{font-size:1.5rem;font-weight:bold}\
.prediction{margin:1.5rem 0;padding:1rem 1.5rem;border-radius:8px;color:#fff}\
.error{margin:1.5rem 0;padding:1rem 1.5rem;border-radius:8px;background:#dc3545;color:#fff}\
footer{margin-top:2rem;font-size:.85rem;color:#666}";

/// Render the full dashboard page
pub fn render_html(dashboard: &Dashboard) -> String {
    let mut body = String::new();

    let _ = write!(body, "<div class=\"cards\">");
    for metric in &dashboard.metrics {
        let _ = write!(
            body,
            "<div class=\"card\" style=\"border-top:4px solid {colour}\">\
             <div class=\"label\">{label}</div>\
             <div class=\"value\" style=\"color:{colour}\">{value}</div></div>",
            colour = metric.colour,
            label = escape(&metric.label),
            value = escape(&metric.value),
        );
    }
    let _ = write!(body, "</div>");

    let prediction = &dashboard.prediction;
    let _ = write!(
        body,
        "<div class=\"prediction\" style=\"background:{colour}\">\
         <div>Predicted price: <strong>{price}</strong> ({change})</div>\
         <h2>{text}</h2></div>",
        colour = prediction.colour,
        price = escape(&prediction.predicted_price),
        change = escape(&prediction.percent_change),
        text = escape(&prediction.recommendation_text),
    );

    for chart in &dashboard.charts {
        let _ = write!(body, "<div class=\"chart\">{}</div>", render_chart(chart));
    }

    let _ = write!(body, "<footer>{}</footer>", escape(dashboard.footnote));

    page(&dashboard.date.format("%Y-%m-%d").to_string(), &body)
}

/// Render the page shown when a run fails; no recommendation is included
pub fn render_error_html(error: &PipelineError) -> String {
    let body = format!(
        "<div class=\"error\"><h2>Forecast unavailable</h2><p>{}</p></div>",
        escape(&error.to_string())
    );
    page("unavailable", &body)
}

fn page(subtitle: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{TITLE}</title><style>{STYLE}</style></head>\
         <body><h1>{TITLE}</h1><p>{}</p>{body}</body></html>",
        escape(subtitle)
    )
}

/// Inline SVG line chart: dated x-axis with roughly weekly labels, USD
/// y-axis, grid and legend
fn render_chart(chart: &ChartSeries) -> String {
    let points: Vec<(NaiveDate, f64)> = chart
        .points
        .iter()
        .map(|p| (p.date, f64::try_from(p.close).unwrap_or(0.0)))
        .collect();

    if points.len() < 2 {
        return "<p>Not enough data to chart.</p>".to_string();
    }

    let mut svg = String::new();
    match draw_chart(chart, &points, &mut svg) {
        Ok(()) => svg,
        Err(e) => {
            tracing::warn!(chart = %chart.title, error = %e, "Chart rendering failed");
            "<p>Chart unavailable.</p>".to_string()
        }
    }
}

fn draw_chart(
    chart: &ChartSeries,
    points: &[(NaiveDate, f64)],
    svg: &mut String,
) -> Result<(), Box<dyn Error>> {
    let first = points[0].0;
    let last = points[points.len() - 1].0;
    let (low, high) = value_range(points);
    let colour = hex_colour(chart.colour);

    let root = SVGBackend::with_string(svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(first..last, low..high)?;

    ctx.configure_mesh()
        .x_labels(weekly_label_count(first, last))
        .x_label_formatter(&|d: &NaiveDate| d.format("%b %d").to_string())
        .y_label_formatter(&|v: &f64| format!("${v:.0}"))
        .x_desc("Date")
        .y_desc("Price (USD)")
        .light_line_style(GRID_COLOUR)
        .draw()?;

    ctx.draw_series(LineSeries::new(points.iter().copied(), colour.stroke_width(2)))?
        .label(chart.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Padded y-range; a flat series gets a band around its value
fn value_range(points: &[(NaiveDate, f64)]) -> (f64, f64) {
    let low = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let high = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let pad = if high > low {
        (high - low) * 0.05
    } else {
        (low.abs() * 0.01).max(1.0)
    };
    (low - pad, high + pad)
}

fn weekly_label_count(first: NaiveDate, last: NaiveDate) -> usize {
    let weeks = (last - first).num_days() / 7;
    (weeks as usize + 1).max(2)
}

/// `#RRGGBB` to an RGB colour; anything else draws black
fn hex_colour(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => BLACK,
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
