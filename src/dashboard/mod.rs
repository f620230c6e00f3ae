//! Dashboard view model
//!
//! Turns a finished `PipelineRun` into display-ready values: labelled
//! metric cards with colour tags, a prediction card whose colour follows
//! the recommendation, and closing-price chart series. Renderers for
//! terminal text and HTML live in the submodules; JSON is the view model
//! serialised as-is.

mod html;
mod text;

pub use html::{render_error_html, render_html};
pub use text::render_text;

use crate::decision::Recommendation;
use crate::market::PricePoint;
use crate::pipeline::PipelineRun;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub const BTC_COLOUR: &str = "#F7931A";
pub const GOLD_COLOUR: &str = "#FFD700";
pub const SENTIMENT_COLOUR: &str = "#6A5ACD";
pub const RSI_COLOUR: &str = "#FF69B4";

pub const BUY_COLOUR: &str = "#28a745";
pub const SELL_COLOUR: &str = "#dc3545";
pub const HOLD_COLOUR: &str = "#ffc107";

pub const TITLE: &str = "Bitcoin Price Prediction Dashboard";

pub const FOOTNOTE: &str = "Next-day price predicted by a regression model trained on news \
sentiment, BTC price, gold price and RSI. This is not financial advice.";

/// A single labelled metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub colour: &'static str,
}

/// The prediction and what to do about it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionCard {
    pub predicted_price: String,
    pub percent_change: String,
    pub recommendation: Recommendation,
    pub recommendation_text: String,
    pub colour: &'static str,
}

/// A line chart of daily closes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    /// Legend entry for the line
    pub label: &'static str,
    pub colour: &'static str,
    pub points: Vec<PricePoint>,
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub date: NaiveDate,
    pub metrics: Vec<MetricCard>,
    pub prediction: PredictionCard,
    pub charts: Vec<ChartSeries>,
    pub footnote: &'static str,
}

impl Dashboard {
    /// Build the view model from a completed run
    pub fn from_run(run: &PipelineRun) -> Self {
        let metrics = vec![
            MetricCard {
                label: "News Sentiment".to_string(),
                value: format!("{:.4}", run.sentiment.value()),
                colour: SENTIMENT_COLOUR,
            },
            MetricCard {
                label: "BTC Price".to_string(),
                value: format_usd(run.btc.value),
                colour: BTC_COLOUR,
            },
            MetricCard {
                label: "Gold Price".to_string(),
                value: format_usd(run.gold.value),
                colour: GOLD_COLOUR,
            },
            MetricCard {
                label: "RSI".to_string(),
                value: format!("{:.2}", run.rsi.value()),
                colour: RSI_COLOUR,
            },
        ];

        let recommendation = run.prediction.recommendation;
        let prediction = PredictionCard {
            predicted_price: format_usd(run.prediction.predicted_price),
            percent_change: format_percent(run.prediction.percent_change),
            recommendation,
            recommendation_text: format!("{} ({})", recommendation, recommendation.rationale()),
            colour: severity_colour(recommendation),
        };

        let charts = vec![
            ChartSeries {
                title: format!("BTC closing price, last {} days", run.btc_history.len()),
                label: "BTC close",
                colour: BTC_COLOUR,
                points: run.btc_history.points().to_vec(),
            },
            ChartSeries {
                title: format!("Gold closing price, last {} days", run.gold_history.len()),
                label: "Gold close",
                colour: GOLD_COLOUR,
                points: run.gold_history.points().to_vec(),
            },
        ];

        Self {
            title: TITLE,
            date: run.as_of,
            metrics,
            prediction,
            charts,
            footnote: FOOTNOTE,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Card colour for a recommendation
pub fn severity_colour(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Buy => BUY_COLOUR,
        Recommendation::Sell => SELL_COLOUR,
        Recommendation::Hold => HOLD_COLOUR,
    }
}

/// `$61,300.00`
pub fn format_usd(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.abs().round_dp(2));
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// `+2.17%` / `-2.50%`
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2}%")
    } else {
        format!("{rounded:.2}%")
    }
}
