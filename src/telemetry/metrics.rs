//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Spot quote request latency
    SpotQuotes,
    /// Daily price history request latency
    PriceHistory,
    /// News search latency
    News,
    /// Model inference latency
    Inference,
    /// Whole pipeline run
    PipelineRun,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::SpotQuotes => "btcforecast_spot_quotes_latency_ms",
            LatencyMetric::PriceHistory => "btcforecast_price_history_latency_ms",
            LatencyMetric::News => "btcforecast_news_latency_ms",
            LatencyMetric::Inference => "btcforecast_inference_latency_ms",
            LatencyMetric::PipelineRun => "btcforecast_pipeline_run_latency_ms",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Mean news sentiment of the last run
    Sentiment,
    /// Latest RSI
    Rsi,
    /// Current BTC spot price
    BtcPrice,
    /// Current gold spot price
    GoldPrice,
    /// Predicted next-day BTC price
    PredictedPrice,
    /// Predicted percentage change
    PercentChange,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::Sentiment => "btcforecast_sentiment",
            GaugeMetric::Rsi => "btcforecast_rsi",
            GaugeMetric::BtcPrice => "btcforecast_btc_price_usd",
            GaugeMetric::GoldPrice => "btcforecast_gold_price_usd",
            GaugeMetric::PredictedPrice => "btcforecast_predicted_price_usd",
            GaugeMetric::PercentChange => "btcforecast_percent_change",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    let value_ms = duration.as_secs_f64() * 1_000.0;

    metrics::histogram!(metric_name).record(value_ms);
    tracing::trace!(metric = metric_name, value_ms, "Recording latency");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = metric.name();

    metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value, "Setting gauge");
}

/// Count a finished pipeline run by outcome ("ok" or an error kind)
pub fn record_run_outcome(outcome: &'static str) {
    metrics::counter!("btcforecast_pipeline_runs_total", "outcome" => outcome).increment(1);
}
