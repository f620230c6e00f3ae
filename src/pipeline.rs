//! Forecast pipeline
//!
//! One run fetches spot quotes, news and daily history concurrently, then
//! scores sentiment, computes RSI, assembles the feature vector and asks
//! the model for tomorrow's price. Any failure halts the run.

use crate::config::{Config, Credentials};
use crate::decision::{decide, PredictionResult};
use crate::error::{PipelineError, Result};
use crate::features::FeatureVector;
use crate::indicator::{Rsi, RsiValue};
use crate::market::{
    Asset, CoinGeckoClient, CoinGeckoConfig, HistorySource, PriceQuote, PriceSeries, QuoteSource,
};
use crate::model::PriceModel;
use crate::news::{NewsApiClient, NewsQuery, NewsSource};
use crate::sentiment::{SentimentScore, SentimentScorer, VaderScorer};
use crate::telemetry::{
    record_latency, record_run_outcome, set_gauge, GaugeMetric, LatencyMetric,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub as_of: NaiveDate,
    pub btc: PriceQuote,
    pub gold: PriceQuote,
    pub btc_history: PriceSeries,
    pub gold_history: PriceSeries,
    pub article_count: usize,
    pub sentiment: SentimentScore,
    pub rsi: RsiValue,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
}

/// Tunables for a run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// History and news window (days)
    pub lookback_days: u32,
    pub news_query: String,
    pub news_language: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            news_query: "Bitcoin".to_string(),
            news_language: "en".to_string(),
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            lookback_days: config.sources.lookback_days,
            news_query: config.news.query.clone(),
            news_language: config.news.language.clone(),
        }
    }
}

/// The forecast pipeline and its collaborators
pub struct Pipeline {
    quotes: Arc<dyn QuoteSource>,
    history: Arc<dyn HistorySource>,
    news: Arc<dyn NewsSource>,
    model: Arc<dyn PriceModel>,
    scorer: SentimentScorer<VaderScorer>,
    rsi: Rsi,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Create a pipeline with default settings
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        history: Arc<dyn HistorySource>,
        news: Arc<dyn NewsSource>,
        model: Arc<dyn PriceModel>,
    ) -> Self {
        Self {
            quotes,
            history,
            news,
            model,
            scorer: SentimentScorer::default(),
            rsi: Rsi::default(),
            settings: PipelineSettings::default(),
        }
    }

    /// Wire the live CoinGecko and NewsAPI clients from configuration
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        model: Arc<dyn PriceModel>,
    ) -> anyhow::Result<Self> {
        let market = Arc::new(CoinGeckoClient::with_config(CoinGeckoConfig::from(
            &config.sources,
        ))?);
        let news = Arc::new(NewsApiClient::new(
            &config.news,
            &config.sources,
            credentials.news_api_key.clone(),
        )?);

        Ok(Self::new(market.clone(), market, news, model)
            .with_settings(PipelineSettings::from(config))
            .with_rsi(Rsi::new(config.indicator.rsi_window)))
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_rsi(mut self, rsi: Rsi) -> Self {
        self.rsi = rsi;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run once as of today (UTC)
    pub async fn run(&self) -> Result<PipelineRun> {
        self.run_as_of(Utc::now().date_naive()).await
    }

    /// Run once with the news window ending on `as_of`
    pub async fn run_as_of(&self, as_of: NaiveDate) -> Result<PipelineRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id, %as_of);
        let started = Instant::now();

        let result = self.execute(run_id, as_of).instrument(span.clone()).await;
        record_latency(LatencyMetric::PipelineRun, started.elapsed());

        span.in_scope(|| match result {
            Ok(ref run) => {
                record_run_outcome("ok");
                tracing::info!(
                    btc = %run.btc.value,
                    predicted = %run.prediction.predicted_price,
                    percent_change = %run.prediction.percent_change.round_dp(2),
                    recommendation = %run.prediction.recommendation,
                    "Forecast complete"
                );
            }
            Err(ref e) => {
                record_run_outcome(e.kind());
                tracing::error!(error = %e, "Forecast failed");
            }
        });
        result
    }

    async fn execute(&self, run_id: Uuid, as_of: NaiveDate) -> Result<PipelineRun> {
        let window = self.settings.lookback_days;
        if window == 0 {
            return Err(PipelineError::InvalidInput(
                "lookback window must be at least one day".to_string(),
            ));
        }
        let query = NewsQuery::trailing(
            self.settings.news_query.as_str(),
            self.settings.news_language.as_str(),
            as_of,
            window,
        );

        let (quotes, articles, btc_history, gold_history) = tokio::try_join!(
            self.quotes.quotes(&[Asset::Btc, Asset::Gold]),
            self.news.articles(&query),
            self.history.history(Asset::Btc, window),
            self.history.history(Asset::Gold, window),
        )?;
        tracing::debug!(
            articles = articles.len(),
            btc_days = btc_history.len(),
            gold_days = gold_history.len(),
            "Fetched inputs"
        );

        let btc = pick_quote(&quotes, Asset::Btc)?;
        let gold = pick_quote(&quotes, Asset::Gold)?;

        let sentiment = self.scorer.score(&articles);
        let rsi = self.rsi.latest(&btc_history.closes());
        if btc_history.len() < self.rsi.window() {
            tracing::warn!(
                days = btc_history.len(),
                window = self.rsi.window(),
                "Not enough history for RSI, using 0"
            );
        }

        let features = FeatureVector::assemble(sentiment, &btc, &gold, rsi);

        let inference_started = Instant::now();
        let prediction = decide(self.model.as_ref(), &features, btc.value)?;
        record_latency(LatencyMetric::Inference, inference_started.elapsed());

        set_gauge(GaugeMetric::Sentiment, sentiment.value());
        set_gauge(GaugeMetric::Rsi, rsi.value());
        set_gauge(GaugeMetric::BtcPrice, features.btc_price());
        set_gauge(GaugeMetric::GoldPrice, features.gold_price());
        set_gauge(
            GaugeMetric::PredictedPrice,
            f64::try_from(prediction.predicted_price).unwrap_or(0.0),
        );
        set_gauge(
            GaugeMetric::PercentChange,
            f64::try_from(prediction.percent_change).unwrap_or(0.0),
        );

        Ok(PipelineRun {
            run_id,
            as_of,
            btc,
            gold,
            btc_history,
            gold_history,
            article_count: articles.len(),
            sentiment,
            rsi,
            features,
            prediction,
        })
    }
}

fn pick_quote(quotes: &[PriceQuote], asset: Asset) -> Result<PriceQuote> {
    quotes
        .iter()
        .find(|q| q.asset == asset)
        .cloned()
        .ok_or_else(|| PipelineError::unavailable("quotes", format!("no quote for {asset}")))
}
