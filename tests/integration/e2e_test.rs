//! End-to-end integration tests
//!
//! Bundled configuration and model artifact through to a rendered dashboard.

use async_trait::async_trait;
use btc_forecast::config::Config;
use btc_forecast::dashboard::{render_text, Dashboard};
use btc_forecast::decision::{decide, Recommendation};
use btc_forecast::error::Result;
use btc_forecast::features::FeatureVector;
use btc_forecast::indicator::RsiValue;
use btc_forecast::market::{
    Asset, HistorySource, PricePoint, PriceQuote, PriceSeries, QuoteSource,
};
use btc_forecast::model::{ModelArtifact, PriceModel};
use btc_forecast::news::{NewsItem, NewsQuery, NewsSource};
use btc_forecast::pipeline::{Pipeline, PipelineSettings};
use btc_forecast::sentiment::SentimentScore;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

fn bundled_artifact() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("model/bitcoin_price_model.json")
}

#[test]
fn test_config_example_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(include_str!("../../config.toml.example").as_bytes())
        .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.sources.lookback_days, 30);
    assert_eq!(config.indicator.rsi_window, 14);
    assert_eq!(config.news.query, "Bitcoin");
    assert_eq!(config.news.env_file, Some(PathBuf::from("API.env")));
    assert_eq!(config.model.path, PathBuf::from("model/bitcoin_price_model.json"));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.server.bind, config.server.bind);
    assert_eq!(parsed.sources.coingecko_url, config.sources.coingecko_url);
}

#[test]
fn test_bundled_artifact_predicts_plausible_price() {
    let model = ModelArtifact::load(bundled_artifact()).unwrap();
    let btc = PriceQuote {
        asset: Asset::Btc,
        value: dec!(60000),
        timestamp: Utc::now(),
    };
    let gold = PriceQuote {
        asset: Asset::Gold,
        value: dec!(2000),
        timestamp: Utc::now(),
    };
    let features = FeatureVector::assemble(SentimentScore::new(0.2), &btc, &gold, RsiValue::new(55.0));

    let result = decide(&model, &features, btc.value).unwrap();
    assert!(result.predicted_price > dec!(50000) && result.predicted_price < dec!(70000));
    assert_eq!(
        result.recommendation,
        Recommendation::from_percent_change(result.percent_change)
    );
}

struct StaticMarket;

#[async_trait]
impl QuoteSource for StaticMarket {
    async fn quotes(&self, assets: &[Asset]) -> Result<Vec<PriceQuote>> {
        Ok(assets
            .iter()
            .map(|&asset| PriceQuote {
                asset,
                value: match asset {
                    Asset::Btc => dec!(60000),
                    Asset::Gold => dec!(2000),
                },
                timestamp: Utc::now(),
            })
            .collect())
    }
}

#[async_trait]
impl HistorySource for StaticMarket {
    async fn history(&self, asset: Asset, window_days: u32) -> Result<PriceSeries> {
        let end = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        // Alternating closes: equal gains and losses
        let points = (0..window_days).map(|i| PricePoint {
            date: end - Duration::days(i64::from(window_days - 1 - i)),
            close: if i % 2 == 0 { dec!(59000) } else { dec!(60000) },
        });
        Ok(PriceSeries::from_points(asset, points))
    }
}

struct StaticNews;

#[async_trait]
impl NewsSource for StaticNews {
    async fn articles(&self, _query: &NewsQuery) -> Result<Vec<NewsItem>> {
        Ok(vec![
            NewsItem::new("Bitcoin adoption grows", "", ""),
            NewsItem::new("Regulators voice concerns", "", ""),
        ])
    }
}

#[test]
fn test_bundled_model_through_pipeline_to_text() {
    let model: Arc<dyn PriceModel> = Arc::new(ModelArtifact::load(bundled_artifact()).unwrap());
    let market = Arc::new(StaticMarket);
    let pipeline = Pipeline::new(market.clone(), market, Arc::new(StaticNews), model)
        .with_settings(PipelineSettings::default());

    let run = tokio_test::block_on(
        pipeline.run_as_of(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()),
    )
    .unwrap();

    assert_eq!(run.article_count, 2);
    assert_eq!(run.btc_history.len(), 30);
    assert!(run.rsi.value() > 0.0 && run.rsi.value() < 100.0);
    assert!(run.prediction.predicted_price > Decimal::ZERO);

    let text = render_text(&Dashboard::from_run(&run));
    assert!(text.contains("2024-05-31"));
    assert!(text.contains(&run.prediction.recommendation.to_string()));
    assert!(text.contains("BTC closing price, last 30 days"));
}
