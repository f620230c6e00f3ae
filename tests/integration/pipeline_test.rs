//! Pipeline integration tests against in-memory sources

use async_trait::async_trait;
use btc_forecast::decision::Recommendation;
use btc_forecast::error::{PipelineError, Result};
use btc_forecast::features::FeatureVector;
use btc_forecast::market::{
    Asset, HistorySource, PricePoint, PriceQuote, PriceSeries, QuoteSource,
};
use btc_forecast::model::{LinearModel, PriceModel};
use btc_forecast::news::{NewsItem, NewsQuery, NewsSource};
use btc_forecast::pipeline::{Pipeline, PipelineSettings};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
}

struct FakeMarket {
    btc: Decimal,
    gold: Decimal,
    history_days: usize,
    fail_quotes: bool,
    fail_history: bool,
    windows: Mutex<Vec<(Asset, u32)>>,
}

impl FakeMarket {
    fn new(btc: Decimal, gold: Decimal) -> Self {
        Self {
            btc,
            gold,
            history_days: 30,
            fail_quotes: false,
            fail_history: false,
            windows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QuoteSource for FakeMarket {
    async fn quotes(&self, assets: &[Asset]) -> Result<Vec<PriceQuote>> {
        if self.fail_quotes {
            return Err(PipelineError::unavailable("coingecko", "HTTP 500"));
        }
        Ok(assets
            .iter()
            .map(|&asset| PriceQuote {
                asset,
                value: match asset {
                    Asset::Btc => self.btc,
                    Asset::Gold => self.gold,
                },
                timestamp: Utc::now(),
            })
            .collect())
    }
}

#[async_trait]
impl HistorySource for FakeMarket {
    async fn history(&self, asset: Asset, window_days: u32) -> Result<PriceSeries> {
        self.windows.lock().unwrap().push((asset, window_days));
        if self.fail_history {
            return Err(PipelineError::unavailable("coingecko", "timeout"));
        }
        // Strictly rising closes ending on the run date
        let points = (0..self.history_days).map(|i| PricePoint {
            date: as_of() - Duration::days((self.history_days - 1 - i) as i64),
            close: Decimal::from(50_000 + i as i64 * 100),
        });
        Ok(PriceSeries::from_points(asset, points))
    }
}

struct FakeNews {
    items: Vec<NewsItem>,
    fail: bool,
    queries: Mutex<Vec<NewsQuery>>,
}

impl FakeNews {
    fn with_items(items: Vec<NewsItem>) -> Self {
        Self {
            items,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn articles(&self, query: &NewsQuery) -> Result<Vec<NewsItem>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(PipelineError::unavailable("newsapi", "HTTP 401"));
        }
        Ok(self.items.clone())
    }
}

/// Always predicts `price` and counts invocations
struct CountingModel {
    price: f64,
    calls: AtomicUsize,
    seen: Mutex<Vec<FeatureVector>>,
}

impl CountingModel {
    fn new(price: f64) -> Arc<Self> {
        Arc::new(Self {
            price,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PriceModel for CountingModel {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().extend_from_slice(rows);
        Ok(vec![self.price; rows.len()])
    }
}

fn pipeline(
    market: Arc<FakeMarket>,
    news: Arc<FakeNews>,
    model: Arc<dyn PriceModel>,
) -> Pipeline {
    Pipeline::new(market.clone(), market, news, model)
}

#[tokio::test]
async fn test_buy_scenario() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(vec![NewsItem::new(
        "Bitcoin rally continues",
        "Investors optimistic about strong gains",
        "",
    )]));
    let model = CountingModel::new(61_300.0);

    let run = pipeline(market, news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap();

    assert_eq!(run.prediction.predicted_price, dec!(61300));
    assert_eq!(run.prediction.percent_change.round_dp(4), dec!(2.1667));
    assert_eq!(run.prediction.recommendation, Recommendation::Buy);
    assert_eq!(run.article_count, 1);
    assert!(run.sentiment.value() > 0.0);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_sell_scenario() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(58_500.0);

    let run = pipeline(market, news, model).run_as_of(as_of()).await.unwrap();

    assert_eq!(run.prediction.percent_change, dec!(-2.5));
    assert_eq!(run.prediction.recommendation, Recommendation::Sell);
}

#[tokio::test]
async fn test_feature_vector_order() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(60_000.0);

    let run = pipeline(market, news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap();

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    // Rising closes have no losses, so RSI saturates at 100
    assert_eq!(seen[0].as_array(), &[0.0, 60_000.0, 2_000.0, 100.0]);
    assert_eq!(run.features, seen[0]);
    assert_eq!(run.prediction.recommendation, Recommendation::Hold);
}

#[tokio::test]
async fn test_empty_news_is_neutral() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(60_000.0);

    let run = pipeline(market, news, model).run_as_of(as_of()).await.unwrap();

    assert_eq!(run.sentiment.value(), 0.0);
    assert_eq!(run.article_count, 0);
}

#[tokio::test]
async fn test_short_history_gives_zero_rsi() {
    let mut market = FakeMarket::new(dec!(60000), dec!(2000));
    market.history_days = 13;
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(60_000.0);

    let run = pipeline(Arc::new(market), news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap();

    assert_eq!(run.rsi.value(), 0.0);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_history_of_exactly_window_length_defines_rsi() {
    let mut market = FakeMarket::new(dec!(60000), dec!(2000));
    market.history_days = 14;
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(60_000.0);

    let run = pipeline(Arc::new(market), news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap();

    // 14 rising closes: no losses
    assert_eq!(run.rsi.value(), 100.0);
    assert_eq!(model.seen.lock().unwrap()[0].as_array()[3], 100.0);
}

#[tokio::test]
async fn test_news_failure_halts_before_model() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews {
        items: Vec::new(),
        fail: true,
        queries: Mutex::new(Vec::new()),
    });
    let model = CountingModel::new(61_300.0);

    let err = pipeline(market, news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::DataUnavailable {
            source_name: "newsapi",
            ..
        }
    ));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_quote_failure_halts_before_model() {
    let mut market = FakeMarket::new(dec!(60000), dec!(2000));
    market.fail_quotes = true;
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(61_300.0);

    let err = pipeline(Arc::new(market), news, model.clone())
        .run_as_of(as_of())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "data_unavailable");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_history_failure_halts_before_model() {
    let mut market = FakeMarket::new(dec!(60000), dec!(2000));
    market.fail_history = true;
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model = CountingModel::new(61_300.0);

    let result = pipeline(Arc::new(market), news, model.clone())
        .run_as_of(as_of())
        .await;

    assert!(result.is_err());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_model_failure_is_fatal() {
    struct BrokenModel;

    impl PriceModel for BrokenModel {
        fn predict(&self, _rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
            anyhow::bail!("corrupt weights")
        }
    }

    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(Vec::new()));

    let err = pipeline(market, news, Arc::new(BrokenModel))
        .run_as_of(as_of())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ModelUnavailable(_)));
}

#[tokio::test]
async fn test_lookback_window_is_forwarded() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(Vec::new()));
    let model: Arc<dyn PriceModel> = Arc::new(LinearModel::new(0.0, [0.0, 1.0, 0.0, 0.0]));

    let settings = PipelineSettings {
        lookback_days: 7,
        news_query: "BTC".to_string(),
        news_language: "de".to_string(),
    };
    pipeline(market.clone(), news.clone(), model)
        .with_settings(settings)
        .run_as_of(as_of())
        .await
        .unwrap();

    let mut windows = market.windows.lock().unwrap().clone();
    windows.sort_by_key(|(asset, _)| *asset == Asset::Gold);
    assert_eq!(windows, vec![(Asset::Btc, 7), (Asset::Gold, 7)]);

    let queries = news.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query, "BTC");
    assert_eq!(queries[0].language, "de");
    assert_eq!(queries[0].to, as_of());
    assert_eq!(queries[0].from, NaiveDate::from_ymd_opt(2024, 5, 24).unwrap());
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let market = Arc::new(FakeMarket::new(dec!(60000), dec!(2000)));
    let news = Arc::new(FakeNews::with_items(vec![NewsItem::new(
        "Terrible week as Bitcoin crash fears grow",
        "",
        "",
    )]));
    let model: Arc<dyn PriceModel> = Arc::new(LinearModel::new(100.0, [500.0, 1.0, 0.1, -1.0]));
    let pipeline = pipeline(market, news, model);

    let first = pipeline.run_as_of(as_of()).await.unwrap();
    let second = pipeline.run_as_of(as_of()).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.prediction, second.prediction);
    assert!(first.sentiment.value() < 0.0);
}
