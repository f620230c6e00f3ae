//! Sentiment scoring module
//!
//! Reduces a batch of news items to one score in [-1, 1]

mod vader;

pub use vader::VaderScorer;

use crate::news::NewsItem;
use serde::{Deserialize, Serialize};

/// Free text in, compound polarity in [-1, 1] out
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Mean news sentiment in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentScore(f64);

impl SentimentScore {
    /// Score used when there is nothing to score
    pub const NEUTRAL: SentimentScore = SentimentScore(0.0);

    /// Clamp a raw value into range
    pub fn new(value: f64) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Averages per-item polarity over a batch of articles
pub struct SentimentScorer<P: PolarityScorer> {
    scorer: P,
}

impl<P: PolarityScorer> SentimentScorer<P> {
    pub fn new(scorer: P) -> Self {
        Self { scorer }
    }

    /// Arithmetic mean of item scores; exactly 0.0 for an empty batch
    pub fn score(&self, items: &[NewsItem]) -> SentimentScore {
        if items.is_empty() {
            return SentimentScore::NEUTRAL;
        }

        let total: f64 = items
            .iter()
            .map(|item| self.scorer.compound(&item.text()).clamp(-1.0, 1.0))
            .sum();

        SentimentScore::new(total / items.len() as f64)
    }
}

impl Default for SentimentScorer<VaderScorer> {
    fn default() -> Self {
        Self::new(VaderScorer::new())
    }
}
