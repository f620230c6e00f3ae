//! VADER compound polarity

use super::PolarityScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Full VADER rule set: valence lexicon, negation, boosters, caps emphasis,
/// "but" contrast, punctuation amplification and emoji handling
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        // The analyzer only borrows the crate's static lexicons
        let analyzer = SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}
