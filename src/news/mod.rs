//! News module
//!
//! Article records used as input to sentiment scoring

mod newsapi;

pub use newsapi::NewsApiClient;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A news article; any field may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub body: String,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            body: body.into(),
        }
    }

    /// Title, description and body joined into one text blob
    pub fn text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.body)
    }
}

/// Search parameters for a news fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub query: String,
    pub language: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NewsQuery {
    /// Query covering `days` days ending on `to`
    pub fn trailing(
        query: impl Into<String>,
        language: impl Into<String>,
        to: NaiveDate,
        days: u32,
    ) -> Self {
        let from = to - chrono::Duration::days(i64::from(days));
        Self {
            query: query.into(),
            language: language.into(),
            from,
            to,
        }
    }
}

/// Source of news articles
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch articles matching the query
    async fn articles(&self, query: &NewsQuery) -> Result<Vec<NewsItem>>;
}
