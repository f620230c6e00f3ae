//! NewsAPI `/everything` client

use super::{NewsItem, NewsQuery, NewsSource};
use crate::config::{NewsConfig, SourcesConfig};
use crate::error::Result;
use crate::http::{build_client, fetch_json};
use crate::telemetry::LatencyMetric;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

const SOURCE: &str = "newsapi";
const API_KEY_HEADER: &str = "X-Api-Key";

/// Client for the NewsAPI article search
pub struct NewsApiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl NewsApiClient {
    pub fn new(news: &NewsConfig, sources: &SourcesConfig, api_key: String) -> reqwest::Result<Self> {
        Ok(Self {
            base_url: news.base_url.trim_end_matches('/').to_string(),
            api_key,
            client: build_client(sources.timeout())?,
        })
    }

    /// Key travels in a header so it never appears in a URL or error text
    fn request(&self, query: &NewsQuery) -> RequestBuilder {
        let from = query.from.to_string();
        let to = query.to.to_string();
        self.client
            .get(format!("{}/everything", self.base_url))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .query(&[
                ("q", query.query.as_str()),
                ("language", query.language.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
            ])
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn articles(&self, query: &NewsQuery) -> Result<Vec<NewsItem>> {
        tracing::debug!(
            base_url = %self.base_url,
            q = %query.query,
            from = %query.from,
            to = %query.to,
            "Fetching news"
        );

        let body: EverythingResponse =
            fetch_json(self.request(query), SOURCE, LatencyMetric::News).await?;

        tracing::debug!(count = body.articles.len(), "Received articles");

        Ok(body.articles.into_iter().map(NewsItem::from).collect())
    }
}

/// `/everything` body; `articles` is required
#[derive(Debug, Deserialize)]
struct EverythingResponse {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl From<RawArticle> for NewsItem {
    fn from(raw: RawArticle) -> Self {
        NewsItem {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            body: raw.content.unwrap_or_default(),
        }
    }
}
