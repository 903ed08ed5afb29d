//! External published-content feed
//!
//! The feed is untrusted and may be down. Every failure maps to
//! [`RouteError::ExternalSourceUnavailable`] or [`RouteError::MalformedOutput`]
//! so the assembler can fall back to static and file-derived routes.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::RouteError;

/// Raw record as returned by the feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishedRecord {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// A record that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    pub slug: String,
    pub published: NaiveDate,
}

/// Source of published posts
pub trait ContentFeed: Send + Sync {
    /// Fetch at most `limit` published records, newest first
    fn fetch_published(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PublishedRecord>, RouteError>> + Send;
}

/// PostgREST-style HTTP feed
#[derive(Debug, Clone)]
pub struct RestFeed {
    client: reqwest::Client,
    endpoint: String,
    table: String,
    api_key: Option<String>,
}

impl RestFeed {
    /// Create a feed from configuration; no endpoint means unconfigured
    pub fn from_config(config: &FeedConfig) -> Result<Self, RouteError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                RouteError::ExternalSourceUnavailable("feed endpoint not configured".to_string())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RouteError::ExternalSourceUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
        })
    }

    fn url(&self, limit: usize) -> String {
        format!(
            "{}/rest/v1/{}?select=slug,publish_date,published&published=eq.true&order=publish_date.desc&limit={}",
            self.endpoint, self.table, limit
        )
    }
}

impl ContentFeed for RestFeed {
    async fn fetch_published(&self, limit: usize) -> Result<Vec<PublishedRecord>, RouteError> {
        let mut request = self.client.get(self.url(limit));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RouteError::ExternalSourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::ExternalSourceUnavailable(format!(
                "feed answered {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RouteError::ExternalSourceUnavailable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| RouteError::MalformedOutput(e.to_string()))
    }
}

/// Keep published records with a canonical slug and a readable date,
/// newest first, capped at `limit`
pub fn sanitize(records: Vec<PublishedRecord>, limit: usize) -> Vec<FeedPost> {
    let mut posts: Vec<FeedPost> = records
        .into_iter()
        .filter_map(|record| {
            if !record.published {
                return None;
            }
            let slug = record.slug?.trim().to_string();
            if slug.is_empty() || slug::slugify(&slug) != slug {
                tracing::debug!("Dropping feed record with slug {:?}", slug);
                return None;
            }
            let Some(published) = record.publish_date.as_deref().and_then(parse_date) else {
                tracing::debug!("Dropping feed record {} without a usable date", slug);
                return None;
            };
            Some(FeedPost { slug, published })
        })
        .collect();

    posts.sort_by(|a, b| b.published.cmp(&a.published));
    posts.truncate(limit);
    posts
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
