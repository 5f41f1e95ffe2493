use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(1);

/// Round-robin pool of catalog API keys.
///
/// The cursor is a process-wide atomic shared by every in-flight request.
/// Under concurrency callers may observe interleaved positions; the only
/// guarantee is that every call lands on some valid key in the pool.
pub struct KeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Returns the key at the cursor and advances it modulo pool size.
    pub fn next(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.keys[idx % self.keys.len()]
    }
}

/// Thin HTTP client for the TMDB catalog API.
///
/// Every call draws a fresh key from the ring. A 429 response triggers a
/// fixed backoff and exactly one retry with the next key; any other failure
/// is converted into a typed error value so aggregation can contain it.
#[derive(Clone)]
pub struct CatalogClient {
    http_client: HttpClient,
    keys: Arc<KeyRing>,
    api_url: String,
    rate_limit_backoff: Duration,
}

impl CatalogClient {
    pub fn new(api_url: String, keys: Vec<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            keys: Arc::new(KeyRing::new(keys)),
            api_url,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
        })
    }

    /// Issues a GET against `{api_url}{path}` and deserializes the body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut response = self.send(&url, params).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(path = %path, "Catalog rate limit hit, retrying with next key");
            tokio::time::sleep(self.rate_limit_backoff).await;
            response = self.send(&url, params).await?;
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "catalog returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn send(&self, url: &str, params: &[(&str, String)]) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .query(&[("api_key", self.keys.next())])
            .send()
            .await?;
        Ok(response)
    }
}
