//! # Market API
//!
//! The four backend calls the screens make, behind the [`MarketApi`] trait.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Backend Endpoints                              │
//! │                                                                         │
//! │  GET   /categories                     → [Category]                     │
//! │  GET   /markets/category/{categoryId}  → [MarketSummary]                │
//! │  GET   /markets/{id}                   → MarketDetail | null | 404      │
//! │  PATCH /coupons/{marketId}             → { "coupons": "<code>" }        │
//! │                                                                         │
//! │  Every path segment is percent-encoded. One client, one base URL,      │
//! │  one timeout (700 ms by default), cookies kept when credentials are on.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flows only see `Arc<dyn MarketApi>`, so tests swap in an in-memory
//! implementation.

use async_trait::async_trait;
use chrono::Utc;
use nearby_core::{Category, CouponCode, MarketDetail, MarketSummary, RedeemResponse};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Trait
// =============================================================================

/// Backend operations used by the screen flows.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// `GET /categories`
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    /// `GET /markets/category/{category_id}`
    async fn list_markets(&self, category_id: &str) -> ClientResult<Vec<MarketSummary>>;

    /// `GET /markets/{market_id}`. `None` when the backend has no record.
    async fn get_market(&self, market_id: &str) -> ClientResult<Option<MarketDetail>>;

    /// `PATCH /coupons/{market_id}`
    async fn redeem_coupon(&self, market_id: &str) -> ClientResult<CouponCode>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`MarketApi`] over HTTP.
///
/// Built once from [`ApiSettings`] and shared; it never changes afterwards.
#[derive(Debug, Clone)]
pub struct HttpMarketApi {
    client: Client,
    base: Url,
    timeout_ms: u64,
}

impl HttpMarketApi {
    /// Builds the client: base URL, uniform timeout, cookie store.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base = settings.base()?;
        let client = Client::builder()
            .timeout(settings.timeout())
            .cookie_store(settings.with_credentials)
            .build()?;

        debug!(
            base_url = %base,
            timeout_ms = settings.timeout_ms,
            with_credentials = settings.with_credentials,
            "HTTP client configured"
        );

        Ok(HttpMarketApi {
            client,
            base,
            timeout_ms: settings.timeout_ms,
        })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins percent-encoded path segments onto the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_ms)
        } else {
            err.into()
        }
    }

    /// Sends a request and decodes a JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: String,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        debug!(method, path = %path, "Sending request");

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            warn!(method, path = %path, status = status.as_u16(), "Backend rejected request");
            return Err(ClientError::Status {
                method,
                path,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let value = serde_json::from_slice(&body)?;
        Ok(value)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        self.send("GET", path, self.client.get(url)).await
    }

    async fn patch<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        self.send("PATCH", path, self.client.patch(url)).await
    }
}

#[async_trait]
impl MarketApi for HttpMarketApi {
    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get(&["categories"]).await
    }

    async fn list_markets(&self, category_id: &str) -> ClientResult<Vec<MarketSummary>> {
        self.get(&["markets", "category", category_id]).await
    }

    async fn get_market(&self, market_id: &str) -> ClientResult<Option<MarketDetail>> {
        match self.get::<Option<MarketDetail>>(&["markets", market_id]).await {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    async fn redeem_coupon(&self, market_id: &str) -> ClientResult<CouponCode> {
        let response: RedeemResponse = self.patch(&["coupons", market_id]).await?;
        Ok(response.into_code(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpMarketApi {
        HttpMarketApi::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let api = api("http://192.168.15.198:3333");
        assert_eq!(
            api.endpoint(&["markets", "category", "c1"]).unwrap().as_str(),
            "http://192.168.15.198:3333/markets/category/c1"
        );
        assert_eq!(
            api.endpoint(&["coupons", "m1"]).unwrap().path(),
            "/coupons/m1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = api("https://example.com/api/");
        assert_eq!(
            api.endpoint(&["categories"]).unwrap().as_str(),
            "https://example.com/api/categories"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let api = api("http://localhost:3333");
        let url = api.endpoint(&["markets", "a b/../c?d"]).unwrap();
        assert_eq!(url.path(), "/markets/a%20b%2F..%2Fc%3Fd");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = HttpMarketApi::new(&ApiSettings {
            base_url: "ws://localhost:3333".to_string(),
            ..ApiSettings::default()
        })
        .unwrap_err();
        assert!(err.is_config_error());
    }
}
