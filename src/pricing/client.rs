//! Retrying, cached client for the AWS Price List query API shape:
//! `{ServiceCode, Filters:[{Type:"TERM_MATCH", Field, Value}], MaxResults}`
//! decoding `PriceList[0].terms.OnDemand[*].priceDimensions[*].pricePerUnit.USD`.

use super::cache::{CacheManager, PriceQueryParams};
use crate::debug_log;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PRICING_ENDPOINT: &str = "https://api.pricing.us-east-1.amazonaws.com";

#[derive(Debug, Deserialize)]
struct PriceListResponse {
    #[serde(rename = "PriceList", default)]
    price_list: Vec<serde_json::Value>,
}

/// Client over the remote pricing catalog with an in-memory front layer, a
/// persistent on-disk cache, and retry-with-backoff on transient failures.
pub struct PricingClient {
    http: reqwest::Client,
    cache: CacheManager,
    memory: Mutex<HashMap<String, f64>>,
    endpoint: String,
}

impl PricingClient {
    pub fn new(cache: CacheManager) -> Self {
        Self::with_endpoint(cache, PRICING_ENDPOINT.to_string())
    }

    pub fn with_endpoint(cache: CacheManager, endpoint: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static config");
        Self {
            http,
            cache,
            memory: Mutex::new(HashMap::new()),
            endpoint,
        }
    }

    /// Resolves a price in USD, or `None` if the catalog has no data for
    /// these params. Never returns an error: catalog failures fall through
    /// to a stale cache entry, then to `None`.
    pub async fn get_price(&self, params: &PriceQueryParams) -> Option<f64> {
        let key = params.cache_key();
        if let Some(price) = self.memory.lock().expect("memory cache lock poisoned").get(&key) {
            return Some(*price);
        }
        if let Some(price) = self.cache.get_cached_price(params) {
            self.memory.lock().expect("memory cache lock poisoned").insert(key, price);
            return Some(price);
        }

        match self.fetch_with_retry(params).await {
            Ok(Some(price)) => {
                self.cache.set_cached_price(params, price);
                self.memory.lock().expect("memory cache lock poisoned").insert(key, price);
                Some(price)
            }
            Ok(None) => None,
            Err(e) => {
                debug_log!("pricing catalog exhausted retries for {:?}: {e}", params);
                self.cache.get_stale_price(params)
            }
        }
    }

    async fn fetch_with_retry(&self, params: &PriceQueryParams) -> Result<Option<f64>, String> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(params).await {
                Ok(price) => return Ok(price),
                Err(FetchError::NotRetryable(msg)) => return Err(msg),
                Err(FetchError::Retryable(msg)) => {
                    if attempt >= MAX_RETRIES {
                        return Err(msg);
                    }
                    let delay = backoff_delay(attempt);
                    debug_log!("pricing fetch attempt {} failed ({msg}), retrying in {:?}", attempt + 1, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_once(&self, params: &PriceQueryParams) -> Result<Option<f64>, FetchError> {
        let body = serde_json::json!({
            "ServiceCode": params.service_code,
            "Filters": params.filters.iter().map(|(field, value)| {
                serde_json::json!({"Type": "TERM_MATCH", "Field": field, "Value": value})
            }).collect::<Vec<_>>(),
            "MaxResults": 1,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Retryable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(FetchError::Retryable(format!("catalog returned {status}")));
        }
        if status.is_client_error() {
            return Err(FetchError::NotRetryable(format!("catalog returned {status}")));
        }

        let parsed: PriceListResponse = response
            .json()
            .await
            .map_err(|e| FetchError::NotRetryable(format!("malformed catalog response: {e}")))?;

        Ok(extract_on_demand_usd(&parsed.price_list))
    }
}

/// Exponential backoff delay for the nth retry (0-indexed): 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    BASE_BACKOFF * 2u32.pow(attempt)
}

enum FetchError {
    Retryable(String),
    NotRetryable(String),
}

impl std::fmt::Debug for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Retryable(m) | FetchError::NotRetryable(m) => write!(f, "{m}"),
        }
    }
}

/// Decodes the first on-demand price dimension's USD rate from a
/// `PriceList` entries array. Unsupported shapes yield `None` rather than an
/// error: a missing price is data, not a failure.
fn extract_on_demand_usd(price_list: &[serde_json::Value]) -> Option<f64> {
    let product = price_list.first()?;
    let on_demand = product.get("terms")?.get("OnDemand")?.as_object()?;
    for term in on_demand.values() {
        let dimensions = term.get("priceDimensions")?.as_object()?;
        for dimension in dimensions.values() {
            if let Some(usd) = dimension.get("pricePerUnit").and_then(|v| v.get("USD")).and_then(|v| v.as_str()) {
                if let Ok(price) = usd.parse::<f64>() {
                    return Some(price);
                }
            }
        }
    }
    None
}
