use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

pub type QueryParams = BTreeMap<String, String>;

pub const TOKEN_HEADER: &str = "X-TrackerToken";

/// A single GET against the API. The paginator and client are written
/// against this so they can run over something other than HTTP.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, endpoint: &str, query: &QueryParams, with_envelope: bool) -> Result<Value>;
}

pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new(api_token: &str) -> Result<Self> {
        let mut token = header::HeaderValue::from_str(api_token)?;
        token.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("pivotalclient/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for Transport {
    async fn get(&self, endpoint: &str, query: &QueryParams, with_envelope: bool) -> Result<Value> {
        let mut query = query.clone();
        if with_envelope {
            query.insert("envelope".to_string(), "true".to_string());
        }
        tracing::debug!("GET {} {:?}", endpoint, query);

        let response = self
            .client
            .get(endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, None, format!("failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                code.to_string()
            } else {
                format!("{} - {}", code, body.trim())
            };
            return Err(Error::api(endpoint, Some(code), detail));
        }

        response.json::<Value>().await.map_err(|e| {
            Error::api(
                endpoint,
                None,
                format!("{} returned a non-JSON body: {}", status.as_u16(), e),
            )
        })
    }
}

/// Decode a parsed body into the shape an operation expects.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, what: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::api(endpoint, None, format!("returned a malformed {}: {}", what, e)))
}
