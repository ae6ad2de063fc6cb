//! Nominatim reverse-geocoding client.
//!
//! Nominatim's usage policy requires an identifying User-Agent and at most
//! one request per second; the second part is enforced by the core
//! `RateLimiter`, not here.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;

use togetherlog_core::error::{Result, TogetherLogError};
use togetherlog_core::geocode::{GeocodingProvider, GEOCODE_ZOOM};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NominatimProvider {
    http: Client,
    base_url: String,
}

impl NominatimProvider {
    pub fn new(base_url: &str, user_agent: &str) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en"),
        );

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Value> {
        let response = self
            .http
            .get(self.reverse_url())
            .query(&[
                ("format", "json".to_string()),
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("zoom", GEOCODE_ZOOM.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| TogetherLogError::Provider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TogetherLogError::Provider(format!(
                "Geocoding API error: {status}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TogetherLogError::Provider(format!("malformed payload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let provider =
            NominatimProvider::new("https://nominatim.example.org/", "TogetherLog/1.0").unwrap();
        assert_eq!(
            provider.reverse_url(),
            "https://nominatim.example.org/reverse"
        );
    }
}
