//! Reverse geocoding: coordinates to a short, human-readable place name.
//!
//! The HTTP provider lives in the server crate; this module owns the
//! contract, the rate limiting and the name heuristic so they can be tested
//! without a network.

pub mod rate_limit;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TogetherLogError};
use crate::validation::validate_coordinates;

pub use rate_limit::{RateLimiter, NOMINATIM_MIN_INTERVAL};

/// Zoom level requested from the provider (city / suburb granularity).
pub const GEOCODE_ZOOM: u8 = 14;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Upstream reverse-geocoding service.
///
/// Implementations issue exactly one request per call, ask for address
/// details at [`GEOCODE_ZOOM`], and return the decoded JSON body. A non-2xx
/// status or an undecodable body is a [`TogetherLogError::Provider`].
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub raw: Value,
}

pub struct ReverseGeocoder {
    limiter: Arc<RateLimiter>,
    provider: Arc<dyn GeocodingProvider>,
}

impl ReverseGeocoder {
    pub fn new(limiter: Arc<RateLimiter>, provider: Arc<dyn GeocodingProvider>) -> Self {
        Self { limiter, provider }
    }

    /// Validates the coordinates, waits for a rate-limit slot and asks the
    /// provider. Invalid coordinates fail before any network traffic.
    pub async fn geocode(&self, lat: f64, lng: f64) -> Result<GeocodeResult> {
        validate_coordinates(lat, lng)?;

        self.limiter.acquire().await;
        let raw = self.provider.reverse(lat, lng).await?;

        if !raw.is_object() {
            return Err(TogetherLogError::Provider(
                "malformed payload: expected a JSON object".into(),
            ));
        }

        let display_name = display_name_from_payload(&raw);
        tracing::debug!(lat, lng, %display_name, "reverse geocoded");
        Ok(GeocodeResult { display_name, raw })
    }
}

/// Builds "Settlement, State, Country" from the address block, falling back
/// to the provider's full `display_name` and then to [`UNKNOWN_LOCATION`].
pub fn display_name_from_payload(payload: &Value) -> String {
    if let Some(short) = payload.get("address").and_then(short_name_from_address) {
        return short;
    }
    non_empty_str(payload, "display_name")
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

fn short_name_from_address(address: &Value) -> Option<String> {
    let settlement = ["city", "town", "village"]
        .iter()
        .find_map(|key| non_empty_str(address, key));

    let parts: Vec<&str> = settlement
        .into_iter()
        .chain(non_empty_str(address, "state"))
        .chain(non_empty_str(address, "country"))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
