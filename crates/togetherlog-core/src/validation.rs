//! Input validation shared by the CRUD endpoints and the workers.
//!
//! Every check fails with a [`TogetherLogError::Validation`] (or
//! `InvalidCoordinates`) carrying the message returned to the client.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::error::{Result, TogetherLogError};

pub const LOG_NAME_MAX: usize = 100;
pub const HIGHLIGHT_MAX: usize = 500;

pub fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| TogetherLogError::validation(format!("{field} is required")))
}

/// Length is counted in characters, not bytes.
pub fn validate_string(value: &str, field: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if min > 0 && len == 0 {
        return Err(TogetherLogError::validation(format!("{field} is required")));
    }
    if len < min {
        return Err(TogetherLogError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(TogetherLogError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| TogetherLogError::validation(format!("Invalid {field} format")))
}

/// Parses one of an enum's exact variant names.
pub fn validate_enum<E>(value: &str, field: &str) -> Result<E>
where
    E: FromStr + IntoEnumIterator + AsRef<str>,
{
    E::from_str(value).map_err(|_| {
        let allowed: Vec<String> = E::iter().map(|v| v.as_ref().to_string()).collect();
        TogetherLogError::validation(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        ))
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its date part is kept).
pub fn parse_event_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| TogetherLogError::validation("event_date must be a valid date"))
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(TogetherLogError::InvalidCoordinates { lat, lng });
    }
    Ok(())
}

/// Entry payloads carry latitude and longitude together or not at all.
pub fn validate_location_pair(lat: Option<f64>, lng: Option<f64>) -> Result<Option<(f64, f64)>> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(TogetherLogError::validation(
                    "location_lat must be between -90 and 90",
                ));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(TogetherLogError::validation(
                    "location_lng must be between -180 and 180",
                ));
            }
            Ok(Some((lat, lng)))
        }
        _ => Err(TogetherLogError::validation(
            "Both location_lat and location_lng must be provided together",
        )),
    }
}
