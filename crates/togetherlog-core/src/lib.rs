//! TogetherLog core: domain types, Smart Page rules, reverse geocoding and
//! the services behind the HTTP surface.
//!
//! Persistence is reached only through [`ports`]; nothing here depends on a
//! database driver or a web framework.

pub mod error;
pub mod geocode;
pub mod journal;
pub mod memory;
pub mod photos;
pub mod ports;
pub mod proto;
pub mod smart_page;
pub mod types;
pub mod validation;
pub mod workers;

pub use error::{Result, TogetherLogError};
pub use geocode::{GeocodingProvider, RateLimiter, ReverseGeocoder};
pub use journal::JournalService;
pub use workers::WorkerService;
