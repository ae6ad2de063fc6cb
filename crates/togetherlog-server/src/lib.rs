//! TogetherLog HTTP server: routes, auth middleware, config and the
//! Nominatim provider. The binary in `main.rs` wires these to Postgres.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod nominatim;
pub mod router;
