//! Server configuration read from the environment.
//!
//!   DATABASE_URL                  : Postgres connection string (required)
//!   TOGETHERLOG_JWT_SECRET        : JWT HMAC secret (required)
//!   TOGETHERLOG_BIND_ADDR         : listen address (default: 0.0.0.0:4200)
//!   TOGETHERLOG_STORAGE_PUBLIC_URL: base for public photo URLs (default: http://localhost:54321)
//!   NOMINATIM_BASE_URL            : reverse geocoding endpoint (default: https://nominatim.openstreetmap.org)
//!   NOMINATIM_USER_AGENT          : sent on every geocoding request (default: TogetherLog/1.0)
//!   DATABASE_MAX_CONNECTIONS      : pool size (default: 10)

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4200";
pub const DEFAULT_STORAGE_PUBLIC_URL: &str = "http://localhost:54321";
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_NOMINATIM_USER_AGENT: &str = "TogetherLog/1.0";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub storage_public_url: String,
    pub nominatim_base_url: String,
    pub nominatim_user_agent: String,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {v}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("TOGETHERLOG_JWT_SECRET")?,
            bind_addr: or_default("TOGETHERLOG_BIND_ADDR", DEFAULT_BIND_ADDR),
            storage_public_url: or_default(
                "TOGETHERLOG_STORAGE_PUBLIC_URL",
                DEFAULT_STORAGE_PUBLIC_URL,
            ),
            nominatim_base_url: or_default("NOMINATIM_BASE_URL", DEFAULT_NOMINATIM_BASE_URL),
            nominatim_user_agent: or_default(
                "NOMINATIM_USER_AGENT",
                DEFAULT_NOMINATIM_USER_AGENT,
            ),
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql:///togetherlog"),
            ("TOGETHERLOG_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.nominatim_user_agent, "TogetherLog/1.0");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgresql:///x")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "TOGETHERLOG_JWT_SECRET must be set");
    }

    #[test]
    fn bad_pool_size_is_an_error() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql:///x"),
            ("TOGETHERLOG_JWT_SECRET", "s"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]));
        assert!(result.is_err());
    }
}
