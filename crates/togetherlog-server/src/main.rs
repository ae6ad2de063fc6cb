//! togetherlog-server: REST server for the TogetherLog journal.
//!
//! See [`togetherlog_server::config`] for the environment it reads.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use togetherlog_core::geocode::{GeocodingProvider, RateLimiter, ReverseGeocoder};
use togetherlog_core::photos::PublicUrlBuilder;
use togetherlog_core::ports::{EntryStore, LogStore, PhotoStore};
use togetherlog_core::{JournalService, WorkerService};
use togetherlog_postgres::{PgStores, MIGRATOR};
use togetherlog_server::config::ServerConfig;
use togetherlog_server::middleware::jwt::JwtConfig;
use togetherlog_server::nominatim::NominatimProvider;
use togetherlog_server::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,togetherlog_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to apply migrations")?;

    let stores = PgStores::new(pool);
    let logs: Arc<dyn LogStore> = Arc::new(stores.logs);
    let entries: Arc<dyn EntryStore> = Arc::new(stores.entries);
    let photos: Arc<dyn PhotoStore> = Arc::new(stores.photos);

    let journal = Arc::new(JournalService::new(
        Arc::clone(&logs),
        Arc::clone(&entries),
        Arc::clone(&photos),
        Arc::new(stores.tags),
    ));

    // One limiter for the whole process: Nominatim counts requests per client.
    let provider: Arc<dyn GeocodingProvider> = Arc::new(NominatimProvider::new(
        &config.nominatim_base_url,
        &config.nominatim_user_agent,
    )?);
    let geocoder = ReverseGeocoder::new(Arc::new(RateLimiter::nominatim()), provider);
    tracing::info!(
        "Reverse geocoding via {} (min interval {:?})",
        config.nominatim_base_url,
        togetherlog_core::geocode::NOMINATIM_MIN_INTERVAL
    );

    let workers = Arc::new(WorkerService::new(
        logs,
        entries,
        photos,
        geocoder,
        PublicUrlBuilder::new(&config.storage_public_url),
    ));

    let jwt_config = JwtConfig::from_secret(config.jwt_secret.as_bytes());
    let app = build_router(journal, workers, jwt_config);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("togetherlog-server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
