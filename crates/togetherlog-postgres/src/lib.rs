//! TogetherLog PostgreSQL adapter.
//!
//! Implements the core store ports over a shared `PgPool` and ships the
//! schema as embedded migrations.

pub mod sqlx_types;
pub mod store;

use sqlx::migrate::Migrator;
use sqlx::PgPool;

pub use store::{PgEntryStore, PgLogStore, PgPhotoStore, PgTagStore};

/// Schema and tag vocabulary, applied at server startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// One adapter per port, all sharing the same pool.
pub struct PgStores {
    pub logs: PgLogStore,
    pub entries: PgEntryStore,
    pub photos: PgPhotoStore,
    pub tags: PgTagStore,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            logs: PgLogStore::new(pool.clone()),
            entries: PgEntryStore::new(pool.clone()),
            photos: PgPhotoStore::new(pool.clone()),
            tags: PgTagStore::new(pool),
        }
    }
}
