//! Persistence ports.
//!
//! Services operate exclusively through these traits, so the Postgres adapter
//! and [`crate::memory::MemoryStore`] are interchangeable. Lookups return
//! `Ok(None)` for missing rows; the services decide whether that is a 404.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::*;

#[async_trait]
pub trait LogStore: Send + Sync {
    /// The user's logs, newest first, with entry counts.
    async fn list_logs(&self, user_id: Uuid) -> Result<Vec<LogSummary>>;
    /// `None` when the log does not exist or belongs to someone else.
    async fn get_log(&self, user_id: Uuid, log_id: Uuid) -> Result<Option<LogSummary>>;
    async fn insert_log(&self, new: &NewLog) -> Result<Log>;
    async fn update_log(&self, user_id: Uuid, log_id: Uuid, patch: &LogPatch)
        -> Result<Option<Log>>;
    /// Cascades to entries, their tag links and photos. Returns whether a row went away.
    async fn delete_log(&self, user_id: Uuid, log_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<Entry>>;
    async fn get_entry_detail(&self, entry_id: Uuid) -> Result<Option<EntryDetail>>;
    /// Entries of a log ordered by event date, oldest first.
    async fn list_entry_details(&self, log_id: Uuid) -> Result<Vec<EntryDetail>>;
    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry>;
    async fn update_entry(&self, entry_id: Uuid, patch: &EntryPatch) -> Result<()>;
    async fn delete_entry(&self, entry_id: Uuid) -> Result<()>;

    async fn add_entry_tags(&self, entry_id: Uuid, tag_ids: &[Uuid]) -> Result<()>;
    async fn clear_entry_tags(&self, entry_id: Uuid) -> Result<()>;

    /// Writes layout, theme, sprinkles and `is_processed = true` as one
    /// atomic update so concurrent recomputations never interleave.
    async fn write_smart_page(&self, entry_id: Uuid, page: &SmartPage) -> Result<()>;
    /// Writes the geocoded location unless the user has overridden it in the
    /// meantime. Returns false when nothing was written.
    async fn write_geocoded_location(
        &self,
        entry_id: Uuid,
        location: &GeocodedLocation,
    ) -> Result<bool>;
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn get_photo(&self, photo_id: Uuid) -> Result<Option<Photo>>;
    /// Attaches a photo to an entry. Only unlinked photos and photos already
    /// on one of `user_id`'s entries can be moved; returns false otherwise.
    async fn link_photo(
        &self,
        user_id: Uuid,
        photo_id: Uuid,
        entry_id: Uuid,
        display_order: i32,
    ) -> Result<bool>;
    async fn write_dominant_colors(&self, photo_id: Uuid, colors: &[DominantColor]) -> Result<()>;
    async fn write_processed_photo(&self, photo_id: Uuid, processed: &ProcessedPhoto)
        -> Result<()>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    /// All tags ordered by category, then name.
    async fn list_tags(&self) -> Result<Vec<Tag>>;
}
