//! Postgres implementations of the core store ports.
//!
//! Each adapter is a newtype wrapping PgPool. All SQL is runtime-checked
//! (sqlx::query, not sqlx::query!) so building needs no live database.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use togetherlog_core::error::{Result, TogetherLogError};
use togetherlog_core::ports::{EntryStore, LogStore, PhotoStore, TagStore};
use togetherlog_core::types::*;

use crate::sqlx_types::{
    PgEntryRow, PgEntryTagRow, PgLogRow, PgLogSummaryRow, PgPhotoRow, PgTagRow,
};

fn db_err(e: sqlx::Error) -> TogetherLogError {
    tracing::error!(error = %e, "database query failed");
    TogetherLogError::Persistence(e.to_string())
}

fn missing(what: &str, id: Uuid) -> TogetherLogError {
    TogetherLogError::Persistence(format!("{what} {id} does not exist"))
}

const LOG_COLUMNS: &str = r#"id, user_id, name, "type" AS log_type, created_at, updated_at"#;

const ENTRY_COLUMNS: &str = r#"
    id, log_id, event_date, highlight_text,
    location_lat, location_lng, location_display_name, location_is_user_overridden,
    page_layout_type, color_theme, sprinkles, is_processed,
    created_at, updated_at
"#;

const PHOTO_COLUMNS: &str = r#"
    id, entry_id, storage_path, url, thumbnail_url,
    display_order, dominant_colors, exif_data
"#;

// ── PgLogStore ────────────────────────────────────────────────

pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn list_logs(&self, user_id: Uuid) -> Result<Vec<LogSummary>> {
        let rows = sqlx::query_as::<_, PgLogSummaryRow>(
            r#"
            SELECT l.id, l.name, l."type" AS log_type, l.created_at, l.updated_at,
                   (SELECT COUNT(*) FROM entries e WHERE e.log_id = l.id) AS entry_count
            FROM logs l
            WHERE l.user_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(LogSummary::try_from).collect()
    }

    async fn get_log(&self, user_id: Uuid, log_id: Uuid) -> Result<Option<LogSummary>> {
        let row = sqlx::query_as::<_, PgLogSummaryRow>(
            r#"
            SELECT l.id, l.name, l."type" AS log_type, l.created_at, l.updated_at,
                   (SELECT COUNT(*) FROM entries e WHERE e.log_id = l.id) AS entry_count
            FROM logs l
            WHERE l.id = $1 AND l.user_id = $2
            "#,
        )
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(LogSummary::try_from).transpose()
    }

    async fn insert_log(&self, new: &NewLog) -> Result<Log> {
        let query = format!(
            r#"INSERT INTO logs (user_id, name, "type")
               VALUES ($1, $2, $3)
               RETURNING {LOG_COLUMNS}"#
        );
        let row = sqlx::query_as::<_, PgLogRow>(&query)
            .bind(new.user_id)
            .bind(&new.name)
            .bind(new.log_type.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Log::try_from(row)
    }

    async fn update_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        patch: &LogPatch,
    ) -> Result<Option<Log>> {
        let query = format!(
            r#"
            UPDATE logs
            SET name = COALESCE($3, name),
                "type" = COALESCE($4, "type"),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {LOG_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PgLogRow>(&query)
            .bind(log_id)
            .bind(user_id)
            .bind(patch.name.as_deref())
            .bind(patch.log_type.map(|t| t.to_string()))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(Log::try_from).transpose()
    }

    async fn delete_log(&self, user_id: Uuid, log_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1 AND user_id = $2")
            .bind(log_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

// ── PgEntryStore ──────────────────────────────────────────────

pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Photos and tags for a batch of entries, grouped by entry id.
    async fn load_children(
        &self,
        entry_ids: &[Uuid],
    ) -> Result<(HashMap<Uuid, Vec<Photo>>, HashMap<Uuid, Vec<Tag>>)> {
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE entry_id = ANY($1) ORDER BY display_order, id"
        );
        let photo_rows = sqlx::query_as::<_, PgPhotoRow>(&query)
            .bind(entry_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let tag_rows = sqlx::query_as::<_, PgEntryTagRow>(
            r#"
            SELECT et.entry_id, t.id, t.name, t.category, t.icon
            FROM entry_tags et
            JOIN tags t ON t.id = et.tag_id
            WHERE et.entry_id = ANY($1)
            ORDER BY et.created_at, t.name
            "#,
        )
        .bind(entry_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut photos: HashMap<Uuid, Vec<Photo>> = HashMap::new();
        for row in photo_rows {
            if let Some(entry_id) = row.entry_id {
                photos.entry(entry_id).or_default().push(Photo::from(row));
            }
        }
        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            let (entry_id, tag) = row.into_parts();
            tags.entry(entry_id).or_default().push(tag);
        }
        Ok((photos, tags))
    }

    async fn details(&self, rows: Vec<PgEntryRow>) -> Result<Vec<EntryDetail>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let (mut photos, mut tags) = self.load_children(&ids).await?;
        rows.into_iter()
            .map(|row| -> Result<EntryDetail> {
                let entry = Entry::try_from(row)?;
                Ok(EntryDetail {
                    photos: photos.remove(&entry.id).unwrap_or_default(),
                    tags: tags.remove(&entry.id).unwrap_or_default(),
                    entry,
                })
            })
            .collect()
    }

    async fn fetch_entry_row(&self, entry_id: Uuid) -> Result<Option<PgEntryRow>> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1");
        sqlx::query_as::<_, PgEntryRow>(&query)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<Entry>> {
        self.fetch_entry_row(entry_id)
            .await?
            .map(Entry::try_from)
            .transpose()
    }

    async fn get_entry_detail(&self, entry_id: Uuid) -> Result<Option<EntryDetail>> {
        let Some(row) = self.fetch_entry_row(entry_id).await? else {
            return Ok(None);
        };
        Ok(self.details(vec![row]).await?.pop())
    }

    async fn list_entry_details(&self, log_id: Uuid) -> Result<Vec<EntryDetail>> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE log_id = $1 ORDER BY event_date, created_at"
        );
        let rows = sqlx::query_as::<_, PgEntryRow>(&query)
            .bind(log_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        self.details(rows).await
    }

    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry> {
        let location = new.location.as_ref();
        let query = format!(
            r#"
            INSERT INTO entries (
                log_id, event_date, highlight_text,
                location_lat, location_lng, location_display_name, location_is_user_overridden
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ENTRY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PgEntryRow>(&query)
            .bind(new.log_id)
            .bind(new.event_date)
            .bind(&new.highlight_text)
            .bind(location.map(|l| l.lat))
            .bind(location.map(|l| l.lng))
            .bind(location.and_then(|l| l.display_name.as_deref()))
            .bind(location.is_some_and(|l| l.is_user_overridden))
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Entry::try_from(row)
    }

    async fn update_entry(&self, entry_id: Uuid, patch: &EntryPatch) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET event_date = COALESCE($2, event_date),
                highlight_text = COALESCE($3, highlight_text),
                location_lat = COALESCE($4, location_lat),
                location_lng = COALESCE($5, location_lng),
                location_display_name = COALESCE($6, location_display_name),
                location_is_user_overridden = COALESCE($7, location_is_user_overridden),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(entry_id)
        .bind(patch.event_date)
        .bind(patch.highlight_text.as_deref())
        .bind(patch.location_lat)
        .bind(patch.location_lng)
        .bind(patch.location_display_name.as_deref())
        .bind(patch.location_is_user_overridden)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(missing("entry", entry_id));
        }
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn add_entry_tags(&self, entry_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO entry_tags (entry_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS tag_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(entry_id)
        .bind(tag_ids)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn clear_entry_tags(&self, entry_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM entry_tags WHERE entry_id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn write_smart_page(&self, entry_id: Uuid, page: &SmartPage) -> Result<()> {
        let sprinkles: Vec<String> = page.sprinkles.iter().map(|s| s.to_string()).collect();
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET page_layout_type = $2,
                color_theme = $3,
                sprinkles = $4,
                is_processed = TRUE,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(entry_id)
        .bind(page.page_layout_type.to_string())
        .bind(page.color_theme.to_string())
        .bind(&sprinkles)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(missing("entry", entry_id));
        }
        Ok(())
    }

    async fn write_geocoded_location(
        &self,
        entry_id: Uuid,
        location: &GeocodedLocation,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET location_lat = $2,
                location_lng = $3,
                location_display_name = $4,
                updated_at = now()
            WHERE id = $1 AND location_is_user_overridden = FALSE
            "#,
        )
        .bind(entry_id)
        .bind(location.lat)
        .bind(location.lng)
        .bind(&location.display_name)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() == 0 {
            tracing::debug!(%entry_id, "geocoded location not written");
        }
        Ok(result.rows_affected() > 0)
    }
}

// ── PgPhotoStore ──────────────────────────────────────────────

pub struct PgPhotoStore {
    pool: PgPool,
}

impl PgPhotoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoStore for PgPhotoStore {
    async fn get_photo(&self, photo_id: Uuid) -> Result<Option<Photo>> {
        let query = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        let row = sqlx::query_as::<_, PgPhotoRow>(&query)
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(Photo::from))
    }

    async fn link_photo(
        &self,
        user_id: Uuid,
        photo_id: Uuid,
        entry_id: Uuid,
        display_order: i32,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE photos
            SET entry_id = $2, display_order = $3
            WHERE id = $1
              AND (entry_id IS NULL OR entry_id IN (
                  SELECT e.id FROM entries e
                  JOIN logs l ON l.id = e.log_id
                  WHERE l.user_id = $4))
            "#,
        )
        .bind(photo_id)
        .bind(entry_id)
        .bind(display_order)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn write_dominant_colors(&self, photo_id: Uuid, colors: &[DominantColor]) -> Result<()> {
        let colors = serde_json::to_value(colors).map_err(anyhow::Error::from)?;
        let result = sqlx::query("UPDATE photos SET dominant_colors = $2 WHERE id = $1")
            .bind(photo_id)
            .bind(colors)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(missing("photo", photo_id));
        }
        Ok(())
    }

    async fn write_processed_photo(
        &self,
        photo_id: Uuid,
        processed: &ProcessedPhoto,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE photos SET url = $2, thumbnail_url = $3, exif_data = $4 WHERE id = $1",
        )
        .bind(photo_id)
        .bind(&processed.url)
        .bind(&processed.thumbnail_url)
        .bind(&processed.exif_data)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(missing("photo", photo_id));
        }
        Ok(())
    }
}

// ── PgTagStore ────────────────────────────────────────────────

pub struct PgTagStore {
    pool: PgPool,
}

impl PgTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for PgTagStore {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, PgTagRow>(
            "SELECT id, name, category, icon FROM tags ORDER BY category, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }
}
