//! Row shapes as Postgres returns them, and their conversion into core types.
//!
//! Enum columns are TEXT; an unrecognised value is a persistence error rather
//! than a silent default.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use togetherlog_core::error::TogetherLogError;
use togetherlog_core::types::*;

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, TogetherLogError> {
    T::from_str(value).map_err(|_| {
        TogetherLogError::Persistence(format!("unexpected {column} value '{value}'"))
    })
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub log_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgLogRow> for Log {
    type Error = TogetherLogError;

    fn try_from(row: PgLogRow) -> Result<Self, Self::Error> {
        Ok(Log {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            log_type: parse_column("type", &row.log_type)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgLogSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub log_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entry_count: i64,
}

impl TryFrom<PgLogSummaryRow> for LogSummary {
    type Error = TogetherLogError;

    fn try_from(row: PgLogSummaryRow) -> Result<Self, Self::Error> {
        Ok(LogSummary {
            id: row.id,
            name: row.name,
            log_type: parse_column("type", &row.log_type)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            entry_count: row.entry_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgEntryRow {
    pub id: Uuid,
    pub log_id: Uuid,
    pub event_date: NaiveDate,
    pub highlight_text: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_display_name: Option<String>,
    pub location_is_user_overridden: bool,
    pub page_layout_type: String,
    pub color_theme: String,
    pub sprinkles: Vec<String>,
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgEntryRow> for Entry {
    type Error = TogetherLogError;

    fn try_from(row: PgEntryRow) -> Result<Self, Self::Error> {
        let sprinkles = row
            .sprinkles
            .iter()
            .map(|s| parse_column("sprinkles", s))
            .collect::<Result<Vec<SprinkleIcon>, _>>()?;
        Ok(Entry {
            id: row.id,
            log_id: row.log_id,
            event_date: row.event_date,
            highlight_text: row.highlight_text,
            location_lat: row.location_lat,
            location_lng: row.location_lng,
            location_display_name: row.location_display_name,
            location_is_user_overridden: row.location_is_user_overridden,
            page_layout_type: parse_column("page_layout_type", &row.page_layout_type)?,
            color_theme: parse_column("color_theme", &row.color_theme)?,
            sprinkles,
            is_processed: row.is_processed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgPhotoRow {
    pub id: Uuid,
    pub entry_id: Option<Uuid>,
    pub storage_path: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub dominant_colors: Option<Value>,
    pub exif_data: Option<Value>,
}

impl From<PgPhotoRow> for Photo {
    fn from(row: PgPhotoRow) -> Self {
        // Palettes written by older clients may not match the current shape;
        // treat them as absent so the theme falls back to the tag rules.
        let dominant_colors = row
            .dominant_colors
            .and_then(|v| serde_json::from_value::<Vec<DominantColor>>(v).ok());
        Photo {
            id: row.id,
            entry_id: row.entry_id,
            storage_path: row.storage_path,
            url: row.url,
            thumbnail_url: row.thumbnail_url,
            display_order: row.display_order,
            dominant_colors,
            exif_data: row.exif_data,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgTagRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub icon: Option<String>,
}

impl From<PgTagRow> for Tag {
    fn from(row: PgTagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
            category: row.category,
            icon: row.icon,
        }
    }
}

/// A tag joined through `entry_tags`, keyed by the entry it belongs to.
#[derive(Debug, sqlx::FromRow)]
pub struct PgEntryTagRow {
    pub entry_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub icon: Option<String>,
}

impl PgEntryTagRow {
    pub fn into_parts(self) -> (Uuid, Tag) {
        (
            self.entry_id,
            Tag {
                id: self.id,
                name: self.name,
                category: self.category,
                icon: self.icon,
            },
        )
    }
}
