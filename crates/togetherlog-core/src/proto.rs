//! Request and response bodies for the HTTP surface.
//!
//! Request fields are optional at the serde level so a missing field becomes
//! a 400 with a readable message instead of a deserialization failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::{DominantColor, EntryDetail, SmartPage, Tag};

// ── Workers ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputeSmartPageRequest {
    pub entry_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartPageInputs {
    pub photo_count: usize,
    pub tag_count: usize,
    pub tags: Vec<String>,
    pub has_location: bool,
    pub highlight_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartPageResponse {
    pub success: bool,
    pub entry_id: Uuid,
    pub smart_page: SmartPage,
    pub inputs: SmartPageInputs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseGeocodeRequest {
    pub entry_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationPayload {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    pub raw_data: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReverseGeocodeResponse {
    /// The entry's location was set by the user and is left alone.
    Skipped { message: String, entry_id: Uuid },
    Located {
        success: bool,
        entry_id: Uuid,
        location: LocationPayload,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputeColorsRequest {
    pub photo_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputeColorsResponse {
    pub success: bool,
    pub photo_id: Uuid,
    pub dominant_colors: Vec<DominantColor>,
    pub note: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessPhotoRequest {
    pub photo_id: Option<String>,
    pub storage_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPhotoResponse {
    pub success: bool,
    pub photo_id: Uuid,
    pub url: String,
    pub thumbnail_url: String,
    pub exif_data: Value,
    pub note: String,
}

// ── Logs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLogRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLogRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogResponse<T> {
    pub log: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse<T> {
    pub logs: Vec<T>,
}

// ── Entries ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEntryRequest {
    pub event_date: Option<String>,
    pub highlight_text: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_display_name: Option<String>,
    pub location_is_user_overridden: Option<bool>,
    pub tag_ids: Option<Vec<Uuid>>,
    /// Photos are uploaded separately and referenced here in display order.
    pub photo_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntryRequest {
    pub event_date: Option<String>,
    pub highlight_text: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_display_name: Option<String>,
    pub location_is_user_overridden: Option<bool>,
    /// Replaces the whole tag set when present.
    pub tag_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub entry: EntryDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<EntryDetail>,
}

// ── Tags ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TagBrief {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<Tag>,
    pub tags_by_category: BTreeMap<String, Vec<TagBrief>>,
}

impl TagsResponse {
    pub fn grouped(tags: Vec<Tag>) -> Self {
        let mut tags_by_category: BTreeMap<String, Vec<TagBrief>> = BTreeMap::new();
        for tag in &tags {
            tags_by_category
                .entry(tag.category.clone())
                .or_default()
                .push(TagBrief {
                    id: tag.id,
                    name: tag.name.clone(),
                    icon: tag.icon.clone(),
                });
        }
        Self {
            tags,
            tags_by_category,
        }
    }
}

// ── Misc ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
