//! Domain types shared by the core services, the Postgres adapter and the server.
//!
//! The three Smart Page enums serialize to the same snake_case names the
//! clients and the `entries` table use; `Display` writes the column value and
//! `FromStr` parses it back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

// ── Smart Page enums ──────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
pub enum LayoutType {
    #[default]
    #[serde(rename = "single_full")]
    #[strum(serialize = "single_full")]
    SingleFull,
    #[serde(rename = "grid_2x2")]
    #[strum(serialize = "grid_2x2")]
    Grid2x2,
    #[serde(rename = "grid_2x3")]
    #[strum(serialize = "grid_2x3")]
    Grid2x3,
    #[serde(rename = "grid_3x2")]
    #[strum(serialize = "grid_3x2")]
    Grid3x2,
    #[serde(rename = "collage_4")]
    #[strum(serialize = "collage_4")]
    Collage4,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorTheme {
    WarmRed,
    SoftRose,
    EarthGreen,
    OceanBlue,
    DeepPurple,
    #[default]
    Neutral,
    WarmEarth,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SprinkleIcon {
    Heart,
    Mountain,
    Tree,
    Beach,
    Wave,
    Sun,
    Star,
    Airplane,
    Camera,
    Utensils,
    Gift,
    Balloon,
}

/// Computed presentation metadata for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SmartPage {
    pub page_layout_type: LayoutType,
    pub color_theme: ColorTheme,
    pub sprinkles: Vec<SprinkleIcon>,
}

// ── Photos and tags ───────────────────────────────────────────

/// One extracted color, ordered by descending `percentage` within a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub hex: String,
    pub rgb: [u8; 3],
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub entry_id: Option<Uuid>,
    pub storage_path: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub dominant_colors: Option<Vec<DominantColor>>,
    pub exif_data: Option<serde_json::Value>,
}

impl Photo {
    /// An unlinked photo as it exists right after upload.
    pub fn uploaded(id: Uuid, storage_path: impl Into<String>) -> Self {
        Self {
            id,
            entry_id: None,
            storage_path: Some(storage_path.into()),
            url: None,
            thumbnail_url: None,
            display_order: 0,
            dominant_colors: None,
            exif_data: None,
        }
    }

    pub fn first_dominant_color(&self) -> Option<&DominantColor> {
        self.dominant_colors.as_ref().and_then(|c| c.first())
    }
}

/// Fields written back by the photo processing worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedPhoto {
    pub url: String,
    pub thumbnail_url: String,
    pub exif_data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub icon: Option<String>,
}

// ── Logs ──────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
pub enum LogType {
    #[default]
    Couple,
    Friends,
    Family,
    Solo,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entry_count: i64,
}

impl LogSummary {
    pub fn from_log(log: &Log, entry_count: i64) -> Self {
        Self {
            id: log.id,
            name: log.name.clone(),
            log_type: log.log_type,
            created_at: log.created_at,
            updated_at: log.updated_at,
            entry_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLog {
    pub user_id: Uuid,
    pub name: String,
    pub log_type: LogType,
}

#[derive(Debug, Clone, Default)]
pub struct LogPatch {
    pub name: Option<String>,
    pub log_type: Option<LogType>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.log_type.is_none()
    }
}

// ── Entries ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLocation {
    pub lat: f64,
    pub lng: f64,
    pub display_name: Option<String>,
    pub is_user_overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub log_id: Uuid,
    pub event_date: NaiveDate,
    pub highlight_text: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_display_name: Option<String>,
    pub location_is_user_overridden: bool,
    pub page_layout_type: LayoutType,
    pub color_theme: ColorTheme,
    pub sprinkles: Vec<SprinkleIcon>,
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn location(&self) -> Option<EntryLocation> {
        match (self.location_lat, self.location_lng) {
            (Some(lat), Some(lng)) => Some(EntryLocation {
                lat,
                lng,
                display_name: self.location_display_name.clone(),
                is_user_overridden: self.location_is_user_overridden,
            }),
            _ => None,
        }
    }

    /// Location presence as the Smart Page worker reports it: both
    /// coordinates set and non-zero.
    pub fn has_location(&self) -> bool {
        matches!(
            (self.location_lat, self.location_lng),
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0
        )
    }

    pub fn smart_page(&self) -> SmartPage {
        SmartPage {
            page_layout_type: self.page_layout_type,
            color_theme: self.color_theme,
            sprinkles: self.sprinkles.clone(),
        }
    }
}

/// An entry joined with its ordered photos and its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: Entry,
    pub photos: Vec<Photo>,
    pub tags: Vec<Tag>,
}

impl EntryDetail {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

/// Insert payload; Smart Page fields always start at their defaults.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub log_id: Uuid,
    pub event_date: NaiveDate,
    pub highlight_text: String,
    pub location: Option<EntryLocation>,
}

#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub event_date: Option<NaiveDate>,
    pub highlight_text: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_display_name: Option<String>,
    pub location_is_user_overridden: Option<bool>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.event_date.is_none()
            && self.highlight_text.is_none()
            && self.location_lat.is_none()
            && self.location_lng.is_none()
            && self.location_display_name.is_none()
            && self.location_is_user_overridden.is_none()
    }
}

/// Location fields written by the geocoding worker.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn layout_wire_names() {
        assert_eq!(LayoutType::Grid2x2.to_string(), "grid_2x2");
        assert_eq!(LayoutType::from_str("grid_3x2").unwrap(), LayoutType::Grid3x2);
        assert_eq!(
            serde_json::to_value(LayoutType::Collage4).unwrap(),
            serde_json::json!("collage_4")
        );
    }

    #[test]
    fn theme_and_icon_wire_names() {
        assert_eq!(ColorTheme::WarmEarth.to_string(), "warm_earth");
        assert_eq!(ColorTheme::from_str("deep_purple").unwrap(), ColorTheme::DeepPurple);
        assert_eq!(SprinkleIcon::Utensils.to_string(), "utensils");
        assert!(SprinkleIcon::from_str("Heart").is_err());
    }

    #[test]
    fn log_type_parses_exact_names() {
        assert_eq!(LogType::from_str("Friends").unwrap(), LogType::Friends);
        assert!(LogType::from_str("friends").is_err());
        assert_eq!(LogType::default(), LogType::Couple);
    }
}
