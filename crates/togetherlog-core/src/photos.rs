//! Placeholder photo metadata.
//!
//! No image is decoded here: the color worker stores a fixed warm-brown
//! palette and the processing worker derives public URLs from the storage
//! path and stamps a minimal metadata record.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::types::{DominantColor, ProcessedPhoto};

pub const PHOTO_BUCKET: &str = "photos";
pub const PROCESSOR_NAME: &str = "TogetherLog-V1";

pub const PLACEHOLDER_COLORS_NOTE: &str =
    "V1: Placeholder colors. Real color extraction requires additional setup.";
pub const PROCESSING_NOTE: &str =
    "V1: Basic processing complete. EXIF and thumbnail generation require additional setup.";

/// Five browns, most dominant first, percentages summing to 100.
pub fn placeholder_palette() -> Vec<DominantColor> {
    [
        ("#8B7355", [139, 115, 85], 35.0),
        ("#A0826D", [160, 130, 109], 25.0),
        ("#6B5D52", [107, 93, 82], 20.0),
        ("#D4C4B0", [212, 196, 176], 12.0),
        ("#4A3F35", [74, 63, 53], 8.0),
    ]
    .into_iter()
    .map(|(hex, rgb, percentage)| DominantColor {
        hex: hex.to_string(),
        rgb,
        percentage,
    })
    .collect()
}

/// Builds public object URLs for the photo bucket.
#[derive(Debug, Clone)]
pub struct PublicUrlBuilder {
    base_url: String,
}

impl PublicUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn public_url(&self, storage_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            PHOTO_BUCKET,
            storage_path.trim_start_matches('/')
        )
    }

    /// Thumbnails are not generated yet; they point at the original.
    pub fn processed(&self, storage_path: &str, now: DateTime<Utc>) -> ProcessedPhoto {
        let url = self.public_url(storage_path);
        ProcessedPhoto {
            thumbnail_url: url.clone(),
            url,
            exif_data: json!({
                "processed_at": now.to_rfc3339(),
                "processor": PROCESSOR_NAME,
                "note": "Full EXIF extraction requires additional setup",
            }),
        }
    }
}
