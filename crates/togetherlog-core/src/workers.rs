//! Background workers: Smart Page, reverse geocoding, colors, photo processing.
//!
//! Each worker validates its payload, loads the referenced row, computes, and
//! writes back. Rows are scoped to the calling user the same way the journal
//! scopes them: a row someone else owns is not found. Validation and not-found
//! errors are returned before any side effect; provider and persistence errors
//! bubble up as 500s.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, TogetherLogError};
use crate::geocode::ReverseGeocoder;
use crate::journal::owned_entry;
use crate::photos::{
    placeholder_palette, PublicUrlBuilder, PLACEHOLDER_COLORS_NOTE, PROCESSING_NOTE,
};
use crate::ports::{EntryStore, LogStore, PhotoStore};
use crate::proto::*;
use crate::smart_page::{compute_smart_page, TagSet};
use crate::types::{Entry, GeocodedLocation, Photo};
use crate::validation::{require, validate_coordinates, validate_uuid};

pub const USER_OVERRIDE_MESSAGE: &str = "Location is user-overridden, skipping geocoding";

pub struct WorkerService {
    logs: Arc<dyn LogStore>,
    entries: Arc<dyn EntryStore>,
    photos: Arc<dyn PhotoStore>,
    geocoder: ReverseGeocoder,
    urls: PublicUrlBuilder,
}

impl WorkerService {
    pub fn new(
        logs: Arc<dyn LogStore>,
        entries: Arc<dyn EntryStore>,
        photos: Arc<dyn PhotoStore>,
        geocoder: ReverseGeocoder,
        urls: PublicUrlBuilder,
    ) -> Self {
        Self {
            logs,
            entries,
            photos,
            geocoder,
            urls,
        }
    }

    pub async fn compute_smart_page(
        &self,
        user_id: Uuid,
        req: ComputeSmartPageRequest,
    ) -> Result<SmartPageResponse> {
        let entry_id = parse_id(req.entry_id, "entry_id")?;
        self.owned_entry(user_id, entry_id).await?;

        let detail = self
            .entries
            .get_entry_detail(entry_id)
            .await?
            .ok_or_else(|| TogetherLogError::not_found("Entry"))?;

        let tags: TagSet = detail.tag_names().collect();
        let photo_count = detail.photos.len();
        let page = compute_smart_page(photo_count, &tags, &detail.photos);

        self.entries.write_smart_page(entry_id, &page).await?;
        tracing::debug!(
            %entry_id,
            layout = %page.page_layout_type,
            theme = %page.color_theme,
            sprinkles = page.sprinkles.len(),
            "smart page computed"
        );

        Ok(SmartPageResponse {
            success: true,
            entry_id,
            inputs: SmartPageInputs {
                photo_count,
                tag_count: tags.len(),
                has_location: detail.entry.has_location(),
                highlight_length: detail.entry.highlight_text.chars().count(),
                tags: tags.into_vec(),
            },
            smart_page: page,
        })
    }

    pub async fn reverse_geocode(
        &self,
        user_id: Uuid,
        req: ReverseGeocodeRequest,
    ) -> Result<ReverseGeocodeResponse> {
        let (Some(entry_id), Some(lat), Some(lng)) = (req.entry_id, req.lat, req.lng) else {
            return Err(TogetherLogError::validation(
                "entry_id, lat, and lng are required",
            ));
        };
        let entry_id = validate_uuid(&entry_id, "entry_id")?;
        validate_coordinates(lat, lng)?;

        let entry = self.owned_entry(user_id, entry_id).await?;
        if entry.location_is_user_overridden {
            tracing::debug!(%entry_id, "location is user-overridden, not geocoding");
            return Ok(skipped(entry_id));
        }

        let result = self.geocoder.geocode(lat, lng).await?;
        let location = GeocodedLocation {
            lat,
            lng,
            display_name: result.display_name,
        };
        // The user may have set a location while the lookup was in flight.
        let written = self
            .entries
            .write_geocoded_location(entry_id, &location)
            .await?;
        if !written {
            tracing::debug!(%entry_id, "location overridden during lookup, discarding");
            return Ok(skipped(entry_id));
        }

        Ok(ReverseGeocodeResponse::Located {
            success: true,
            entry_id,
            location: LocationPayload {
                lat,
                lng,
                display_name: location.display_name,
                raw_data: result.raw,
            },
        })
    }

    pub async fn compute_colors(
        &self,
        user_id: Uuid,
        req: ComputeColorsRequest,
    ) -> Result<ComputeColorsResponse> {
        let photo_id = parse_id(req.photo_id, "photo_id")?;
        self.owned_photo(user_id, photo_id).await?;

        let dominant_colors = placeholder_palette();
        self.photos
            .write_dominant_colors(photo_id, &dominant_colors)
            .await?;

        Ok(ComputeColorsResponse {
            success: true,
            photo_id,
            dominant_colors,
            note: PLACEHOLDER_COLORS_NOTE.to_string(),
        })
    }

    pub async fn process_photo(
        &self,
        user_id: Uuid,
        req: ProcessPhotoRequest,
    ) -> Result<ProcessPhotoResponse> {
        let (Some(photo_id), Some(storage_path)) = (req.photo_id, req.storage_path) else {
            return Err(TogetherLogError::validation(
                "photo_id and storage_path are required",
            ));
        };
        let photo_id = validate_uuid(&photo_id, "photo_id")?;
        let photo = self.owned_photo(user_id, photo_id).await?;
        if photo.storage_path.as_deref().is_some_and(|p| p != storage_path) {
            return Err(TogetherLogError::validation(
                "storage_path does not match the photo",
            ));
        }

        let processed = self.urls.processed(&storage_path, Utc::now());
        self.photos
            .write_processed_photo(photo_id, &processed)
            .await?;

        Ok(ProcessPhotoResponse {
            success: true,
            photo_id,
            url: processed.url,
            thumbnail_url: processed.thumbnail_url,
            exif_data: processed.exif_data,
            note: PROCESSING_NOTE.to_string(),
        })
    }

    async fn owned_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<Entry> {
        owned_entry(self.logs.as_ref(), self.entries.as_ref(), user_id, entry_id).await
    }

    /// A photo attached to an entry is reachable only by that entry's owner.
    /// Freshly uploaded photos have no entry yet and are open to processing.
    async fn owned_photo(&self, user_id: Uuid, photo_id: Uuid) -> Result<Photo> {
        let photo = self
            .photos
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| TogetherLogError::not_found("Photo"))?;
        if let Some(entry_id) = photo.entry_id {
            match self.owned_entry(user_id, entry_id).await {
                Err(TogetherLogError::NotFound(_)) => {
                    return Err(TogetherLogError::not_found("Photo"));
                }
                other => {
                    other?;
                }
            }
        }
        Ok(photo)
    }
}

fn skipped(entry_id: Uuid) -> ReverseGeocodeResponse {
    ReverseGeocodeResponse::Skipped {
        message: USER_OVERRIDE_MESSAGE.to_string(),
        entry_id,
    }
}

fn parse_id(value: Option<String>, field: &str) -> Result<Uuid> {
    let raw = require(value.filter(|v| !v.is_empty()), field)?;
    validate_uuid(&raw, field)
}
