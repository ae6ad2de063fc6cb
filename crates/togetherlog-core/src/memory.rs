//! In-memory implementation of every store port.
//!
//! Used by the HTTP tests and for running the server without a database.
//! Referential checks mirror the Postgres foreign keys: linking an unknown
//! tag or photo fails the same way the database would.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, TogetherLogError};
use crate::ports::{EntryStore, LogStore, PhotoStore, TagStore};
use crate::types::*;

#[derive(Default)]
struct State {
    logs: HashMap<Uuid, Log>,
    entries: HashMap<Uuid, Entry>,
    photos: HashMap<Uuid, Photo>,
    tags: HashMap<Uuid, Tag>,
    /// (entry_id, tag_id) in insertion order.
    entry_tags: Vec<(Uuid, Uuid)>,
}

impl State {
    fn entry_count(&self, log_id: Uuid) -> i64 {
        self.entries.values().filter(|e| e.log_id == log_id).count() as i64
    }

    fn detail(&self, entry: &Entry) -> EntryDetail {
        let mut photos: Vec<Photo> = self
            .photos
            .values()
            .filter(|p| p.entry_id == Some(entry.id))
            .cloned()
            .collect();
        photos.sort_by_key(|p| p.display_order);

        let tags = self
            .entry_tags
            .iter()
            .filter(|(entry_id, _)| *entry_id == entry.id)
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();

        EntryDetail {
            entry: entry.clone(),
            photos,
            tags,
        }
    }

    fn remove_entry(&mut self, entry_id: Uuid) {
        self.entries.remove(&entry_id);
        self.entry_tags.retain(|(e, _)| *e != entry_id);
        self.photos.retain(|_, p| p.entry_id != Some(entry_id));
    }

    fn entry_mut(&mut self, entry_id: Uuid) -> Result<&mut Entry> {
        self.entries
            .get_mut(&entry_id)
            .ok_or_else(|| {
                TogetherLogError::Persistence(format!("entry {entry_id} does not exist"))
            })
    }

    fn entry_owner(&self, entry_id: Uuid) -> Option<Uuid> {
        let entry = self.entries.get(&entry_id)?;
        self.logs.get(&entry.log_id).map(|l| l.user_id)
    }

    fn photo_mut(&mut self, photo_id: Uuid) -> Result<&mut Photo> {
        self.photos
            .get_mut(&photo_id)
            .ok_or_else(|| {
                TogetherLogError::Persistence(format!("photo {photo_id} does not exist"))
            })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tag (the tag vocabulary is reference data, not user-created).
    pub async fn insert_tag(&self, tag: Tag) {
        self.state.write().await.tags.insert(tag.id, tag);
    }

    /// Seed an uploaded photo.
    pub async fn insert_photo(&self, photo: Photo) {
        self.state.write().await.photos.insert(photo.id, photo);
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn list_logs(&self, user_id: Uuid) -> Result<Vec<LogSummary>> {
        let state = self.state.read().await;
        let mut logs: Vec<LogSummary> = state
            .logs
            .values()
            .filter(|l| l.user_id == user_id)
            .map(|l| LogSummary::from_log(l, state.entry_count(l.id)))
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn get_log(&self, user_id: Uuid, log_id: Uuid) -> Result<Option<LogSummary>> {
        let state = self.state.read().await;
        Ok(state
            .logs
            .get(&log_id)
            .filter(|l| l.user_id == user_id)
            .map(|l| LogSummary::from_log(l, state.entry_count(l.id))))
    }

    async fn insert_log(&self, new: &NewLog) -> Result<Log> {
        let now = Utc::now();
        let log = Log {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name.clone(),
            log_type: new.log_type,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.logs.insert(log.id, log.clone());
        Ok(log)
    }

    async fn update_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        patch: &LogPatch,
    ) -> Result<Option<Log>> {
        let mut state = self.state.write().await;
        let Some(log) = state.logs.get_mut(&log_id).filter(|l| l.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            log.name = name.clone();
        }
        if let Some(log_type) = patch.log_type {
            log.log_type = log_type;
        }
        log.updated_at = Utc::now();
        Ok(Some(log.clone()))
    }

    async fn delete_log(&self, user_id: Uuid, log_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .logs
            .get(&log_id)
            .is_some_and(|l| l.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        state.logs.remove(&log_id);
        let entry_ids: Vec<Uuid> = state
            .entries
            .values()
            .filter(|e| e.log_id == log_id)
            .map(|e| e.id)
            .collect();
        for entry_id in entry_ids {
            state.remove_entry(entry_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<Entry>> {
        Ok(self.state.read().await.entries.get(&entry_id).cloned())
    }

    async fn get_entry_detail(&self, entry_id: Uuid) -> Result<Option<EntryDetail>> {
        let state = self.state.read().await;
        Ok(state.entries.get(&entry_id).map(|e| state.detail(e)))
    }

    async fn list_entry_details(&self, log_id: Uuid) -> Result<Vec<EntryDetail>> {
        let state = self.state.read().await;
        let mut entries: Vec<&Entry> = state
            .entries
            .values()
            .filter(|e| e.log_id == log_id)
            .collect();
        entries.sort_by_key(|e| (e.event_date, e.created_at));
        Ok(entries.into_iter().map(|e| state.detail(e)).collect())
    }

    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry> {
        let mut state = self.state.write().await;
        if !state.logs.contains_key(&new.log_id) {
            return Err(TogetherLogError::Persistence(format!(
                "log {} does not exist",
                new.log_id
            )));
        }
        let now = Utc::now();
        let location = new.location.as_ref();
        let entry = Entry {
            id: Uuid::new_v4(),
            log_id: new.log_id,
            event_date: new.event_date,
            highlight_text: new.highlight_text.clone(),
            location_lat: location.map(|l| l.lat),
            location_lng: location.map(|l| l.lng),
            location_display_name: location.and_then(|l| l.display_name.clone()),
            location_is_user_overridden: location.is_some_and(|l| l.is_user_overridden),
            page_layout_type: LayoutType::default(),
            color_theme: ColorTheme::default(),
            sprinkles: Vec::new(),
            is_processed: false,
            created_at: now,
            updated_at: now,
        };
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, entry_id: Uuid, patch: &EntryPatch) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state.entry_mut(entry_id)?;
        if let Some(date) = patch.event_date {
            entry.event_date = date;
        }
        if let Some(text) = &patch.highlight_text {
            entry.highlight_text = text.clone();
        }
        if let Some(lat) = patch.location_lat {
            entry.location_lat = Some(lat);
        }
        if let Some(lng) = patch.location_lng {
            entry.location_lng = Some(lng);
        }
        if let Some(name) = &patch.location_display_name {
            entry.location_display_name = Some(name.clone());
        }
        if let Some(flag) = patch.location_is_user_overridden {
            entry.location_is_user_overridden = flag;
        }
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> Result<()> {
        self.state.write().await.remove_entry(entry_id);
        Ok(())
    }

    async fn add_entry_tags(&self, entry_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(missing) = tag_ids.iter().find(|id| !state.tags.contains_key(*id)) {
            return Err(TogetherLogError::Persistence(format!(
                "tag {missing} does not exist"
            )));
        }
        for tag_id in tag_ids {
            if !state.entry_tags.contains(&(entry_id, *tag_id)) {
                state.entry_tags.push((entry_id, *tag_id));
            }
        }
        Ok(())
    }

    async fn clear_entry_tags(&self, entry_id: Uuid) -> Result<()> {
        self.state
            .write()
            .await
            .entry_tags
            .retain(|(e, _)| *e != entry_id);
        Ok(())
    }

    async fn write_smart_page(&self, entry_id: Uuid, page: &SmartPage) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state.entry_mut(entry_id)?;
        entry.page_layout_type = page.page_layout_type;
        entry.color_theme = page.color_theme;
        entry.sprinkles = page.sprinkles.clone();
        entry.is_processed = true;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn write_geocoded_location(
        &self,
        entry_id: Uuid,
        location: &GeocodedLocation,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(entry) = state
            .entries
            .get_mut(&entry_id)
            .filter(|e| !e.location_is_user_overridden)
        else {
            return Ok(false);
        };
        entry.location_lat = Some(location.lat);
        entry.location_lng = Some(location.lng);
        entry.location_display_name = Some(location.display_name.clone());
        entry.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn get_photo(&self, photo_id: Uuid) -> Result<Option<Photo>> {
        Ok(self.state.read().await.photos.get(&photo_id).cloned())
    }

    async fn link_photo(
        &self,
        user_id: Uuid,
        photo_id: Uuid,
        entry_id: Uuid,
        display_order: i32,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(current) = state.photos.get(&photo_id).map(|p| p.entry_id) else {
            return Ok(false);
        };
        if let Some(current) = current {
            if state.entry_owner(current) != Some(user_id) {
                return Ok(false);
            }
        }
        let photo = state.photo_mut(photo_id)?;
        photo.entry_id = Some(entry_id);
        photo.display_order = display_order;
        Ok(true)
    }

    async fn write_dominant_colors(&self, photo_id: Uuid, colors: &[DominantColor]) -> Result<()> {
        let mut state = self.state.write().await;
        state.photo_mut(photo_id)?.dominant_colors = Some(colors.to_vec());
        Ok(())
    }

    async fn write_processed_photo(
        &self,
        photo_id: Uuid,
        processed: &ProcessedPhoto,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let photo = state.photo_mut(photo_id)?;
        photo.url = Some(processed.url.clone());
        photo.thumbnail_url = Some(processed.thumbnail_url.clone());
        photo.exif_data = Some(processed.exif_data.clone());
        Ok(())
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self.state.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(tags)
    }
}
