//! Log, entry and tag CRUD with row-level ownership.
//!
//! A log belongs to one user; an entry is visible only through its log. Any
//! row the caller does not own is reported as not found.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Result, TogetherLogError};
use crate::ports::{EntryStore, LogStore, PhotoStore, TagStore};
use crate::proto::*;
use crate::types::*;
use crate::validation::*;

pub struct JournalService {
    logs: Arc<dyn LogStore>,
    entries: Arc<dyn EntryStore>,
    photos: Arc<dyn PhotoStore>,
    tags: Arc<dyn TagStore>,
}

impl JournalService {
    pub fn new(
        logs: Arc<dyn LogStore>,
        entries: Arc<dyn EntryStore>,
        photos: Arc<dyn PhotoStore>,
        tags: Arc<dyn TagStore>,
    ) -> Self {
        Self {
            logs,
            entries,
            photos,
            tags,
        }
    }

    // ── Logs ──

    pub async fn list_logs(&self, user_id: Uuid) -> Result<LogsResponse<LogSummary>> {
        let logs = self.logs.list_logs(user_id).await?;
        Ok(LogsResponse { logs })
    }

    pub async fn get_log(&self, user_id: Uuid, log_id: &str) -> Result<LogResponse<LogSummary>> {
        let log_id = validate_uuid(log_id, "log ID")?;
        let log = self.owned_log(user_id, log_id).await?;
        Ok(LogResponse { log })
    }

    pub async fn create_log(
        &self,
        user_id: Uuid,
        req: CreateLogRequest,
    ) -> Result<LogResponse<Log>> {
        let name = require(req.name, "name")?;
        validate_string(&name, "name", 1, LOG_NAME_MAX)?;
        let log_type = match req.log_type.as_deref() {
            Some(t) => validate_enum::<LogType>(t, "type")?,
            None => LogType::default(),
        };

        let log = self
            .logs
            .insert_log(&NewLog {
                user_id,
                name,
                log_type,
            })
            .await?;
        tracing::info!(log_id = %log.id, "log created");
        Ok(LogResponse { log })
    }

    pub async fn update_log(
        &self,
        user_id: Uuid,
        log_id: &str,
        req: UpdateLogRequest,
    ) -> Result<LogResponse<Log>> {
        let log_id = validate_uuid(log_id, "log ID")?;

        if let Some(name) = &req.name {
            validate_string(name, "name", 1, LOG_NAME_MAX)?;
        }
        let log_type = req
            .log_type
            .as_deref()
            .map(|t| validate_enum::<LogType>(t, "type"))
            .transpose()?;

        let patch = LogPatch {
            name: req.name,
            log_type,
        };
        if patch.is_empty() {
            return Err(TogetherLogError::validation("No fields to update"));
        }

        let log = self
            .logs
            .update_log(user_id, log_id, &patch)
            .await?
            .ok_or_else(|| TogetherLogError::not_found("Log"))?;
        Ok(LogResponse { log })
    }

    pub async fn delete_log(&self, user_id: Uuid, log_id: &str) -> Result<MessageResponse> {
        let log_id = validate_uuid(log_id, "log ID")?;
        if !self.logs.delete_log(user_id, log_id).await? {
            return Err(TogetherLogError::not_found("Log"));
        }
        tracing::info!(%log_id, "log deleted");
        Ok(MessageResponse::new("Log deleted successfully"))
    }

    // ── Entries ──

    pub async fn list_entries(&self, user_id: Uuid, log_id: &str) -> Result<EntriesResponse> {
        let log_id = validate_uuid(log_id, "log ID")?;
        self.owned_log(user_id, log_id).await?;
        let entries = self.entries.list_entry_details(log_id).await?;
        Ok(EntriesResponse { entries })
    }

    pub async fn get_entry(&self, user_id: Uuid, entry_id: &str) -> Result<EntryResponse> {
        let entry_id = validate_uuid(entry_id, "entry ID")?;
        self.owned_entry(user_id, entry_id).await?;
        let entry = self.load_detail(entry_id).await?;
        Ok(EntryResponse { entry })
    }

    /// Tag assignment and photo linking are best-effort: the entry exists
    /// once the insert succeeds, whatever happens to its links.
    pub async fn create_entry(
        &self,
        user_id: Uuid,
        log_id: &str,
        req: CreateEntryRequest,
    ) -> Result<EntryResponse> {
        let log_id = validate_uuid(log_id, "log ID")?;
        self.owned_log(user_id, log_id).await?;

        let event_date = parse_event_date(&require(req.event_date, "event_date")?)?;
        let highlight_text = req.highlight_text.unwrap_or_default();
        validate_string(&highlight_text, "highlight_text", 0, HIGHLIGHT_MAX)?;
        let location = validate_location_pair(req.location_lat, req.location_lng)?.map(
            |(lat, lng)| EntryLocation {
                lat,
                lng,
                display_name: req.location_display_name,
                is_user_overridden: req.location_is_user_overridden.unwrap_or(false),
            },
        );

        let entry = self
            .entries
            .insert_entry(&NewEntry {
                log_id,
                event_date,
                highlight_text,
                location,
            })
            .await?;
        tracing::info!(entry_id = %entry.id, %log_id, "entry created");

        if let Some(tag_ids) = req.tag_ids.filter(|ids| !ids.is_empty()) {
            if let Err(e) = self.entries.add_entry_tags(entry.id, &tag_ids).await {
                tracing::warn!(entry_id = %entry.id, "assigning tags failed: {e}");
            }
        }

        for (order, photo_id) in req.photo_ids.unwrap_or_default().into_iter().enumerate() {
            let order = i32::try_from(order).unwrap_or(i32::MAX);
            match self.photos.link_photo(user_id, photo_id, entry.id, order).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(entry_id = %entry.id, %photo_id, "photo not linkable, skipped");
                }
                Err(e) => {
                    tracing::warn!(entry_id = %entry.id, %photo_id, "linking photo failed: {e}");
                }
            }
        }

        let detail = self
            .entries
            .get_entry_detail(entry.id)
            .await?
            .unwrap_or(EntryDetail {
                entry,
                photos: Vec::new(),
                tags: Vec::new(),
            });
        Ok(EntryResponse { entry: detail })
    }

    pub async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: &str,
        req: UpdateEntryRequest,
    ) -> Result<EntryResponse> {
        let entry_id = validate_uuid(entry_id, "entry ID")?;
        self.owned_entry(user_id, entry_id).await?;

        if let Some(text) = &req.highlight_text {
            validate_string(text, "highlight_text", 0, HIGHLIGHT_MAX)?;
        }
        let location = validate_location_pair(req.location_lat, req.location_lng)?;
        let event_date = req.event_date.as_deref().map(parse_event_date).transpose()?;

        let patch = EntryPatch {
            event_date,
            highlight_text: req.highlight_text,
            location_lat: location.map(|(lat, _)| lat),
            location_lng: location.map(|(_, lng)| lng),
            location_display_name: req.location_display_name,
            location_is_user_overridden: req.location_is_user_overridden,
        };
        if !patch.is_empty() {
            self.entries.update_entry(entry_id, &patch).await?;
        }

        if let Some(tag_ids) = req.tag_ids {
            self.replace_tags(entry_id, &tag_ids).await;
        }

        let entry = self.load_detail(entry_id).await?;
        Ok(EntryResponse { entry })
    }

    pub async fn delete_entry(&self, user_id: Uuid, entry_id: &str) -> Result<MessageResponse> {
        let entry_id = validate_uuid(entry_id, "entry ID")?;
        self.owned_entry(user_id, entry_id).await?;
        self.entries.delete_entry(entry_id).await?;
        tracing::info!(%entry_id, "entry deleted");
        Ok(MessageResponse::new("Entry deleted successfully"))
    }

    // ── Tags ──

    pub async fn list_tags(&self) -> Result<TagsResponse> {
        let tags = self.tags.list_tags().await?;
        Ok(TagsResponse::grouped(tags))
    }

    // ── Ownership ──

    async fn owned_log(&self, user_id: Uuid, log_id: Uuid) -> Result<LogSummary> {
        self.logs
            .get_log(user_id, log_id)
            .await?
            .ok_or_else(|| TogetherLogError::not_found("Log"))
    }

    async fn owned_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<Entry> {
        owned_entry(self.logs.as_ref(), self.entries.as_ref(), user_id, entry_id).await
    }

    async fn load_detail(&self, entry_id: Uuid) -> Result<EntryDetail> {
        self.entries
            .get_entry_detail(entry_id)
            .await?
            .ok_or_else(|| TogetherLogError::not_found("Entry"))
    }

    async fn replace_tags(&self, entry_id: Uuid, tag_ids: &[Uuid]) {
        if let Err(e) = self.entries.clear_entry_tags(entry_id).await {
            tracing::warn!(%entry_id, "clearing tags failed: {e}");
            return;
        }
        if tag_ids.is_empty() {
            return;
        }
        if let Err(e) = self.entries.add_entry_tags(entry_id, tag_ids).await {
            tracing::warn!(%entry_id, "updating tags failed: {e}");
        }
    }
}

/// Loads an entry only if its log belongs to `user_id`. Someone else's entry
/// looks exactly like a missing one.
pub(crate) async fn owned_entry(
    logs: &dyn LogStore,
    entries: &dyn EntryStore,
    user_id: Uuid,
    entry_id: Uuid,
) -> Result<Entry> {
    let entry = entries
        .get_entry(entry_id)
        .await?
        .ok_or_else(|| TogetherLogError::not_found("Entry"))?;
    logs.get_log(user_id, entry.log_id)
        .await?
        .ok_or_else(|| TogetherLogError::not_found("Entry"))?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn service() -> (Arc<MemoryStore>, JournalService) {
        let store = Arc::new(MemoryStore::new());
        let svc = JournalService::new(store.clone(), store.clone(), store.clone(), store.clone());
        (store, svc)
    }

    async fn make_log(svc: &JournalService, user: Uuid) -> Uuid {
        svc.create_log(
            user,
            CreateLogRequest {
                name: Some("Us two".into()),
                log_type: None,
            },
        )
        .await
        .unwrap()
        .log
        .id
    }

    fn entry_req(date: &str) -> CreateEntryRequest {
        CreateEntryRequest {
            event_date: Some(date.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_log_defaults_to_couple() {
        let (_, svc) = service();
        let user = Uuid::new_v4();
        let resp = svc
            .create_log(
                user,
                CreateLogRequest {
                    name: Some("Us".into()),
                    log_type: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.log.log_type, LogType::Couple);
        assert_eq!(resp.log.user_id, user);
    }

    #[tokio::test]
    async fn create_log_validates() {
        let (_, svc) = service();
        let user = Uuid::new_v4();
        let err = svc
            .create_log(user, CreateLogRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "name is required");

        let err = svc
            .create_log(
                user,
                CreateLogRequest {
                    name: Some("x".into()),
                    log_type: Some("Roommates".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn other_users_logs_are_invisible() {
        let (_, svc) = service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let log_id = make_log(&svc, owner).await.to_string();

        assert_eq!(
            svc.get_log(stranger, &log_id).await.unwrap_err().http_status(),
            404
        );
        assert_eq!(
            svc.delete_log(stranger, &log_id).await.unwrap_err().http_status(),
            404
        );
        assert!(svc.list_logs(stranger).await.unwrap().logs.is_empty());
        assert_eq!(svc.get_log(owner, &log_id).await.unwrap().log.entry_count, 0);
    }

    #[tokio::test]
    async fn update_log_needs_fields() {
        let (_, svc) = service();
        let user = Uuid::new_v4();
        let log_id = make_log(&svc, user).await.to_string();
        let err = svc
            .update_log(user, &log_id, UpdateLogRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");

        let resp = svc
            .update_log(
                user,
                &log_id,
                UpdateLogRequest {
                    name: None,
                    log_type: Some("Family".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.log.log_type, LogType::Family);
    }

    #[tokio::test]
    async fn bad_log_id_is_validation_error() {
        let (_, svc) = service();
        let err = svc.get_log(Uuid::new_v4(), "abc").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid log ID format");
    }

    #[tokio::test]
    async fn entry_creation_survives_bad_tag_and_photo_links() {
        let (store, svc) = service();
        let user = Uuid::new_v4();
        let log_id = make_log(&svc, user).await.to_string();
        let good_photo = Uuid::new_v4();
        store.insert_photo(Photo::uploaded(good_photo, "a.jpg")).await;

        let resp = svc
            .create_entry(
                user,
                &log_id,
                CreateEntryRequest {
                    tag_ids: Some(vec![Uuid::new_v4()]),
                    photo_ids: Some(vec![Uuid::new_v4(), good_photo]),
                    ..entry_req("2024-07-14")
                },
            )
            .await
            .unwrap();

        assert!(resp.entry.tags.is_empty());
        assert_eq!(resp.entry.photos.len(), 1);
        assert_eq!(resp.entry.photos[0].display_order, 1);
        assert_eq!(resp.entry.entry.page_layout_type, LayoutType::SingleFull);
        assert!(!resp.entry.entry.is_processed);
    }

    #[tokio::test]
    async fn photos_cannot_be_taken_from_another_users_entry() {
        let (store, svc) = service();
        let owner = Uuid::new_v4();
        let owner_log = make_log(&svc, owner).await.to_string();
        let photo = Uuid::new_v4();
        store.insert_photo(Photo::uploaded(photo, "a.jpg")).await;
        let owners_entry = svc
            .create_entry(
                owner,
                &owner_log,
                CreateEntryRequest {
                    photo_ids: Some(vec![photo]),
                    ..entry_req("2024-07-14")
                },
            )
            .await
            .unwrap();
        assert_eq!(owners_entry.entry.photos.len(), 1);

        let stranger = Uuid::new_v4();
        let other_log_id = make_log(&svc, stranger).await.to_string();
        let others_entry = svc
            .create_entry(
                stranger,
                &other_log_id,
                CreateEntryRequest {
                    photo_ids: Some(vec![photo]),
                    ..entry_req("2024-07-15")
                },
            )
            .await
            .unwrap();
        assert!(others_entry.entry.photos.is_empty());

        let entry_id = owners_entry.entry.entry.id.to_string();
        let reloaded = svc.get_entry(owner, &entry_id).await.unwrap();
        assert_eq!(reloaded.entry.photos.len(), 1);
        assert_eq!(reloaded.entry.photos[0].id, photo);
    }

    #[tokio::test]
    async fn entry_location_must_be_paired() {
        let (_, svc) = service();
        let user = Uuid::new_v4();
        let log_id = make_log(&svc, user).await.to_string();
        let err = svc
            .create_entry(
                user,
                &log_id,
                CreateEntryRequest {
                    location_lat: Some(10.0),
                    ..entry_req("2024-07-14")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Both location_lat and location_lng must be provided together"
        );
    }

    #[tokio::test]
    async fn update_entry_replaces_tags() {
        let (store, svc) = service();
        let user = Uuid::new_v4();
        let log_id = make_log(&svc, user).await.to_string();
        let (happy, travel) = (Uuid::new_v4(), Uuid::new_v4());
        for (id, name) in [(happy, "Happy"), (travel, "Travel")] {
            store
                .insert_tag(Tag {
                    id,
                    name: name.into(),
                    category: "Mood".into(),
                    icon: None,
                })
                .await;
        }
        let created = svc
            .create_entry(
                user,
                &log_id,
                CreateEntryRequest {
                    tag_ids: Some(vec![happy]),
                    ..entry_req("2024-01-01")
                },
            )
            .await
            .unwrap();
        let entry_id = created.entry.entry.id.to_string();

        let updated = svc
            .update_entry(
                user,
                &entry_id,
                UpdateEntryRequest {
                    tag_ids: Some(vec![travel]),
                    highlight_text: Some("New year".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let names: Vec<&str> = updated.entry.tag_names().collect();
        assert_eq!(names, vec!["Travel"]);
        assert_eq!(updated.entry.entry.highlight_text, "New year");
    }

    #[tokio::test]
    async fn entries_are_scoped_to_owner() {
        let (_, svc) = service();
        let owner = Uuid::new_v4();
        let log_id = make_log(&svc, owner).await.to_string();
        let entry_id = svc
            .create_entry(owner, &log_id, entry_req("2024-02-02"))
            .await
            .unwrap()
            .entry
            .entry
            .id
            .to_string();

        let stranger = Uuid::new_v4();
        for err in [
            svc.get_entry(stranger, &entry_id).await.unwrap_err(),
            svc.delete_entry(stranger, &entry_id).await.unwrap_err(),
            svc.list_entries(stranger, &log_id).await.unwrap_err(),
        ] {
            assert_eq!(err.http_status(), 404);
        }

        svc.delete_entry(owner, &entry_id).await.unwrap();
        assert!(svc.list_entries(owner, &log_id).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn entries_listed_by_event_date() {
        let (_, svc) = service();
        let user = Uuid::new_v4();
        let log_id = make_log(&svc, user).await.to_string();
        for date in ["2024-03-03", "2023-01-01", "2024-01-01"] {
            svc.create_entry(user, &log_id, entry_req(date)).await.unwrap();
        }
        let dates: Vec<String> = svc
            .list_entries(user, &log_id)
            .await
            .unwrap()
            .entries
            .iter()
            .map(|e| e.entry.event_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2023-01-01", "2024-01-01", "2024-03-03"]);
    }

    #[tokio::test]
    async fn tags_grouped_by_category() {
        let (store, svc) = service();
        for (name, category) in [("Happy", "Mood"), ("Travel", "Places"), ("In Love", "Mood")] {
            store
                .insert_tag(Tag {
                    id: Uuid::new_v4(),
                    name: name.into(),
                    category: category.into(),
                    icon: None,
                })
                .await;
        }
        let resp = svc.list_tags().await.unwrap();
        assert_eq!(resp.tags.len(), 3);
        let mood: Vec<&str> = resp.tags_by_category["Mood"]
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(mood, vec!["Happy", "In Love"]);
        assert_eq!(resp.tags_by_category["Places"].len(), 1);
    }
}
