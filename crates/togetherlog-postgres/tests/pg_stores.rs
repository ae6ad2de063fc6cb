//! Store round trips against a real database.
//!
//! Requires a running PostgreSQL database; migrations are applied on connect.
//! Run with: DATABASE_URL="postgresql:///togetherlog_test" cargo test -p togetherlog-postgres -- --ignored

use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use togetherlog_core::ports::{EntryStore, LogStore, PhotoStore, TagStore};
use togetherlog_core::smart_page::{compute_smart_page, TagSet};
use togetherlog_core::types::*;
use togetherlog_postgres::{PgStores, MIGRATOR};

async fn stores() -> PgStores {
    PgStores::new(pool().await)
}

async fn pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database");
    MIGRATOR.run(&pool).await.expect("migrations failed");
    pool
}

async fn upload_photo(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO photos (storage_path) VALUES ('it/1.jpg') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn new_entry(stores: &PgStores) -> (Uuid, Entry) {
    let user = Uuid::new_v4();
    let log = stores
        .logs
        .insert_log(&NewLog {
            user_id: user,
            name: "Integration".into(),
            log_type: LogType::Friends,
        })
        .await
        .unwrap();
    let entry = stores
        .entries
        .insert_entry(&NewEntry {
            log_id: log.id,
            event_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            highlight_text: "Lake day".into(),
            location: None,
        })
        .await
        .unwrap();
    (user, entry)
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn new_entry_has_smart_page_defaults() {
    let stores = stores().await;
    let (_, entry) = new_entry(&stores).await;
    assert_eq!(entry.page_layout_type, LayoutType::SingleFull);
    assert_eq!(entry.color_theme, ColorTheme::Neutral);
    assert!(entry.sprinkles.is_empty());
    assert!(!entry.is_processed);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn smart_page_write_round_trips() {
    let stores = stores().await;
    let (_, entry) = new_entry(&stores).await;

    let tag = stores
        .tags
        .list_tags()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.name == "Lake / Beach")
        .expect("seeded tag");
    stores.entries.add_entry_tags(entry.id, &[tag.id]).await.unwrap();

    let detail = stores.entries.get_entry_detail(entry.id).await.unwrap().unwrap();
    let tags: TagSet = detail.tag_names().collect();
    let page = compute_smart_page(detail.photos.len(), &tags, &detail.photos);
    stores.entries.write_smart_page(entry.id, &page).await.unwrap();

    let stored = stores.entries.get_entry(entry.id).await.unwrap().unwrap();
    assert!(stored.is_processed);
    assert_eq!(stored.color_theme, ColorTheme::OceanBlue);
    assert_eq!(stored.sprinkles, vec![SprinkleIcon::Beach, SprinkleIcon::Sun]);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn unknown_tag_is_a_persistence_error() {
    let stores = stores().await;
    let (_, entry) = new_entry(&stores).await;
    let err = stores
        .entries
        .add_entry_tags(entry.id, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 500);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn delete_log_cascades_and_respects_owner() {
    let stores = stores().await;
    let (user, entry) = new_entry(&stores).await;

    assert!(!stores.logs.delete_log(Uuid::new_v4(), entry.log_id).await.unwrap());
    assert_eq!(
        stores.logs.get_log(user, entry.log_id).await.unwrap().unwrap().entry_count,
        1
    );
    assert!(stores.logs.delete_log(user, entry.log_id).await.unwrap());
    assert!(stores.entries.get_entry(entry.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn missing_photo_is_not_linked() {
    let stores = stores().await;
    let (user, entry) = new_entry(&stores).await;
    assert!(!stores
        .photos
        .link_photo(user, Uuid::new_v4(), entry.id, 0)
        .await
        .unwrap());
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn linked_photo_stays_with_its_owner() {
    let pool = pool().await;
    let stores = PgStores::new(pool.clone());
    let (owner, entry) = new_entry(&stores).await;
    let (stranger, other) = new_entry(&stores).await;
    let photo = upload_photo(&pool).await;

    assert!(stores.photos.link_photo(owner, photo, entry.id, 0).await.unwrap());
    assert!(!stores.photos.link_photo(stranger, photo, other.id, 0).await.unwrap());
    let stored = stores.photos.get_photo(photo).await.unwrap().unwrap();
    assert_eq!(stored.entry_id, Some(entry.id));
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn geocoded_location_respects_override() {
    let stores = stores().await;
    let (_, entry) = new_entry(&stores).await;
    let location = GeocodedLocation {
        lat: 48.8566,
        lng: 2.3522,
        display_name: "Paris, France".into(),
    };
    assert!(stores
        .entries
        .write_geocoded_location(entry.id, &location)
        .await
        .unwrap());

    stores
        .entries
        .update_entry(
            entry.id,
            &EntryPatch {
                location_display_name: Some("Our spot".into()),
                location_is_user_overridden: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!stores
        .entries
        .write_geocoded_location(entry.id, &location)
        .await
        .unwrap());
    let stored = stores.entries.get_entry(entry.id).await.unwrap().unwrap();
    assert_eq!(stored.location_display_name.as_deref(), Some("Our spot"));
}
