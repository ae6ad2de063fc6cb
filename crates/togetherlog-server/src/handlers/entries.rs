//! Entry CRUD. Entries are reached through a log the caller owns.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use togetherlog_core::{
    proto::{
        CreateEntryRequest, EntriesResponse, EntryResponse, MessageResponse, UpdateEntryRequest,
    },
    JournalService,
};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::jwt::AuthUser;

/// GET /logs/:log_id/entries
pub async fn list_entries(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(log_id): Path<String>,
) -> Result<Json<EntriesResponse>, AppError> {
    Ok(Json(journal.list_entries(user.user_id, &log_id).await?))
}

/// POST /logs/:log_id/entries
pub async fn create_entry(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(log_id): Path<String>,
    ApiJson(req): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let resp = journal.create_entry(user.user_id, &log_id, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn get_entry(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
) -> Result<Json<EntryResponse>, AppError> {
    Ok(Json(journal.get_entry(user.user_id, &id).await?))
}

pub async fn update_entry(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateEntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    Ok(Json(journal.update_entry(user.user_id, &id, req).await?))
}

pub async fn delete_entry(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(journal.delete_entry(user.user_id, &id).await?))
}
