//! /logs: CRUD over the caller's logs.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use togetherlog_core::{
    proto::{CreateLogRequest, LogResponse, LogsResponse, MessageResponse, UpdateLogRequest},
    types::{Log, LogSummary},
    JournalService,
};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::jwt::AuthUser;

pub async fn list_logs(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
) -> Result<Json<LogsResponse<LogSummary>>, AppError> {
    Ok(Json(journal.list_logs(user.user_id).await?))
}

pub async fn get_log(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
) -> Result<Json<LogResponse<LogSummary>>, AppError> {
    Ok(Json(journal.get_log(user.user_id, &id).await?))
}

pub async fn create_log(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    ApiJson(req): ApiJson<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogResponse<Log>>), AppError> {
    let resp = journal.create_log(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn update_log(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateLogRequest>,
) -> Result<Json<LogResponse<Log>>, AppError> {
    Ok(Json(journal.update_log(user.user_id, &id, req).await?))
}

pub async fn delete_log(
    Extension(user): Extension<AuthUser>,
    Extension(journal): Extension<Arc<JournalService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(journal.delete_log(user.user_id, &id).await?))
}
