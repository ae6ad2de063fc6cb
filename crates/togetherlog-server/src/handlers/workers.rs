//! POST /workers/*: background jobs invoked by the app or a queue.
//!
//! Workers run under the same bearer auth as the CRUD routes and only touch
//! rows the caller owns; anything else is a 404.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use togetherlog_core::{proto::*, WorkerService};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::jwt::AuthUser;

pub async fn compute_smart_page(
    Extension(user): Extension<AuthUser>,
    Extension(workers): Extension<Arc<WorkerService>>,
    ApiJson(req): ApiJson<ComputeSmartPageRequest>,
) -> Result<Json<SmartPageResponse>, AppError> {
    tracing::debug!(user_id = %user.user_id, "compute-smart-page");
    Ok(Json(workers.compute_smart_page(user.user_id, req).await?))
}

pub async fn reverse_geocode(
    Extension(user): Extension<AuthUser>,
    Extension(workers): Extension<Arc<WorkerService>>,
    ApiJson(req): ApiJson<ReverseGeocodeRequest>,
) -> Result<Json<ReverseGeocodeResponse>, AppError> {
    tracing::debug!(user_id = %user.user_id, "reverse-geocode");
    Ok(Json(workers.reverse_geocode(user.user_id, req).await?))
}

pub async fn compute_colors(
    Extension(user): Extension<AuthUser>,
    Extension(workers): Extension<Arc<WorkerService>>,
    ApiJson(req): ApiJson<ComputeColorsRequest>,
) -> Result<Json<ComputeColorsResponse>, AppError> {
    tracing::debug!(user_id = %user.user_id, "compute-colors");
    Ok(Json(workers.compute_colors(user.user_id, req).await?))
}

pub async fn process_photo(
    Extension(user): Extension<AuthUser>,
    Extension(workers): Extension<Arc<WorkerService>>,
    ApiJson(req): ApiJson<ProcessPhotoRequest>,
) -> Result<Json<ProcessPhotoResponse>, AppError> {
    tracing::debug!(user_id = %user.user_id, "process-photo");
    Ok(Json(workers.process_photo(user.user_id, req).await?))
}
