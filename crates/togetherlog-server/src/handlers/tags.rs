//! GET /tags: the tag vocabulary, flat and grouped by category.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use togetherlog_core::{proto::TagsResponse, JournalService};

use crate::error::AppError;

pub async fn list_tags(
    Extension(journal): Extension<Arc<JournalService>>,
) -> Result<Json<TagsResponse>, AppError> {
    Ok(Json(journal.list_tags().await?))
}
