//! JSON body extractor whose rejection uses the API error shape.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use togetherlog_core::error::TogetherLogError;

use crate::error::AppError;

/// Like [`axum::Json`], but a missing or malformed body is a 400 `{error}`.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError(TogetherLogError::validation(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                )))
            })?;
        Ok(Self(value))
    }
}
