//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs; the `sub` claim is the user id. A verified caller
//! is attached to the request as an [`AuthUser`] extension.

use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone)]
pub struct JwtConfig {
    key: DecodingKey,
    validation: Validation,
}

impl JwtConfig {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {e}")))?;
        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid token subject"))?;
        Ok(AuthUser { user_id })
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    sub: String,
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

pub async fn jwt_auth(
    Extension(config): Extension<JwtConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header"))?
        .to_string();

    let user = config.verify(&token)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
