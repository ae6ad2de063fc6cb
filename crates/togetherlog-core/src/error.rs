use thiserror::Error;

#[derive(Debug, Error)]
pub enum TogetherLogError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("geocoding provider error: {0}")]
    Provider(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TogetherLogError>;

impl TogetherLogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidCoordinates { .. } => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Provider(_) | Self::Persistence(_) | Self::Internal(_) => 500,
        }
    }

    /// True for errors detected before any side effect took place.
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}
