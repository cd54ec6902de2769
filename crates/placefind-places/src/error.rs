use placefind_core::PlacefindError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL {0}: {1}")]
    InvalidUrl(String, String),
}

impl From<PlacesError> for PlacefindError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Parse(msg) => PlacefindError::Decode(msg),
            PlacesError::InvalidUrl(url, msg) => {
                PlacefindError::ConfigError(format!("invalid URL {url}: {msg}"))
            }
            other => PlacefindError::Network(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlacesError>;
