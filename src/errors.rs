// appinfosync/src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} {reason} from {url}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("XML decoding error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("XML encoding error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),

    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read {0} from the terminal")]
    Prompt(&'static str),
}

impl AppError {
    /// Errors that only invalidate the item being processed: the server
    /// answered, but with a non-success status. Anything else ends the run.
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, AppError::HttpStatus { .. })
    }

    pub(crate) fn from_status(url: &str, status: reqwest::StatusCode) -> Self {
        AppError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
