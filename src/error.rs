/// Error types shared across the crate
///
/// Errors are carried inside iced messages, so every variant holds owned,
/// cloneable data rather than the source error itself.

use thiserror::Error;

/// Everything that can go wrong while searching, loading or persisting GIF layers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    /// Request could not be sent or the body could not be read
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status code
    #[error("HTTP status {0}")]
    Http(u16),

    /// Response body was not a valid GIPHY envelope
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Downloaded bytes could not be decoded as an image
    #[error("failed to decode image: {0}")]
    Image(String),

    /// A request URL could not be built
    #[error("invalid URL: {0}")]
    Url(String),

    /// A persisted transform record is malformed
    #[error("invalid transform record: {0}")]
    Record(String),

    /// A saved layout document is malformed or has an unknown version
    #[error("invalid layout: {0}")]
    Layout(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LayerError>;

impl From<reqwest::Error> for LayerError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => LayerError::Http(status.as_u16()),
            None => LayerError::Network(err.to_string()),
        }
    }
}

impl From<std::io::Error> for LayerError {
    fn from(err: std::io::Error) -> Self {
        LayerError::Io(err.to_string())
    }
}

impl From<image::ImageError> for LayerError {
    fn from(err: image::ImageError) -> Self {
        LayerError::Image(err.to_string())
    }
}
