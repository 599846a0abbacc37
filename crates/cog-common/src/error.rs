//! Error types for the COG viewer crates.

use thiserror::Error;

/// Result type alias using ViewerError.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Primary error type for viewer operations.
#[derive(Debug, Error)]
pub enum ViewerError {
    // === Parameter Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid bounds: {0}")]
    InvalidBbox(String),

    // === Metadata Service Errors ===
    #[error("Metadata request failed: {0}")]
    MetadataRequest(String),

    #[error("Metadata service returned {status}: {detail}")]
    ServiceStatus { status: u16, detail: String },

    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    // === Viewport Errors ===
    #[error("Projection error: {0}")]
    ProjectionError(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Request timeout")]
    Timeout,
}

impl ViewerError {
    /// Whether the failure came from the metadata service round trip.
    ///
    /// These collapse to "no metadata" in the session instead of surfacing.
    pub fn is_metadata_failure(&self) -> bool {
        matches!(
            self,
            ViewerError::MetadataRequest(_)
                | ViewerError::ServiceStatus { .. }
                | ViewerError::MalformedMetadata(_)
                | ViewerError::Timeout
        )
    }
}

impl From<crate::crs::CrsParseError> for ViewerError {
    fn from(err: crate::crs::CrsParseError) -> Self {
        ViewerError::InvalidCrs(err.to_string())
    }
}

impl From<crate::bbox::BboxParseError> for ViewerError {
    fn from(err: crate::bbox::BboxParseError) -> Self {
        ViewerError::InvalidBbox(err.to_string())
    }
}

// Conversion from common error types
impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::MalformedMetadata(format!("JSON error: {}", err))
    }
}
