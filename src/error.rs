//! Error types for scene loading, asset placement and export.
//!
//! Every failure from an asynchronous load leaves the scene in its last
//! known-good state; these values are what gets surfaced to the user instead.

use thiserror::Error;

/// Errors surfaced by the editor and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Background identifier resolved to nothing
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    /// Image bytes could not be fetched or decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Canvas could not be exported
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Editing attempted while the access signal is false
    #[error("Access denied: hold the required token balance to edit")]
    AccessDenied,

    /// Asset placement attempted before any background was loaded
    #[error("Load a background first")]
    NoBackground,

    /// Asset id missing from the catalog
    #[error("Unknown asset: {asset_id}")]
    UnknownAsset { asset_id: String },

    /// Network or upstream failure
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced while flattening the canvas into an image file
#[derive(Error, Debug)]
pub enum ExportError {
    /// A drawn raster came from another origin without readback permission
    #[error("Canvas is tainted by cross-origin image from {source_url}")]
    Tainted { source_url: String },

    /// PNG encoding failed
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Fetch(e.to_string())
    }
}
