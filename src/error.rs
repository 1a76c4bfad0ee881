//! Error types for themekit operations.

use thiserror::Error;

/// Errors that can occur while processing pages or packaging a theme.
///
/// Page passes themselves never fail on missing markup; they skip the work
/// instead. Only I/O, archive, configuration and selector problems surface
/// here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[cfg(feature = "cli")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector `{0}`")]
    Selector(String),

    #[error("Unknown theme: {0}")]
    InvalidTheme(String),

    #[error("Invalid package manifest: {0}")]
    InvalidManifest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
