//! Error types for the catalog client.

use sonata_playback::{CatalogError, PlaybackError};
use thiserror::Error;

/// Errors that can occur while fetching a track catalog.
#[derive(Error, Debug)]
pub enum CatalogClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("Error fetching or parsing track data: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Error loading tracks: HTTP status {status}")]
    Http { status: u16 },

    /// Response body is not text
    #[error("Error fetching or parsing track data: {0}")]
    Parse(String),

    /// Body parsed but is not a usable catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The player refused the fetched catalog
    #[error(transparent)]
    Playback(PlaybackError),

    /// A fetch is already outstanding
    #[error("Catalog fetch already in progress")]
    FetchInProgress,

    /// Invalid base or catalog URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<PlaybackError> for CatalogClientError {
    fn from(error: PlaybackError) -> Self {
        match error {
            PlaybackError::Catalog(e) => Self::Catalog(e),
            PlaybackError::CatalogLoadInProgress => Self::FetchInProgress,
            other => Self::Playback(other),
        }
    }
}

impl From<config::ConfigError> for CatalogClientError {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;
