//! Error types for playback management

use crate::types::PlaybackState;
use thiserror::Error;

/// Catalog parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Source was not valid JSON
    #[error("Error fetching or parsing track data: {0}")]
    Parse(String),

    /// Source parsed, but the top-level value is not an array
    #[error("Error fetching or parsing track data: expected a JSON array of tracks")]
    NotAnArray,

    /// Every entry was filtered out, or the array was empty
    #[error("No valid tracks found in tracks.json")]
    Empty,
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No catalog is loaded (Idle, or Error after a failed load)
    #[error("No tracks loaded")]
    NoCatalog,

    /// Track index outside the catalog
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Playback rate outside the allowed set
    #[error("Unsupported playback rate: {0}")]
    UnsupportedRate(f64),

    /// Volume that is not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),

    /// Operation not valid in the current state
    #[error("Cannot {action} while {from:?}")]
    InvalidTransition {
        from: PlaybackState,
        action: &'static str,
    },

    /// A catalog request is already outstanding
    #[error("A catalog load is already in progress")]
    CatalogLoadInProgress,

    /// Catalog could not be parsed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
