//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! The controller queues events as it transitions; the host drains them with
//! `PlaybackController::drain_events` after each call and re-renders:
//! - State changes (loaded/playing/paused/error)
//! - Track changes (select, next, previous, natural end)
//! - List changes (catalog load, shuffle toggle)
//! - Progress, volume, rate and mode updates

use crate::types::{PlaybackState, RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackStateEvent,
    },

    /// A different track was loaded into the media element
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// Index of the new track in catalog order
        original_index: usize,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Rendered rows need rebuilding (catalog load or shuffle toggle)
    ListChanged {
        /// Number of rows
        length: usize,
    },

    /// Position or duration changed
    ProgressChanged {
        /// Current position in seconds
        position_secs: f64,
        /// Track duration in seconds, once known
        duration_secs: Option<f64>,
    },

    /// Transport controls were enabled or disabled
    ControlsChanged {
        /// Whether transport controls accept input
        enabled: bool,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f64,
        /// Whether audio is muted
        muted: bool,
    },

    /// Playback rate changed
    RateChanged {
        /// New rate multiplier
        rate: f64,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// Media element started or stopped buffering
    BufferingChanged {
        /// Whether the element is waiting for data
        buffering: bool,
    },

    /// Non-fatal problem (e.g. play blocked by autoplay policy)
    Warning {
        /// Warning message
        message: String,
    },

    /// Error occurred during loading or playback
    Error {
        /// Error message
        message: String,
    },

    /// Order ran out under repeat off; playback halted at the current track
    ReachedEnd,
}

/// Playback state for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStateEvent {
    /// No catalog loaded
    Idle,
    /// Track loaded, not playing
    Loaded,
    /// Playing audio
    Playing,
    /// Paused mid-track
    Paused,
    /// Catalog or media failure
    Error,
}

impl From<PlaybackState> for PlaybackStateEvent {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Idle => PlaybackStateEvent::Idle,
            PlaybackState::Loaded => PlaybackStateEvent::Loaded,
            PlaybackState::Playing => PlaybackStateEvent::Playing,
            PlaybackState::Paused => PlaybackStateEvent::Paused,
            PlaybackState::Error(_) => PlaybackStateEvent::Error,
        }
    }
}
