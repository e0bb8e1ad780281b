//! Core types for playback management

use crate::media::MediaErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Synthetic track identifier
///
/// Assigned once per catalog load, in catalog order. Two tracks with identical
/// path/name/artist/album still get distinct ids, so every lookup between the
/// original and the shuffled order is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u32);

impl TrackId {
    /// Create a track ID from its raw value
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track-{}", self.0)
    }
}

/// Track information
///
/// Immutable for the lifetime of the catalog it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier assigned at catalog load
    pub id: TrackId,

    /// Media URL handed to the playback element
    pub path: String,

    /// Display name
    pub name: String,

    /// Artist name (optional)
    pub artist: Option<String>,

    /// Album name (optional)
    pub album: Option<String>,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the end of the order is reached
    #[default]
    Off,

    /// Loop the entire order
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One cycle
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Why the controller is in the `Error` state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "camelCase")]
pub enum FailureKind {
    /// Catalog fetch/parse failed or produced no tracks; needs a fresh load
    CatalogLoad,

    /// The media element reported an error for the current track
    Media(MediaErrorCode),
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "failure", rename_all = "camelCase")]
pub enum PlaybackState {
    /// No catalog loaded yet
    #[default]
    Idle,

    /// Track selected and loaded, not playing
    Loaded,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Catalog or media failure
    Error(FailureKind),
}

impl PlaybackState {
    /// Whether navigation (select/next/previous) is possible in this state
    pub fn allows_navigation(self) -> bool {
        !matches!(
            self,
            Self::Idle | Self::Error(FailureKind::CatalogLoad)
        )
    }
}

/// Frequency visualizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// FFT size of the analysis collaborator (bins = fft_size / 2)
    pub fft_size: usize,

    /// Multiplier applied to `width / bins` for each bar
    pub bar_width_scale: f64,

    /// Multiplier applied to each byte sample for bar height
    pub bar_height_scale: f64,

    /// Horizontal gap between bars, in pixels
    pub bar_gap: f64,
}

impl VisualizerConfig {
    /// Number of frequency bins the analyser exposes
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            bar_width_scale: 1.5,
            bar_height_scale: 1.5,
            bar_gap: 1.0,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub initial_volume: f64,

    /// Seek forward/backward step in seconds (default: 10)
    pub seek_step_secs: f64,

    /// Playback rate multipliers the speed control accepts
    pub allowed_rates: Vec<f64>,

    /// Initial repeat mode (default: Off)
    pub initial_repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub initial_shuffle: bool,

    /// Fixed shuffle seed; `None` seeds from OS entropy
    pub shuffle_seed: Option<u64>,

    /// Visualizer geometry
    pub visualizer: VisualizerConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            seek_step_secs: 10.0,
            allowed_rates: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            initial_repeat: RepeatMode::Off,
            initial_shuffle: false,
            shuffle_seed: None,
            visualizer: VisualizerConfig::default(),
        }
    }
}
