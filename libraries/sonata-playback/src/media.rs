//! Media playback collaborator
//!
//! The controller never decodes audio. It drives a single-slot media element
//! (an `<audio>` element in the browser) through [`MediaElement`] and receives
//! its lifecycle callbacks back as [`MediaEvent`]s.

use serde::{Deserialize, Serialize};

/// Generation counter for media loads
///
/// Bumped every time a new source is handed to the element. Events tagged with
/// an older token belong to a superseded load and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Token following this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw generation value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Coded media element error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaErrorCode {
    /// Fetching was aborted by the user agent
    Aborted,

    /// Network error while fetching the media
    Network,

    /// Media could not be decoded
    Decode,

    /// Source format is not supported
    SourceNotSupported,

    /// Any code the element does not document
    Unknown,
}

impl MediaErrorCode {
    /// Map a `MediaError.code` value (1-4) to a code
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Aborted,
            2 => Self::Network,
            3 => Self::Decode,
            4 => Self::SourceNotSupported,
            _ => Self::Unknown,
        }
    }

    /// User-readable message
    pub fn message(self) -> &'static str {
        match self {
            Self::Aborted => "Playback was aborted.",
            Self::Network => "A network error stopped the track from loading.",
            Self::Decode => "The track could not be decoded.",
            Self::SourceNotSupported => "The track format is not supported.",
            Self::Unknown => "An unknown media error occurred.",
        }
    }
}

/// Reason a play request was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRejection {
    /// DOMException name (e.g. `NotAllowedError`)
    pub name: String,

    /// Human-readable detail
    pub message: String,
}

impl PlayRejection {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Rejected by the autoplay policy (needs a user gesture)
    pub fn is_autoplay_block(&self) -> bool {
        self.name == "NotAllowedError"
    }
}

/// Immediate result of [`MediaElement::play`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started synchronously
    Started,

    /// Outcome arrives later as [`MediaEvent::PlayStarted`] or [`MediaEvent::PlayRejected`]
    Pending,

    /// Refused synchronously
    Rejected(PlayRejection),
}

/// Lifecycle callbacks of the media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position update
    TimeUpdate { current_time: f64 },

    /// Metadata for the current source is available
    MetadataLoaded { duration: f64 },

    /// Playback reached the end of the source
    Ended,

    /// Element stalled waiting for data
    BufferingStarted,

    /// Element resumed after buffering
    BufferingEnded,

    /// Element began loading the source
    LoadStarted,

    /// Element-level error
    Error(MediaErrorCode),

    /// A pending play request was fulfilled
    PlayStarted,

    /// A pending play request was refused
    PlayRejected(PlayRejection),
}

/// Single-slot media element driven by the controller
///
/// Implementors own the actual decode/output pipeline. Durations and positions
/// are in seconds; `duration` is NaN until metadata is known.
pub trait MediaElement {
    /// Point the element at a new source
    fn set_source(&mut self, path: &str);

    /// Start loading the current source
    fn load(&mut self);

    /// Request playback from the current position
    fn play(&mut self) -> PlayOutcome;

    /// Pause playback
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Source duration in seconds (NaN while unknown)
    fn duration(&self) -> f64;

    /// Output volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Playback rate multiplier
    fn set_playback_rate(&mut self, rate: f64);
}

/// Scripted media element for testing
///
/// Records every call and answers `play()` with a configurable outcome.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeMediaElement {
    pub source: Option<String>,
    pub loads: usize,
    pub plays: usize,
    pub pauses: usize,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub playback_rate: f64,
    pub next_outcome: Option<PlayOutcome>,
}

#[cfg(test)]
impl MediaElement for FakeMediaElement {
    fn set_source(&mut self, path: &str) {
        self.source = Some(path.to_string());
        self.current_time = 0.0;
        self.duration = None;
    }

    fn load(&mut self) {
        self.loads += 1;
        self.playback_rate = 1.0;
    }

    fn play(&mut self) -> PlayOutcome {
        self.plays += 1;
        self.next_outcome.clone().unwrap_or(PlayOutcome::Started)
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration.unwrap_or(f64::NAN)
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }
}
