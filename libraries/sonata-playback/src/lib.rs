//! Sonata - Playback Management
//!
//! Platform-agnostic playlist playback for the Sonata browser player.
//!
//! This crate provides:
//! - Catalog parsing (flat `tracks.json` array, invalid entries filtered)
//! - Playback order (original vs shuffled order, index translation)
//! - Repeat modes (Off, All, One) with terminal/wrap policy
//! - Playback controller state machine (Idle, Loaded, Playing, Paused, Error)
//! - Track list presentation (rows with an active flag)
//! - Frequency visualizer loop gated by playback state
//! - Seek, volume, mute and playback-rate control
//!
//! # Architecture
//!
//! `sonata-playback` is completely platform-agnostic:
//! - No dependency on the DOM (outside the optional `wasm` feature)
//! - No audio decoding; a [`MediaElement`] implementation does the playing
//! - Single-threaded and event-driven: media callbacks are fed back in as
//!   [`MediaEvent`]s tagged with a [`LoadToken`]
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use sonata_playback::{
//!     MediaElement, PlayOutcome, PlaybackController, PlaybackState, PlayerConfig,
//! };
//!
//! // A media element that plays instantly
//! #[derive(Default)]
//! struct Silent {
//!     time: f64,
//! }
//!
//! impl MediaElement for Silent {
//!     fn set_source(&mut self, _path: &str) {}
//!     fn load(&mut self) {}
//!     fn play(&mut self) -> PlayOutcome {
//!         PlayOutcome::Started
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 {
//!         self.time
//!     }
//!     fn set_current_time(&mut self, seconds: f64) {
//!         self.time = seconds;
//!     }
//!     fn duration(&self) -> f64 {
//!         f64::NAN
//!     }
//!     fn set_volume(&mut self, _volume: f64) {}
//!     fn set_playback_rate(&mut self, _rate: f64) {}
//! }
//!
//! let mut player = PlaybackController::new(Silent::default(), PlayerConfig::default());
//!
//! player
//!     .load_catalog_json(r#"[{"path": "audio/a.mp3", "name": "A"},
//!                            {"path": "audio/b.mp3", "name": "B"}]"#)
//!     .unwrap();
//! assert_eq!(player.state(), PlaybackState::Loaded);
//!
//! player.play().unwrap();
//! player.next().unwrap();
//! assert_eq!(player.cursor(), Some(1));
//! assert_eq!(player.state(), PlaybackState::Playing);
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use sonata_playback::{PlaybackOrder, RepeatMode, TrackCatalog, TrackRecord};
//! use rand::SeedableRng;
//!
//! let catalog = TrackCatalog::from_records(vec![
//!     TrackRecord::new("a.mp3", "A"),
//!     TrackRecord::new("b.mp3", "B"),
//!     TrackRecord::new("c.mp3", "C"),
//! ]);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! let mut order = PlaybackOrder::new(false, RepeatMode::All);
//! order.reset(&catalog, None, &mut rng);
//!
//! // Shuffle while B is playing: B leads the effective order
//! let b = catalog.get(1).unwrap().id;
//! order.enable_shuffle(Some(b), &mut rng);
//! assert_eq!(order.index_of(b), Some(0));
//! ```

mod catalog;
mod controller;
mod error;
mod events;
pub mod media;
pub mod order;
mod presenter;
mod shuffle;
pub mod time;
pub mod types;
pub mod visualizer;
mod volume;

pub mod wasm;

// Public exports
pub use catalog::{TrackCatalog, TrackRecord};
pub use controller::{PlaybackController, AUTOPLAY_BLOCKED_MESSAGE, CATALOG_FAILURE_LABEL};
pub use error::{CatalogError, PlaybackError, Result};
pub use events::{PlaybackEvent, PlaybackStateEvent};
pub use media::{
    LoadToken, MediaElement, MediaErrorCode, MediaEvent, PlayOutcome, PlayRejection,
};
pub use order::{resolve_next, resolve_previous, NextStep, NextTarget, PlaybackOrder};
pub use presenter::{render_rows, ControlsState, PlayerView, TrackRow};
pub use shuffle::{fisher_yates, shuffle_with_current_first};
pub use time::format_time;
pub use types::{
    FailureKind, PlaybackState, PlayerConfig, RepeatMode, Track, TrackId, VisualizerConfig,
};
pub use visualizer::{FrequencyAnalyzer, LoopStatus, VisualizerLoop, VisualizerSurface};
pub use volume::{Volume, VolumeLevel};
