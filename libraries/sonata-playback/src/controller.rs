//! Playback controller - core orchestration
//!
//! Owns every piece of mutable player state (catalog, order, cursor, volume,
//! rate, progress) and drives a [`MediaElement`] from it. All input arrives as
//! method calls: user actions, catalog load results and media callbacks
//! ([`PlaybackController::handle_media_event`]). Output is the media calls
//! themselves plus queued [`PlaybackEvent`]s for the UI.
//!
//! ```text
//!            catalog_ready(non-empty)          play()
//!   Idle ────────────────────────────► Loaded ───────► Playing
//!    │                                   ▲  ▲           │   ▲
//!    │ catalog_ready(empty)              │  └─ select ──┤   │ play()
//!    │ load_failure                      │              ▼   │
//!    └──────────────► Error ◄── media ───┴───────────  Paused
//! ```

use crate::{
    catalog::TrackCatalog,
    error::{CatalogError, PlaybackError, Result},
    events::PlaybackEvent,
    media::{LoadToken, MediaElement, MediaErrorCode, MediaEvent, PlayOutcome, PlayRejection},
    order::PlaybackOrder,
    presenter::{render_rows, ControlsState, PlayerView, TrackRow},
    time::{clamp_seek, format_time, progress_percent},
    types::{FailureKind, PlaybackState, PlayerConfig, RepeatMode, Track, TrackId},
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

/// Tolerance when matching a requested rate against the allowed set
const RATE_EPSILON: f64 = 1e-9;

/// Label shown in place of a track name after a catalog failure
pub const CATALOG_FAILURE_LABEL: &str = "Error loading tracks.";

/// Warning surfaced when the autoplay policy blocks `play()`
pub const AUTOPLAY_BLOCKED_MESSAGE: &str =
    "Autoplay prevented! User must interact with the document first.";

/// Playlist playback controller
///
/// Generic over the media element so the same state machine runs against an
/// `<audio>` element in the browser and a scripted fake in tests.
pub struct PlaybackController<M: MediaElement> {
    // State
    state: PlaybackState,
    media: M,
    config: PlayerConfig,

    // Catalog, order and cursor
    catalog: TrackCatalog,
    order: PlaybackOrder,
    cursor: Option<usize>,

    // Load tracking
    load_token: LoadToken,
    pending_play: Option<LoadToken>,
    catalog_request_outstanding: bool,

    // Progress
    position: f64,
    duration: Option<f64>,
    buffering: bool,

    // Settings
    volume: Volume,
    playback_rate: f64,

    // Presentation
    controls_enabled: bool,
    message: Option<String>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,

    rng: StdRng,
}

impl<M: MediaElement> PlaybackController<M> {
    /// Create a controller in `Idle` around a media element
    pub fn new(mut media: M, config: PlayerConfig) -> Self {
        let volume = Volume::new(config.initial_volume);
        media.set_volume(volume.gain());
        media.set_playback_rate(1.0);

        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: PlaybackState::Idle,
            media,
            catalog: TrackCatalog::empty(),
            order: PlaybackOrder::new(config.initial_shuffle, config.initial_repeat),
            cursor: None,
            load_token: LoadToken::default(),
            pending_play: None,
            catalog_request_outstanding: false,
            position: 0.0,
            duration: None,
            buffering: false,
            volume,
            playback_rate: 1.0,
            controls_enabled: false,
            message: None,
            pending_events: Vec::new(),
            rng,
            config,
        }
    }

    // ===== Catalog Loading =====

    /// Mark a catalog request as outstanding
    ///
    /// Only one request may be in flight; a second call before
    /// `catalog_ready`/`load_failure` is rejected.
    pub fn begin_catalog_load(&mut self) -> Result<()> {
        if self.catalog_request_outstanding {
            warn!("Catalog load requested while another is outstanding");
            return Err(PlaybackError::CatalogLoadInProgress);
        }

        debug!("Catalog load started");
        self.catalog_request_outstanding = true;
        Ok(())
    }

    /// Abandon an outstanding catalog request
    ///
    /// For callers whose request was dropped before it settled. Leaves the
    /// current catalog and state untouched.
    pub fn cancel_catalog_load(&mut self) {
        if self.catalog_request_outstanding {
            debug!("Catalog load abandoned");
            self.catalog_request_outstanding = false;
        }
    }

    /// Whether a catalog request is in flight
    pub fn is_catalog_load_pending(&self) -> bool {
        self.catalog_request_outstanding
    }

    /// Install a freshly loaded catalog
    ///
    /// A non-empty catalog selects track 0 without autoplay (`Loaded`).
    /// An empty one moves to `Error` and returns `CatalogError::Empty`.
    pub fn catalog_ready(&mut self, catalog: TrackCatalog) -> Result<()> {
        self.catalog_request_outstanding = false;

        if catalog.is_empty() {
            let failure = CatalogError::Empty;
            self.load_failure(failure.to_string());
            return Err(failure.into());
        }

        info!(tracks = catalog.len(), "Catalog loaded");

        let first = catalog.get(0).map(|track| track.id);
        self.order.reset(&catalog, first, &mut self.rng);
        self.catalog = catalog;
        self.cursor = None;
        self.message = None;
        self.emit_list_changed();

        self.load_track(0)
    }

    /// Parse a `tracks.json` body and install it, or fail the load
    pub fn load_catalog_json(&mut self, body: &str) -> Result<()> {
        match TrackCatalog::from_json_str(body) {
            Ok(catalog) => self.catalog_ready(catalog),
            Err(e) => {
                self.load_failure(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Catalog fetch or parse failed
    ///
    /// Valid from any state. Halts playback, drops the catalog and disables
    /// transport until the next successful `catalog_ready`.
    pub fn load_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!(message = %message, "Catalog load failed");

        self.catalog_request_outstanding = false;
        self.halt_media();
        self.load_token = self.load_token.next();

        self.catalog = TrackCatalog::empty();
        self.order.reset(&self.catalog, None, &mut self.rng);
        self.cursor = None;
        self.reset_progress();
        self.emit_list_changed();

        self.message = Some(message.clone());
        self.pending_events.push(PlaybackEvent::Error { message });
        self.set_state(PlaybackState::Error(FailureKind::CatalogLoad));
    }

    // ===== Playback Control =====

    /// Start or resume playback of the loaded track
    ///
    /// A rejected request (e.g. autoplay policy) leaves the state unchanged
    /// and surfaces a warning instead of failing.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Loaded | PlaybackState::Paused => {
                self.request_play();
                Ok(())
            }
            PlaybackState::Playing => Ok(()),
            PlaybackState::Idle | PlaybackState::Error(FailureKind::CatalogLoad) => {
                Err(PlaybackError::NoCatalog)
            }
            PlaybackState::Error(FailureKind::Media(_)) => Err(PlaybackError::InvalidTransition {
                from: self.state,
                action: "play",
            }),
        }
    }

    /// Pause playback
    ///
    /// Also cancels a play request that has not resolved yet.
    pub fn pause(&mut self) {
        if self.pending_play.take().is_some() {
            debug!("Cancelling pending play request");
            self.media.pause();
        }

        if self.state == PlaybackState::Playing {
            self.media.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Pause when playing (or about to), play otherwise
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.is_playing_or_pending() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Load the track at an original-order index
    ///
    /// Always lands in `Loaded` with progress reset; plays right away if
    /// `autoplay` is set.
    pub fn select_track(&mut self, index: usize, autoplay: bool) -> Result<()> {
        self.ensure_navigable()?;
        if index >= self.catalog.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        self.load_track(index)?;
        if autoplay {
            self.request_play();
        }
        Ok(())
    }

    /// Advance along the effective order
    ///
    /// Follows the same policy as a natural end: at the last track with
    /// repeat off, playback halts on the current track.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let cursor = self.ensure_navigable()?;
        let target = self
            .order
            .next_from(cursor)
            .ok_or(PlaybackError::IndexOutOfBounds(cursor))?;

        if target.terminal {
            self.halt_at_end();
            return Ok(());
        }

        let resume = self.is_playing_or_pending();
        self.load_track(target.original_index)?;
        if resume {
            self.request_play();
        }
        Ok(())
    }

    /// Step back along the effective order (always wraps)
    pub fn previous(&mut self) -> Result<()> {
        let cursor = self.ensure_navigable()?;
        let target = self
            .order
            .previous_from(cursor)
            .ok_or(PlaybackError::IndexOutOfBounds(cursor))?;

        let resume = self.is_playing_or_pending();
        self.load_track(target)?;
        if resume {
            self.request_play();
        }
        Ok(())
    }

    // ===== Media Events =====

    /// Dispatch a media element callback
    ///
    /// Events tagged with a superseded load token are dropped.
    pub fn handle_media_event(&mut self, token: LoadToken, event: MediaEvent) {
        if token != self.load_token {
            debug!(
                stale = token.get(),
                current = self.load_token.get(),
                "Ignoring media event from superseded load"
            );
            return;
        }

        if self.cursor.is_none() {
            debug!(event = ?event, "Ignoring media event with no track loaded");
            return;
        }

        match event {
            MediaEvent::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    self.position = current_time.max(0.0);
                    self.emit_progress();
                }
            }
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = (duration.is_finite() && duration > 0.0).then_some(duration);
                debug!(duration = ?self.duration, "Track metadata loaded");
                self.emit_progress();
                self.refresh_controls();
            }
            MediaEvent::Ended => {
                if self.state == PlaybackState::Playing {
                    self.natural_end();
                }
            }
            MediaEvent::BufferingStarted => self.set_buffering(true),
            MediaEvent::BufferingEnded => self.set_buffering(false),
            MediaEvent::LoadStarted => debug!("Media load started"),
            MediaEvent::Error(code) => self.media_failure(code),
            MediaEvent::PlayStarted => {
                if self.pending_play == Some(token) {
                    self.pending_play = None;
                    self.set_state(PlaybackState::Playing);
                }
            }
            MediaEvent::PlayRejected(rejection) => {
                if self.pending_play == Some(token) {
                    self.play_rejected(rejection);
                }
            }
        }
    }

    /// The current track finished on its own
    fn natural_end(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };

        match self.order.next_from(cursor) {
            Some(target) if !target.terminal => {
                debug!(from = cursor, to = target.original_index, "Advancing after track end");
                if self.load_track(target.original_index).is_ok() {
                    self.request_play();
                }
            }
            _ => self.halt_at_end(),
        }
    }

    fn media_failure(&mut self, code: MediaErrorCode) {
        let message = code.message().to_string();
        error!(code = ?code, track = ?self.cursor, "Media element error");

        self.pending_play = None;
        self.media.pause();
        self.set_buffering(false);

        self.message = Some(message.clone());
        self.pending_events.push(PlaybackEvent::Error { message });
        self.set_state(PlaybackState::Error(FailureKind::Media(code)));
    }

    // ===== Seek =====

    /// Jump forward by the configured step
    pub fn seek_forward(&mut self) -> Result<()> {
        self.seek_by(self.config.seek_step_secs)
    }

    /// Jump backward by the configured step
    pub fn seek_backward(&mut self) -> Result<()> {
        self.seek_by(-self.config.seek_step_secs)
    }

    fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.ensure_navigable()?;
        let target = self.media.current_time() + delta;
        self.seek_to(target)
    }

    /// Seek to an absolute position, clamped to `[0, duration]`
    ///
    /// Ignored while the duration is unknown.
    pub fn seek_to(&mut self, seconds: f64) -> Result<()> {
        self.ensure_navigable()?;

        let Some(target) = self.known_duration().and_then(|d| clamp_seek(seconds, d)) else {
            debug!(seconds, "Seek ignored; duration unknown");
            return Ok(());
        };

        self.media.set_current_time(target);
        self.position = target;
        self.emit_progress();
        Ok(())
    }

    /// Seek to a fraction (0.0-1.0) of the track, as a progress-bar click does
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        self.ensure_navigable()?;

        if fraction.is_nan() {
            return Ok(());
        }
        let Some(duration) = self.known_duration() else {
            return Ok(());
        };

        self.seek_to(fraction.clamp(0.0, 1.0) * duration)
    }

    // ===== Rate & Volume =====

    /// Change the playback rate; must be one of the allowed multipliers
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        let allowed = self
            .config
            .allowed_rates
            .iter()
            .any(|allowed| (allowed - rate).abs() < RATE_EPSILON);
        if !allowed {
            warn!(rate, "Rejected unsupported playback rate");
            return Err(PlaybackError::UnsupportedRate(rate));
        }

        self.playback_rate = rate;
        self.media.set_playback_rate(rate);
        self.pending_events.push(PlaybackEvent::RateChanged { rate });
        Ok(())
    }

    /// Set volume (0.0-1.0, clamped)
    pub fn set_volume(&mut self, level: f64) -> Result<()> {
        self.volume.set_level(level)?;
        self.apply_volume();
        Ok(())
    }

    /// Toggle mute, keeping the level for unmute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.media.set_volume(self.volume.gain());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== Shuffle & Repeat =====

    /// Turn shuffle on or off
    ///
    /// Turning it on puts the current track first in the new effective order.
    pub fn set_shuffle(&mut self, enabled: bool) {
        let current = self.current_track().map(|track| track.id);
        self.order.set_shuffle(enabled, current, &mut self.rng);

        info!(enabled, "Shuffle changed");
        self.pending_events.push(PlaybackEvent::ShuffleChanged { enabled });
        self.emit_list_changed();
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.order.is_shuffled());
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.order.set_repeat(mode);
        self.pending_events.push(PlaybackEvent::RepeatChanged { mode });
    }

    /// Advance Off -> All -> One -> Off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.order.repeat().next();
        self.set_repeat(mode);
        mode
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Original index of the loaded track
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|index| self.catalog.get(index))
    }

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.current_track().map(|track| track.id)
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn order(&self) -> &PlaybackOrder {
        &self.order
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Position in seconds, as last reported by the media element
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds, once metadata is known
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn repeat(&self) -> RepeatMode {
        self.order.repeat()
    }

    pub fn is_shuffled(&self) -> bool {
        self.order.is_shuffled()
    }

    /// Last error or warning surfaced to the user
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Token media callbacks must carry to be accepted
    pub fn load_token(&self) -> LoadToken {
        self.load_token
    }

    /// Token of a play request still waiting on the media element
    pub fn pending_play(&self) -> Option<LoadToken> {
        self.pending_play
    }

    /// Track list rows in effective order
    pub fn rows(&self) -> Vec<TrackRow> {
        render_rows(&self.catalog, &self.order, self.cursor)
    }

    pub fn controls(&self) -> ControlsState {
        if self.state.allows_navigation() {
            ControlsState::enabled(self.known_duration().is_some())
        } else {
            ControlsState::disabled()
        }
    }

    /// Text for the now-playing label
    pub fn now_playing(&self) -> String {
        match self.state {
            PlaybackState::Error(FailureKind::CatalogLoad) => CATALOG_FAILURE_LABEL.to_string(),
            _ => self
                .current_track()
                .map(|track| track.name.clone())
                .unwrap_or_default(),
        }
    }

    /// Full snapshot for rendering
    pub fn view(&self) -> PlayerView {
        let duration = self.known_duration();

        PlayerView {
            state: self.state,
            rows: self.rows(),
            controls: self.controls(),
            now_playing: self.now_playing(),
            elapsed: format_time(self.position),
            total: format_time(duration.unwrap_or(f64::NAN)),
            progress_percent: duration.and_then(|d| progress_percent(self.position, d)),
            volume: self.volume.level(),
            volume_level: self.volume.indicator(),
            playback_rate: self.playback_rate,
            shuffle: self.order.is_shuffled(),
            repeat: self.order.repeat(),
            buffering: self.buffering,
            message: self.message.clone(),
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Cursor of a loaded catalog, or why there is none
    fn ensure_navigable(&self) -> Result<usize> {
        if !self.state.allows_navigation() {
            return Err(PlaybackError::NoCatalog);
        }
        self.cursor.ok_or(PlaybackError::NoCatalog)
    }

    fn is_playing_or_pending(&self) -> bool {
        self.state == PlaybackState::Playing || self.pending_play.is_some()
    }

    fn known_duration(&self) -> Option<f64> {
        self.duration.or_else(|| {
            let duration = self.media.duration();
            (duration.is_finite() && duration > 0.0).then_some(duration)
        })
    }

    /// Point the media element at a catalog track and land in `Loaded`
    fn load_track(&mut self, index: usize) -> Result<()> {
        let track = self
            .catalog
            .get(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        let track_id = track.id;
        let path = track.path.clone();
        let previous_track_id = self.current_track_id();

        self.load_token = self.load_token.next();
        self.pending_play = None;
        self.cursor = Some(index);

        self.media.set_source(&path);
        self.media.load();
        // load() resets the element's rate
        self.media.set_playback_rate(self.playback_rate);
        self.media.set_volume(self.volume.gain());

        info!(index, track = %track_id, path = %path, "Track loaded");

        self.reset_progress();
        self.set_buffering(false);
        self.message = None;

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            original_index: index,
            previous_track_id,
        });
        self.emit_progress();
        self.set_state(PlaybackState::Loaded);
        self.refresh_controls();
        Ok(())
    }

    /// Ask the media element to play the loaded track
    fn request_play(&mut self) {
        if self.pending_play == Some(self.load_token) {
            return;
        }

        match self.media.play() {
            PlayOutcome::Started => self.set_state(PlaybackState::Playing),
            PlayOutcome::Pending => {
                debug!(token = self.load_token.get(), "Play request pending");
                self.pending_play = Some(self.load_token);
            }
            PlayOutcome::Rejected(rejection) => self.play_rejected(rejection),
        }
    }

    fn play_rejected(&mut self, rejection: PlayRejection) {
        self.pending_play = None;

        let message = if rejection.is_autoplay_block() {
            AUTOPLAY_BLOCKED_MESSAGE.to_string()
        } else {
            format!("Playback failed: {}: {}", rejection.name, rejection.message)
        };
        warn!(name = %rejection.name, detail = %rejection.message, "Play request rejected");

        self.message = Some(message.clone());
        self.pending_events.push(PlaybackEvent::Warning { message });
    }

    /// Stop on the current track at position 0 without moving the cursor
    fn halt_at_end(&mut self) {
        info!(cursor = ?self.cursor, "Reached end of playback order");

        self.pending_play = None;
        self.media.pause();
        self.media.set_current_time(0.0);
        self.position = 0.0;

        self.pending_events.push(PlaybackEvent::ReachedEnd);
        self.emit_progress();
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    fn halt_media(&mut self) {
        if self.is_playing_or_pending() {
            self.media.pause();
        }
        self.pending_play = None;
        self.set_buffering(false);
    }

    fn reset_progress(&mut self) {
        self.position = 0.0;
        self.duration = None;
    }

    fn set_buffering(&mut self, buffering: bool) {
        if self.buffering != buffering {
            self.buffering = buffering;
            self.pending_events
                .push(PlaybackEvent::BufferingChanged { buffering });
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }

        debug!(from = ?self.state, to = ?state, "State transition");
        self.state = state;
        self.pending_events.push(PlaybackEvent::StateChanged {
            state: state.into(),
        });
        self.refresh_controls();
    }

    fn refresh_controls(&mut self) {
        let enabled = self.controls().play_pause;
        if enabled != self.controls_enabled {
            self.controls_enabled = enabled;
            self.pending_events
                .push(PlaybackEvent::ControlsChanged { enabled });
        }
    }

    fn emit_progress(&mut self) {
        self.pending_events.push(PlaybackEvent::ProgressChanged {
            position_secs: self.position,
            duration_secs: self.duration,
        });
    }

    fn emit_list_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::ListChanged {
            length: self.catalog.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackRecord;
    use crate::media::FakeMediaElement;

    fn abc() -> TrackCatalog {
        TrackCatalog::from_records(vec![
            TrackRecord::new("audio/a.mp3", "A"),
            TrackRecord::new("audio/b.mp3", "B"),
            TrackRecord::new("audio/c.mp3", "C"),
        ])
    }

    fn controller() -> PlaybackController<FakeMediaElement> {
        let config = PlayerConfig {
            shuffle_seed: Some(7),
            ..PlayerConfig::default()
        };
        PlaybackController::new(FakeMediaElement::default(), config)
    }

    fn loaded() -> PlaybackController<FakeMediaElement> {
        let mut player = controller();
        player.catalog_ready(abc()).unwrap();
        player.drain_events();
        player
    }

    #[test]
    fn starts_idle_with_controls_disabled() {
        let mut player = controller();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(!player.controls().any_enabled());
        assert!(matches!(player.next(), Err(PlaybackError::NoCatalog)));
    }

    #[test]
    fn catalog_ready_loads_first_track_without_autoplay() {
        let mut player = controller();
        player.catalog_ready(abc()).unwrap();

        assert_eq!(player.state(), PlaybackState::Loaded);
        assert_eq!(player.cursor(), Some(0));
        assert_eq!(player.media().source.as_deref(), Some("audio/a.mp3"));
        assert_eq!(player.media().plays, 0);
        assert!(player.controls().play_pause);

        let events = player.drain_events();
        assert!(events.contains(&PlaybackEvent::ListChanged { length: 3 }));
        assert!(events.contains(&PlaybackEvent::ControlsChanged { enabled: true }));
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let mut player = controller();
        let result = player.catalog_ready(TrackCatalog::empty());

        assert!(matches!(
            result,
            Err(PlaybackError::Catalog(CatalogError::Empty))
        ));
        assert_eq!(
            player.state(),
            PlaybackState::Error(FailureKind::CatalogLoad)
        );
        assert_eq!(player.message(), Some("No valid tracks found in tracks.json"));
        assert_eq!(player.now_playing(), CATALOG_FAILURE_LABEL);
        assert!(!player.controls().any_enabled());
    }

    #[test]
    fn second_catalog_request_rejected_while_outstanding() {
        let mut player = controller();
        player.begin_catalog_load().unwrap();
        assert!(matches!(
            player.begin_catalog_load(),
            Err(PlaybackError::CatalogLoadInProgress)
        ));

        player.catalog_ready(abc()).unwrap();
        assert!(player.begin_catalog_load().is_ok());
    }

    #[test]
    fn play_pause_cycle() {
        let mut player = loaded();

        player.play().unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);

        player.pause();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.media().pauses, 1);

        player.toggle_play_pause().unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn autoplay_block_keeps_state_and_warns() {
        let mut player = loaded();
        player.media_mut().next_outcome = Some(PlayOutcome::Rejected(PlayRejection::new(
            "NotAllowedError",
            "play() needs a gesture",
        )));

        player.play().unwrap();

        assert_eq!(player.state(), PlaybackState::Loaded);
        assert_eq!(player.message(), Some(AUTOPLAY_BLOCKED_MESSAGE));
        assert!(player
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Warning { .. })));
    }

    #[test]
    fn pending_play_resolves_through_media_event() {
        let mut player = loaded();
        player.media_mut().next_outcome = Some(PlayOutcome::Pending);

        player.play().unwrap();
        assert_eq!(player.state(), PlaybackState::Loaded);
        let token = player.pending_play().unwrap();

        player.handle_media_event(token, MediaEvent::PlayStarted);
        assert_eq!(player.state(), PlaybackState::Playing);
        assert!(player.pending_play().is_none());
    }

    #[test]
    fn pause_cancels_pending_play() {
        let mut player = loaded();
        player.media_mut().next_outcome = Some(PlayOutcome::Pending);

        player.play().unwrap();
        let token = player.pending_play().unwrap();
        player.pause();

        assert!(player.pending_play().is_none());
        player.handle_media_event(token, MediaEvent::PlayStarted);
        assert_eq!(player.state(), PlaybackState::Loaded);
    }

    #[test]
    fn media_events_without_a_track_are_ignored() {
        let mut player = controller();
        let token = player.load_token();

        player.handle_media_event(token, MediaEvent::Error(MediaErrorCode::Network));
        player.handle_media_event(token, MediaEvent::Ended);
        player.handle_media_event(token, MediaEvent::PlayStarted);

        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(!player.controls().any_enabled());
        assert!(player.message().is_none());
    }

    #[test]
    fn media_error_after_failed_catalog_keeps_controls_disabled() {
        let mut player = loaded();
        player.load_failure("Error loading tracks: HTTP status 503");
        let token = player.load_token();

        player.handle_media_event(token, MediaEvent::Error(MediaErrorCode::Decode));

        assert_eq!(player.state(), PlaybackState::Error(FailureKind::CatalogLoad));
        assert!(!player.controls().any_enabled());
    }

    #[test]
    fn cancelled_catalog_load_allows_a_new_request() {
        let mut player = loaded();
        player.begin_catalog_load().unwrap();

        player.cancel_catalog_load();

        assert!(!player.is_catalog_load_pending());
        assert_eq!(player.state(), PlaybackState::Loaded);
        assert_eq!(player.catalog().len(), 3);
        assert!(player.begin_catalog_load().is_ok());
    }

    #[test]
    fn stale_media_events_are_ignored() {
        let mut player = loaded();
        let stale = player.load_token();

        player.select_track(2, false).unwrap();
        player.handle_media_event(stale, MediaEvent::Error(MediaErrorCode::Network));
        player.handle_media_event(stale, MediaEvent::MetadataLoaded { duration: 99.0 });

        assert_eq!(player.state(), PlaybackState::Loaded);
        assert_eq!(player.duration(), None);
    }

    #[test]
    fn media_error_stops_but_navigation_survives() {
        let mut player = loaded();
        player.play().unwrap();

        let token = player.load_token();
        player.handle_media_event(token, MediaEvent::Error(MediaErrorCode::Decode));

        assert_eq!(
            player.state(),
            PlaybackState::Error(FailureKind::Media(MediaErrorCode::Decode))
        );
        assert_eq!(player.message(), Some(MediaErrorCode::Decode.message()));
        assert!(player.play().is_err());

        player.select_track(1, true).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
        assert!(player.message().is_none());
    }

    #[test]
    fn select_track_resets_progress() {
        let mut player = loaded();
        let token = player.load_token();
        player.handle_media_event(token, MediaEvent::MetadataLoaded { duration: 200.0 });
        player.handle_media_event(token, MediaEvent::TimeUpdate { current_time: 42.0 });

        player.select_track(1, false).unwrap();

        assert_eq!(player.cursor(), Some(1));
        assert_eq!(player.position(), 0.0);
        assert_eq!(player.duration(), None);
        assert!(!player.controls().seek);
        assert!(matches!(
            player.select_track(3, false),
            Err(PlaybackError::IndexOutOfBounds(3))
        ));
    }

    #[test]
    fn seek_clamps_and_needs_duration() {
        let mut player = loaded();

        player.seek_forward().unwrap();
        assert_eq!(player.media().current_time, 0.0);

        let token = player.load_token();
        player.handle_media_event(token, MediaEvent::MetadataLoaded { duration: 25.0 });
        player.media_mut().duration = Some(25.0);

        player.seek_forward().unwrap();
        assert_eq!(player.media().current_time, 10.0);
        player.seek_forward().unwrap();
        player.seek_forward().unwrap();
        assert_eq!(player.media().current_time, 25.0);

        player.seek_to(-3.0).unwrap();
        assert_eq!(player.media().current_time, 0.0);

        player.seek_to_fraction(0.5).unwrap();
        assert_eq!(player.media().current_time, 12.5);
    }

    #[test]
    fn rate_must_be_allowed() {
        let mut player = loaded();

        player.set_playback_rate(1.5).unwrap();
        assert_eq!(player.media().playback_rate, 1.5);

        assert!(matches!(
            player.set_playback_rate(3.0),
            Err(PlaybackError::UnsupportedRate(_))
        ));
        assert_eq!(player.playback_rate(), 1.5);

        // Rate survives a track change
        player.next().unwrap();
        assert_eq!(player.media().playback_rate, 1.5);
    }

    #[test]
    fn mute_toggle_restores_volume() {
        let mut player = loaded();
        player.set_volume(0.6).unwrap();

        player.toggle_mute();
        assert_eq!(player.media().volume, 0.0);

        player.toggle_mute();
        assert_eq!(player.media().volume, 0.6);
    }

    #[test]
    fn load_failure_disables_everything() {
        let mut player = loaded();
        player.play().unwrap();

        player.load_failure("Error loading tracks: HTTP status 404");

        assert_eq!(
            player.state(),
            PlaybackState::Error(FailureKind::CatalogLoad)
        );
        assert!(player.catalog().is_empty());
        assert!(player.cursor().is_none());
        assert!(!player.controls().any_enabled());
        assert_eq!(player.media().pauses, 1);

        player.catalog_ready(abc()).unwrap();
        assert_eq!(player.state(), PlaybackState::Loaded);
    }

    #[test]
    fn malformed_json_fails_load() {
        let mut player = controller();
        assert!(player.load_catalog_json("not json").is_err());
        assert_eq!(
            player.state(),
            PlaybackState::Error(FailureKind::CatalogLoad)
        );
        assert!(player
            .message()
            .unwrap()
            .starts_with("Error fetching or parsing track data"));
    }

    #[test]
    fn view_reflects_progress() {
        let mut player = loaded();
        let token = player.load_token();
        player.handle_media_event(token, MediaEvent::MetadataLoaded { duration: 200.0 });
        player.handle_media_event(token, MediaEvent::TimeUpdate { current_time: 50.0 });
        player.handle_media_event(token, MediaEvent::BufferingStarted);

        let view = player.view();
        assert_eq!(view.elapsed, "0:50");
        assert_eq!(view.total, "3:20");
        assert_eq!(view.progress_percent, Some(25.0));
        assert_eq!(view.now_playing, "A");
        assert!(view.buffering);
        assert!(view.controls.seek);
        assert_eq!(view.rows.iter().filter(|r| r.active).count(), 1);
    }

    #[test]
    fn cycle_repeat_modes() {
        let mut player = loaded();
        assert_eq!(player.cycle_repeat(), RepeatMode::All);
        assert_eq!(player.cycle_repeat(), RepeatMode::One);
        assert_eq!(player.cycle_repeat(), RepeatMode::Off);
    }
}
