//! List presentation
//!
//! Pure functions from controller data to what the page renders. Nothing here
//! holds state; re-render after catalog load, shuffle toggle or track change.

use crate::catalog::TrackCatalog;
use crate::order::PlaybackOrder;
use crate::types::{PlaybackState, RepeatMode, TrackId};
use crate::volume::VolumeLevel;
use serde::{Deserialize, Serialize};

/// One rendered track list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRow {
    pub track_id: TrackId,

    /// Index in catalog order (what a click selects)
    pub original_index: usize,

    /// Position in the rendered (effective) order
    pub position: usize,

    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,

    /// Backing track is the one under the cursor
    pub active: bool,
}

/// Rows in effective order with the cursor track flagged active
///
/// The effective order equals catalog order while shuffle is off, so this
/// covers both display modes.
pub fn render_rows(
    catalog: &TrackCatalog,
    order: &PlaybackOrder,
    cursor: Option<usize>,
) -> Vec<TrackRow> {
    let active_id = cursor.and_then(|index| catalog.get(index)).map(|track| track.id);

    order
        .effective()
        .iter()
        .enumerate()
        .filter_map(|(position, id)| {
            let original_index = order.original_index_of(*id)?;
            let track = catalog.get(original_index)?;

            Some(TrackRow {
                track_id: track.id,
                original_index,
                position,
                name: track.name.clone(),
                artist: track.artist.clone(),
                album: track.album.clone(),
                active: Some(track.id) == active_id,
            })
        })
        .collect()
}

/// Enabled flags for the transport buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlsState {
    pub play_pause: bool,
    pub previous: bool,
    pub next: bool,
    pub seek: bool,
}

impl ControlsState {
    /// Every control disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Transport enabled; seeking only once the duration is known
    pub fn enabled(seekable: bool) -> Self {
        Self {
            play_pause: true,
            previous: true,
            next: true,
            seek: seekable,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.play_pause || self.previous || self.next || self.seek
    }
}

/// Snapshot of everything the player page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub state: PlaybackState,
    pub rows: Vec<TrackRow>,
    pub controls: ControlsState,

    /// Name of the track under the cursor, or a failure notice
    pub now_playing: String,

    pub elapsed: String,
    pub total: String,

    /// 0-100, absent while the duration is unknown
    pub progress_percent: Option<f64>,

    pub volume: f64,
    pub volume_level: VolumeLevel,
    pub playback_rate: f64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub buffering: bool,

    /// Last error or warning shown to the user
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(shuffle_current: Option<usize>) -> (TrackCatalog, PlaybackOrder) {
        let catalog = TrackCatalog::from_records(vec![
            TrackRecord::new("a.mp3", "A").with_artist("X"),
            TrackRecord::new("b.mp3", "B"),
            TrackRecord::new("c.mp3", "C").with_album("Z"),
        ]);
        let mut order = PlaybackOrder::new(false, RepeatMode::Off);
        let mut rng = StdRng::seed_from_u64(21);
        order.reset(&catalog, None, &mut rng);

        if let Some(current) = shuffle_current {
            order.enable_shuffle(catalog.get(current).map(|t| t.id), &mut rng);
        }
        (catalog, order)
    }

    #[test]
    fn rows_follow_catalog_order_when_unshuffled() {
        let (catalog, order) = setup(None);
        let rows = render_rows(&catalog, &order, Some(1));

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(rows[0].artist.as_deref(), Some("X"));
        assert_eq!(rows[2].album.as_deref(), Some("Z"));
    }

    #[test]
    fn exactly_one_active_row() {
        let (catalog, order) = setup(None);
        let rows = render_rows(&catalog, &order, Some(2));

        let active: Vec<usize> = rows.iter().filter(|r| r.active).map(|r| r.original_index).collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn shuffled_rows_lead_with_active_track() {
        let (catalog, order) = setup(Some(1));
        let rows = render_rows(&catalog, &order, Some(1));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "B");
        assert!(rows[0].active);
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[0].original_index, 1);
        assert_eq!(rows.iter().filter(|r| r.active).count(), 1);
    }

    #[test]
    fn no_cursor_no_active_row() {
        let (catalog, order) = setup(None);
        assert!(render_rows(&catalog, &order, None).iter().all(|r| !r.active));
    }

    #[test]
    fn controls_flags() {
        assert!(!ControlsState::disabled().any_enabled());

        let controls = ControlsState::enabled(false);
        assert!(controls.play_pause && controls.next && controls.previous);
        assert!(!controls.seek);
    }
}
