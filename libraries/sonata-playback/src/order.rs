//! Playback order
//!
//! Keeps two orders of the same tracks side by side:
//! - Original order: catalog order, the index the cursor and media loads use
//! - Effective order: what navigation follows (a permutation while shuffled)
//!
//! ```text
//! original:   [A, B, C, D, E]        cursor = 1 (B)
//! effective:  [B, E, A, D, C]        shuffle enabled while B was playing
//!              ^ position 0 holds the current track
//! ```
//!
//! Translation between the two goes through `TrackId` position maps, so
//! duplicate-valued catalog entries never collapse onto one position.

use crate::catalog::TrackCatalog;
use crate::shuffle::{fisher_yates, shuffle_with_current_first};
use crate::types::{RepeatMode, TrackId};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Result of resolving the next effective position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextStep {
    /// Effective position to move to (equals the input when terminal)
    pub index: usize,

    /// End of the order under `RepeatMode::Off`; caller halts instead of advancing
    pub terminal: bool,
}

/// Next effective position under a repeat policy
///
/// Returns `None` for an empty order or an out-of-range `current`.
pub fn resolve_next<T>(order: &[T], current: usize, repeat: RepeatMode) -> Option<NextStep> {
    let len = order.len();
    if current >= len {
        return None;
    }

    let step = match repeat {
        RepeatMode::One => NextStep {
            index: current,
            terminal: false,
        },
        RepeatMode::All => NextStep {
            index: (current + 1) % len,
            terminal: false,
        },
        RepeatMode::Off if current + 1 == len => NextStep {
            index: current,
            terminal: true,
        },
        RepeatMode::Off => NextStep {
            index: current + 1,
            terminal: false,
        },
    };

    Some(step)
}

/// Previous effective position; always wraps, whatever the repeat mode
pub fn resolve_previous<T>(order: &[T], current: usize) -> Option<usize> {
    let len = order.len();
    if current >= len {
        return None;
    }

    Some((current + len - 1) % len)
}

/// Navigation target in original-order terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTarget {
    /// Original index to load (the current one when terminal)
    pub original_index: usize,

    /// Whether the order ran out under `RepeatMode::Off`
    pub terminal: bool,
}

/// Original and effective order plus shuffle/repeat policy
#[derive(Debug, Clone, Default)]
pub struct PlaybackOrder {
    /// Track ids in catalog order
    original: Vec<TrackId>,

    /// Track ids in navigation order
    effective: Vec<TrackId>,

    /// Id -> original index
    original_positions: HashMap<TrackId, usize>,

    /// Id -> effective position
    effective_positions: HashMap<TrackId, usize>,

    shuffle: bool,
    repeat: RepeatMode,
}

impl PlaybackOrder {
    /// Empty order with the given policy
    pub fn new(shuffle: bool, repeat: RepeatMode) -> Self {
        Self {
            shuffle,
            repeat,
            ..Self::default()
        }
    }

    /// Rebuild both orders for a freshly loaded catalog
    ///
    /// The shuffle flag is kept; if it is on, `current` leads the new
    /// effective order.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        catalog: &TrackCatalog,
        current: Option<TrackId>,
        rng: &mut R,
    ) {
        self.original = catalog.ids();
        self.original_positions = positions(&self.original);

        if self.shuffle {
            self.enable_shuffle(current, rng);
        } else {
            self.disable_shuffle();
        }
    }

    /// Shuffle the effective order with `current` at position 0
    pub fn enable_shuffle<R: Rng + ?Sized>(
        &mut self,
        current: Option<TrackId>,
        rng: &mut R,
    ) -> &[TrackId] {
        let mut effective = self.original.clone();
        match current {
            Some(id) => shuffle_with_current_first(&mut effective, &id, rng),
            None => fisher_yates(&mut effective, rng),
        }

        debug!(tracks = effective.len(), current = ?current, "Shuffle enabled");

        self.shuffle = true;
        self.set_effective(effective);
        &self.effective
    }

    /// Restore the effective order to catalog order
    pub fn disable_shuffle(&mut self) -> &[TrackId] {
        self.shuffle = false;
        self.set_effective(self.original.clone());
        &self.effective
    }

    /// Switch shuffle on or off, re-deriving the effective order either way
    pub fn set_shuffle<R: Rng + ?Sized>(
        &mut self,
        enabled: bool,
        current: Option<TrackId>,
        rng: &mut R,
    ) -> &[TrackId] {
        if enabled {
            self.enable_shuffle(current, rng)
        } else {
            self.disable_shuffle()
        }
    }

    fn set_effective(&mut self, effective: Vec<TrackId>) {
        self.effective_positions = positions(&effective);
        self.effective = effective;
    }

    /// Effective position of a track
    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.effective_positions.get(&id).copied()
    }

    /// Original index of a track
    pub fn original_index_of(&self, id: TrackId) -> Option<usize> {
        self.original_positions.get(&id).copied()
    }

    /// Original index -> effective position
    pub fn to_effective(&self, original_index: usize) -> Option<usize> {
        self.original
            .get(original_index)
            .and_then(|id| self.index_of(*id))
    }

    /// Effective position -> original index
    pub fn to_original(&self, effective_index: usize) -> Option<usize> {
        self.effective
            .get(effective_index)
            .and_then(|id| self.original_index_of(*id))
    }

    /// Where "next" (or a natural end) leads from the track at `original_index`
    pub fn next_from(&self, original_index: usize) -> Option<NextTarget> {
        let position = self.to_effective(original_index)?;
        let step = resolve_next(&self.effective, position, self.repeat)?;

        Some(NextTarget {
            original_index: self.to_original(step.index)?,
            terminal: step.terminal,
        })
    }

    /// Where "previous" leads from the track at `original_index`
    pub fn previous_from(&self, original_index: usize) -> Option<usize> {
        let position = self.to_effective(original_index)?;
        let previous = resolve_previous(&self.effective, position)?;
        self.to_original(previous)
    }

    /// Ids in catalog order
    pub fn original(&self) -> &[TrackId] {
        &self.original
    }

    /// Ids in navigation order
    pub fn effective(&self) -> &[TrackId] {
        &self.effective
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

fn positions(ids: &[TrackId]) -> HashMap<TrackId, usize> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect()
}
