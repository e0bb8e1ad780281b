//! Track catalog
//!
//! The catalog is the immutable, ordered list of tracks produced by one load.
//! It is built from the JSON array served as `tracks.json`; entries that are
//! not objects or lack a non-empty string `path` and `name` are dropped.

use crate::error::CatalogError;
use crate::types::{Track, TrackId};
use serde_json::Value;
use tracing::{debug, warn};

/// Raw catalog entry before ids are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub path: String,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TrackRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            artist: None,
            album: None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Extract a record from one JSON entry, if it is usable
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let path = non_empty_str(object.get("path"))?;
        let name = non_empty_str(object.get("name"))?;

        Some(Self {
            path: path.to_string(),
            name: name.to_string(),
            artist: non_empty_str(object.get("artist")).map(str::to_string),
            album: non_empty_str(object.get("album")).map(str::to_string),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Ordered, immutable list of tracks
///
/// Track ids are assigned sequentially in catalog order, so `get(i).id`
/// is always `TrackId::new(i)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    /// Catalog with no tracks
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from the raw `tracks.json` body
    ///
    /// An empty result is not an error here; the controller decides what an
    /// empty catalog means.
    pub fn from_json_str(source: &str) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Build a catalog from an already-parsed JSON value
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let entries = value.as_array().ok_or(CatalogError::NotAnArray)?;

        let records: Vec<TrackRecord> = entries.iter().filter_map(TrackRecord::from_value).collect();

        let dropped = entries.len() - records.len();
        if dropped > 0 {
            warn!(dropped, total = entries.len(), "Skipped invalid catalog entries");
        }

        Ok(Self::from_records(records))
    }

    /// Build a catalog from records, assigning ids in order
    pub fn from_records(records: impl IntoIterator<Item = TrackRecord>) -> Self {
        let tracks: Vec<Track> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Track {
                id: TrackId::new(index as u32),
                path: record.path,
                name: record.name,
                artist: record.artist,
                album: record.album,
            })
            .collect();

        debug!(tracks = tracks.len(), "Catalog built");
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at an original-order index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Original-order index of a track id
    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        let index = id.get() as usize;
        self.tracks
            .get(index)
            .filter(|track| track.id == id)
            .map(|_| index)
    }

    /// Ids in original order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|track| track.id).collect()
    }
}
