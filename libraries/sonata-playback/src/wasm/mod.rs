//! WASM bindings for sonata-playback
//!
//! This module exposes the playback controller to web pages: an
//! `<audio>`-backed [`crate::MediaElement`], a canvas visualizer and the
//! JS-facing [`WasmPlayer`].

#[cfg(feature = "wasm")]
mod media;

#[cfg(feature = "wasm")]
mod player;

#[cfg(feature = "wasm")]
mod visual;

#[cfg(feature = "wasm")]
pub use media::WebMediaElement;

#[cfg(feature = "wasm")]
pub use player::WasmPlayer;

#[cfg(feature = "wasm")]
pub use visual::{CanvasSurface, WebAnalyser};
