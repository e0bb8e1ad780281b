//! Frequency visualizer loop
//!
//! Draws one frame of frequency bars per display frame while the controller is
//! `Playing`. The host drives it: call [`VisualizerLoop::on_state_changed`] on
//! every state event and [`VisualizerLoop::frame`] from the animation-frame
//! callback, rescheduling only while it reports [`LoopStatus::Running`].
//!
//! ```text
//! state -> Playing      frame() -> Running, frame() -> Running, ...
//! state -> Paused       final clear, frame() -> Stopped
//! ```

use crate::types::{PlaybackState, VisualizerConfig};
use tracing::debug;

/// Source of frequency-domain samples (an `AnalyserNode` in the browser)
pub trait FrequencyAnalyzer {
    /// Whether sampling is possible right now
    fn is_available(&self) -> bool;

    /// Number of frequency bins per sample
    fn bin_count(&self) -> usize;

    /// Fill `bins` with the current byte magnitudes (0-255)
    fn sample(&mut self, bins: &mut [u8]);
}

/// Drawing target (a 2D canvas in the browser)
pub trait VisualizerSurface {
    /// Width and height in pixels
    fn size(&self) -> (f64, f64);

    /// Clear the whole surface
    fn clear(&mut self);

    /// Fill one bar
    fn fill_bar(&mut self, bar: &Bar);
}

/// Bar colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// CSS `rgb()` string
    pub fn to_css(self) -> String {
        format!("rgb({:.0},{:.0},{:.0})", self.r, self.g, self.b)
    }
}

/// One bar, measured from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
}

/// Lay out one frame of bars, bottom-aligned, left to right
///
/// Bars shade from violet at the low bins towards orange at the high ones.
pub fn layout_bars(samples: &[u8], width: f64, height: f64, config: &VisualizerConfig) -> Vec<Bar> {
    let bins = samples.len();
    if bins == 0 {
        return Vec::new();
    }

    let bar_width = width / bins as f64 * config.bar_width_scale;
    let mut x = 0.0;

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let bar_height = f64::from(*sample) * config.bar_height_scale;
            let t = i as f64 / bins as f64;

            let bar = Bar {
                x,
                y: height - bar_height,
                width: bar_width,
                height: bar_height,
                color: Rgb {
                    r: 100.0 + 150.0 * t,
                    g: 50.0 * t,
                    b: 200.0 - 150.0 * t,
                },
            };

            x += bar_width + config.bar_gap;
            bar
        })
        .collect()
}

/// Whether the host should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Stopped,
}

/// State-gated animation loop over an analyzer and a surface
pub struct VisualizerLoop<A, S> {
    analyzer: A,
    surface: S,
    config: VisualizerConfig,
    bins: Vec<u8>,
    active: bool,
}

impl<A: FrequencyAnalyzer, S: VisualizerSurface> VisualizerLoop<A, S> {
    pub fn new(analyzer: A, surface: S, config: VisualizerConfig) -> Self {
        Self {
            analyzer,
            surface,
            config,
            bins: Vec::new(),
            active: false,
        }
    }

    /// Follow a controller state change
    ///
    /// Leaving `Playing` clears the surface immediately so no stale frame
    /// stays on screen.
    pub fn on_state_changed(&mut self, state: PlaybackState) -> LoopStatus {
        let playing = state == PlaybackState::Playing;

        if self.active && !playing {
            debug!(state = ?state, "Visualizer stopping");
            self.surface.clear();
        } else if !self.active && playing {
            debug!("Visualizer starting");
        }

        self.active = playing;
        self.status()
    }

    /// Draw one frame
    pub fn frame(&mut self) -> LoopStatus {
        if !self.active || !self.analyzer.is_available() {
            self.surface.clear();
            return LoopStatus::Stopped;
        }

        let bin_count = self.analyzer.bin_count();
        self.bins.resize(bin_count, 0);
        self.analyzer.sample(&mut self.bins);

        let (width, height) = self.surface.size();
        self.surface.clear();
        for bar in layout_bars(&self.bins, width, height, &self.config) {
            self.surface.fill_bar(&bar);
        }

        LoopStatus::Running
    }

    pub fn status(&self) -> LoopStatus {
        if self.active {
            LoopStatus::Running
        } else {
            LoopStatus::Stopped
        }
    }

    pub fn analyzer_mut(&mut self) -> &mut A {
        &mut self.analyzer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
