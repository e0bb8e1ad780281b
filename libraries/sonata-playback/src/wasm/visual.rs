//! Web Audio analyser and 2D canvas behind the visualizer traits

use crate::visualizer::{Bar, FrequencyAnalyzer, VisualizerSurface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AnalyserNode, CanvasRenderingContext2d, HtmlCanvasElement};

/// `AnalyserNode` as a frequency source
pub struct WebAnalyser {
    node: AnalyserNode,
}

impl WebAnalyser {
    pub fn new(node: AnalyserNode) -> Self {
        Self { node }
    }
}

impl FrequencyAnalyzer for WebAnalyser {
    fn is_available(&self) -> bool {
        true
    }

    fn bin_count(&self) -> usize {
        self.node.frequency_bin_count() as usize
    }

    fn sample(&mut self, bins: &mut [u8]) {
        self.node.get_byte_frequency_data(bins);
    }
}

/// Canvas with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { canvas, context })
    }
}

impl VisualizerSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_bar(&mut self, bar: &Bar) {
        self.context
            .set_fill_style(&JsValue::from_str(&bar.color.to_css()));
        self.context.fill_rect(bar.x, bar.y, bar.width, bar.height);
    }
}
