//! `HtmlMediaElement` adapter

use crate::media::{MediaElement, MediaErrorCode, MediaEvent, PlayOutcome, PlayRejection};
use js_sys::{Promise, Reflect};
use wasm_bindgen::JsValue;
use web_sys::HtmlMediaElement;

/// DOM events the player listens to on the media element
pub(crate) const MEDIA_EVENTS: [&str; 7] = [
    "timeupdate",
    "loadedmetadata",
    "ended",
    "waiting",
    "playing",
    "loadstart",
    "error",
];

/// [`MediaElement`] over an `<audio>` element
///
/// `play()` always answers `Pending`; the returned promise is parked here
/// until the player awaits it and feeds the result back as a media event.
pub struct WebMediaElement {
    element: HtmlMediaElement,
    pending_play: Option<Promise>,
}

impl WebMediaElement {
    pub fn new(element: HtmlMediaElement) -> Self {
        Self {
            element,
            pending_play: None,
        }
    }

    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }

    /// Promise of the last `play()` call, if nobody has taken it yet
    pub fn take_pending_play(&mut self) -> Option<Promise> {
        self.pending_play.take()
    }
}

impl MediaElement for WebMediaElement {
    fn set_source(&mut self, path: &str) {
        self.pending_play = None;
        self.element.set_src(path);
    }

    fn load(&mut self) {
        self.element.load();
    }

    fn play(&mut self) -> PlayOutcome {
        match self.element.play() {
            Ok(promise) => {
                self.pending_play = Some(promise);
                PlayOutcome::Pending
            }
            Err(e) => PlayOutcome::Rejected(rejection_from_js(&e)),
        }
    }

    fn pause(&mut self) {
        self.element.pause().ok();
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }
}

/// Translate a DOM event name into a media event, reading the element state
pub(crate) fn media_event(name: &str, element: &HtmlMediaElement) -> Option<MediaEvent> {
    let event = match name {
        "timeupdate" => MediaEvent::TimeUpdate {
            current_time: element.current_time(),
        },
        "loadedmetadata" => MediaEvent::MetadataLoaded {
            duration: element.duration(),
        },
        "ended" => MediaEvent::Ended,
        "waiting" => MediaEvent::BufferingStarted,
        "playing" => MediaEvent::BufferingEnded,
        "loadstart" => MediaEvent::LoadStarted,
        "error" => MediaEvent::Error(
            element
                .error()
                .map_or(MediaErrorCode::Unknown, |e| MediaErrorCode::from_code(e.code())),
        ),
        _ => return None,
    };
    Some(event)
}

/// Read `name`/`message` off a rejected promise value (usually a DOMException)
pub(crate) fn rejection_from_js(value: &JsValue) -> PlayRejection {
    let field = |key: &str| {
        Reflect::get(value, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
    };

    PlayRejection::new(
        field("name").unwrap_or_else(|| "Error".to_string()),
        field("message")
            .or_else(|| value.as_string())
            .unwrap_or_default(),
    )
}

/// Best-effort text of a JS error value
pub(crate) fn describe(value: &JsValue) -> String {
    let rejection = rejection_from_js(value);
    if rejection.message.is_empty() {
        rejection.name
    } else {
        rejection.message
    }
}
