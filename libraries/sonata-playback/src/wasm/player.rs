//! WASM-compatible player wrapper
//!
//! Wraps [`PlaybackController`] over an `<audio>` element with a
//! JavaScript-friendly API. Media listeners are bound per load token, so
//! callbacks from a superseded track are detached instead of filtered late.

use super::media::{describe, media_event, rejection_from_js, WebMediaElement, MEDIA_EVENTS};
use super::visual::{CanvasSurface, WebAnalyser};
use crate::{
    media::{LoadToken, MediaEvent},
    time::format_time,
    visualizer::{LoopStatus, VisualizerLoop},
    PlaybackController, PlaybackError, PlaybackEvent, PlaybackState, PlayerConfig, RepeatMode,
};
use js_sys::Function;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AudioContext, AudioContextState, HtmlCanvasElement, HtmlMediaElement, Response};

type Shared = Rc<RefCell<PlayerInner>>;

struct PlayerInner {
    controller: PlaybackController<WebMediaElement>,
    element: HtmlMediaElement,
    on_event: Option<Function>,
    listeners: Option<MediaListeners>,
    /// Previous generation, detached but kept alive in case it is mid-call
    retired: Option<MediaListeners>,
    audio_context: Option<AudioContext>,
    visualizer: Option<VisualizerLoop<WebAnalyser, CanvasSurface>>,
}

/// DOM listeners bound to one load token
struct MediaListeners {
    token: LoadToken,
    target: HtmlMediaElement,
    closures: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

impl MediaListeners {
    fn bind(shared: &Weak<RefCell<PlayerInner>>, element: &HtmlMediaElement, token: LoadToken) -> Self {
        let mut closures = Vec::with_capacity(MEDIA_EVENTS.len());

        for name in MEDIA_EVENTS {
            let weak = shared.clone();
            let source = element.clone();
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if let Some(event) = media_event(name, &source) {
                    dispatch(&shared, token, event);
                }
            }) as Box<dyn FnMut(web_sys::Event)>);

            if let Err(e) =
                element.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                web_sys::console::error_2(&JsValue::from_str("Failed to add media listener"), &e);
            }
            closures.push((name, closure));
        }

        Self {
            token,
            target: element.clone(),
            closures,
        }
    }

    fn detach(&self) {
        for (name, closure) in &self.closures {
            self.target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .ok();
        }
    }
}

/// WASM-compatible playlist player
#[wasm_bindgen]
pub struct WasmPlayer {
    shared: Shared,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player around an `<audio>` element
    ///
    /// `config` is an optional `PlayerConfig`-shaped object; missing fields
    /// take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(audio: HtmlMediaElement, config: JsValue) -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid player config: {}", e)))?
        };

        let controller = PlaybackController::new(WebMediaElement::new(audio.clone()), config);
        let shared = Rc::new(RefCell::new(PlayerInner {
            controller,
            element: audio,
            on_event: None,
            listeners: None,
            retired: None,
            audio_context: None,
            visualizer: None,
        }));

        rebind_listeners(&shared);
        Ok(Self { shared })
    }

    // ===== Catalog =====

    /// Fetch `tracks.json` (or any catalog URL) and install it
    #[wasm_bindgen(js_name = fetchCatalog)]
    pub fn fetch_catalog(&self, url: String) -> Result<(), JsValue> {
        self.shared
            .borrow_mut()
            .controller
            .begin_catalog_load()
            .map_err(to_js)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let shared = Rc::clone(&self.shared);

        spawn_local(async move {
            let outcome = fetch_text(&window, &url).await;
            {
                let mut inner = shared.borrow_mut();
                match outcome {
                    Ok(body) => {
                        inner.controller.load_catalog_json(&body).ok();
                    }
                    Err(message) => inner.controller.load_failure(message),
                }
            }
            after_call(&shared);
        });

        Ok(())
    }

    /// Install a catalog from a JSON string the page fetched itself
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&self, json: &str) -> Result<(), JsValue> {
        let result = self.shared.borrow_mut().controller.load_catalog_json(json);
        after_call(&self.shared);
        result.map_err(to_js)
    }

    /// Report a catalog fetch the page could not complete
    #[wasm_bindgen(js_name = catalogFailed)]
    pub fn catalog_failed(&self, message: String) {
        self.shared.borrow_mut().controller.load_failure(message);
        after_call(&self.shared);
    }

    // ===== Playback Control =====

    pub fn play(&self) -> Result<(), JsValue> {
        self.resume_audio_context();
        self.call(|c| c.play())
    }

    pub fn pause(&self) {
        self.shared.borrow_mut().controller.pause();
        after_call(&self.shared);
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> Result<(), JsValue> {
        self.resume_audio_context();
        self.call(|c| c.toggle_play_pause())
    }

    pub fn next(&self) -> Result<(), JsValue> {
        self.call(|c| c.next())
    }

    pub fn previous(&self) -> Result<(), JsValue> {
        self.call(|c| c.previous())
    }

    /// Select a track by its catalog index (as carried by each row)
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&self, index: usize, autoplay: bool) -> Result<(), JsValue> {
        if autoplay {
            self.resume_audio_context();
        }
        self.call(|c| c.select_track(index, autoplay))
    }

    // ===== Seeking =====

    #[wasm_bindgen(js_name = seekForward)]
    pub fn seek_forward(&self) -> Result<(), JsValue> {
        self.call(|c| c.seek_forward())
    }

    #[wasm_bindgen(js_name = seekBackward)]
    pub fn seek_backward(&self) -> Result<(), JsValue> {
        self.call(|c| c.seek_backward())
    }

    /// Seek to position in seconds
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&self, position_secs: f64) -> Result<(), JsValue> {
        self.call(|c| c.seek_to(position_secs))
    }

    /// Seek to a fraction of the track (0.0 - 1.0)
    #[wasm_bindgen(js_name = seekToFraction)]
    pub fn seek_to_fraction(&self, fraction: f64) -> Result<(), JsValue> {
        self.call(|c| c.seek_to_fraction(fraction))
    }

    // ===== Rate & Volume =====

    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&self, rate: f64) -> Result<(), JsValue> {
        self.call(|c| c.set_playback_rate(rate))
    }

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, level: f64) -> Result<(), JsValue> {
        self.call(|c| c.set_volume(level))
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.shared.borrow_mut().controller.toggle_mute();
        after_call(&self.shared);
    }

    // ===== Shuffle & Repeat =====

    #[wasm_bindgen(js_name = setShuffle)]
    pub fn set_shuffle(&self, enabled: bool) {
        self.shared.borrow_mut().controller.set_shuffle(enabled);
        after_call(&self.shared);
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) {
        self.shared.borrow_mut().controller.toggle_shuffle();
        after_call(&self.shared);
    }

    /// Set repeat mode ("off" | "all" | "one")
    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&self, mode: &str) -> Result<(), JsValue> {
        let repeat = match mode {
            "off" => RepeatMode::Off,
            "all" => RepeatMode::All,
            "one" => RepeatMode::One,
            _ => return Err(JsValue::from_str("Invalid repeat mode. Use 'off', 'all', or 'one'")),
        };

        self.shared.borrow_mut().controller.set_repeat(repeat);
        after_call(&self.shared);
        Ok(())
    }

    /// Advance the repeat mode and return the new one
    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&self) -> String {
        let mode = self.shared.borrow_mut().controller.cycle_repeat();
        after_call(&self.shared);
        repeat_name(mode).to_string()
    }

    // ===== State Queries =====

    /// Current playback state as string
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        match self.shared.borrow().controller.state() {
            PlaybackState::Idle => "idle",
            PlaybackState::Loaded => "loaded",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Error(_) => "error",
        }
        .to_string()
    }

    /// Everything the page renders, as one object
    pub fn view(&self) -> JsValue {
        to_value(&self.shared.borrow().controller.view())
    }

    /// Track list rows in display order
    pub fn rows(&self) -> JsValue {
        to_value(&self.shared.borrow().controller.rows())
    }

    // ===== Visualizer =====

    /// Route the audio through an analyser and draw into `canvas`
    ///
    /// Call from a user gesture; browsers keep the audio context suspended
    /// otherwise.
    #[wasm_bindgen(js_name = attachVisualizer)]
    pub fn attach_visualizer(&self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let mut inner = self.shared.borrow_mut();
        if inner.visualizer.is_some() {
            return Ok(());
        }

        let config = inner.controller.config().visualizer.clone();
        let context = AudioContext::new()?;
        let analyser = context.create_analyser()?;
        analyser.set_fft_size(config.fft_size as u32);

        let source = context.create_media_element_source(&inner.element)?;
        source.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&context.destination())?;

        let mut visualizer =
            VisualizerLoop::new(WebAnalyser::new(analyser), CanvasSurface::new(canvas)?, config);
        visualizer.on_state_changed(inner.controller.state());

        inner.visualizer = Some(visualizer);
        inner.audio_context = Some(context);
        Ok(())
    }

    /// Draw one visualizer frame; returns whether to request another
    ///
    /// The page owns the `requestAnimationFrame` loop: call this from the
    /// frame callback and schedule the next frame only while it returns
    /// `true`. It returns `false` once playback leaves `playing` (after the
    /// final clear), so the loop stops by itself. Restart it from `onEvent`
    /// when a `stateChanged` event reports `playing`.
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&self) -> bool {
        self.shared
            .borrow_mut()
            .visualizer
            .as_mut()
            .is_some_and(|visualizer| visualizer.frame() == LoopStatus::Running)
    }

    // ===== Event Listeners =====

    /// Register the callback receiving every `PlaybackEvent` as an object
    ///
    /// Events arrive after the call that caused them has returned, so the
    /// callback may call back into the player. A `stateChanged` event with
    /// `state: "playing"` is the signal to start the `renderFrame` loop.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        self.shared.borrow_mut().on_event = Some(callback);
    }

    // ===== Internals =====

    fn call<F>(&self, f: F) -> Result<(), JsValue>
    where
        F: FnOnce(&mut PlaybackController<WebMediaElement>) -> crate::Result<()>,
    {
        let result = f(&mut self.shared.borrow_mut().controller);
        after_call(&self.shared);
        result.map_err(to_js)
    }

    fn resume_audio_context(&self) {
        if let Some(context) = &self.shared.borrow().audio_context {
            if context.state() == AudioContextState::Suspended {
                context.resume().ok();
            }
        }
    }
}

/// Format seconds as `M:SS`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
    format_time(seconds)
}

// ===== Dispatch =====

fn dispatch(shared: &Shared, token: LoadToken, event: MediaEvent) {
    shared.borrow_mut().controller.handle_media_event(token, event);
    after_call(shared);
}

/// Bookkeeping after every controller call: await play promises, follow the
/// load token with the listeners, then hand queued events to JS.
fn after_call(shared: &Shared) {
    watch_play(shared);
    rebind_listeners(shared);
    flush_events(shared);
}

fn watch_play(shared: &Shared) {
    let (promise, token) = {
        let mut inner = shared.borrow_mut();
        let token = inner.controller.pending_play();
        (inner.controller.media_mut().take_pending_play(), token)
    };

    let (Some(promise), Some(token)) = (promise, token) else {
        return;
    };

    let shared = Rc::clone(shared);
    spawn_local(async move {
        let event = match JsFuture::from(promise).await {
            Ok(_) => MediaEvent::PlayStarted,
            Err(e) => MediaEvent::PlayRejected(rejection_from_js(&e)),
        };
        dispatch(&shared, token, event);
    });
}

fn rebind_listeners(shared: &Shared) {
    let weak = Rc::downgrade(shared);
    let mut inner = shared.borrow_mut();
    let token = inner.controller.load_token();

    if inner.listeners.as_ref().map(|l| l.token) == Some(token) {
        return;
    }

    if let Some(old) = inner.listeners.take() {
        old.detach();
        inner.retired = Some(old);
    }

    let listeners = MediaListeners::bind(&weak, &inner.element, token);
    inner.listeners = Some(listeners);
}

fn flush_events(shared: &Shared) {
    let (events, callback) = {
        let mut inner = shared.borrow_mut();
        let events = inner.controller.drain_events();

        if events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::StateChanged { .. }))
        {
            let state = inner.controller.state();
            if let Some(visualizer) = inner.visualizer.as_mut() {
                visualizer.on_state_changed(state);
            }
        }

        (events, inner.on_event.clone())
    };

    let Some(callback) = callback else {
        return;
    };
    for event in &events {
        callback.call1(&JsValue::NULL, &to_value(event)).ok();
    }
}

async fn fetch_text(window: &web_sys::Window, url: &str) -> Result<String, String> {
    let parse_failure = |e: &JsValue| format!("Error fetching or parsing track data: {}", describe(e));

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .and_then(|value| value.dyn_into::<Response>())
        .map_err(|e| parse_failure(&e))?;

    if !response.ok() {
        return Err(format!("Error loading tracks: HTTP status {}", response.status()));
    }

    let text = response.text().map_err(|e| parse_failure(&e))?;
    JsFuture::from(text)
        .await
        .map_err(|e| parse_failure(&e))?
        .as_string()
        .ok_or_else(|| "Error fetching or parsing track data: body is not text".to_string())
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn repeat_name(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    }
}
