//! Browser bindings
//!
//! The page owns the canvas/DOM and the requestAnimationFrame loop; it feeds
//! input events and timestamps into a [`GreetingHandle`] and draws whatever
//! `snapshot_json` returns.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::input::Direction;
use crate::session::Session;
use crate::settings::Settings;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Star Greeting module loaded");
}

#[wasm_bindgen]
pub struct GreetingHandle {
    session: Session<WebAudio>,
}

#[wasm_bindgen]
impl GreetingHandle {
    /// Start a session from an optional seed and optional tuning JSON
    ///
    /// Without a seed every page load plays a different round.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, tuning_json: Option<String>) -> Result<GreetingHandle, JsValue> {
        let seed = seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let settings = Settings::load();
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let tuning = tuning.with_settings(&settings);
        let session = Session::new(tuning, seed, WebAudio::new(settings))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { session })
    }

    pub fn move_left(&mut self) {
        self.session.move_left();
    }

    pub fn move_right(&mut self) {
        self.session.move_right();
    }

    pub fn press_left(&mut self) {
        self.session.press(Direction::Left);
    }

    pub fn press_right(&mut self) {
        self.session.press(Direction::Right);
    }

    pub fn release_left(&mut self) {
        self.session.release(Direction::Left);
    }

    pub fn release_right(&mut self) {
        self.session.release(Direction::Right);
    }

    pub fn fire(&mut self) {
        self.session.fire();
    }

    pub fn replay(&mut self) {
        self.session.replay();
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.session.set_idle_mode(on);
    }

    /// Advance from a requestAnimationFrame timestamp
    ///
    /// Returns false once stopped; the page should not request another frame.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let running = self.session.frame(timestamp_ms);
        if running {
            self.session.audio_mut().pump();
        }
        running
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.session
            .snapshot()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Toggle mute and remember it
    pub fn set_muted(&mut self, muted: bool) {
        let mut settings = self.session.audio().settings().clone();
        settings.muted = muted;
        settings.save();
        self.session.audio_mut().set_settings(settings);
    }

    pub fn stop(&self) {
        self.session.stop();
    }
}
