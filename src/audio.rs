//! Audio feedback using Web Audio API
//!
//! Procedurally generated: a short pop on each collected letter and a soft
//! chord loop once the player has interacted. No external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::hooks::AudioHooks;
use crate::settings::Settings;

/// Ambient progression: C major, D minor, E minor, F major
const CHORDS: [[f32; 3]; 4] = [
    [261.63, 329.63, 392.00],
    [293.66, 349.23, 440.00],
    [329.63, 392.00, 493.88],
    [349.23, 440.00, 523.25],
];

/// Seconds each chord rings
const CHORD_SECONDS: f64 = 4.0;
/// One pass through the progression
const LOOP_SECONDS: f64 = CHORD_SECONDS * CHORDS.len() as f64;
/// Queue the next pass when the current one is this close to ending
const SCHEDULE_AHEAD: f64 = 1.0;

/// Audio collaborator for the browser
pub struct WebAudio {
    ctx: Option<AudioContext>,
    settings: Settings,
    ambient_started: bool,
    /// Context time the next ambient pass begins at
    next_loop_at: f64,
}

impl WebAudio {
    pub fn new(settings: Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings,
            ambient_started: false,
            next_loop_at: 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Resume the context if the browser suspended it
    fn resume(ctx: &AudioContext) {
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
    }

    /// Keep the ambient loop going; call once per display refresh
    pub fn pump(&mut self) {
        if !self.ambient_started {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let now = ctx.current_time();
        if now + SCHEDULE_AHEAD < self.next_loop_at {
            return;
        }

        let start = self.next_loop_at.max(now);
        let vol = self.settings.effective_music_volume();
        if vol > 0.0 {
            for (i, chord) in CHORDS.iter().enumerate() {
                let at = start + i as f64 * CHORD_SECONDS;
                for &freq in chord {
                    Self::play_ambient_note(ctx, freq, at, vol);
                }
            }
        }
        self.next_loop_at = start + LOOP_SECONDS;
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Letter collected - gentle falling pop
    fn play_pop(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(400.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// One voice of an ambient chord, faded in and out
    fn play_ambient_note(ctx: &AudioContext, freq: f32, at: f64, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let end = at + CHORD_SECONDS;

        gain.gain().set_value_at_time(0.0, at).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.03, at + 1.0)
            .ok();
        gain.gain()
            .linear_ramp_to_value_at_time(0.0, end)
            .ok();

        osc.start_with_when(at).ok();
        osc.stop_with_when(end).ok();
    }
}

impl AudioHooks for WebAudio {
    fn on_letter_collected(&mut self) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        Self::resume(ctx);
        Self::play_pop(ctx, vol);
    }

    fn on_first_interaction(&mut self) {
        if self.ambient_started {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        Self::resume(ctx);
        self.ambient_started = true;
        self.next_loop_at = ctx.current_time();
        log::info!("Ambient loop started");
        self.pump();
    }
}
