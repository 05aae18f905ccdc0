//! Browser cue output using the Web Audio API
//!
//! The bounce clip is `musics/bounce.mp3`; if it cannot be loaded a short
//! synthesized ping takes its place. Notes are synthesized oscillators.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{CueOutput, Note};

/// Path of the bounce clip, relative to the page
pub const BOUNCE_CLIP: &str = "musics/bounce.mp3";

const MASTER_VOLUME: f32 = 0.8;

/// Cue output for the browser
pub struct WebAudioOutput {
    ctx: Option<AudioContext>,
    /// Set by the clip's error handler; switches to the synthesized ping
    clip_failed: Rc<Cell<bool>>,
}

impl Default for WebAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioOutput {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - synthesized cues disabled");
        }

        let clip_failed = Rc::new(Cell::new(false));
        Self::preload_clip(clip_failed.clone());

        Self {
            ctx,
            clip_failed,
        }
    }

    /// Probe the clip once so a missing file is reported and replaced early
    fn preload_clip(failed: Rc<Cell<bool>>) {
        let Ok(probe) = HtmlAudioElement::new_with_src(BOUNCE_CLIP) else {
            log::warn!("Audio elements unavailable, using synthesized bounce");
            failed.set(true);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            log::warn!("Could not load {}, using synthesized bounce", BOUNCE_CLIP);
            failed.set(true);
        });
        probe.set_onerror(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Context ready to schedule sound, resumed if the browser suspended it
    fn live_context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Synthesized bounce - short high ping
    fn play_ping(&self) {
        let Some(ctx) = self.live_context() else { return };
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(MASTER_VOLUME * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }
}

impl CueOutput for WebAudioOutput {
    fn play_clip(&mut self) {
        if self.clip_failed.get() {
            self.play_ping();
            return;
        }
        // A fresh element per cue so overlapping bounces don't cut each other off
        match HtmlAudioElement::new_with_src(BOUNCE_CLIP) {
            Ok(clip) => {
                clip.set_volume(MASTER_VOLUME as f64);
                let _ = clip.play();
            }
            Err(_) => self.play_ping(),
        }
    }

    fn play_note(&mut self, note: Note) {
        let vol = MASTER_VOLUME * note.gain();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.live_context() else { return };
        let Some((osc, gain)) = self.create_osc(ctx, note.frequency(), OscillatorType::Triangle)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }
}
