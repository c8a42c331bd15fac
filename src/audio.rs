//! Audio system
//!
//! Sound effects are synthesised from Web Audio oscillators, so there are no
//! asset files. The simulation never plays sounds itself; the session maps
//! game events onto a `SoundPlayer`.

use std::rc::Rc;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player flapped
    Jump,
    /// Pipe passed, coin collected or level up
    Score,
    /// Run ended
    Crash,
    /// UI confirmation (run started)
    Click,
}

/// Fire-and-forget sound output
pub trait SoundPlayer {
    fn play(&self, effect: SoundEffect);
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Rc<P> {
    fn play(&self, effect: SoundEffect) {
        (**self).play(effect)
    }
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for &P {
    fn play(&self, effect: SoundEffect) {
        (**self).play(effect)
    }
}

/// Plays nothing (native builds, attract sessions, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl SoundPlayer for SilentAudio {
    fn play(&self, _effect: SoundEffect) {}
}

/// Gain actually applied to a sound, given user preferences
pub fn effective_volume(master: f32, sfx: f32, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        master.clamp(0.0, 1.0) * sfx.clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundPlayer, effective_volume};
    use crate::settings::Settings;

    /// Web Audio sound player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: Cell<f32>,
        sfx_volume: Cell<f32>,
        muted: Cell<bool>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Can fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: Cell::new(0.8),
                sfx_volume: Cell::new(1.0),
                muted: Cell::new(false),
            }
        }

        /// Resume the context (browsers require a user gesture first)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&self, settings: &Settings) {
            self.master_volume.set(settings.master_volume.clamp(0.0, 1.0));
            self.sfx_volume.set(settings.sfx_volume.clamp(0.0, 1.0));
            self.muted.set(settings.muted);
        }

        fn volume(&self) -> f32 {
            effective_volume(
                self.master_volume.get(),
                self.sfx_volume.get(),
                self.muted.get(),
            )
        }

        /// Oscillator routed through its own gain node
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

        /// Jump - rising square chirp
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Score - two-note sine ding
        fn play_score(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency().set_value_at_time(880.0, t + 0.1).ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Crash - falling sawtooth
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(20.0, t + 0.3)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Click - short triangle blip
        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.05, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }
    }

    impl SoundPlayer for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_jump(ctx, vol),
                SoundEffect::Score => self.play_score(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Click => self.play_click(ctx, vol),
            }
        }
    }
}
