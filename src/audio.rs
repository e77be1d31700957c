//! Audio cues
//!
//! The simulation only knows the `AudioCues` trait. `AudioManager` turns
//! cues into procedurally generated noise bursts through the Web Audio API;
//! natively it accepts cues silently.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;

/// Sink for the two sounds the show makes
pub trait AudioCues {
    /// Called exactly once per firework explosion
    fn emit_explosion_cue(&mut self);
    /// Called up to once per tick while the glyph is burning
    fn emit_crackling_cue(&mut self);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCues;

impl AudioCues for NullCues {
    fn emit_explosion_cue(&mut self) {}
    fn emit_crackling_cue(&mut self) {}
}

/// Counts cue invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CueCounter {
    pub explosions: u64,
    pub crackles: u64,
}

impl AudioCues for CueCounter {
    fn emit_explosion_cue(&mut self) {
        self.explosions += 1;
    }

    fn emit_crackling_cue(&mut self) {
        self.crackles += 1;
    }
}

/// Fraction of crackle cues that actually make a sound
pub const CRACKLE_CHANCE: f64 = 0.15;
/// Length of the shared white-noise buffer (seconds)
pub const NOISE_SECONDS: f32 = 2.0;

/// Audio manager for the show
pub struct AudioManager {
    enabled: bool,
    master_volume: f32,
    rng: Pcg32,
    /// Cues that passed the enable flag and the crackle gate
    played: CueCounter,
    #[cfg(target_arch = "wasm32")]
    voice: Option<web::NoiseVoice>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AudioManager {
    /// Create a disabled manager. The audio context is created on first enable
    /// (browsers only allow that after a user gesture).
    pub fn new(seed: u64) -> Self {
        Self {
            enabled: false,
            master_volume: 1.0,
            rng: Pcg32::seed_from_u64(seed),
            played: CueCounter::default(),
            #[cfg(target_arch = "wasm32")]
            voice: None,
        }
    }

    /// Manager with the user's sound preferences applied
    pub fn from_settings(seed: u64, settings: &Settings) -> Self {
        let mut audio = Self::new(seed);
        audio.set_master_volume(settings.master_volume);
        audio.set_enabled(settings.audio_enabled);
        audio
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn sound on/off. Takes effect on the next cue.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        #[cfg(target_arch = "wasm32")]
        if enabled {
            if self.voice.is_none() {
                self.voice = web::NoiseVoice::new(&mut self.rng);
                if self.voice.is_none() {
                    log::warn!("Failed to create AudioContext - audio disabled");
                }
            }
            if let Some(voice) = &self.voice {
                voice.resume();
            }
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Cues that made it past the enable flag and the crackle gate
    pub fn played(&self) -> CueCounter {
        self.played
    }

    fn audible(&self) -> bool {
        self.enabled && self.master_volume > 0.0
    }
}

impl AudioCues for AudioManager {
    fn emit_explosion_cue(&mut self) {
        if !self.audible() {
            return;
        }
        self.played.explosions += 1;
        #[cfg(target_arch = "wasm32")]
        if let Some(voice) = &self.voice {
            voice.thud(self.master_volume);
        }
    }

    fn emit_crackling_cue(&mut self) {
        if !self.audible() || !self.rng.random_bool(CRACKLE_CHANCE) {
            return;
        }
        self.played.crackles += 1;
        // Very short click/pop at a random level and buffer offset
        let volume = self.rng.random_range(0.02..0.05) * self.master_volume;
        let offset = self.rng.random::<f64>();
        #[cfg(target_arch = "wasm32")]
        if let Some(voice) = &self.voice {
            voice.click(volume, offset);
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = (volume, offset);
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::Rng;
    use web_sys::{AudioBuffer, AudioContext, BiquadFilterType};

    use super::NOISE_SECONDS;

    /// Audio context plus a reusable white-noise buffer
    pub struct NoiseVoice {
        ctx: AudioContext,
        noise: AudioBuffer,
    }

    impl NoiseVoice {
        pub fn new(rng: &mut impl Rng) -> Option<Self> {
            let ctx = AudioContext::new().ok()?;
            let rate = ctx.sample_rate();
            let len = (rate * NOISE_SECONDS) as u32;
            let noise = ctx.create_buffer(1, len, rate).ok()?;
            let mut samples: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
            noise.copy_to_channel(&mut samples, 0).ok()?;
            Some(Self { ctx, noise })
        }

        /// Resume context if suspended (browsers require user gesture)
        pub fn resume(&self) {
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }

        /// Explosion - low-passed noise with a falling cutoff
        pub fn thud(&self, vol: f32) {
            let ctx = &self.ctx;
            let t = ctx.current_time();
            let Ok(source) = ctx.create_buffer_source() else { return };
            let Ok(filter) = ctx.create_biquad_filter() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            source.set_buffer(Some(&self.noise));

            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value_at_time(400.0, t).ok();
            filter
                .frequency()
                .exponential_ramp_to_value_at_time(100.0, t + 0.3)
                .ok();

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.2 * vol, t + 0.02)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();

            if source.connect_with_audio_node(&filter).is_err()
                || filter.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            source.start_with_when(t).ok();
            source.stop_with_when(t + 0.6).ok();
        }

        /// Crackle - high-passed 100ms grain from a random point in the buffer
        pub fn click(&self, vol: f32, offset: f64) {
            let ctx = &self.ctx;
            let t = ctx.current_time();
            let Ok(source) = ctx.create_buffer_source() else { return };
            let Ok(filter) = ctx.create_biquad_filter() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            source.set_buffer(Some(&self.noise));

            filter.set_type(BiquadFilterType::Highpass);
            filter.frequency().set_value(5000.0);

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.05)
                .ok();

            if source.connect_with_audio_node(&filter).is_err()
                || filter.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            let start = offset * (self.noise.duration() - 0.1).max(0.0);
            source
                .start_with_when_and_grain_offset_and_grain_duration(t, start, 0.1)
                .ok();
        }
    }
}
