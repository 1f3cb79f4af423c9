//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! A missing or blocked AudioContext silently disables sound.

use web_sys::{
    AudioBuffer, AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

/// Sound effect types across the three games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gentle touchdown on a planet
    Land,
    /// Too-fast surface contact
    Bounce,
    /// Leaving a surface under thrust
    Launch,
    /// Star collected
    StarCollect,
    /// Drifted out of rescue range
    LostInSpace,
    /// Stability check passed
    CheckPass,
    /// Stability check missed
    CheckFail,
    /// Balance rocket tipped over
    Crash,
    /// Gate Run tap
    Flap,
    /// Gate cleared
    GatePass,
    /// Gate Run collision
    GateCrash,
}

/// Looped engine-noise channel: noise buffer through a filter chain,
/// gain tracked to the thrust level
struct EngineChannel {
    gain: GainNode,
    filter: BiquadFilterNode,
}

/// Audio manager for the arcade
pub struct AudioManager {
    ctx: Option<AudioContext>,
    engine: Option<EngineChannel>,
    volume: f32,
    last_engine_level: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; sound just stays off
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            engine: None,
            volume: 0.55,
            last_engine_level: 0.0,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set effective volume (0.0 silences everything)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        if self.volume == 0.0 {
            self.set_engine_level(0.0);
        }
    }

    /// Drive the looped engine noise: 0.0 silent, 1.0 full burn.
    /// The channel is built lazily so it starts after a user gesture.
    pub fn set_engine_level(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0) * if self.volume > 0.0 { 1.0 } else { 0.0 };
        if (level - self.last_engine_level).abs() < 0.01 {
            return;
        }
        self.last_engine_level = level;

        if self.engine.is_none() && level > 0.0 {
            self.engine = self.build_engine();
        }
        let Some(ctx) = &self.ctx else { return };
        let Some(engine) = &self.engine else { return };
        let t = ctx.current_time();
        engine
            .gain
            .gain()
            .set_target_at_time(0.12 * level * self.volume, t, 0.04)
            .ok();
        engine
            .filter
            .frequency()
            .set_target_at_time(200.0 + 640.0 * level, t, 0.05)
            .ok();
    }

    /// Play a one-shot sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Land => self.beep(ctx, 860.0, 0.10, 0.12, OscillatorType::Sine),
            SoundEffect::Bounce => self.beep(ctx, 220.0, 0.08, 0.07, OscillatorType::Sine),
            SoundEffect::Launch => self.beep(ctx, 520.0, 0.12, 0.10, OscillatorType::Sine),
            SoundEffect::StarCollect => self.beep(ctx, 880.0, 0.10, 0.11, OscillatorType::Sine),
            SoundEffect::LostInSpace => self.beep(ctx, 180.0, 0.22, 0.16, OscillatorType::Sine),
            SoundEffect::CheckPass => {
                self.sweep(ctx, 520.0, 880.0, 0.18, 0.14, OscillatorType::Sine)
            }
            SoundEffect::CheckFail => self.beep(ctx, 200.0, 0.12, 0.08, OscillatorType::Triangle),
            SoundEffect::Crash => {
                self.sweep(ctx, 180.0, 60.0, 0.26, 0.18, OscillatorType::Sawtooth)
            }
            SoundEffect::Flap => self.beep(ctx, 520.0, 0.05, 0.08, OscillatorType::Sine),
            SoundEffect::GatePass => self.beep(ctx, 880.0, 0.05, 0.10, OscillatorType::Sine),
            SoundEffect::GateCrash => {
                self.noise_burst(ctx, 0.09, 0.10);
                self.beep(ctx, 140.0, 0.12, 0.10, OscillatorType::Sine);
            }
        }
    }

    /// Create an oscillator routed through a fresh gain node
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

    /// Short envelope blip at a fixed frequency
    fn beep(&self, ctx: &AudioContext, freq: f32, dur: f64, amp: f32, osc_type: OscillatorType) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time();
        let peak = amp * self.volume;

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(peak.max(0.0002), t + 0.02)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + dur)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + dur + 0.02).ok();
    }

    /// Envelope blip gliding between two frequencies
    fn sweep(
        &self,
        ctx: &AudioContext,
        from: f32,
        to: f32,
        dur: f64,
        amp: f32,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();
        let peak = amp * self.volume;

        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to.max(1.0), t + dur)
            .ok();
        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(peak.max(0.0002), t + 0.03)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + dur)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + dur + 0.02).ok();
    }

    /// Decaying white-noise burst (impacts)
    fn noise_burst(&self, ctx: &AudioContext, dur: f64, amp: f32) {
        let Some(buffer) = make_noise_buffer(ctx, dur, true) else {
            return;
        };
        let Ok(src) = ctx.create_buffer_source() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };

        src.set_buffer(Some(&buffer));
        gain.gain().set_value(amp * self.volume);
        if src.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        src.start().ok();
    }

    /// Build the looped engine channel: noise -> highpass -> bandpass -> gain
    fn build_engine(&self) -> Option<EngineChannel> {
        let ctx = self.ctx.as_ref()?;
        let buffer = make_noise_buffer(ctx, 1.4, false)?;

        let src = ctx.create_buffer_source().ok()?;
        src.set_buffer(Some(&buffer));
        src.set_loop(true);

        let highpass = ctx.create_biquad_filter().ok()?;
        highpass.set_type(BiquadFilterType::Highpass);
        highpass.frequency().set_value(80.0);

        let bandpass = ctx.create_biquad_filter().ok()?;
        bandpass.set_type(BiquadFilterType::Bandpass);
        bandpass.frequency().set_value(220.0);
        bandpass.q().set_value(0.7);

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(0.0);

        src.connect_with_audio_node(&highpass).ok()?;
        highpass.connect_with_audio_node(&bandpass).ok()?;
        bandpass.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        src.start().ok()?;

        Some(EngineChannel {
            gain,
            filter: bandpass,
        })
    }
}

/// Fill a buffer with white noise, optionally fading out over its length
fn make_noise_buffer(ctx: &AudioContext, dur: f64, fade: bool) -> Option<AudioBuffer> {
    let sample_rate = ctx.sample_rate();
    let len = (sample_rate as f64 * dur) as u32;
    let buffer = ctx.create_buffer(1, len, sample_rate).ok()?;

    let mut data = vec![0.0f32; len as usize];
    for (i, sample) in data.iter_mut().enumerate() {
        let envelope = if fade {
            1.0 - i as f32 / len as f32
        } else {
            1.0
        };
        *sample = (js_sys::Math::random() as f32 * 2.0 - 1.0) * 0.5 * envelope;
    }
    buffer.copy_to_channel(&mut data, 0).ok()?;

    Some(buffer)
}
