//! Synthesized one-shot effects.
//!
//! Both cues are rendered to mono PCM up front and handed to the backend as a
//! finished buffer, so the backend never needs a synthesis graph of its own.

use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::PI;
use std::time::Duration;

/// Output rate used for rendered effects
pub const EFFECT_SAMPLE_RATE: u32 = 44_100;

const TRANSITION_SECS: f32 = 0.18;
const TRANSITION_ATTACK_SECS: f32 = 0.03;
const TRANSITION_PEAK: f32 = 0.25;
const TRANSITION_NOISE_LEVEL: f32 = 0.3;
const TRANSITION_SWEEP_HZ: (f32, f32) = (1200.0, 400.0);
const TRANSITION_Q: f32 = 1.5;

const POP_SECS: f32 = 0.12;
const POP_SWEEP_SECS: f32 = 0.1;
const POP_PEAK: f32 = 0.2;
const POP_SWEEP_HZ: (f32, f32) = (600.0, 200.0);

/// Level both envelopes decay towards
const FLOOR: f32 = 0.001;

/// Which decorative cue a buffer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Transition,
    Pop,
}

/// A rendered mono effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectBuffer {
    pub kind: EffectKind,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl EffectBuffer {
    #[must_use]
    pub fn duration(&self) -> Duration {
        #[allow(clippy::cast_precision_loss)]
        let secs = self.samples.len() as f64 / f64::from(self.sample_rate);
        Duration::from_secs_f64(secs)
    }

    /// Largest absolute sample value
    #[must_use]
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Encode as a 16-bit PCM mono WAV file
    #[must_use]
    pub fn to_wav(&self) -> Vec<u8> {
        const HEADER_LEN: usize = 44;
        let data_len = self.samples.len() * 2;
        let mut out = Vec::with_capacity(HEADER_LEN + data_len);

        let data_len_u32 = u32::try_from(data_len).unwrap_or(u32::MAX);
        let byte_rate = self.sample_rate * 2;

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len_u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16_u32.to_le_bytes());
        out.extend_from_slice(&1_u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1_u16.to_le_bytes()); // mono
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&2_u16.to_le_bytes()); // block align
        out.extend_from_slice(&16_u16.to_le_bytes()); // bits per sample
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len_u32.to_le_bytes());

        for sample in &self.samples {
            #[allow(clippy::cast_possible_truncation)]
            let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            out.extend_from_slice(&value.to_le_bytes());
        }

        out
    }
}

/// Render the slide-change whoosh: band-passed noise with a falling centre frequency.
pub fn render_transition(sample_rate: u32, rng: &mut StdRng) -> EffectBuffer {
    let rate = sample_rate_f32(sample_rate);
    let total = sample_count(TRANSITION_SECS, sample_rate);
    let mut filter = BandPass::default();
    let mut samples = Vec::with_capacity(total);

    for i in 0..total {
        let t = index_secs(i, rate);
        let progress = t / TRANSITION_SECS;

        let noise = rng.gen_range(-1.0_f32..1.0) * TRANSITION_NOISE_LEVEL;
        let centre = exp_ramp(TRANSITION_SWEEP_HZ.0, TRANSITION_SWEEP_HZ.1, progress);
        filter.tune(centre, TRANSITION_Q, rate);

        let gain = if t < TRANSITION_ATTACK_SECS {
            TRANSITION_PEAK * (t / TRANSITION_ATTACK_SECS)
        } else {
            let decay = (t - TRANSITION_ATTACK_SECS) / (TRANSITION_SECS - TRANSITION_ATTACK_SECS);
            exp_ramp(TRANSITION_PEAK, FLOOR, decay)
        };

        samples.push(filter.process(noise) * gain);
    }

    EffectBuffer {
        kind: EffectKind::Transition,
        sample_rate,
        samples,
    }
}

/// Render the soft pop: a sine sweeping down with a fast exponential decay.
#[must_use]
pub fn render_pop(sample_rate: u32) -> EffectBuffer {
    let rate = sample_rate_f32(sample_rate);
    let total = sample_count(POP_SECS, sample_rate);
    let mut phase = 0.0_f32;
    let mut samples = Vec::with_capacity(total);

    for i in 0..total {
        let t = index_secs(i, rate);
        let freq = exp_ramp(POP_SWEEP_HZ.0, POP_SWEEP_HZ.1, t / POP_SWEEP_SECS);
        let gain = exp_ramp(POP_PEAK, FLOOR, t / POP_SECS);

        samples.push(phase.sin() * gain);
        phase = (phase + 2.0 * PI * freq / rate) % (2.0 * PI);
    }

    EffectBuffer {
        kind: EffectKind::Pop,
        sample_rate,
        samples,
    }
}

/// Exponential interpolation from `from` to `to`, holding `to` past the end
fn exp_ramp(from: f32, to: f32, progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    from * (to / from).powf(p)
}

#[allow(clippy::cast_precision_loss)]
fn sample_rate_f32(sample_rate: u32) -> f32 {
    sample_rate as f32
}

#[allow(clippy::cast_precision_loss)]
fn index_secs(index: usize, rate: f32) -> f32 {
    index as f32 / rate
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_count(secs: f32, sample_rate: u32) -> usize {
    (secs * sample_rate_f32(sample_rate)).round() as usize
}

/// RBJ band-pass biquad (constant 0 dB peak gain), retuned every sample
#[derive(Debug, Default)]
struct BandPass {
    b0: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BandPass {
    fn tune(&mut self, centre: f32, q: f32, rate: f32) {
        let w0 = 2.0 * PI * centre / rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        self.b0 = alpha / a0;
        self.b2 = -alpha / a0;
        self.a1 = -2.0 * w0.cos() / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}
