//! Band energies, dual-rate envelopes and beat onset detection from a
//! byte-valued frequency spectrum (e.g. `AnalyserNode::getByteFrequencyData`).
//!
//! Bands split the bins by index fraction: low is the first 10%, mid runs to
//! 50%, high covers the rest. Each band's raw energy is its mean bin value
//! divided by 255.

use crate::constants::*;

/// Band split and smoothing tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioParams {
    pub low_band_end: f32,
    pub mid_band_end: f32,
    pub fast_alpha: f32,
    pub slow_alpha: f32,
    pub beat_threshold: f32,
    pub beat_release_ratio: f32,
    pub beat_decay_per_sec: f32,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            low_band_end: LOW_BAND_END,
            mid_band_end: MID_BAND_END,
            fast_alpha: FAST_ENVELOPE_ALPHA,
            slow_alpha: SLOW_ENVELOPE_ALPHA,
            beat_threshold: BEAT_THRESHOLD,
            beat_release_ratio: BEAT_RELEASE_RATIO,
            beat_decay_per_sec: BEAT_DECAY_PER_SEC,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bands {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl Bands {
    #[inline]
    fn approach(&mut self, target: &Bands, alpha: f32) {
        self.low += (target.low - self.low) * alpha;
        self.mid += (target.mid - self.mid) * alpha;
        self.high += (target.high - self.high) * alpha;
    }
}

#[inline]
fn frame_alpha(alpha: f32, dt: f32) -> f32 {
    1.0 - (1.0 - alpha.clamp(0.0, 1.0)).powf(dt / REFERENCE_FRAME_SEC)
}

/// One frame of audio-reactive signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioEnvelope {
    pub raw: Bands,
    pub fast: Bands,
    pub slow: Bands,
    /// 1.0 on an onset, decaying exponentially toward 0.
    pub beat_phase: f32,
    /// True only on the frame an onset was detected.
    pub onset: bool,
}

impl AudioEnvelope {
    /// Weighted loudness of the fast envelopes.
    pub fn overall(&self) -> f32 {
        self.fast.low * 0.5 + self.fast.mid * 0.3 + self.fast.high * 0.2
    }

    /// How far the fast bass envelope sits above the slow one.
    pub fn punch(&self) -> f32 {
        (self.fast.low - self.slow.low).max(0.0)
    }
}

/// Stateful tracker; feed it one spectrum per frame.
#[derive(Clone, Debug, Default)]
pub struct AudioEnvelopeTracker {
    params: AudioParams,
    fast: Bands,
    slow: Bands,
    beat_locked: bool,
    beat_phase: f32,
    onsets: u64,
}

impl AudioEnvelopeTracker {
    pub fn new(params: AudioParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &AudioParams {
        &self.params
    }

    /// Total onsets detected since construction or the last [`reset`](Self::reset).
    pub fn onset_count(&self) -> u64 {
        self.onsets
    }

    pub fn reset(&mut self) {
        let params = self.params;
        *self = Self::new(params);
    }

    /// Split `bins` into raw band energies in \[0, 1\]. Empty input is silence.
    pub fn band_energies(&self, bins: &[u8]) -> Bands {
        let n = bins.len();
        if n == 0 {
            return Bands::default();
        }
        let low_end = ((n as f32 * self.params.low_band_end) as usize).min(n);
        let mid_end = ((n as f32 * self.params.mid_band_end) as usize).clamp(low_end, n);
        Bands {
            low: mean_normalized(&bins[..low_end]),
            mid: mean_normalized(&bins[low_end..mid_end]),
            high: mean_normalized(&bins[mid_end..]),
        }
    }

    /// Advance the envelopes with this frame's spectrum. The smoothing
    /// alphas are per 60 Hz frame and rescaled to `dt_sec`.
    pub fn update(&mut self, bins: &[u8], dt_sec: f32) -> AudioEnvelope {
        let dt = dt_sec.max(0.0);
        let raw = self.band_energies(bins);
        self.fast.approach(&raw, frame_alpha(self.params.fast_alpha, dt));
        self.slow.approach(&raw, frame_alpha(self.params.slow_alpha, dt));

        self.beat_phase *= (-dt * self.params.beat_decay_per_sec).exp();
        let onset = self.detect_beat(self.fast.low);
        if onset {
            self.beat_phase = 1.0;
            self.onsets += 1;
            log::debug!("beat onset #{} (fast low {:.3})", self.onsets, self.fast.low);
        }

        AudioEnvelope {
            raw,
            fast: self.fast,
            slow: self.slow,
            beat_phase: self.beat_phase,
            onset,
        }
    }

    /// No active source: clear the smoothing state and report silence.
    pub fn silence(&mut self) -> AudioEnvelope {
        self.fast = Bands::default();
        self.slow = Bands::default();
        self.beat_locked = false;
        self.beat_phase = 0.0;
        AudioEnvelope::default()
    }

    // Rising edge above the threshold while unlocked fires; the lock only
    // releases once the signal drops below threshold * release ratio.
    fn detect_beat(&mut self, fast_low: f32) -> bool {
        let threshold = self.params.beat_threshold;
        let mut fired = false;
        if fast_low > threshold && !self.beat_locked {
            self.beat_locked = true;
            fired = true;
        }
        if fast_low < threshold * self.params.beat_release_ratio {
            self.beat_locked = false;
        }
        fired
    }
}

#[inline]
fn mean_normalized(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / (bins.len() as f32 * 255.0)
}
