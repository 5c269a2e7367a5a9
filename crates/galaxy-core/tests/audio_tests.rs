// Host-side tests for band splitting, envelopes and beat detection.

use galaxy_core::constants::{
    BEAT_THRESHOLD, FAST_ENVELOPE_ALPHA, LOW_BAND_END, SLOW_ENVELOPE_ALPHA,
};
use galaxy_core::*;
use rand::prelude::*;

const BINS: usize = 64;
const DT: f32 = 1.0 / 60.0;

/// Spectrum with the low band at `level` (0..1) and everything else silent.
fn bass(level: f32) -> Vec<u8> {
    let mut bins = vec![0u8; BINS];
    let low_end = (BINS as f32 * LOW_BAND_END) as usize;
    for b in &mut bins[..low_end] {
        *b = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    bins
}

#[test]
fn bands_split_by_index_fraction() {
    let tracker = AudioEnvelopeTracker::new(AudioParams::default());
    let mut bins = vec![0u8; 100];
    bins[..10].fill(255);
    bins[10..50].fill(51);
    let b = tracker.band_energies(&bins);
    assert!((b.low - 1.0).abs() < 1e-6);
    assert!((b.mid - 0.2).abs() < 1e-6);
    assert_eq!(b.high, 0.0);
}

#[test]
fn empty_spectrum_is_silence() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    assert_eq!(tracker.band_energies(&[]), Bands::default());
    let env = tracker.update(&[], DT);
    assert_eq!(env.fast, Bands::default());
    assert!(!env.onset);
}

#[test]
fn silence_clears_everything() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    for _ in 0..30 {
        tracker.update(&bass(1.0), DT);
    }
    assert_eq!(tracker.silence(), AudioEnvelope::default());
    // Smoothing restarts from zero afterwards
    let env = tracker.update(&bass(1.0), DT);
    assert!((env.fast.low - FAST_ENVELOPE_ALPHA).abs() < 1e-3);
}

#[test]
fn fast_envelope_leads_slow() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    let mut env = AudioEnvelope::default();
    for _ in 0..10 {
        env = tracker.update(&bass(1.0), DT);
    }
    assert!(env.fast.low > 0.85);
    assert!(env.slow.low < 0.45);
    assert!(env.punch() > 0.4);
    assert!(env.overall() > 0.0);
}

#[test]
fn envelopes_follow_wall_time_not_frame_rate() {
    let run = |hz: u32| {
        let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
        let mut env = AudioEnvelope::default();
        // Half a second of full-scale bass
        for _ in 0..hz / 2 {
            env = tracker.update(&bass(1.0), 1.0 / hz as f32);
        }
        env
    };
    let (at60, at144) = (run(60), run(144));
    assert!((at60.fast.low - at144.fast.low).abs() < 1e-3);
    assert!(
        (at60.slow.low - at144.slow.low).abs() < 1e-3,
        "{} vs {}",
        at60.slow.low,
        at144.slow.low
    );
    let expected = 1.0 - (1.0 - SLOW_ENVELOPE_ALPHA).powi(30);
    assert!((at60.slow.low - expected).abs() < 1e-3);
}

#[test]
fn one_onset_per_crossing_cycle_despite_noise() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    let mut rng = StdRng::seed_from_u64(7);
    let cycles = 12;
    for cycle in 0..cycles {
        let mut onsets = 0;
        // Hit, then hover around the threshold, then fall silent
        for _ in 0..20 {
            let v = 0.8 + rng.gen_range(-0.05..0.05);
            onsets += tracker.update(&bass(v), DT).onset as u32;
        }
        for _ in 0..40 {
            let v = BEAT_THRESHOLD + rng.gen_range(-0.08..0.08);
            onsets += tracker.update(&bass(v), DT).onset as u32;
        }
        for _ in 0..40 {
            let v = rng.gen_range(0.0..0.04);
            onsets += tracker.update(&bass(v), DT).onset as u32;
        }
        assert_eq!(onsets, 1, "cycle {cycle}");
    }
    assert_eq!(tracker.onset_count(), cycles);
}

#[test]
fn beat_phase_resets_then_decays() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    let mut env = AudioEnvelope::default();
    while !env.onset {
        env = tracker.update(&bass(1.0), DT);
    }
    assert_eq!(env.beat_phase, 1.0);

    let next = tracker.update(&bass(1.0), 0.1);
    assert!(!next.onset);
    assert!((next.beat_phase - (-0.5f32).exp()).abs() < 1e-5);

    let later = tracker.update(&bass(1.0), 1.0);
    assert!(later.beat_phase < next.beat_phase);
}

#[test]
fn reset_forgets_state() {
    let mut tracker = AudioEnvelopeTracker::new(AudioParams::default());
    for _ in 0..20 {
        tracker.update(&bass(1.0), DT);
    }
    assert!(tracker.onset_count() > 0);
    tracker.reset();
    assert_eq!(tracker.onset_count(), 0);
    assert_eq!(tracker.params(), &AudioParams::default());
}
