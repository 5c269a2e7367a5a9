//! Headless rehearsal of the whole timeline.
//!
//! Sweeps the scroll from top to bottom at a fixed 60 Hz, feeds a synthetic
//! kick-drum spectrum, and has a worker thread deliver the photo, heart and
//! proposal targets while the sweep is already running.
//!
//! Usage: `galaxy-native [particles] [seconds]`

use anyhow::Context;
use galaxy_core::{
    fit_samples, heart, sample_luminance, FitParams, MorphTarget, SceneEvent, ShapeBuffer,
    TargetSender, Universe, UniverseConfig,
};
use glam::Vec2;
use rand::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

const FRAME_SEC: f32 = 1.0 / 60.0;
const BIN_COUNT: usize = 128;
const KICK_PERIOD_SEC: f32 = 0.5;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let particles: usize = match args.next() {
        Some(a) => a.parse().context("particle count must be an integer")?,
        None => 20_000,
    };
    let seconds: f32 = match args.next() {
        Some(a) => a.parse().context("duration must be a number of seconds")?,
        None => 30.0,
    };

    let config = UniverseConfig {
        particle_count: particles,
        ..UniverseConfig::default()
    };
    let seed = config.seed;
    let mut universe = Universe::standard(config)?;
    universe.toggle_audio_enabled();

    let loader = spawn_loader(universe.target_sender(), particles, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let frames = (seconds / FRAME_SEC).ceil() as usize;
    let mut entered: Vec<SceneEvent> = Vec::new();
    let mut onsets = 0usize;
    let mut installed = 0usize;
    let mut bins = vec![0u8; BIN_COUNT];
    let started = Instant::now();

    for f in 0..frames {
        let t = f as f32 * FRAME_SEC;
        let x = (t / seconds).clamp(0.0, 1.0);
        let scroll = x * x * (3.0 - 2.0 * x);
        universe.set_scroll_progress(scroll, FRAME_SEC);

        // Lazy figure-eight with the pointer so chaos has something to push against
        let ndc = Vec2::new((t * 0.7).sin() * 0.6, (t * 1.4).sin() * 0.3);
        universe.set_pointer_position(ndc);

        synth_spectrum(&mut bins, t, &mut rng);
        let out = universe.frame(FRAME_SEC, Some(&bins));
        entered.extend(out.events.iter().copied());
        installed += out.targets_installed;
        if out.audio.onset {
            onsets += 1;
        }
        if f % 300 == 0 {
            log::info!(
                "t={t:5.1}s scroll={scroll:.3} scene={} morph={:.2} bloom={:.3} depth={:.1}",
                universe.current_scene().name,
                out.state.morph_phase,
                out.params.bloom,
                out.camera.eye.z
            );
        }
    }

    loader
        .join()
        .map_err(|_| anyhow::anyhow!("target loader panicked"))??;

    let engine = universe.engine();
    let proposal = engine.target_positions(MorphTarget::Proposal);
    let mean_err = engine
        .particles()
        .position
        .iter()
        .zip(proposal)
        .map(|(p, q)| p.distance(*q))
        .sum::<f32>()
        / particles.max(1) as f32;

    log::info!(
        "done: {} scene entries {:?}, {onsets} beat onsets, {installed} targets installed",
        entered.len(),
        entered.iter().map(|e| e.name()).collect::<Vec<_>>()
    );
    log::info!("mean distance to proposal silhouette: {mean_err:.3}");
    let wall = started.elapsed().as_secs_f32();
    log::info!(
        "{frames} frames in {wall:.2}s ({:.0} frames/s)",
        frames as f32 / wall.max(1e-6)
    );
    Ok(())
}

/// Builds the three targets off-thread, staggered the way real loads would be.
fn spawn_loader(
    sender: TargetSender,
    count: usize,
    seed: u64,
) -> thread::JoinHandle<anyhow::Result<()>> {
    thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(seed ^ 0xA5A5);

        let (w, h) = (160, 120);
        let photo = sample_luminance(&portrait_pixels(w, h), w, h, 30.0, 12.0)?;
        sender.send(
            MorphTarget::Photo,
            fit_samples(photo, count, FitParams::PHOTO, &mut rng),
        )?;

        thread::sleep(Duration::from_millis(20));
        sender.send(MorphTarget::Heart, heart(count, &mut rng))?;

        let (w, h) = (256, 256);
        let ring = sample_luminance(&ring_pixels(w, h), w, h, 35.0, 3.0)?;
        let proposal = fit_samples(ring, count, FitParams::PROPOSAL, &mut rng);
        sender.send(
            MorphTarget::Proposal,
            ShapeBuffer::from_positions(proposal.positions),
        )?;
        log::info!("loader: all targets sent");
        Ok(())
    })
}

/// Soft radial blob, brightest in the middle.
fn portrait_pixels(w: usize, h: usize) -> Vec<u8> {
    let mut px = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        for x in 0..w {
            let dx = (x as f32 / w as f32 - 0.5) * 2.0;
            let dy = (y as f32 / h as f32 - 0.5) * 2.0;
            let v = (1.0 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            let b = (v * 255.0) as u8;
            px.extend_from_slice(&[b, (b as f32 * 0.8) as u8, (b as f32 * 0.9) as u8, 255]);
        }
    }
    px
}

/// A ring with a small stone on top.
fn ring_pixels(w: usize, h: usize) -> Vec<u8> {
    let mut px = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 / w as f32 - 0.5;
            let dy = y as f32 / h as f32 - 0.55;
            let r = (dx * dx + dy * dy).sqrt();
            let band = (0.18..0.22).contains(&r);
            let stone = (dx * dx + (dy + 0.24) * (dy + 0.24)).sqrt() < 0.05;
            let b = if band || stone { 255 } else { 0 };
            px.extend_from_slice(&[b, b, b, 255]);
        }
    }
    px
}

/// Kick on every half second in the low bins, a little hiss elsewhere.
fn synth_spectrum(bins: &mut [u8], t: f32, rng: &mut StdRng) {
    let since_kick = t % KICK_PERIOD_SEC;
    let kick = (-since_kick * 12.0).exp();
    let low_end = bins.len() / 10;
    for (i, b) in bins.iter_mut().enumerate() {
        let v = if i < low_end {
            230.0 * kick + rng.gen::<f32>() * 10.0
        } else {
            40.0 * kick + rng.gen::<f32>() * 25.0
        };
        *b = v.clamp(0.0, 255.0) as u8;
    }
}
