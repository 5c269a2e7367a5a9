//! Particle morph engine.
//!
//! Particles spring toward a blend of a chain of target shapes
//! (sphere → photo → heart → proposal), staggered by a per-particle delay,
//! with float, bass push, pointer repulsion, curl swirl and shockwave
//! impulses layered on top.
//!
//! Targets that have not arrived yet hold a placeholder sphere. Real targets
//! are delivered whole through a [`TargetSender`] and swapped in at the start
//! of a frame, so a frame never reads a half-written buffer and particle
//! indices stay stable across swaps.

use crate::constants::*;
use crate::error::{ShapeError, TargetError};
use crate::noise::curl_noise;
use crate::shapes::{uniform_sphere, ShapeBuffer};
use crate::timeline::Shockwave;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Shapes that arrive after start-up. The initial sphere is slot 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MorphTarget {
    Photo,
    Heart,
    Proposal,
}

impl MorphTarget {
    pub const ALL: [MorphTarget; 3] = [MorphTarget::Photo, MorphTarget::Heart, MorphTarget::Proposal];

    /// Position in the morph chain; phase `k` rests on slot `k`.
    pub fn slot(self) -> usize {
        match self {
            MorphTarget::Photo => 1,
            MorphTarget::Heart => 2,
            MorphTarget::Proposal => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MorphTarget::Photo => "photo",
            MorphTarget::Heart => "heart",
            MorphTarget::Proposal => "proposal",
        }
    }
}

impl fmt::Display for MorphTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MorphTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MorphTarget::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| TargetError::UnknownTarget(s.to_string()))
    }
}

/// Force and motion tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphParams {
    pub delay_spread: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    pub curl_strength: f32,
    pub float_amplitude: f32,
    pub audio_push: f32,
    pub shockwave_impulse: f32,
    pub sphere_radius: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            delay_spread: DELAY_SPREAD,
            stiffness: SPRING_STIFFNESS,
            damping: VELOCITY_DAMPING,
            repulsion_radius: REPULSION_RADIUS,
            repulsion_strength: REPULSION_STRENGTH,
            curl_strength: CURL_STRENGTH,
            float_amplitude: FLOAT_AMPLITUDE,
            audio_push: AUDIO_PUSH,
            shockwave_impulse: SHOCKWAVE_IMPULSE,
            sphere_radius: SPHERE_RADIUS,
        }
    }
}

/// Parallel per-particle arrays, all of length N.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    pub color: Vec<Vec3>,
    pub size: Vec<f32>,
    pub phase: Vec<Vec3>,
    pub delay: Vec<f32>,
    pub life: Vec<f32>,
    pub brightness: Vec<f32>,
}

impl ParticleSet {
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Positions as interleaved `x, y, z` for upload.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.position)
    }

    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.color)
    }
}

/// Per-frame inputs read from the timeline, audio and camera.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MorphFrame {
    pub dt: f32,
    pub morph_phase: f32,
    pub energy: f32,
    /// World-space repulsion centre when pointer interaction is active.
    pub pointer: Option<Vec3>,
    pub shockwave: Option<Shockwave>,
    pub bass: f32,
    pub life_target: f32,
}

#[derive(Clone, Debug)]
struct TargetSlot {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    brightness: Vec<f32>,
    ready: bool,
}

type Delivery = (MorphTarget, ShapeBuffer);

/// Cloneable handle for delivering targets from loaders on any thread.
#[derive(Clone, Debug)]
pub struct TargetSender {
    tx: Sender<Delivery>,
}

impl TargetSender {
    pub fn send(&self, target: MorphTarget, shape: ShapeBuffer) -> Result<(), TargetError> {
        self.tx
            .send((target, shape))
            .map_err(|_| TargetError::Disconnected)
    }
}

pub struct MorphEngine {
    params: MorphParams,
    particles: ParticleSet,
    slots: Vec<TargetSlot>,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    time: f32,
}

impl MorphEngine {
    /// Build `count` particles laid out in the initial sphere. Every later
    /// target starts as its own placeholder sphere until delivered.
    pub fn new(count: usize, params: MorphParams, seed: u64) -> Self {
        // Independent streams per purpose, derived from the base seed
        let stream = |k: u64| StdRng::seed_from_u64(seed ^ k.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let mut rng = stream(1);
        let base = uniform_sphere(count, params.sphere_radius, &mut rng);
        let mut particles = ParticleSet {
            position: base.positions.clone(),
            velocity: vec![Vec3::ZERO; count],
            color: vec![Vec3::ONE; count],
            size: Vec::with_capacity(count),
            phase: Vec::with_capacity(count),
            delay: Vec::with_capacity(count),
            life: vec![LIFE_FULL; count],
            brightness: Vec::with_capacity(count),
        };
        for _ in 0..count {
            particles.size.push(rng.gen::<f32>() * SIZE_SPAN + SIZE_MIN);
            particles.delay.push(rng.gen::<f32>());
            particles
                .brightness
                .push(BRIGHTNESS_MIN + rng.gen::<f32>() * (1.0 - BRIGHTNESS_MIN));
            particles
                .phase
                .push(Vec3::new(rng.gen(), rng.gen(), rng.gen()));
        }

        let mut slots = Vec::with_capacity(MORPH_SEGMENTS + 1);
        slots.push(TargetSlot {
            positions: base.positions,
            colors: vec![Vec3::ONE; count],
            brightness: particles.brightness.clone(),
            ready: true,
        });
        for k in 0..MORPH_SEGMENTS as u64 {
            let mut rng = stream(2 + k);
            slots.push(TargetSlot {
                positions: uniform_sphere(count, params.sphere_radius, &mut rng).positions,
                colors: vec![Vec3::ONE; count],
                brightness: particles.brightness.clone(),
                ready: false,
            });
        }

        let (tx, rx) = channel();
        log::info!("morph engine: {count} particles");
        Self {
            params,
            particles,
            slots,
            tx,
            rx,
            time: 0.0,
        }
    }

    pub fn params(&self) -> &MorphParams {
        &self.params
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Seconds of simulated time.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_ready(&self, target: MorphTarget) -> bool {
        self.slots[target.slot()].ready
    }

    /// Current positions of a target slot (placeholder until delivered).
    pub fn target_positions(&self, target: MorphTarget) -> &[Vec3] {
        &self.slots[target.slot()].positions
    }

    pub fn target_sender(&self) -> TargetSender {
        TargetSender {
            tx: self.tx.clone(),
        }
    }

    /// Install a target right away (same-thread delivery).
    pub fn deliver(&mut self, target: MorphTarget, shape: ShapeBuffer) -> Result<(), ShapeError> {
        shape.validate(self.len())?;
        let fallback_brightness = &self.slots[0].brightness;
        let slot = TargetSlot {
            colors: shape.colors.unwrap_or_else(|| vec![Vec3::ONE; shape.positions.len()]),
            brightness: shape
                .brightness
                .unwrap_or_else(|| fallback_brightness.clone()),
            positions: shape.positions,
            ready: true,
        };
        self.slots[target.slot()] = slot;
        log::info!("morph target `{target}` ready ({} particles)", self.len());
        Ok(())
    }

    /// Swap in everything queued on the channel. Returns how many were installed.
    pub fn drain_deliveries(&mut self) -> usize {
        let mut installed = 0;
        while let Ok((target, shape)) = self.rx.try_recv() {
            match self.deliver(target, shape) {
                Ok(()) => installed += 1,
                Err(e) => log::warn!("rejected `{target}` delivery: {e}"),
            }
        }
        installed
    }

    /// Blended target position, colour and brightness for particle `i` at
    /// effective phase `phase`.
    pub(crate) fn blended_target(&self, i: usize, phase: f32) -> (Vec3, Vec3, f32) {
        let (lo, f) = segment_of(phase);
        let (a, b) = (&self.slots[lo], &self.slots[lo + 1]);
        (
            a.positions[i].lerp(b.positions[i], f),
            a.colors[i].lerp(b.colors[i], f),
            a.brightness[i] + (b.brightness[i] - a.brightness[i]) * f,
        )
    }

    /// Advance every particle by `frame.dt`, capped at [`MAX_FRAME_DT_SEC`].
    /// A zero or negative step is a no-op. Steps longer than 1/30 s are split
    /// to keep the spring stable.
    pub fn update(&mut self, frame: &MorphFrame) {
        if frame.dt.is_nan() || frame.dt <= 0.0 {
            return;
        }
        let dt = frame.dt.min(MAX_FRAME_DT_SEC);
        let steps = (dt / MAX_STABLE_DT_SEC).ceil().max(1.0) as usize;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.step(frame, h);
            self.time += h;
        }
    }

    fn step(&mut self, frame: &MorphFrame, h: f32) {
        let p = self.params;
        let damping = p.damping.powf(h / REFERENCE_FRAME_SEC);
        let life_rate = (h * LIFE_RATE_PER_SEC).min(1.0);
        let t = self.time;

        let shock = frame.shockwave.map(|s| {
            let decay = (1.0 - s.elapsed / SHOCKWAVE_DURATION_SEC).clamp(0.0, 1.0);
            (s.origin, p.shockwave_impulse * s.strength * decay)
        });

        for i in 0..self.particles.len() {
            let eff = effective_phase(
                frame.morph_phase,
                self.particles.delay[i],
                p.delay_spread,
            );
            let (mut target, color, brightness) = self.blended_target(i, eff);

            let ph = self.particles.phase[i];
            if frame.energy > 0.0 {
                let w = t * FLOAT_FREQUENCY;
                let drift = Vec3::new(
                    (w + ph.x * TAU).sin(),
                    (w * 0.8 + ph.y * TAU).cos(),
                    (w * 0.6 + ph.z * TAU).sin(),
                );
                target += drift * p.float_amplitude * frame.energy;
            }
            if frame.bass > 0.0 {
                target += target.normalize_or_zero() * frame.bass * p.audio_push * (0.5 + ph.x);
            }

            let pos = self.particles.position[i];
            let mut vel = self.particles.velocity[i];

            if let Some(pointer) = frame.pointer {
                vel += pointer_impulse(pos, pointer, t, &p) * h;
            }

            if let Some((origin, impulse)) = shock {
                vel += (pos - origin).normalize_or_zero() * impulse * h;
            }

            vel += (target - pos) * p.stiffness * h;
            vel *= damping;

            let ps = &mut self.particles;
            ps.velocity[i] = vel;
            ps.position[i] = pos + vel * h;
            ps.color[i] = color;
            ps.brightness[i] = brightness;
            ps.life[i] += (frame.life_target - ps.life[i]) * life_rate;
        }
    }
}

/// Velocity change per second that the pointer at `pointer` applies to a
/// particle at `pos`: inverse-square repulsion plus a curl-noise swirl, both
/// fading linearly to zero at `repulsion_radius`. Zero outside the radius or
/// inside [`REPULSION_MIN_DIST`].
pub fn pointer_impulse(pos: Vec3, pointer: Vec3, time: f32, p: &MorphParams) -> Vec3 {
    let d = pos - pointer;
    let dist = d.length();
    if !(dist < p.repulsion_radius && dist > REPULSION_MIN_DIST) {
        return Vec3::ZERO;
    }
    let fade = 1.0 - dist / p.repulsion_radius;
    let push = d / dist * (p.repulsion_strength / (dist * dist)) * REPULSION_IMPULSE_SCALE;

    let q = pos * CURL_SPATIAL_SCALE + Vec3::X * (time * CURL_TIME_SCALE);
    let swirl = curl_noise(q) * p.curl_strength;
    (push + swirl) * fade
}

/// Staggered phase for a particle with `delay` in \[0, 1\].
///
/// Within each segment `[k, k + 1]` the most delayed particle lags by
/// `spread`, and every particle still lands exactly on `k + 1` when the
/// global phase does, so holds between segments show finished shapes.
/// A flat `phase - delay * spread` offset would instead leave delayed
/// particles short of the target during those holds and at the final shape.
pub fn effective_phase(phase: f32, delay: f32, spread: f32) -> f32 {
    let max = MORPH_SEGMENTS as f32;
    if phase.is_nan() || phase <= 0.0 {
        return 0.0;
    }
    if phase >= max {
        return max;
    }
    let seg = phase.floor();
    let f = phase - seg;
    let local = (f * (1.0 + spread) - delay.clamp(0.0, 1.0) * spread).clamp(0.0, 1.0);
    seg + local
}

#[inline]
fn segment_of(phase: f32) -> (usize, f32) {
    let phase = phase.clamp(0.0, MORPH_SEGMENTS as f32);
    let lo = (phase.floor() as usize).min(MORPH_SEGMENTS - 1);
    (lo, phase - lo as f32)
}
