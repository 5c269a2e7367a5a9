//! Point-cloud producers for morph targets.
//!
//! Generators take an explicit RNG so layouts are reproducible. Image
//! decoding is not done here; [`sample_luminance`] works on pixels that have
//! already been decoded to RGBA8.

use crate::error::ShapeError;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// A fully built target: one position per particle plus optional colour and
/// brightness channels of the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeBuffer {
    pub positions: Vec<Vec3>,
    pub colors: Option<Vec<Vec3>>,
    pub brightness: Option<Vec<f32>>,
}

impl ShapeBuffer {
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            colors: None,
            brightness: None,
        }
    }

    /// Build from an interleaved `x, y, z, x, y, z, ...` buffer.
    pub fn from_flat(flat: &[f32]) -> Result<Self, ShapeError> {
        let positions: &[Vec3] =
            bytemuck::try_cast_slice(flat).map_err(|_| ShapeError::NotVec3Aligned(flat.len()))?;
        Ok(Self::from_positions(positions.to_vec()))
    }

    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_flat_colors(self, flat: &[f32]) -> Result<Self, ShapeError> {
        let colors: &[Vec3] =
            bytemuck::try_cast_slice(flat).map_err(|_| ShapeError::NotVec3Aligned(flat.len()))?;
        Ok(self.with_colors(colors.to_vec()))
    }

    pub fn with_brightness(mut self, brightness: Vec<f32>) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that every channel holds exactly `expected` entries.
    pub fn validate(&self, expected: usize) -> Result<(), ShapeError> {
        let lens = [
            Some(self.positions.len()),
            self.colors.as_ref().map(Vec::len),
            self.brightness.as_ref().map(Vec::len),
        ];
        match lens.into_iter().flatten().find(|&n| n != expected) {
            Some(found) => Err(ShapeError::LengthMismatch { expected, found }),
            None => Ok(()),
        }
    }
}

/// Volume-uniform ball of `radius` centred on the origin.
pub fn uniform_sphere<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> ShapeBuffer {
    let positions = (0..count)
        .map(|_| {
            let theta = rng.gen::<f32>() * TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let r = rng.gen::<f32>().cbrt() * radius;
            Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            )
        })
        .collect();
    ShapeBuffer::from_positions(positions)
}

const HEART_SCALE: f32 = 0.18;
const HEART_Y_OFFSET: f32 = 2.0;
const HEART_DEPTH: f32 = 0.8;
const HEART_JITTER: f32 = 0.3;
const HEART_PROFILE_SAMPLES: usize = 512;

#[inline]
fn heart_curve(u: f32) -> (f32, f32) {
    let x = 16.0 * u.sin().powi(3);
    let y = 13.0 * u.cos() - 5.0 * (2.0 * u).cos() - 2.0 * (3.0 * u).cos() - (4.0 * u).cos();
    (x, y)
}

/// Surface-area weight of the heart parameterisation along `u`, i.e. the
/// area element `|dP/du x dP/dv|` divided by `|cos v|`.
///
/// The surface is `P(u, v) = (x(u), y(u), sin v * w(u))` with
/// `w(u) = 0.8 * sqrt(|x(u)|)`, so the area element is
/// `|cos v| * w(u) * |c'(u)|` where `c(u) = (x(u), y(u))`.
pub fn heart_area_weight(u: f32) -> f32 {
    let (s, c) = u.sin_cos();
    let (x, _) = heart_curve(u);
    let dx = 48.0 * s * s * c;
    let dy = -13.0 * s + 10.0 * (2.0 * u).sin() + 6.0 * (3.0 * u).sin() + 4.0 * (4.0 * u).sin();
    HEART_DEPTH * x.abs().sqrt() * (dx * dx + dy * dy).sqrt()
}

/// Heart surface with uniform area density.
///
/// `(u, v)` are drawn uniformly and accepted with probability proportional to
/// the area element, which cancels the parameterisation's uneven stretch.
pub fn heart<R: Rng + ?Sized>(count: usize, rng: &mut R) -> ShapeBuffer {
    // Tabulated maximum plus headroom for peaks between samples.
    let max_weight = (0..HEART_PROFILE_SAMPLES)
        .map(|i| heart_area_weight(i as f32 / HEART_PROFILE_SAMPLES as f32 * TAU))
        .fold(0.0f32, f32::max)
        * 1.05;

    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    let mut brightness = Vec::with_capacity(count);

    while positions.len() < count {
        let u = rng.gen::<f32>() * TAU;
        let v = rng.gen::<f32>() * TAU;
        let accept = (v.cos().abs() * heart_area_weight(u) / max_weight).min(1.0);
        if rng.gen::<f32>() >= accept {
            continue;
        }

        let (x, y) = heart_curve(u);
        let z = v.sin() * x.abs().sqrt() * HEART_DEPTH;
        let mut jitter = || (rng.gen::<f32>() - 0.5) * HEART_JITTER;
        positions.push(Vec3::new(
            x * HEART_SCALE + jitter(),
            y * HEART_SCALE + HEART_Y_OFFSET + jitter(),
            z * HEART_SCALE + jitter(),
        ));

        // #ff758c at the tip toward #ff7eb3 at the lobes
        let t = (y * HEART_SCALE + 4.0) / 8.0;
        colors.push(Vec3::new(1.0, 0.46 + t * 0.03, 0.55 + t * 0.15));
        brightness.push(0.5 + t * 0.5);
    }

    ShapeBuffer {
        positions,
        colors: Some(colors),
        brightness: Some(brightness),
    }
}

/// A bright point picked out of an image or drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSample {
    pub position: Vec3,
    pub color: Vec3,
    pub brightness: f32,
}

/// Where particles go when there are fewer samples than particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Excess {
    /// Dim dust on a ring 20..50 units out.
    Dust,
    /// Uniform disk of radius 60 with some depth.
    Disk,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParams {
    pub jitter_xy: f32,
    pub jitter_z: f32,
    pub excess: Excess,
}

impl FitParams {
    pub const PHOTO: FitParams = FitParams {
        jitter_xy: 0.1,
        jitter_z: 0.3,
        excess: Excess::Dust,
    };
    pub const PROPOSAL: FitParams = FitParams {
        jitter_xy: 0.12,
        jitter_z: 0.5,
        excess: Excess::Disk,
    };
}

/// Fill a `count`-particle target from `samples`, brightest first, so that
/// low particle indices land on the most prominent pixels.
pub fn fit_samples<R: Rng + ?Sized>(
    mut samples: Vec<PointSample>,
    count: usize,
    params: FitParams,
    rng: &mut R,
) -> ShapeBuffer {
    samples.sort_by(|a, b| b.brightness.total_cmp(&a.brightness));

    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    let mut brightness = Vec::with_capacity(count);

    for i in 0..count {
        match samples.get(i) {
            Some(s) => {
                let j = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * params.jitter_xy,
                    (rng.gen::<f32>() - 0.5) * params.jitter_xy,
                    (rng.gen::<f32>() - 0.5) * params.jitter_z,
                );
                positions.push(s.position + j);
                colors.push(s.color);
                brightness.push(s.brightness);
            }
            None => {
                let angle = rng.gen::<f32>() * TAU;
                match params.excess {
                    Excess::Dust => {
                        let radius = 20.0 + rng.gen::<f32>() * 30.0;
                        positions.push(Vec3::new(
                            angle.cos() * radius,
                            angle.sin() * radius,
                            (rng.gen::<f32>() - 0.5) * 20.0,
                        ));
                        colors.push(Vec3::new(0.5, 0.4, 0.6));
                        brightness.push(0.05);
                    }
                    Excess::Disk => {
                        let radius = rng.gen::<f32>().sqrt() * 60.0;
                        positions.push(Vec3::new(
                            angle.cos() * radius,
                            angle.sin() * radius,
                            (rng.gen::<f32>() - 0.5) * 25.0,
                        ));
                        colors.push(Vec3::ONE);
                        brightness.push(0.3);
                    }
                }
            }
        }
    }

    ShapeBuffer {
        positions,
        colors: Some(colors),
        brightness: Some(brightness),
    }
}

/// Luminance threshold below which a pixel is treated as background.
pub const LUMINANCE_THRESHOLD: f32 = 0.08;

/// Turn decoded RGBA8 pixels into world-space samples.
///
/// The larger image side maps to `spread` world units; `depth` scales how
/// far bright pixels pop toward the camera.
pub fn sample_luminance(
    rgba: &[u8],
    width: usize,
    height: usize,
    spread: f32,
    depth: f32,
) -> Result<Vec<PointSample>, ShapeError> {
    if rgba.len() != width * height * 4 {
        return Err(ShapeError::PixelBufferSize {
            width,
            height,
            found: rgba.len(),
        });
    }
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let aspect = width as f32 / height as f32;
    let (spread_x, spread_y) = if aspect >= 1.0 {
        (spread, spread / aspect)
    } else {
        (spread * aspect, spread)
    };

    let samples = rgba
        .chunks_exact(4)
        .enumerate()
        .filter_map(|(i, px)| {
            let color = Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0;
            let lum = (color.x * 0.299 + color.y * 0.587 + color.z * 0.114).clamp(0.0, 1.0);
            (lum > LUMINANCE_THRESHOLD).then(|| {
                let (x, y) = (i % width, i / width);
                PointSample {
                    position: Vec3::new(
                        (x as f32 / width as f32 - 0.5) * spread_x,
                        -(y as f32 / height as f32 - 0.5) * spread_y,
                        (lum - 0.5) * depth,
                    ),
                    color,
                    brightness: lum,
                }
            })
        })
        .collect();
    Ok(samples)
}
