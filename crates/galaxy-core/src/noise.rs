//! Deterministic smooth noise and its curl.
//!
//! Lattice values come from an integer hash and are blended with a quintic
//! fade, so the field is C2-continuous. The curl is taken by central finite
//! differences of three decorrelated copies of that field, which makes it
//! divergence-free and continuous in space and time.

use crate::constants::CURL_EPS;
use glam::Vec3;

const POTENTIAL_Y_OFFSET: Vec3 = Vec3::new(31.416, 47.853, 12.793);
const POTENTIAL_Z_OFFSET: Vec3 = Vec3::new(-19.37, 83.11, -55.7);

#[inline]
fn lattice_hash(x: i32, y: i32, z: i32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ (z as u32).wrapping_mul(0xcb1a_b31f);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    h as f32 / u32::MAX as f32
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Value noise in \[0, 1\].
pub fn value_noise(p: Vec3) -> f32 {
    let base = p.floor();
    let f = p - base;
    let (ix, iy, iz) = (base.x as i32, base.y as i32, base.z as i32);
    let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

    let c = |dx: i32, dy: i32, dz: i32| lattice_hash(ix + dx, iy + dy, iz + dz);
    let x00 = c(0, 0, 0) + (c(1, 0, 0) - c(0, 0, 0)) * u;
    let x10 = c(0, 1, 0) + (c(1, 1, 0) - c(0, 1, 0)) * u;
    let x01 = c(0, 0, 1) + (c(1, 0, 1) - c(0, 0, 1)) * u;
    let x11 = c(0, 1, 1) + (c(1, 1, 1) - c(0, 1, 1)) * u;
    let y0 = x00 + (x10 - x00) * v;
    let y1 = x01 + (x11 - x01) * v;
    y0 + (y1 - y0) * w
}

#[inline]
fn potential(p: Vec3) -> Vec3 {
    Vec3::new(
        value_noise(p),
        value_noise(p + POTENTIAL_Y_OFFSET),
        value_noise(p + POTENTIAL_Z_OFFSET),
    )
}

/// Curl of the noise potential at `p`.
pub fn curl_noise(p: Vec3) -> Vec3 {
    let e = CURL_EPS;
    let inv = 1.0 / (2.0 * e);
    let dx = (potential(p + Vec3::X * e) - potential(p - Vec3::X * e)) * inv;
    let dy = (potential(p + Vec3::Y * e) - potential(p - Vec3::Y * e)) * inv;
    let dz = (potential(p + Vec3::Z * e) - potential(p - Vec3::Z * e)) * inv;
    Vec3::new(dy.z - dz.y, dz.x - dx.z, dx.y - dy.x)
}
