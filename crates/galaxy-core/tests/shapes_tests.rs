// Host-side tests for target shape generators and image sampling.

use galaxy_core::*;
use glam::Vec3;
use rand::prelude::*;

#[test]
fn sphere_stays_inside_its_radius() {
    let mut rng = StdRng::seed_from_u64(1);
    let s = uniform_sphere(2000, 50.0, &mut rng);
    assert_eq!(s.len(), 2000);
    assert!(s.positions.iter().all(|p| p.length() <= 50.0 + 1e-3));
    // Volume-uniform: about half the points sit outside 0.79 of the radius
    let outer = s.positions.iter().filter(|p| p.length() > 50.0 * 0.7937).count();
    assert!((800..1200).contains(&outer), "outer shell held {outer}");
}

#[test]
fn heart_has_every_channel_and_fits_its_bounds() {
    let mut rng = StdRng::seed_from_u64(2);
    let h = heart(1500, &mut rng);
    assert_eq!(h.len(), 1500);
    assert!(h.validate(1500).is_ok());
    assert_eq!(h.colors.as_ref().map(Vec::len), Some(1500));
    for p in &h.positions {
        assert!(p.x.abs() <= 3.1, "{p:?}");
        assert!((-1.3..=4.4).contains(&p.y), "{p:?}");
        assert!(p.z.abs() <= 0.8, "{p:?}");
    }
    let b = h.brightness.unwrap();
    assert!(b.iter().all(|v| (0.0..=1.1).contains(v)));
}

#[test]
fn heart_is_deterministic_per_seed() {
    let a = heart(200, &mut StdRng::seed_from_u64(5));
    let b = heart(200, &mut StdRng::seed_from_u64(5));
    assert_eq!(a, b);
}

#[test]
fn heart_area_weight_vanishes_on_the_centre_line() {
    assert_eq!(heart_area_weight(0.0), 0.0);
    assert!(heart_area_weight(std::f32::consts::FRAC_PI_2) > 0.0);
    for k in 0..100 {
        assert!(heart_area_weight(k as f32 * 0.0628) >= 0.0);
    }
}

fn sample(x: f32, brightness: f32) -> PointSample {
    PointSample {
        position: Vec3::new(x, 0.0, 0.0),
        color: Vec3::splat(brightness),
        brightness,
    }
}

#[test]
fn fitting_puts_brightest_samples_first() {
    let mut rng = StdRng::seed_from_u64(3);
    let samples = vec![sample(1.0, 0.2), sample(2.0, 0.9), sample(3.0, 0.5)];
    let s = fit_samples(samples, 5, FitParams::PHOTO, &mut rng);
    assert_eq!(s.len(), 5);
    assert!(s.validate(5).is_ok());

    let b = s.brightness.as_ref().unwrap();
    assert_eq!(&b[..3], &[0.9f32, 0.5, 0.2]);
    assert!((s.positions[0].x - 2.0).abs() <= 0.05);
    assert!((s.positions[2].x - 1.0).abs() <= 0.05);

    // Extra particles become dim dust on a ring
    for (p, v) in s.positions[3..].iter().zip(&b[3..]) {
        let r = p.truncate().length();
        assert!((20.0 - 1e-3..=50.0 + 1e-3).contains(&r));
        assert_eq!(*v, 0.05);
    }
}

#[test]
fn proposal_excess_fills_a_disk() {
    let mut rng = StdRng::seed_from_u64(4);
    let s = fit_samples(vec![sample(0.0, 1.0)], 50, FitParams::PROPOSAL, &mut rng);
    let b = s.brightness.unwrap();
    for (p, v) in s.positions[1..].iter().zip(&b[1..]) {
        assert!(p.truncate().length() <= 60.0 + 1e-3);
        assert_eq!(*v, 0.3);
    }
}

#[test]
fn fitting_truncates_surplus_samples() {
    let mut rng = StdRng::seed_from_u64(6);
    let samples = (0..20).map(|i| sample(i as f32, i as f32 / 20.0)).collect();
    let s = fit_samples(samples, 4, FitParams::PHOTO, &mut rng);
    assert_eq!(s.len(), 4);
    assert!((s.positions[0].x - 19.0).abs() <= 0.05);
}

#[test]
fn luminance_sampling_keeps_bright_pixels() {
    // 2x2: white, black / black, mid grey
    let rgba = [
        255, 255, 255, 255, 0, 0, 0, 255, //
        0, 0, 0, 255, 128, 128, 128, 255,
    ];
    let samples = sample_luminance(&rgba, 2, 2, 10.0, 4.0).unwrap();
    assert_eq!(samples.len(), 2);

    let white = samples[0];
    assert!((white.brightness - 1.0).abs() < 1e-3);
    assert!((white.position - Vec3::new(-5.0, 5.0, 2.0)).length() < 1e-3);

    let grey = samples[1];
    assert!((grey.brightness - 128.0 / 255.0).abs() < 1e-3);
    assert!((grey.position.x - 0.0).abs() < 1e-3);
    assert!((grey.position.y - 0.0).abs() < 1e-3);
}

#[test]
fn wide_images_keep_their_aspect() {
    let rgba = vec![255u8; 4 * 2 * 4];
    let samples = sample_luminance(&rgba, 4, 2, 8.0, 1.0).unwrap();
    let max_y = samples.iter().map(|s| s.position.y).fold(f32::MIN, f32::max);
    let min_x = samples.iter().map(|s| s.position.x).fold(f32::MAX, f32::min);
    assert!((min_x + 4.0).abs() < 1e-4);
    assert!((max_y - 2.0).abs() < 1e-4);
}

#[test]
fn wrong_pixel_buffer_size_is_an_error() {
    assert_eq!(
        sample_luminance(&[0; 12], 2, 2, 1.0, 1.0).unwrap_err(),
        ShapeError::PixelBufferSize {
            width: 2,
            height: 2,
            found: 12
        }
    );
    assert!(sample_luminance(&[], 0, 0, 1.0, 1.0).unwrap().is_empty());
}

#[test]
fn flat_buffers_must_hold_whole_points() {
    let ok = ShapeBuffer::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(ok.positions, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    assert_eq!(
        ShapeBuffer::from_flat(&[0.0; 7]).unwrap_err(),
        ShapeError::NotVec3Aligned(7)
    );

    let colored = ok.with_flat_colors(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
    assert_eq!(colored.colors.as_ref().unwrap()[1], Vec3::Y);
    assert!(colored.validate(2).is_ok());
    assert_eq!(
        colored.validate(3),
        Err(ShapeError::LengthMismatch {
            expected: 3,
            found: 2
        })
    );
}
