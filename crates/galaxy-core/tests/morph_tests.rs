// Host-side tests for the particle morph engine and the curl noise field.

use galaxy_core::constants::{
    DELAY_SPREAD, LIFE_VOID, MAX_FRAME_DT_SEC, REPULSION_MIN_DIST, SPHERE_RADIUS,
};
use galaxy_core::noise::{curl_noise, value_noise};
use galaxy_core::*;
use glam::Vec3;
use rand::prelude::*;

const N: usize = 64;
const DT: f32 = 1.0 / 60.0;

fn engine() -> MorphEngine {
    MorphEngine::new(N, MorphParams::default(), 42)
}

fn still(morph_phase: f32) -> MorphFrame {
    MorphFrame {
        dt: DT,
        morph_phase,
        energy: 0.0,
        pointer: None,
        shockwave: None,
        bass: 0.0,
        life_target: 1.0,
    }
}

fn max_distance(a: &[Vec3], b: &[Vec3]) -> f32 {
    a.iter().zip(b).map(|(p, q)| p.distance(*q)).fold(0.0, f32::max)
}

#[test]
fn zero_delta_leaves_positions_unchanged() {
    let mut e = engine();
    for _ in 0..30 {
        e.update(&still(1.3));
    }
    let before = e.particles().position.clone();
    let velocity = e.particles().velocity.clone();
    for dt in [0.0, -0.5, f32::NAN] {
        e.update(&MorphFrame { dt, ..still(1.3) });
    }
    assert_eq!(e.particles().position, before);
    assert_eq!(e.particles().velocity, velocity);
}

#[test]
fn spring_converges_to_a_fixed_target() {
    let mut e = engine();
    let target = e.target_positions(MorphTarget::Photo).to_vec();
    let initial = max_distance(&e.particles().position, &target);
    assert!(initial > 1.0);

    for frame in 0..10_000 {
        e.update(&still(1.0));
        if frame == 1000 {
            assert!(max_distance(&e.particles().position, &target) < initial);
        }
    }
    assert!(max_distance(&e.particles().position, &target) < 1e-3);
    assert!(e.particles().velocity.iter().all(|v| v.length() < 1e-3));
}

#[test]
fn long_frames_stay_stable() {
    let mut e = engine();
    let target = e.target_positions(MorphTarget::Heart).to_vec();
    for _ in 0..3000 {
        e.update(&MorphFrame {
            dt: 0.25,
            ..still(2.0)
        });
    }
    assert!(max_distance(&e.particles().position, &target) < 1e-3);
}

#[test]
fn huge_frames_are_truncated() {
    let mut e = engine();
    e.update(&MorphFrame {
        dt: 600.0,
        ..still(1.0)
    });
    assert!((e.time() - MAX_FRAME_DT_SEC).abs() < 1e-5, "time {}", e.time());

    let mut capped = engine();
    capped.update(&MorphFrame {
        dt: MAX_FRAME_DT_SEC,
        ..still(1.0)
    });
    assert_eq!(e.particles().position, capped.particles().position);
}

#[test]
fn effective_phase_is_bounded_and_lands_on_segments() {
    for k in 0..=40 {
        let phase = -1.0 + k as f32 * 0.125;
        for d in 0..=10 {
            let delay = d as f32 / 10.0;
            let eff = effective_phase(phase, delay, DELAY_SPREAD);
            assert!((0.0..=3.0).contains(&eff), "phase {phase} delay {delay} -> {eff}");
        }
    }
    for seg in 0..=3 {
        for d in 0..=10 {
            let eff = effective_phase(seg as f32, d as f32 / 10.0, DELAY_SPREAD);
            assert_eq!(eff, seg as f32);
        }
    }
    assert_eq!(effective_phase(f32::NAN, 0.5, DELAY_SPREAD), 0.0);
}

#[test]
fn delayed_particles_lag_behind() {
    let early = effective_phase(1.4, 0.0, DELAY_SPREAD);
    let late = effective_phase(1.4, 1.0, DELAY_SPREAD);
    assert!(early > late);
    assert!((early - 1.6).abs() < 1e-5);
    assert!((late - 1.1).abs() < 1e-5);
}

#[test]
fn placeholders_fill_every_target_until_delivery() {
    let e = engine();
    for t in MorphTarget::ALL {
        assert!(!e.is_ready(t));
        let positions = e.target_positions(t);
        assert_eq!(positions.len(), N);
        assert!(positions.iter().all(|p| p.length() <= SPHERE_RADIUS + 1e-3));
    }
    // Each placeholder is its own sphere
    assert_ne!(
        e.target_positions(MorphTarget::Photo),
        e.target_positions(MorphTarget::Heart)
    );
}

#[test]
fn same_seed_same_particles() {
    let (a, b) = (engine(), engine());
    assert_eq!(a.particles().position, b.particles().position);
    assert_eq!(a.particles().delay, b.particles().delay);
    let c = MorphEngine::new(N, MorphParams::default(), 43);
    assert_ne!(a.particles().position, c.particles().position);
}

#[test]
fn delivery_swaps_without_teleporting() {
    let mut e = engine();
    for _ in 0..60 {
        e.update(&still(1.0));
    }
    let sender = e.target_sender();
    let shape = ShapeBuffer::from_positions(vec![Vec3::new(5.0, 0.0, 0.0); N])
        .with_colors(vec![Vec3::new(1.0, 0.0, 0.0); N]);
    sender.send(MorphTarget::Photo, shape).unwrap();
    assert!(!e.is_ready(MorphTarget::Photo));

    let before = e.particles().position.clone();
    assert_eq!(e.drain_deliveries(), 1);
    assert!(e.is_ready(MorphTarget::Photo));
    assert_eq!(e.particles().position, before);
    assert!(e
        .target_positions(MorphTarget::Photo)
        .iter()
        .all(|p| *p == Vec3::new(5.0, 0.0, 0.0)));

    for _ in 0..3000 {
        e.update(&still(1.0));
    }
    let p = &e.particles();
    assert!(p.position.iter().all(|q| q.distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-2));
    assert!(p.color.iter().all(|c| *c == Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn mismatched_delivery_is_rejected() {
    let mut e = engine();
    let wrong = ShapeBuffer::from_positions(vec![Vec3::ZERO; N + 1]);
    assert_eq!(
        e.deliver(MorphTarget::Heart, wrong.clone()),
        Err(ShapeError::LengthMismatch {
            expected: N,
            found: N + 1
        })
    );

    e.target_sender().send(MorphTarget::Heart, wrong).unwrap();
    assert_eq!(e.drain_deliveries(), 0);
    assert!(!e.is_ready(MorphTarget::Heart));

    let bad_colors = ShapeBuffer::from_positions(vec![Vec3::ZERO; N]).with_brightness(vec![1.0; 3]);
    assert!(e.deliver(MorphTarget::Heart, bad_colors).is_err());
}

#[test]
fn sending_to_a_dropped_engine_fails() {
    let sender = engine().target_sender();
    let err = sender
        .send(MorphTarget::Proposal, ShapeBuffer::default())
        .unwrap_err();
    assert_eq!(err, TargetError::Disconnected);
}

#[test]
fn target_names_parse() {
    assert_eq!("heart".parse::<MorphTarget>(), Ok(MorphTarget::Heart));
    assert_eq!(
        "cat".parse::<MorphTarget>(),
        Err(TargetError::UnknownTarget("cat".into()))
    );
    assert_eq!(MorphTarget::Proposal.slot(), 3);
}

#[test]
fn pointer_pushes_nearby_particles_away() {
    let mut e = MorphEngine::new(1, MorphParams::default(), 9);
    let start = e.particles().position[0];
    let pointer = start + Vec3::new(0.5, 0.0, 0.0);
    e.update(&MorphFrame {
        pointer: Some(pointer),
        ..still(0.0)
    });
    let moved = e.particles().position[0] - start;
    assert!(moved.x < 0.0, "moved {moved:?}");

    // Without a pointer a resting particle stays put
    let mut calm = MorphEngine::new(1, MorphParams::default(), 9);
    calm.update(&still(0.0));
    assert_eq!(calm.particles().position[0], start);
}

#[test]
fn pointer_impulse_fades_out_at_the_radius() {
    let params = MorphParams::default();
    let r = params.repulsion_radius;
    let pointer = Vec3::new(3.0, -2.0, 1.0);
    let at = |dist: f32| pointer_impulse(pointer + Vec3::X * dist, pointer, 0.7, &params).length();

    assert!(at(r * 0.5) > 0.0);
    let edge = at(r * (1.0 - 1e-6));
    assert!(edge.is_finite() && edge < 1e-2, "impulse {edge} just inside the radius");
    assert_eq!(at(r), 0.0);
    assert_eq!(at(r * 2.0), 0.0);
    assert_eq!(at(REPULSION_MIN_DIST * 0.5), 0.0);
}

#[test]
fn shockwave_pushes_outward() {
    let mut e = engine();
    let mean_radius =
        |e: &MorphEngine| e.particles().position.iter().map(|p| p.length()).sum::<f32>() / N as f32;
    let before = mean_radius(&e);
    e.update(&MorphFrame {
        shockwave: Some(Shockwave {
            origin: Vec3::ZERO,
            elapsed: 0.0,
            strength: 1.0,
        }),
        ..still(0.0)
    });
    assert!(mean_radius(&e) > before);

    // A fully elapsed wave has no effect
    let mut spent = engine();
    spent.update(&MorphFrame {
        shockwave: Some(Shockwave {
            origin: Vec3::ZERO,
            elapsed: 2.0,
            strength: 1.0,
        }),
        ..still(0.0)
    });
    assert_eq!(spent.particles().position, engine().particles().position);
}

#[test]
fn life_eases_toward_its_target() {
    let mut e = engine();
    for _ in 0..300 {
        e.update(&MorphFrame {
            life_target: LIFE_VOID,
            ..still(0.0)
        });
    }
    assert!(e.particles().life.iter().all(|l| (l - LIFE_VOID).abs() < 1e-3));
}

#[test]
fn flat_views_match_particle_arrays() {
    let e = engine();
    let flat = e.particles().positions_flat();
    assert_eq!(flat.len(), N * 3);
    let p = e.particles().position[1];
    assert_eq!(&flat[3..6], &p.to_array());
    assert_eq!(e.particles().colors_flat().len(), N * 3);
}

#[test]
fn value_noise_is_deterministic_and_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let p = Vec3::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        );
        let n = value_noise(p);
        assert!((-1e-6..=1.0 + 1e-6).contains(&n));
        assert_eq!(n, value_noise(p));
    }
}

#[test]
fn curl_noise_is_continuous() {
    let mut rng = StdRng::seed_from_u64(4);
    let step = Vec3::splat(1e-3);
    let mut varied = false;
    let first = curl_noise(Vec3::new(0.3, 0.7, 0.1));
    for _ in 0..200 {
        let p = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let (a, b) = (curl_noise(p), curl_noise(p + step));
        assert!(a.is_finite());
        assert!(a.distance(b) < 0.2, "jump at {p:?}: {a:?} -> {b:?}");
        varied |= a.distance(first) > 0.1;
    }
    assert!(varied);
}
