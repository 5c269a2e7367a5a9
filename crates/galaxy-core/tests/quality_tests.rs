// Host-side tests for device budgets and adaptive pixel ratio.

use galaxy_core::constants::PIXEL_RATIO_MIN;
use galaxy_core::*;

fn desktop(gpu: GpuClass) -> DeviceProfile {
    DeviceProfile {
        gpu,
        ..DeviceProfile::default()
    }
}

#[test]
fn particle_budget_follows_the_device() {
    let phone = |memory_gb| DeviceProfile {
        mobile: true,
        memory_gb,
        ..DeviceProfile::default()
    };
    assert_eq!(phone(8.0).particle_count(), 40_000);
    assert_eq!(phone(4.0).particle_count(), 25_000);
    assert_eq!(desktop(GpuClass::High).particle_count(), 150_000);
    assert_eq!(desktop(GpuClass::Low).particle_count(), 30_000);
    assert_eq!(desktop(GpuClass::Unknown).particle_count(), 80_000);
}

#[test]
fn renderer_strings_classify() {
    let cases = [
        ("ANGLE (NVIDIA, NVIDIA GeForce RTX 3080 Direct3D11 vs_5_0 ps_5_0)", GpuClass::High),
        ("AMD Radeon RX 6800 XT", GpuClass::High),
        ("Apple M1 Pro", GpuClass::High),
        ("Apple A15 GPU", GpuClass::High),
        ("ANGLE (Intel, Intel(R) UHD Graphics 620 Direct3D11)", GpuClass::Low),
        ("Mali-G78 MP14", GpuClass::Low),
        ("Adreno 506", GpuClass::Low),
        ("SwiftShader", GpuClass::Unknown),
        ("", GpuClass::Unknown),
    ];
    for (renderer, expected) in cases {
        assert_eq!(GpuClass::from_renderer_string(renderer), expected, "{renderer}");
    }
}

#[test]
fn tiers_from_pixel_ratio() {
    assert_eq!(QualityTier::from_pixel_ratio(0.75), QualityTier::Low);
    assert_eq!(QualityTier::from_pixel_ratio(1.25), QualityTier::Medium);
    assert_eq!(QualityTier::from_pixel_ratio(2.0), QualityTier::High);
    assert_eq!(QualityTier::default(), QualityTier::High);
}

#[test]
fn smooth_frames_change_nothing() {
    let mut q = AdaptiveQuality::new(2.0);
    for _ in 0..60 * 30 {
        assert_eq!(q.record(1.0 / 60.0), None);
    }
    assert_eq!(q.pixel_ratio(), 2.0);
}

#[test]
fn sustained_slow_frames_step_quality_down() {
    let mut q = AdaptiveQuality::new(2.0);
    let mut changes = Vec::new();
    for _ in 0..61 * 30 {
        if let Some(tier) = q.record(0.05) {
            changes.push(tier);
        }
    }
    assert!(!changes.is_empty());
    assert_eq!(q.tier(), QualityTier::Low);
    assert!(q.pixel_ratio() >= PIXEL_RATIO_MIN);
    assert_eq!(changes.last(), Some(&QualityTier::Low));
}

#[test]
fn invalid_frame_times_are_ignored() {
    let mut q = AdaptiveQuality::new(1.0);
    assert_eq!(q.record(0.0), None);
    assert_eq!(q.record(-1.0), None);
    assert_eq!(q.record(f32::NAN), None);
    assert_eq!(q.pixel_ratio(), 1.0);
}

#[test]
fn pixel_ratio_is_clamped_at_construction() {
    assert_eq!(AdaptiveQuality::new(3.0).pixel_ratio(), 2.0);
    assert_eq!(AdaptiveQuality::new(0.5).pixel_ratio(), PIXEL_RATIO_MIN);
}
