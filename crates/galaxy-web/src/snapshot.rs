use galaxy_core::FrameOutput;

/// Order of the values packed by [`uniforms`].
pub const UNIFORM_LAYOUT: [&str; 24] = [
    "bloom",
    "bloomThreshold",
    "grain",
    "chromaticAberration",
    "fogDensity",
    "fogR",
    "fogG",
    "fogB",
    "tintR",
    "tintG",
    "tintB",
    "depthOfField",
    "energy",
    "morphPhase",
    "warpStretch",
    "colorPhase",
    "beat",
    "heartWarmth",
    "audioBass",
    "audioHigh",
    "beatPhase",
    "shockStrength",
    "shockTime",
    "pointerInteraction",
];

pub fn uniforms(f: &FrameOutput) -> Vec<f32> {
    let p = &f.params;
    let s = &f.state;
    let (shock_strength, shock_time) = s
        .shockwave
        .map(|sw| (sw.strength, sw.elapsed))
        .unwrap_or((0.0, 0.0));
    let values = [
        p.bloom,
        p.bloom_threshold,
        p.grain,
        p.chromatic_aberration,
        p.fog_density,
        p.fog_color.x,
        p.fog_color.y,
        p.fog_color.z,
        p.color_tint.x,
        p.color_tint.y,
        p.color_tint.z,
        p.depth_of_field,
        p.energy,
        s.morph_phase,
        s.warp_stretch,
        s.color_phase,
        f.heartbeat,
        f.heart_warmth,
        f.audio.fast.low,
        f.audio.fast.high,
        f.audio.beat_phase,
        shock_strength,
        shock_time,
        if s.pointer_interaction { 1.0 } else { 0.0 },
    ];
    values.to_vec()
}
