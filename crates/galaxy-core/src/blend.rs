//! Per-field linear blending of scene parameters, plus the per-frame
//! smoother that eases the renderer's live values toward the blend.

use crate::constants::*;
use crate::scene::{SceneDescriptor, SceneTable};
use glam::Vec3;

/// Every numeric visual parameter a scene controls.
///
/// `depth_of_field` is a 0..1 mix so it can be blended like the rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterBundle {
    pub camera_depth: f32,
    pub breathing: f32,
    pub shake: f32,
    pub orbit_speed: f32,
    pub min_depth: f32,
    pub max_depth: f32,
    pub bloom: f32,
    pub energy: f32,
    pub grain: f32,
    pub chromatic_aberration: f32,
    pub fog_density: f32,
    pub fog_color: Vec3,
    pub bloom_threshold: f32,
    pub color_tint: Vec3,
    pub depth_of_field: f32,
}

impl ParameterBundle {
    pub fn from_scene(scene: &SceneDescriptor) -> Self {
        let cam = &scene.camera;
        let fx = &scene.postfx;
        Self {
            camera_depth: cam.depth,
            breathing: cam.breathing,
            shake: cam.shake,
            orbit_speed: cam.orbit_speed,
            min_depth: cam.min_depth,
            max_depth: cam.max_depth,
            bloom: scene.bloom_base,
            energy: scene.energy,
            grain: fx.grain,
            chromatic_aberration: fx.chromatic_aberration,
            fog_density: fx.fog_density,
            fog_color: fx.fog_color,
            bloom_threshold: fx.bloom_threshold,
            color_tint: fx.color_tint,
            depth_of_field: if fx.depth_of_field { 1.0 } else { 0.0 },
        }
    }

    /// Linear interpolation of every field; `t` is not clamped.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            camera_depth: lerp(self.camera_depth, other.camera_depth, t),
            breathing: lerp(self.breathing, other.breathing, t),
            shake: lerp(self.shake, other.shake, t),
            orbit_speed: lerp(self.orbit_speed, other.orbit_speed, t),
            min_depth: lerp(self.min_depth, other.min_depth, t),
            max_depth: lerp(self.max_depth, other.max_depth, t),
            bloom: lerp(self.bloom, other.bloom, t),
            energy: lerp(self.energy, other.energy, t),
            grain: lerp(self.grain, other.grain, t),
            chromatic_aberration: lerp(self.chromatic_aberration, other.chromatic_aberration, t),
            fog_density: lerp(self.fog_density, other.fog_density, t),
            fog_color: self.fog_color.lerp(other.fog_color, t),
            bloom_threshold: lerp(self.bloom_threshold, other.bloom_threshold, t),
            color_tint: self.color_tint.lerp(other.color_tint, t),
            depth_of_field: lerp(self.depth_of_field, other.depth_of_field, t),
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blend two scenes' parameters. `t` is clamped to \[0, 1\].
pub fn blend(from: &SceneDescriptor, to: &SceneDescriptor, t: f32) -> ParameterBundle {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    ParameterBundle::from_scene(from).lerp(&ParameterBundle::from_scene(to), t)
}

/// Target parameters for scene `index` at `local_progress`: the scene's own
/// values, blending toward the next scene over the trailing transition window
/// with the next scene's easing curve.
pub fn scene_target(table: &SceneTable, index: usize, local_progress: f32) -> ParameterBundle {
    let current = table.scene(index);
    let next = table.scene(table.next_index(index));
    let w = ((local_progress - (1.0 - TRANSITION_WINDOW)) / TRANSITION_WINDOW).clamp(0.0, 1.0);
    blend(current, next, next.easing.apply(w))
}

/// Holds the live parameter values and nudges them toward each frame's target.
///
/// Rates are fractions per 60 Hz frame and are rescaled for other frame times.
#[derive(Clone, Debug, Default)]
pub struct ParameterSmoother {
    current: Option<ParameterBundle>,
}

impl ParameterSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ParameterBundle> {
        self.current.as_ref()
    }

    /// Snap to `target` immediately, e.g. after a jump to a new scroll position.
    pub fn reset(&mut self, target: ParameterBundle) {
        self.current = Some(target);
    }

    pub fn step(&mut self, target: &ParameterBundle, dt_sec: f32) -> ParameterBundle {
        let Some(cur) = self.current.as_mut() else {
            self.current = Some(*target);
            return *target;
        };
        let frames = (dt_sec.max(0.0)) / REFERENCE_FRAME_SEC;
        let a = |rate: f32| 1.0 - (1.0 - rate).powf(frames);
        let (cam, fog, bloom, grade, shake) = (
            a(SMOOTH_CAMERA),
            a(SMOOTH_FOG),
            a(SMOOTH_BLOOM),
            a(SMOOTH_GRADE),
            a(SMOOTH_SHAKE),
        );

        cur.camera_depth = lerp(cur.camera_depth, target.camera_depth, cam);
        cur.breathing = lerp(cur.breathing, target.breathing, cam);
        cur.orbit_speed = lerp(cur.orbit_speed, target.orbit_speed, cam);
        cur.min_depth = lerp(cur.min_depth, target.min_depth, cam);
        cur.max_depth = lerp(cur.max_depth, target.max_depth, cam);
        cur.shake = lerp(cur.shake, target.shake, shake);
        cur.bloom = lerp(cur.bloom, target.bloom, bloom);
        cur.bloom_threshold = lerp(cur.bloom_threshold, target.bloom_threshold, bloom);
        cur.fog_density = lerp(cur.fog_density, target.fog_density, fog);
        cur.fog_color = cur.fog_color.lerp(target.fog_color, fog);
        cur.energy = lerp(cur.energy, target.energy, grade);
        cur.grain = lerp(cur.grain, target.grain, grade);
        cur.chromatic_aberration = lerp(cur.chromatic_aberration, target.chromatic_aberration, grade);
        cur.color_tint = cur.color_tint.lerp(target.color_tint, grade);
        cur.depth_of_field = lerp(cur.depth_of_field, target.depth_of_field, grade);
        *cur
    }
}
