//! Scene descriptors and the validated, read-only scene table.

use crate::constants::RANGE_EPSILON;
use crate::easing::Easing;
use crate::error::SceneTableError;
use fnv::FnvHashMap;
use glam::Vec3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One-shot cue fired when a scene is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneEvent {
    Silence,
    ParticlesFadeIn,
    MorphToImage,
    MouseInteraction,
    WarpStretch,
    HeartMorph,
}

impl SceneEvent {
    pub const ALL: [SceneEvent; 6] = [
        SceneEvent::Silence,
        SceneEvent::ParticlesFadeIn,
        SceneEvent::MorphToImage,
        SceneEvent::MouseInteraction,
        SceneEvent::WarpStretch,
        SceneEvent::HeartMorph,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneEvent::Silence => "silence",
            SceneEvent::ParticlesFadeIn => "particles_fadein",
            SceneEvent::MorphToImage => "morph_to_image",
            SceneEvent::MouseInteraction => "mouse_interaction",
            SceneEvent::WarpStretch => "warp_stretch",
            SceneEvent::HeartMorph => "heart_morph",
        }
    }
}

impl fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scene event `{0}`")]
pub struct UnknownSceneEvent(pub String);

impl FromStr for SceneEvent {
    type Err = UnknownSceneEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneEvent::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| UnknownSceneEvent(s.to_string()))
    }
}

/// Half-open scroll interval `[start, end)` owned by a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneRange {
    pub start: f32,
    pub end: f32,
}

impl SceneRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.end - self.start
    }

    /// Position of `progress` inside the range, clamped to \[0, 1\].
    /// A zero-width range reports 0.
    #[inline]
    pub fn local(&self, progress: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        ((progress - self.start) / span).clamp(0.0, 1.0)
    }

    /// True when `progress` lies inside the range widened by `margin` on both ends.
    #[inline]
    pub fn contains_with_margin(&self, progress: f32, margin: f32) -> bool {
        progress >= self.start - margin && progress <= self.end + margin
    }
}

/// Camera targets for a scene.
///
/// - `depth`: camera distance along +Z
/// - `breathing`: amplitude of the slow in/out drift
/// - `shake`: amplitude multiplier for the high-frequency XY jitter
/// - `orbit_speed`: yaw oscillation rate in radians per second (0 disables)
/// - `min_depth` / `max_depth`: clamp applied after breathing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub depth: f32,
    pub breathing: f32,
    pub shake: f32,
    pub orbit_speed: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Post-processing targets for a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostFx {
    pub depth_of_field: bool,
    pub chromatic_aberration: f32,
    pub grain: f32,
    pub fog_density: f32,
    pub fog_color: Vec3,
    pub bloom_threshold: f32,
    pub color_tint: Vec3,
}

/// Immutable configuration of one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    pub name: String,
    pub range: SceneRange,
    pub camera: CameraParams,
    pub postfx: PostFx,
    pub bloom_base: f32,
    pub energy: f32,
    pub emotion: String,
    pub title: String,
    pub easing: Easing,
    pub event: SceneEvent,
    pub pointer_interaction: bool,
}

impl SceneDescriptor {
    /// A scene with neutral visuals over `range`. Handy for building custom tables.
    pub fn neutral(name: &str, range: SceneRange) -> Self {
        Self {
            name: name.to_string(),
            range,
            camera: CameraParams {
                depth: 50.0,
                breathing: 0.0,
                shake: 0.0,
                orbit_speed: 0.0,
                min_depth: 1.0,
                max_depth: 200.0,
            },
            postfx: PostFx {
                depth_of_field: false,
                chromatic_aberration: 0.0,
                grain: 0.0,
                fog_density: 0.0,
                fog_color: Vec3::ZERO,
                bloom_threshold: 0.5,
                color_tint: Vec3::ZERO,
            },
            bloom_base: 0.1,
            energy: 0.5,
            emotion: String::new(),
            title: String::new(),
            easing: Easing::Linear,
            event: SceneEvent::Silence,
            pointer_interaction: false,
        }
    }

    fn check_values(&self) -> Result<(), SceneTableError> {
        let invalid = |field| SceneTableError::InvalidValue {
            name: self.name.clone(),
            field,
        };
        let cam = &self.camera;
        let fx = &self.postfx;
        let scalars = [
            ("camera.depth", cam.depth),
            ("camera.breathing", cam.breathing),
            ("camera.shake", cam.shake),
            ("camera.orbit_speed", cam.orbit_speed),
            ("camera.min_depth", cam.min_depth),
            ("camera.max_depth", cam.max_depth),
            ("postfx.chromatic_aberration", fx.chromatic_aberration),
            ("postfx.grain", fx.grain),
            ("postfx.fog_density", fx.fog_density),
            ("postfx.bloom_threshold", fx.bloom_threshold),
            ("bloom_base", self.bloom_base),
            ("energy", self.energy),
        ];
        for (field, v) in scalars {
            if !v.is_finite() {
                return Err(invalid(field));
            }
        }
        if !fx.fog_color.is_finite() {
            return Err(invalid("postfx.fog_color"));
        }
        if !fx.color_tint.is_finite() {
            return Err(invalid("postfx.color_tint"));
        }
        if cam.min_depth > cam.max_depth {
            return Err(invalid("camera.min_depth"));
        }
        if !(0.0..=1.0).contains(&self.energy) {
            return Err(invalid("energy"));
        }
        Ok(())
    }
}

/// Ordered scenes whose ranges tile \[0, 1\]. Read-only once built.
#[derive(Clone, Debug)]
pub struct SceneTable {
    scenes: Vec<SceneDescriptor>,
    by_name: FnvHashMap<String, usize>,
}

impl SceneTable {
    /// Validate and index `scenes`. Ranges must start at 0, end at 1 and be
    /// consecutive (`range[i].end == range[i + 1].start`).
    pub fn new(scenes: Vec<SceneDescriptor>) -> Result<Self, SceneTableError> {
        let (first, last) = match (scenes.first(), scenes.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(SceneTableError::Empty),
        };
        if (first.range.start - 0.0).abs() > RANGE_EPSILON {
            return Err(SceneTableError::DoesNotStartAtZero {
                name: first.name.clone(),
                start: first.range.start,
            });
        }
        if (last.range.end - 1.0).abs() > RANGE_EPSILON {
            return Err(SceneTableError::DoesNotEndAtOne {
                name: last.name.clone(),
                end: last.range.end,
            });
        }

        let mut by_name = FnvHashMap::default();
        let mut previous_end: Option<f32> = None;
        for (i, scene) in scenes.iter().enumerate() {
            let r = scene.range;
            if !(r.start.is_finite() && r.end.is_finite()) || r.end < r.start {
                return Err(SceneTableError::InvertedRange {
                    name: scene.name.clone(),
                    start: r.start,
                    end: r.end,
                });
            }
            if let Some(prev) = previous_end {
                if (r.start - prev).abs() > RANGE_EPSILON {
                    return Err(SceneTableError::Discontinuous {
                        name: scene.name.clone(),
                        start: r.start,
                        previous_end: prev,
                    });
                }
            }
            previous_end = Some(r.end);
            scene.check_values()?;
            if by_name.insert(scene.name.clone(), i).is_some() {
                return Err(SceneTableError::DuplicateName(scene.name.clone()));
            }
        }

        Ok(Self { scenes, by_name })
    }

    /// The six-scene Valentine sequence: void, birth, memory, chaos, gravity, love.
    pub fn standard() -> Result<Self, SceneTableError> {
        Self::new(standard_scenes())
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> &[SceneDescriptor] {
        &self.scenes
    }

    pub fn get(&self, index: usize) -> Option<&SceneDescriptor> {
        self.scenes.get(index)
    }

    /// Scene at `index`, falling back to the first scene for stale indices.
    pub fn scene(&self, index: usize) -> &SceneDescriptor {
        self.scenes.get(index).unwrap_or(&self.scenes[0])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&SceneDescriptor> {
        self.index_of(name).map(|i| &self.scenes[i])
    }

    /// Index of the scene after `index`, or `index` itself for the last scene.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1).min(self.scenes.len() - 1)
    }
}

#[allow(clippy::too_many_arguments)]
fn scene(
    name: &str,
    range: (f32, f32),
    camera: [f32; 6],
    bloom_base: f32,
    fx: (bool, f32, f32, f32, [f32; 3], f32, [f32; 3]),
    energy: f32,
    emotion: &str,
    title: &str,
    easing: Easing,
    event: SceneEvent,
) -> SceneDescriptor {
    let [depth, breathing, shake, orbit_speed, min_depth, max_depth] = camera;
    let (depth_of_field, chromatic_aberration, grain, fog_density, fog, bloom_threshold, tint) = fx;
    SceneDescriptor {
        name: name.to_string(),
        range: SceneRange::new(range.0, range.1),
        camera: CameraParams {
            depth,
            breathing,
            shake,
            orbit_speed,
            min_depth,
            max_depth,
        },
        postfx: PostFx {
            depth_of_field,
            chromatic_aberration,
            grain,
            fog_density,
            fog_color: Vec3::from_array(fog),
            bloom_threshold,
            color_tint: Vec3::from_array(tint),
        },
        bloom_base,
        energy,
        emotion: emotion.to_string(),
        title: title.to_string(),
        easing,
        event,
        pointer_interaction: event == SceneEvent::MouseInteraction,
    }
}

fn standard_scenes() -> Vec<SceneDescriptor> {
    vec![
        scene(
            "void",
            (0.0, 0.10),
            [100.0, 0.3, 0.0, 0.0, 90.0, 110.0],
            0.08,
            (false, 0.0, 0.02, 0.0, [0.02, 0.02, 0.08], 0.6, [0.0, 0.0, 0.04]),
            0.2,
            "calm",
            "",
            Easing::Power2InOut,
            SceneEvent::Silence,
        ),
        scene(
            "birth",
            (0.10, 0.20),
            [60.0, 0.5, 0.0, 0.0, 50.0, 110.0],
            0.12,
            (false, 0.0, 0.02, 0.014, [0.04, 0.02, 0.09], 0.55, [0.01, 0.0, 0.03]),
            0.4,
            "wonder",
            "ก่อนที่ดาวดวงจะส่องแสง\nเธอก็อยู่ในใจฉันแล้ว",
            Easing::Power3InOut,
            SceneEvent::ParticlesFadeIn,
        ),
        scene(
            "memory",
            (0.20, 0.45),
            [40.0, 0.4, 0.0, 0.05, 30.0, 70.0],
            0.15,
            (false, 0.0, 0.02, 0.008, [0.06, 0.03, 0.10], 0.5, [0.03, 0.02, 0.0]),
            0.6,
            "warm",
            "ทุกวินาที ที่เรามีด้วยกัน\nคือจักรวาลที่สวยที่สุด",
            Easing::Power2InOut,
            SceneEvent::MorphToImage,
        ),
        scene(
            "chaos",
            (0.45, 0.55),
            [40.0, 0.2, 0.8, 0.0, 30.0, 50.0],
            0.25,
            (false, 0.005, 0.03, 0.015, [0.08, 0.02, 0.06], 0.7, [0.04, -0.01, 0.03]),
            1.0,
            "intense",
            "ถึงจะห่างไกลแค่ไหน\nใจฉันก็ยังเลือกเธอ",
            Easing::Power4In,
            SceneEvent::MouseInteraction,
        ),
        scene(
            "gravity",
            (0.55, 0.75),
            [5.0, 0.15, 0.1, 0.0, 3.0, 45.0],
            0.3,
            (false, 0.01, 0.02, 0.012, [0.03, 0.02, 0.07], 0.75, [0.0, 0.0, 0.0]),
            0.3,
            "suspense",
            "ไม่ว่าจะนานแค่ไหน\nฉันจะอยู่ตรงนี้ กับเธอ",
            Easing::Power3In,
            SceneEvent::WarpStretch,
        ),
        scene(
            "love",
            (0.75, 1.0),
            [30.0, 0.6, 0.0, 0.15, 20.0, 40.0],
            0.2,
            (true, 0.0, 0.02, 0.006, [0.08, 0.04, 0.08], 0.8, [0.04, 0.01, 0.03]),
            0.5,
            "intimate",
            "Happy Valentine's Day\nรักนะ ที่สุดในจักรวาล 💖",
            Easing::Power2Out,
            SceneEvent::HeartMorph,
        ),
    ]
}
