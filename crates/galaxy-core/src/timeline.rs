//! Process-wide timeline state and the driver that owns it.
//!
//! All writes go through [`TimelineDriver`], which builds the next
//! [`TimelineState`] and replaces the old one in a single assignment, so a
//! reader never sees half an update. The driver is single-writer and meant
//! to be passed explicitly (e.g. `Rc<RefCell<_>>` on the web); a
//! multi-threaded host must wrap it in a mutex.

use crate::constants::*;
use crate::easing::Easing;
use crate::quality::QualityTier;
use crate::resolver::{sanitize, SceneResolver};
use crate::scene::{SceneDescriptor, SceneEvent, SceneTable};
use glam::{Vec2, Vec3};

/// A decaying radial impulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shockwave {
    pub origin: Vec3,
    pub elapsed: f32,
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineState {
    pub scroll: f32,
    pub velocity: f32,
    pub scene: usize,
    pub previous_scene: usize,
    pub local_progress: f32,
    pub morph_phase: f32,
    pub warp_stretch: f32,
    pub color_phase: f32,
    pub pointer: Vec2,
    pub pointer_velocity: Vec2,
    pub pointer_interaction: bool,
    pub shockwave: Option<Shockwave>,
    pub audio_enabled: bool,
    pub debug: bool,
    pub quality: QualityTier,
}

/// Eased ramp of a value between two scroll positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub scroll_start: f32,
    pub scroll_end: f32,
    pub from: f32,
    pub to: f32,
    pub easing: Easing,
}

/// Piecewise scroll → value mapping. Between keyframes the value holds at the
/// last reached `to`; before the first it holds at `initial`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollSchedule {
    pub initial: f32,
    pub keyframes: Vec<Keyframe>,
}

impl ScrollSchedule {
    /// Sphere → photo over `memory`, then photo → heart → proposal over `love`.
    pub fn morph_default() -> Self {
        let kf = |scroll_start, scroll_end, from, to, easing| Keyframe {
            scroll_start,
            scroll_end,
            from,
            to,
            easing,
        };
        Self {
            initial: 0.0,
            keyframes: vec![
                kf(0.20, 0.45, 0.0, 1.0, Easing::Power2InOut),
                kf(0.75, 0.875, 1.0, 2.0, Easing::Power2InOut),
                kf(0.875, 1.0, 2.0, 3.0, Easing::Power2Out),
            ],
        }
    }

    /// Warp stretch ramp across `gravity`.
    pub fn warp_default() -> Self {
        Self {
            initial: 0.0,
            keyframes: vec![Keyframe {
                scroll_start: 0.55,
                scroll_end: 0.75,
                from: 0.0,
                to: WARP_STRETCH_MAX,
                easing: Easing::Power3In,
            }],
        }
    }

    pub fn value_at(&self, scroll: f32) -> f32 {
        let mut value = self.initial;
        for k in &self.keyframes {
            if scroll >= k.scroll_end {
                value = k.to;
            } else if scroll > k.scroll_start {
                let span = k.scroll_end - k.scroll_start;
                let t = k.easing.apply((scroll - k.scroll_start) / span);
                return k.from + (k.to - k.from) * t;
            } else {
                break;
            }
        }
        value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineParams {
    pub hysteresis: f32,
    pub morph: ScrollSchedule,
    pub warp: ScrollSchedule,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            hysteresis: SCENE_HYSTERESIS,
            morph: ScrollSchedule::morph_default(),
            warp: ScrollSchedule::warp_default(),
        }
    }
}

/// Notification that a new scene became active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneEntry {
    pub index: usize,
    pub event: SceneEvent,
}

pub struct TimelineDriver {
    table: SceneTable,
    resolver: SceneResolver,
    params: TimelineParams,
    state: TimelineState,
}

impl TimelineDriver {
    pub fn new(table: SceneTable, params: TimelineParams) -> Self {
        let resolver = SceneResolver::new(params.hysteresis);
        let first = table.scene(0);
        let state = TimelineState {
            scroll: 0.0,
            velocity: 0.0,
            scene: 0,
            previous_scene: 0,
            local_progress: 0.0,
            morph_phase: params.morph.value_at(0.0),
            warp_stretch: params.warp.value_at(0.0),
            color_phase: 0.0,
            pointer: Vec2::ZERO,
            pointer_velocity: Vec2::ZERO,
            pointer_interaction: first.pointer_interaction,
            shockwave: None,
            audio_enabled: false,
            debug: false,
            quality: QualityTier::default(),
        };
        Self {
            table,
            resolver,
            params,
            state,
        }
    }

    /// Copy of the current state; cheap and consistent.
    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn table(&self) -> &SceneTable {
        &self.table
    }

    pub fn current_scene(&self) -> &SceneDescriptor {
        self.table.scene(self.state.scene)
    }

    pub fn previous_scene(&self) -> &SceneDescriptor {
        self.table.scene(self.state.previous_scene)
    }

    fn commit(&mut self, edit: impl FnOnce(&mut TimelineState)) {
        let mut next = self.state;
        edit(&mut next);
        self.state = next;
    }

    /// Apply a new scroll fraction observed `dt_sec` after the previous one.
    /// Returns the entered scene when the active scene changed.
    pub fn set_scroll_progress(&mut self, progress: f32, dt_sec: f32) -> Option<SceneEntry> {
        let p = sanitize(progress);
        let old = self.state;
        let velocity = scroll_velocity(old.scroll, p, dt_sec);
        let res = self.resolver.resolve_index(&self.table, p, Some(old.scene));
        let (index, local_progress, pointer_interaction, event) = (
            res.index,
            res.local_progress,
            res.scene.pointer_interaction,
            res.scene.event,
        );
        let morph_phase = self.params.morph.value_at(p);
        let warp_stretch = self.params.warp.value_at(p);

        let changed = index != old.scene;
        self.commit(|s| {
            s.scroll = p;
            s.velocity = velocity;
            if changed {
                s.previous_scene = s.scene;
                s.scene = index;
            }
            s.local_progress = local_progress;
            s.morph_phase = morph_phase;
            s.warp_stretch = warp_stretch;
            s.color_phase = p * COLOR_PHASE_PER_SCROLL;
            s.pointer_interaction = pointer_interaction;
        });

        if !changed {
            return None;
        }
        log::info!(
            "scene `{}` -> `{}` at {:.3} (event {})",
            self.previous_scene().name,
            self.current_scene().name,
            p,
            event
        );
        Some(SceneEntry { index, event })
    }

    /// Pointer in normalized device coordinates, clamped to \[-1, 1\].
    pub fn set_pointer_position(&mut self, ndc: Vec2) {
        let ndc = if ndc.is_finite() {
            ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
        } else {
            Vec2::ZERO
        };
        self.commit(|s| s.pointer = ndc);
    }

    pub fn set_pointer_velocity(&mut self, velocity: Vec2) {
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            Vec2::ZERO
        };
        self.commit(|s| s.pointer_velocity = velocity);
    }

    /// Start a new shockwave, replacing any active one. A non-finite strength
    /// is ignored and a non-finite origin falls back to the centre.
    pub fn trigger_shockwave(&mut self, origin: Vec3, strength: f32) {
        if !strength.is_finite() {
            log::warn!("ignoring shockwave with strength {strength}");
            return;
        }
        let origin = if origin.is_finite() { origin } else { Vec3::ZERO };
        self.commit(|s| {
            s.shockwave = Some(Shockwave {
                origin,
                elapsed: 0.0,
                strength,
            })
        });
    }

    /// Age the active shockwave; it expires after its full duration.
    pub fn advance_shockwave(&mut self, dt_sec: f32) {
        let Some(sw) = self.state.shockwave else {
            return;
        };
        let elapsed = sw.elapsed + dt_sec.max(0.0);
        self.commit(|s| {
            s.shockwave = (elapsed <= SHOCKWAVE_DURATION_SEC).then_some(Shockwave { elapsed, ..sw });
        });
    }

    pub fn toggle_audio_enabled(&mut self) -> bool {
        self.commit(|s| s.audio_enabled = !s.audio_enabled);
        self.state.audio_enabled
    }

    pub fn toggle_debug_mode(&mut self) -> bool {
        self.commit(|s| s.debug = !s.debug);
        self.state.debug
    }

    pub fn set_quality(&mut self, quality: QualityTier) {
        self.commit(|s| s.quality = quality);
    }
}

/// `(new - old) / dt` clamped to ±2; near-zero or invalid intervals give 0.
pub fn scroll_velocity(old: f32, new: f32, dt_sec: f32) -> f32 {
    if !dt_sec.is_finite() || dt_sec < MIN_VELOCITY_DT_SEC {
        return 0.0;
    }
    ((new - old) / dt_sec).clamp(-SCROLL_VELOCITY_LIMIT, SCROLL_VELOCITY_LIMIT)
}
