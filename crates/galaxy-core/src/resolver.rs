//! Scroll fraction to scene resolution with a hysteresis band.

use crate::constants::SCENE_HYSTERESIS;
use crate::scene::{SceneDescriptor, SceneTable};

/// Result of resolving a scroll fraction against a scene table.
#[derive(Clone, Copy, Debug)]
pub struct Resolution<'a> {
    pub scene: &'a SceneDescriptor,
    pub index: usize,
    pub local_progress: f32,
}

/// Pure resolver; `hysteresis` is the margin (in scroll units) by which the
/// previous scene's range is widened before a switch is allowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneResolver {
    pub hysteresis: f32,
}

impl Default for SceneResolver {
    fn default() -> Self {
        Self {
            hysteresis: SCENE_HYSTERESIS,
        }
    }
}

impl SceneResolver {
    pub fn new(hysteresis: f32) -> Self {
        Self {
            hysteresis: hysteresis.max(0.0),
        }
    }

    /// Resolve `progress` given the name of the previously active scene.
    /// Unknown names behave like no previous scene.
    pub fn resolve<'a>(
        &self,
        table: &'a SceneTable,
        progress: f32,
        previous: Option<&str>,
    ) -> Resolution<'a> {
        let previous = previous.and_then(|name| table.index_of(name));
        self.resolve_index(table, progress, previous)
    }

    /// Same as [`resolve`](Self::resolve) with the previous scene given by index.
    pub fn resolve_index<'a>(
        &self,
        table: &'a SceneTable,
        progress: f32,
        previous: Option<usize>,
    ) -> Resolution<'a> {
        let p = sanitize(progress);

        let sticky = previous
            .and_then(|i| table.get(i).map(|s| (i, s)))
            .filter(|(_, s)| s.range.contains_with_margin(p, self.hysteresis));

        let (index, scene) = sticky.unwrap_or_else(|| {
            table
                .scenes()
                .iter()
                .enumerate()
                .rev()
                .find(|(_, s)| p >= s.range.start)
                .unwrap_or((0, table.scene(0)))
        });

        Resolution {
            scene,
            index,
            local_progress: scene.range.local(p),
        }
    }
}

/// Clamp to \[0, 1\]; NaN maps to 0.
#[inline]
pub fn sanitize(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
