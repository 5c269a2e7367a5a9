//! Dispatch table from scene events to handlers.

use crate::scene::SceneEvent;
use crate::timeline::{SceneEntry, TimelineDriver};
use fnv::FnvHashMap;
use glam::Vec3;

pub type EventHandler = Box<dyn FnMut(&mut TimelineDriver, &SceneEntry)>;

#[derive(Default)]
pub struct EventTable {
    handlers: FnvHashMap<SceneEvent, Vec<EventHandler>>,
}

impl EventTable {
    /// Empty table; every event is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shockwaves on entering `love` and `chaos`, a log line for the photo morph.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.on(SceneEvent::HeartMorph, |driver, _| {
            driver.trigger_shockwave(Vec3::ZERO, 1.0)
        });
        table.on(SceneEvent::MouseInteraction, |driver, _| {
            driver.trigger_shockwave(Vec3::ZERO, 0.6)
        });
        table.on(SceneEvent::MorphToImage, |driver, entry| {
            log::info!(
                "photo morph begins in `{}`",
                driver.table().scene(entry.index).name
            );
        });
        table
    }

    pub fn on<F>(&mut self, event: SceneEvent, handler: F)
    where
        F: FnMut(&mut TimelineDriver, &SceneEntry) + 'static,
    {
        self.handlers.entry(event).or_default().push(Box::new(handler));
    }

    pub fn handler_count(&self, event: SceneEvent) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }

    /// Run every handler registered for `entry.event`. Returns how many ran.
    pub fn dispatch(&mut self, entry: &SceneEntry, driver: &mut TimelineDriver) -> usize {
        let Some(handlers) = self.handlers.get_mut(&entry.event) else {
            return 0;
        };
        for h in handlers.iter_mut() {
            h(driver, entry);
        }
        log::debug!("dispatched {} to {} handler(s)", entry.event, handlers.len());
        handlers.len()
    }
}
