//! Per-frame orchestration.
//!
//! Input setters write straight into the timeline driver; `frame` then runs
//! every consumer against one consistent snapshot of that state.

use crate::audio::{AudioEnvelope, AudioEnvelopeTracker, AudioParams};
use crate::blend::{scene_target, ParameterBundle, ParameterSmoother};
use crate::camera::{Camera, CameraRig};
use crate::constants::*;
use crate::error::{SceneTableError, ShapeError};
use crate::events::EventTable;
use crate::morph::{MorphEngine, MorphFrame, MorphParams, MorphTarget, ParticleSet, TargetSender};
use crate::quality::{AdaptiveQuality, DeviceProfile};
use crate::scene::{SceneDescriptor, SceneEvent, SceneTable};
use crate::shapes::ShapeBuffer;
use crate::timeline::{TimelineDriver, TimelineParams, TimelineState};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct UniverseConfig {
    pub particle_count: usize,
    pub seed: u64,
    pub device_pixel_ratio: f32,
    pub morph: MorphParams,
    pub audio: AudioParams,
    pub timeline: TimelineParams,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self::for_device(&DeviceProfile::default())
    }
}

impl UniverseConfig {
    pub fn for_device(profile: &DeviceProfile) -> Self {
        Self {
            particle_count: profile.particle_count(),
            seed: 0x5EED_CAFE,
            device_pixel_ratio: profile.pixel_ratio,
            morph: MorphParams::default(),
            audio: AudioParams::default(),
            timeline: TimelineParams::default(),
        }
    }
}

pub type FiredEvents = SmallVec<[SceneEvent; 4]>;

/// What the renderer needs for one frame besides the particle arrays.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub state: TimelineState,
    pub params: ParameterBundle,
    pub camera: Camera,
    pub audio: AudioEnvelope,
    pub heartbeat: f32,
    pub heart_warmth: f32,
    /// Scene events fired since the previous frame, oldest first.
    pub events: FiredEvents,
    pub targets_installed: usize,
}

pub struct Universe {
    driver: TimelineDriver,
    events: EventTable,
    engine: MorphEngine,
    audio: AudioEnvelopeTracker,
    smoother: ParameterSmoother,
    rig: CameraRig,
    quality: AdaptiveQuality,
    elapsed: f32,
    heartbeat: f32,
    heart_warmth: f32,
    fired: FiredEvents,
}

impl Universe {
    pub fn new(table: SceneTable, config: UniverseConfig) -> Self {
        Self::with_events(table, config, EventTable::with_defaults())
    }

    pub fn with_events(table: SceneTable, config: UniverseConfig, events: EventTable) -> Self {
        Self {
            driver: TimelineDriver::new(table, config.timeline),
            events,
            engine: MorphEngine::new(config.particle_count, config.morph, config.seed),
            audio: AudioEnvelopeTracker::new(config.audio),
            smoother: ParameterSmoother::new(),
            rig: CameraRig::default(),
            quality: AdaptiveQuality::new(config.device_pixel_ratio),
            elapsed: 0.0,
            heartbeat: 0.0,
            heart_warmth: 0.0,
            fired: FiredEvents::new(),
        }
    }

    /// Universe over the standard six-scene table.
    pub fn standard(config: UniverseConfig) -> Result<Self, SceneTableError> {
        Ok(Self::new(SceneTable::standard()?, config))
    }

    pub fn driver(&self) -> &TimelineDriver {
        &self.driver
    }

    pub fn engine(&self) -> &MorphEngine {
        &self.engine
    }

    pub fn particles(&self) -> &ParticleSet {
        self.engine.particles()
    }

    pub fn current_scene(&self) -> &SceneDescriptor {
        self.driver.current_scene()
    }

    pub fn events_mut(&mut self) -> &mut EventTable {
        &mut self.events
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn target_sender(&self) -> TargetSender {
        self.engine.target_sender()
    }

    pub fn deliver(&mut self, target: MorphTarget, shape: ShapeBuffer) -> Result<(), ShapeError> {
        self.engine.deliver(target, shape)
    }

    /// Feed a scroll observation. Entering a scene dispatches its event
    /// immediately and queues it for the next [`FrameOutput`].
    pub fn set_scroll_progress(&mut self, progress: f32, dt_sec: f32) -> Option<SceneEvent> {
        let entry = self.driver.set_scroll_progress(progress, dt_sec)?;
        self.events.dispatch(&entry, &mut self.driver);
        self.fired.push(entry.event);
        Some(entry.event)
    }

    pub fn set_pointer_position(&mut self, ndc: Vec2) {
        self.driver.set_pointer_position(ndc);
    }

    pub fn set_pointer_velocity(&mut self, velocity: Vec2) {
        self.driver.set_pointer_velocity(velocity);
    }

    pub fn trigger_shockwave(&mut self, origin: Vec3, strength: f32) {
        self.driver.trigger_shockwave(origin, strength);
    }

    pub fn toggle_audio_enabled(&mut self) -> bool {
        let on = self.driver.toggle_audio_enabled();
        if !on {
            self.audio.silence();
        }
        on
    }

    pub fn toggle_debug_mode(&mut self) -> bool {
        self.driver.toggle_debug_mode()
    }

    /// Run one frame. `bins` is this frame's byte spectrum, if a source is playing.
    pub fn frame(&mut self, dt_sec: f32, bins: Option<&[u8]>) -> FrameOutput {
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };

        let targets_installed = self.engine.drain_deliveries();
        self.driver.advance_shockwave(dt);
        let state = self.driver.state();
        let scene = self.driver.current_scene();
        let (scene_event, scene_name) = (scene.event, scene.name.as_str());

        let audio = match bins {
            Some(bins) if state.audio_enabled => self.audio.update(bins, dt),
            _ => self.audio.silence(),
        };

        let target = scene_target(self.driver.table(), state.scene, state.local_progress);
        let params = self.smoother.step(&target, dt);

        self.elapsed += dt;
        let camera = self.rig.camera(&params, self.elapsed);

        if scene_event == SceneEvent::HeartMorph {
            self.heartbeat = (self.elapsed * HEARTBEAT_FREQUENCY).sin() * 0.5 + 0.5;
            self.heart_warmth = self.heartbeat * HEART_WARMTH;
        } else if dt > 0.0 {
            self.heartbeat *= HEARTBEAT_DECAY;
            self.heart_warmth *= HEARTBEAT_DECAY;
        }

        let life_target = if scene_event == SceneEvent::Silence {
            LIFE_VOID
        } else {
            LIFE_FULL
        };
        if state.debug {
            log::debug!(
                "frame: scene `{scene_name}` local {:.2} morph {:.2} energy {:.2}",
                state.local_progress,
                state.morph_phase,
                params.energy
            );
        }

        self.engine.update(&MorphFrame {
            dt,
            morph_phase: state.morph_phase,
            energy: params.energy,
            pointer: state
                .pointer_interaction
                .then(|| camera.pointer_world(state.pointer, POINTER_RAY_DISTANCE)),
            shockwave: state.shockwave,
            bass: audio.fast.low,
            life_target,
        });

        if let Some(tier) = self.quality.record(dt) {
            self.driver.set_quality(tier);
        }

        FrameOutput {
            state: self.driver.state(),
            params,
            camera,
            audio,
            heartbeat: self.heartbeat,
            heart_warmth: self.heart_warmth,
            events: std::mem::take(&mut self.fired),
            targets_installed,
        }
    }
}
