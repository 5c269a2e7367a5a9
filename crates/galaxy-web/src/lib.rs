#![cfg(target_arch = "wasm32")]
//! JavaScript-facing handle over the galaxy core.
//!
//! The page owns scrolling, image decoding, audio playback and drawing; it
//! forwards input here, calls `frame` once per animation frame and uploads
//! the returned snapshots.

use galaxy_core::{
    DeviceProfile, FrameOutput, GpuClass, MorphTarget, ShapeBuffer, Universe, UniverseConfig,
};
use glam::{Vec2, Vec3};
use instant::Instant;
use wasm_bindgen::prelude::*;

mod snapshot;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("galaxy-web starting");
    Ok(())
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct Galaxy {
    universe: Universe,
    last_frame: Instant,
    last_scroll: Instant,
    last: Option<FrameOutput>,
}

#[wasm_bindgen]
impl Galaxy {
    /// Build for the current device. `renderer` is the unmasked WebGL renderer string.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mobile: bool,
        memory_gb: f32,
        renderer: &str,
        pixel_ratio: f32,
        seed: u32,
    ) -> Result<Galaxy, JsValue> {
        let profile = DeviceProfile {
            mobile,
            memory_gb,
            gpu: GpuClass::from_renderer_string(renderer),
            pixel_ratio,
        };
        let config = UniverseConfig {
            seed: seed as u64,
            ..UniverseConfig::for_device(&profile)
        };
        log::info!(
            "device {:?}: {} particles",
            profile.gpu,
            config.particle_count
        );
        let universe = Universe::standard(config).map_err(js_err)?;
        let now = Instant::now();
        Ok(Galaxy {
            universe,
            last_frame: now,
            last_scroll: now,
            last: None,
        })
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.universe.particles().len()
    }

    /// Returns the name of the entered scene's event, if the scene changed.
    #[wasm_bindgen(js_name = setScrollProgress)]
    pub fn set_scroll_progress(&mut self, progress: f32) -> Option<String> {
        let now = Instant::now();
        let dt = (now - self.last_scroll).as_secs_f32();
        self.last_scroll = now;
        self.universe
            .set_scroll_progress(progress, dt)
            .map(|e| e.name().to_string())
    }

    #[wasm_bindgen(js_name = setPointerPosition)]
    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.universe.set_pointer_position(Vec2::new(x, y));
    }

    #[wasm_bindgen(js_name = setPointerVelocity)]
    pub fn set_pointer_velocity(&mut self, x: f32, y: f32) {
        self.universe.set_pointer_velocity(Vec2::new(x, y));
    }

    #[wasm_bindgen(js_name = triggerShockwave)]
    pub fn trigger_shockwave(&mut self, x: f32, y: f32, z: f32, strength: f32) {
        self.universe.trigger_shockwave(Vec3::new(x, y, z), strength);
    }

    #[wasm_bindgen(js_name = toggleAudioEnabled)]
    pub fn toggle_audio_enabled(&mut self) -> bool {
        self.universe.toggle_audio_enabled()
    }

    #[wasm_bindgen(js_name = toggleDebugMode)]
    pub fn toggle_debug_mode(&mut self) -> bool {
        self.universe.toggle_debug_mode()
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.universe.rig_mut().set_aspect(width, height);
    }

    /// Hand over a finished target. `colors` and `brightness` may be empty.
    #[wasm_bindgen(js_name = deliverTarget)]
    pub fn deliver_target(
        &mut self,
        name: &str,
        positions: &[f32],
        colors: &[f32],
        brightness: &[f32],
    ) -> Result<(), JsValue> {
        let target: MorphTarget = name.parse().map_err(js_err)?;
        let mut shape = ShapeBuffer::from_flat(positions).map_err(js_err)?;
        if !colors.is_empty() {
            shape = shape.with_flat_colors(colors).map_err(js_err)?;
        }
        if !brightness.is_empty() {
            shape = shape.with_brightness(brightness.to_vec());
        }
        self.universe.deliver(target, shape).map_err(js_err)
    }

    /// Advance one frame. Pass an empty array when no audio is playing.
    pub fn frame(&mut self, frequency_bins: &[u8]) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let bins = (!frequency_bins.is_empty()).then_some(frequency_bins);
        self.last = Some(self.universe.frame(dt, bins));
    }

    pub fn title(&self) -> String {
        self.universe.current_scene().title.clone()
    }

    #[wasm_bindgen(js_name = sceneName)]
    pub fn scene_name(&self) -> String {
        self.universe.current_scene().name.clone()
    }

    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.particles().positions_flat())
    }

    pub fn colors(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.particles().colors_flat())
    }

    pub fn sizes(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.particles().size.as_slice())
    }

    pub fn lives(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.particles().life.as_slice())
    }

    pub fn brightness(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.particles().brightness.as_slice())
    }

    /// Flat uniform block for the last frame; layout in `snapshot::UNIFORM_LAYOUT`.
    pub fn uniforms(&self) -> js_sys::Float32Array {
        let values = self
            .last
            .as_ref()
            .map(snapshot::uniforms)
            .unwrap_or_default();
        js_sys::Float32Array::from(values.as_slice())
    }

    #[wasm_bindgen(js_name = uniformLayout)]
    pub fn uniform_layout() -> String {
        snapshot::UNIFORM_LAYOUT.join(",")
    }

    #[wasm_bindgen(js_name = viewProjection)]
    pub fn view_projection(&self) -> js_sys::Float32Array {
        let m = self
            .last
            .as_ref()
            .map(|f| f.camera.view_projection().to_cols_array())
            .unwrap_or_default();
        js_sys::Float32Array::from(&m[..])
    }
}
