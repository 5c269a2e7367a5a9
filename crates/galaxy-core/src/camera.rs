//! Camera description and the rig that animates it from blended parameters.

use crate::blend::ParameterBundle;
use crate::constants::*;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point `distance` units along the ray through `ndc` (x right, y up).
    pub fn pointer_world(&self, ndc: Vec2, distance: f32) -> Vec3 {
        let inv = self.view_projection().inverse();
        // perspective_rh maps depth to [0, 1]
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let dir = (far - near).normalize_or_zero();
        self.eye + dir * distance
    }
}

/// Turns smoothed scene parameters plus elapsed time into a camera pose:
/// dolly with breathing, high-frequency shake and a slow yaw orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub aspect: f32,
    pub fovy_radians: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
        }
    }
}

impl CameraRig {
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn camera(&self, params: &ParameterBundle, time: f32) -> Camera {
        let (lo, hi) = (
            params.min_depth.min(params.max_depth),
            params.max_depth.max(params.min_depth),
        );
        let depth = (params.camera_depth + (time * BREATHING_FREQUENCY).sin() * params.breathing)
            .clamp(lo, hi);
        let shake = Vec3::new(
            (time * SHAKE_FREQUENCY_X).sin() * SHAKE_AMPLITUDE_X,
            (time * SHAKE_FREQUENCY_Y).cos() * SHAKE_AMPLITUDE_Y,
            0.0,
        ) * params.shake;
        let yaw = (time * params.orbit_speed).sin() * ORBIT_YAW_AMPLITUDE;

        Camera {
            eye: Quat::from_rotation_y(yaw) * Vec3::new(0.0, 0.0, depth) + shake,
            target: shake,
            up: Vec3::Y,
            aspect: self.aspect,
            fovy_radians: self.fovy_radians,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}
