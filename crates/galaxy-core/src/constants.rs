//! Timeline, morph and audio tuning constants.
//!
//! These express intended behavior (time constants, clamp limits, band
//! splits) and keep magic numbers out of the engine code.

// Scene resolution
pub const SCENE_HYSTERESIS: f32 = 0.015; // normalized scroll units on each side of a range
pub const RANGE_EPSILON: f32 = 1e-5; // tolerance when checking that ranges tile [0, 1]

// Scroll velocity
pub const SCROLL_VELOCITY_LIMIT: f32 = 2.0; // units per second
pub const MIN_VELOCITY_DT_SEC: f32 = 1e-4; // shorter intervals count as zero velocity

// Scene transition blend: last fraction of local progress spent blending toward the next scene
pub const TRANSITION_WINDOW: f32 = 0.2;

// Color phase
pub const COLOR_PHASE_PER_SCROLL: f32 = 5.0;

// Per-frame exponential smoothing toward the blended parameters (fraction per 60 Hz frame)
pub const SMOOTH_CAMERA: f32 = 0.04;
pub const SMOOTH_FOG: f32 = 0.06;
pub const SMOOTH_BLOOM: f32 = 0.08;
pub const SMOOTH_GRADE: f32 = 0.10;
pub const SMOOTH_SHAKE: f32 = 0.15;
pub const REFERENCE_FRAME_SEC: f32 = 1.0 / 60.0;

// Morph engine
pub const MORPH_SEGMENTS: usize = 3; // sphere -> photo -> heart -> proposal
pub const DELAY_SPREAD: f32 = 0.5; // max phase lag of the most delayed particle
pub const SPRING_STIFFNESS: f32 = 2.0;
pub const VELOCITY_DAMPING: f32 = 0.92; // multiplicative per 60 Hz frame
pub const REPULSION_RADIUS: f32 = 8.0;
pub const REPULSION_STRENGTH: f32 = 200.0;
pub const REPULSION_IMPULSE_SCALE: f32 = 0.4;
pub const REPULSION_MIN_DIST: f32 = 0.01;
pub const CURL_STRENGTH: f32 = 15.0;
pub const CURL_SPATIAL_SCALE: f32 = 0.05;
pub const CURL_TIME_SCALE: f32 = 0.3;
pub const CURL_EPS: f32 = 0.01;
pub const FLOAT_AMPLITUDE: f32 = 0.6; // world units at full energy
pub const FLOAT_FREQUENCY: f32 = 0.7; // radians per second
pub const AUDIO_PUSH: f32 = 1.5; // outward breathing on bass, world units
pub const SHOCKWAVE_DURATION_SEC: f32 = 2.0;
pub const SHOCKWAVE_IMPULSE: f32 = 60.0;
pub const LIFE_VOID: f32 = 0.3;
pub const LIFE_FULL: f32 = 1.0;
pub const LIFE_RATE_PER_SEC: f32 = 2.0;
pub const MAX_STABLE_DT_SEC: f32 = 1.0 / 30.0; // larger steps are subdivided
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // longer frames (resumed tabs) are truncated

// Particle initialisation
pub const SPHERE_RADIUS: f32 = 50.0;
pub const SIZE_MIN: f32 = 0.5;
pub const SIZE_SPAN: f32 = 2.0;
pub const BRIGHTNESS_MIN: f32 = 0.5;

// Audio bands (fractions of the bin count)
pub const LOW_BAND_END: f32 = 0.1;
pub const MID_BAND_END: f32 = 0.5;

// Audio envelopes (fraction per frame)
pub const FAST_ENVELOPE_ALPHA: f32 = 0.2;
pub const SLOW_ENVELOPE_ALPHA: f32 = 0.05;

// Beat detection
pub const BEAT_THRESHOLD: f32 = 0.35;
pub const BEAT_RELEASE_RATIO: f32 = 0.6; // lock releases below threshold * ratio
pub const BEAT_DECAY_PER_SEC: f32 = 5.0;

// Camera rig
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const BREATHING_FREQUENCY: f32 = 0.5;
pub const SHAKE_AMPLITUDE_X: f32 = 0.15;
pub const SHAKE_AMPLITUDE_Y: f32 = 0.1;
pub const SHAKE_FREQUENCY_X: f32 = 15.0;
pub const SHAKE_FREQUENCY_Y: f32 = 12.0;
pub const ORBIT_YAW_AMPLITUDE: f32 = 0.3; // radians
pub const POINTER_RAY_DISTANCE: f32 = 40.0;

// Heartbeat (love scene)
pub const HEARTBEAT_FREQUENCY: f32 = 2.0;
pub const HEART_WARMTH: f32 = 0.1;
pub const HEARTBEAT_DECAY: f32 = 0.95; // per frame outside love

// Warp stretch (gravity scene)
pub const WARP_STRETCH_MAX: f32 = 3.0;

// Adaptive quality
pub const QUALITY_WINDOW_SEC: f32 = 2.0;
pub const QUALITY_MIN_SAMPLES: usize = 60;
pub const LOW_FPS_AVG: f32 = 35.0;
pub const LOW_FPS_P1: f32 = 20.0;
pub const HIGH_FPS_AVG: f32 = 55.0;
pub const HIGH_FPS_P1: f32 = 45.0;
pub const PIXEL_RATIO_MIN: f32 = 0.75;
pub const PIXEL_RATIO_MAX: f32 = 2.0;
pub const PIXEL_RATIO_STEP_DOWN: f32 = 0.5;
pub const PIXEL_RATIO_STEP_UP: f32 = 0.25;
pub const PIXEL_RATIO_EASE: f32 = 0.3;
