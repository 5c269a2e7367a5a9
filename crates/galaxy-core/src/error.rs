use thiserror::Error;

/// Reasons a scene table is refused at load time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneTableError {
    #[error("scene table is empty")]
    Empty,
    #[error("first scene `{name}` starts at {start}, expected 0")]
    DoesNotStartAtZero { name: String, start: f32 },
    #[error("last scene `{name}` ends at {end}, expected 1")]
    DoesNotEndAtOne { name: String, end: f32 },
    #[error("scene `{name}` has inverted range [{start}, {end})")]
    InvertedRange { name: String, start: f32, end: f32 },
    #[error("scene `{name}` starts at {start} but the previous scene ends at {previous_end}")]
    Discontinuous {
        name: String,
        start: f32,
        previous_end: f32,
    },
    #[error("scene name `{0}` appears more than once")]
    DuplicateName(String),
    #[error("scene `{name}` has a non-finite or out-of-range `{field}`")]
    InvalidValue { name: String, field: &'static str },
}

/// Problems with a point cloud handed to the morph engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    #[error("flat buffer length {0} is not a multiple of 3")]
    NotVec3Aligned(usize),
    #[error("shape has {found} points, engine expects {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("pixel buffer of {found} bytes does not match {width}x{height} RGBA")]
    PixelBufferSize {
        width: usize,
        height: usize,
        found: usize,
    },
}

/// Failure to hand a target to the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TargetError {
    #[error("unknown morph target `{0}`")]
    UnknownTarget(String),
    #[error("morph engine is gone; delivery dropped")]
    Disconnected,
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
