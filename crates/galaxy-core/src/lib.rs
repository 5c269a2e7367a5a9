//! Scroll-driven particle galaxy core.
//!
//! A validated [`SceneTable`] partitions the scroll range into scenes. The
//! [`TimelineDriver`] resolves scroll input to a scene (with hysteresis),
//! [`blend()`] produces the visual parameters, the [`MorphEngine`] moves the
//! particles and the [`AudioEnvelopeTracker`] turns spectra into envelopes.
//! [`Universe`] runs them in frame order. Nothing here draws; renderers read
//! the snapshots.

pub mod audio;
pub mod blend;
pub mod camera;
pub mod constants;
pub mod easing;
pub mod error;
pub mod events;
pub mod frame;
pub mod morph;
pub mod noise;
pub mod quality;
pub mod resolver;
pub mod scene;
pub mod shapes;
pub mod timeline;

pub use audio::*;
pub use blend::*;
pub use camera::*;
pub use easing::*;
pub use error::*;
pub use events::*;
pub use frame::*;
pub use morph::*;
pub use quality::*;
pub use resolver::*;
pub use scene::*;
pub use shapes::*;
pub use timeline::*;
