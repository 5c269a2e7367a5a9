//! Easing curves named after their GSAP equivalents.
//!
//! GSAP's `powerN` curves are polynomials of degree `N + 1`, so
//! `power2.inOut` is a cubic in/out and `power4.in` is a quintic ease-in.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    Power2InOut,
    Power3InOut,
    Power4In,
    Power3In,
    Power2Out,
}

impl Easing {
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::Power2InOut,
        Easing::Power3InOut,
        Easing::Power4In,
        Easing::Power3In,
        Easing::Power2Out,
    ];

    /// Map `t` in \[0, 1\] through the curve. Input is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power2InOut => ease_in_out(t, 3),
            Easing::Power3InOut => ease_in_out(t, 4),
            Easing::Power4In => t.powi(5),
            Easing::Power3In => t.powi(4),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "none",
            Easing::Power2InOut => "power2.inOut",
            Easing::Power3InOut => "power3.inOut",
            Easing::Power4In => "power4.in",
            Easing::Power3In => "power3.in",
            Easing::Power2Out => "power2.out",
        }
    }
}

#[inline]
fn ease_in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(degree - 1) * t.powi(degree)
    } else {
        1.0 - (2.0 - 2.0 * t).powi(degree) / 2.0
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing curve `{0}`")]
pub struct UnknownEasing(pub String);

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "linear" => Ok(Easing::Linear),
            "power2.inOut" => Ok(Easing::Power2InOut),
            "power3.inOut" => Ok(Easing::Power3InOut),
            "power4.in" => Ok(Easing::Power4In),
            "power3.in" => Ok(Easing::Power3In),
            "power2.out" => Ok(Easing::Power2Out),
            other => Err(UnknownEasing(other.to_string())),
        }
    }
}
