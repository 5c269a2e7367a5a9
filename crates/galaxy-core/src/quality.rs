//! Device-based particle budgets and frame-rate driven quality adaptation.

use crate::constants::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityTier {
    pub fn from_pixel_ratio(ratio: f32) -> Self {
        if ratio < 1.0 {
            QualityTier::Low
        } else if ratio < 1.5 {
            QualityTier::Medium
        } else {
            QualityTier::High
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GpuClass {
    High,
    Low,
    #[default]
    Unknown,
}

impl GpuClass {
    /// Classify an unmasked WebGL renderer string.
    pub fn from_renderer_string(renderer: &str) -> Self {
        let r = renderer.to_ascii_lowercase();
        let high = ["rtx", "rx 6", "rx 7"].iter().any(|k| r.contains(k))
            || apple_silicon(&r)
            || apple_a_series(&r);
        if high {
            return GpuClass::High;
        }
        let low = r.contains("intel")
            || r.contains("mali")
            || (1..=5).any(|n| r.contains(&format!("adreno {n}")));
        if low {
            GpuClass::Low
        } else {
            GpuClass::Unknown
        }
    }
}

// "m1 " .. "m3 "
fn apple_silicon(r: &str) -> bool {
    (1..=3).any(|n| r.contains(&format!("m{n} ")))
}

// "a14".."a19" and "a20".."a39"
fn apple_a_series(r: &str) -> bool {
    r.as_bytes().windows(3).any(|w| {
        w[0] == b'a'
            && w[1].is_ascii_digit()
            && w[2].is_ascii_digit()
            && matches!((w[1] - b'0', w[2] - b'0'), (1, 4..=9) | (2..=3, _))
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub mobile: bool,
    pub memory_gb: f32,
    pub gpu: GpuClass,
    pub pixel_ratio: f32,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            mobile: false,
            memory_gb: 4.0,
            gpu: GpuClass::Unknown,
            pixel_ratio: 1.0,
        }
    }
}

impl DeviceProfile {
    pub fn particle_count(&self) -> usize {
        if self.mobile {
            return if self.memory_gb >= 6.0 { 40_000 } else { 25_000 };
        }
        match self.gpu {
            GpuClass::High => 150_000,
            GpuClass::Low => 30_000,
            GpuClass::Unknown => 80_000,
        }
    }
}

/// Watches frame rate in windows and walks the pixel ratio up or down.
#[derive(Clone, Debug)]
pub struct AdaptiveQuality {
    fps: Vec<f32>,
    window_sec: f32,
    pixel_ratio: f32,
    target_ratio: f32,
    max_ratio: f32,
    low_streak: u32,
    high_streak: u32,
}

impl AdaptiveQuality {
    pub fn new(device_pixel_ratio: f32) -> Self {
        let max_ratio = device_pixel_ratio.clamp(PIXEL_RATIO_MIN, PIXEL_RATIO_MAX);
        Self {
            fps: Vec::with_capacity(256),
            window_sec: 0.0,
            pixel_ratio: max_ratio,
            target_ratio: max_ratio,
            max_ratio,
            low_streak: 0,
            high_streak: 0,
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn tier(&self) -> QualityTier {
        QualityTier::from_pixel_ratio(self.pixel_ratio)
    }

    /// Record one frame. Returns the new tier when the pixel ratio moved.
    pub fn record(&mut self, dt_sec: f32) -> Option<QualityTier> {
        if !dt_sec.is_finite() || dt_sec <= 0.0 {
            return None;
        }
        self.fps.push(1.0 / dt_sec.max(0.001));
        self.window_sec += dt_sec;
        if self.window_sec <= QUALITY_WINDOW_SEC || self.fps.len() <= QUALITY_MIN_SAMPLES {
            return None;
        }

        let avg = self.fps.iter().sum::<f32>() / self.fps.len() as f32;
        let mut sorted = self.fps.clone();
        sorted.sort_by(f32::total_cmp);
        let p1 = sorted[(sorted.len() as f32 * 0.01) as usize];
        self.fps.clear();
        self.window_sec = 0.0;

        if avg < LOW_FPS_AVG || p1 < LOW_FPS_P1 {
            self.low_streak += 1;
            self.high_streak = 0;
            if self.low_streak >= 2 && self.pixel_ratio > PIXEL_RATIO_MIN {
                self.target_ratio = (self.pixel_ratio - PIXEL_RATIO_STEP_DOWN).max(PIXEL_RATIO_MIN);
            }
        } else if avg > HIGH_FPS_AVG && p1 > HIGH_FPS_P1 {
            self.high_streak += 1;
            self.low_streak = 0;
            if self.high_streak >= 3 {
                self.target_ratio = (self.pixel_ratio + PIXEL_RATIO_STEP_UP).min(self.max_ratio);
            }
        } else {
            self.low_streak = 0;
            self.high_streak = 0;
        }

        if (self.pixel_ratio - self.target_ratio).abs() <= 0.01 {
            return None;
        }
        self.pixel_ratio += (self.target_ratio - self.pixel_ratio) * PIXEL_RATIO_EASE;
        log::debug!(
            "quality: avg {avg:.1} fps, p1 {p1:.1}, pixel ratio {:.2}",
            self.pixel_ratio
        );
        Some(self.tier())
    }
}
