//! Frame timing
//!
//! Converts wall-clock frame timestamps into simulation deltas where 1.0 is
//! one 60 Hz frame.

use crate::consts::{MAX_FRAME_DELTA, NOMINAL_FRAME_MS, SKIP_FRAME_DELTA};

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_ms` and return the tick delta, or `None` when the
    /// frame should not tick (first frame, clock went backwards, or a long
    /// stall such as a hidden tab).
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        let last = self.last_ms.replace(now_ms)?;
        let raw = ((now_ms - last) / NOMINAL_FRAME_MS) as f32;
        if !(0.0..SKIP_FRAME_DELTA).contains(&raw) {
            return None;
        }
        Some(raw.min(MAX_FRAME_DELTA))
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
