use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{ClipError, ClipResult};

/// Longest clip the adapter accepts, in seconds.
pub const MAX_CLIP_SECS: f64 = 10.0;
/// Duration granularity, in seconds.
pub const CLIP_DURATION_STEP: f64 = 0.1;

/// Validated clip duration in seconds: `(0, 10]` on a 0.1 s grid.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize)]
pub struct ClipDuration(f64);

impl ClipDuration {
    /// Validate `secs` and wrap it.
    ///
    /// The stored value is exactly `secs`; the grid check only tolerates float
    /// representation error (`2.3` is accepted, `2.35` is not).
    pub fn new(secs: f64) -> ClipResult<Self> {
        if !secs.is_finite() {
            return Err(ClipError::invalid_input("clip duration must be finite"));
        }
        if secs <= 0.0 || secs > MAX_CLIP_SECS + 1e-9 {
            return Err(ClipError::invalid_input(format!(
                "clip duration must be in (0, {MAX_CLIP_SECS}] seconds, got {secs}"
            )));
        }
        let steps = secs / CLIP_DURATION_STEP;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(ClipError::invalid_input(format!(
                "clip duration must be a multiple of {CLIP_DURATION_STEP} seconds, got {secs}"
            )));
        }
        Ok(Self(secs))
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Number of frames needed to cover the duration at `fps` (rounded up).
    pub fn frame_count(self, fps: u32) -> u64 {
        // Strip float noise first so 2.0 s @ 24 fps is 48 frames, not 49.
        let exact = (self.0 * f64::from(fps) * 1e6).round() / 1e6;
        (exact.ceil() as u64).max(1)
    }
}

/// Shared cancellation flag for an in-flight export.
///
/// Cloning yields a handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
