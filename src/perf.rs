//! Performance instrumentation.
//!
//! The render pass and the pointer handlers are wrapped in `profile_scope!`.
//! Without the `profiling` feature the macro compiles to nothing; with it,
//! each scope is timed and anything slower than its budget is reported.
//!
//! ```ignore
//! fn render_scene(..) {
//!     profile_scope!("render_scene");
//!     // ... drawing ...
//! }
//! ```

use std::time::Instant;
use tracing::{trace, warn};

/// Target frame time for 60 FPS
pub const TARGET_FRAME_MS: f64 = 16.67;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::TARGET_FRAME_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

/// RAII timer that reports its scope's duration on drop.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Whether the scope has already run past its budget.
    pub fn over_budget(&self) -> bool {
        self.elapsed_ms() > self.threshold_ms
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        if elapsed > self.threshold_ms {
            warn!(
                scope = self.name,
                elapsed_ms = elapsed,
                budget_ms = self.threshold_ms,
                "Slow scope"
            );
        } else {
            trace!(scope = self.name, elapsed_ms = elapsed, "Scope timing");
        }
    }
}
