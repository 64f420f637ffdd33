//! Egg components - incubation slots waiting to hatch.

use hatchery_logic::catalog::EggType;
use serde::{Deserialize, Serialize};

/// Monotonic egg identifier, assigned in purchase order.
pub type EggId = u32;

/// An egg in the incubator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    pub id: EggId,
    pub egg_type: EggType,
    /// Purchase time (ms)
    pub started_at: u64,
    /// Required incubation time (ms)
    pub duration_ms: u64,
}

impl Egg {
    /// Milliseconds since purchase; zero if the clock reads earlier.
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.elapsed(now) >= self.duration_ms
    }

    /// Fraction of incubation completed, for progress bars.
    pub fn progress(&self, now: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed(now) as f32 / self.duration_ms as f32).min(1.0)
    }
}
