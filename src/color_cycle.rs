//! Automatic hue rotation for color-capable channels.

use embassy_time::Instant;

use crate::config::ConfigHandle;
use crate::ticks;

/// Minimum time between hue steps. Keeps a held button from spinning the
/// color wheel too fast.
const HUE_STEP_MS: u32 = 20;

/// Hue rotation state machine.
///
/// Advances the shared config's hue by one per interval while
/// `cycle_color` is set. A channel carrying this capability is considered
/// continuously active, whether or not a given tick moved the hue.
#[derive(Debug, Default)]
pub struct ColorCycle {
    last_step_ms: u32,
}

impl ColorCycle {
    pub const fn new() -> Self {
        Self { last_step_ms: 0 }
    }

    pub fn setup(&mut self, now: Instant) {
        self.last_step_ms = ticks::millis(now);
    }

    /// Attempt one hue step; returns whether the hue actually advanced.
    pub fn tick(&mut self, now: Instant, config: ConfigHandle<'_>) -> bool {
        let now_ms = ticks::millis(now);
        if ticks::elapsed_ms(now_ms, self.last_step_ms) < HUE_STEP_MS {
            return false;
        }
        self.last_step_ms = now_ms;

        let mut advanced = false;
        config.update(|config| {
            if config.cycle_color {
                config.hue = config.hue.wrapping_add(1);
                advanced = true;
            }
        });
        advanced
    }
}
