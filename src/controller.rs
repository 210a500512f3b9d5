//! Tick scheduling across a set of lights.
//!
//! Portable pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between ticks.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::light::Light;

/// Default polling rate, matching the pattern frame gate (~60 FPS).
pub const DEFAULT_TICK_HZ: u32 = 60;

/// Default tick duration based on the polling rate.
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_TICK_HZ as u64);

/// Result of one controller tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// Whether any light reported a visible change.
    pub changed: bool,
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Polls every registered light once per tick, with drift correction.
///
/// # Usage
///
/// ```ignore
/// let mut controller: LightController<'_, 4> = LightController::new();
/// controller.add(&mut strip)?;
/// controller.add(&mut fairy)?;
/// controller.setup(Instant::from_millis(now_ms));
///
/// loop {
///     let result = controller.tick(Instant::from_millis(now_ms));
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct LightController<'a, const N: usize> {
    lights: Vec<&'a mut (dyn Light + 'a), N>,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<'a, const N: usize> LightController<'a, N> {
    /// Create a controller with the default tick duration.
    pub fn new() -> Self {
        Self::with_tick_duration(DEFAULT_TICK_DURATION)
    }

    /// Create a controller with a custom tick duration.
    pub fn with_tick_duration(tick_duration: Duration) -> Self {
        Self {
            lights: Vec::new(),
            next_tick: Instant::from_millis(0),
            tick_duration,
        }
    }

    /// Register a light. Returns it back when all slots are taken.
    pub fn add(
        &mut self,
        light: &'a mut (dyn Light + 'a),
    ) -> Result<(), &'a mut (dyn Light + 'a)> {
        self.lights.push(light)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Access one light, e.g. to pulse it on configuration-mode entry or
    /// serve a transport read.
    pub fn light_mut(&mut self, index: usize) -> Option<&mut (dyn Light + 'a)> {
        self.lights.get_mut(index).map(|light| &mut **light)
    }

    /// Run setup on every light. Call exactly once, before the first tick.
    pub fn setup(&mut self, now: Instant) {
        for light in &mut self.lights {
            light.setup(now);
        }
        self.next_tick = now;
    }

    /// Poll every light once and compute the next deadline.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        // Drift correction: if we've fallen too far behind, reset to now
        // instead of bursting through the backlog.
        let max_drift = Duration::from_millis(self.tick_duration.as_millis() * 2);
        if now.as_millis() > self.next_tick.as_millis() + max_drift.as_millis() {
            self.next_tick = now;
        }

        let mut changed = false;
        for light in &mut self.lights {
            changed |= light.update(now);
        }

        self.next_tick += self.tick_duration;

        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            changed,
            next_deadline: self.next_tick,
            sleep_duration,
        }
    }
}

impl<const N: usize> Default for LightController<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
