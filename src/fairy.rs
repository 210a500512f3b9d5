//! Fairy-light string driven through its stock controller.
//!
//! The string ships with its own controller: a single button advancing
//! through a fixed cycle of built-in patterns, with no way to query which
//! one is active. This channel keeps a virtual cursor and emits timed
//! button presses on the control pin to steer the real cursor to match.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

use crate::DigitalPort;
use crate::config::{ConfigHandle, ConfigRecord};
use crate::light::Light;

const PRESS_LOW_MS: u32 = 40;
const PRESS_HIGH_MS: u32 = 40;
const PULSE_ON_HOLD_MS: u32 = 500;
const PULSE_OFF_HOLD_MS: u32 = 300;

/// Button-cycle layout of the stock controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FairyLayout {
    /// Number of positions on the button cycle.
    pub pattern_count: u8,
    /// Position that turns the string off.
    pub off_pattern: u8,
    /// Position considered fully on.
    pub on_pattern: u8,
}

impl Default for FairyLayout {
    /// Layout of the common 9-position controller.
    fn default() -> Self {
        Self {
            pattern_count: 9,
            off_pattern: 0,
            on_pattern: 8,
        }
    }
}

/// A light reachable only through button-press emulation.
///
/// The tracked position is belief, not knowledge: the controller has no
/// state query, so a physical press on the real button desynchronizes the
/// cursor permanently.
pub struct FairyLightChannel<'a, P: DigitalPort, Del: DelayNs> {
    config: ConfigHandle<'a>,
    port: P,
    delay: Del,
    layout: FairyLayout,
    /// Position the external controller is believed to sit on.
    current: u8,
}

impl<'a, P: DigitalPort, Del: DelayNs> FairyLightChannel<'a, P, Del> {
    pub fn new(config: ConfigHandle<'a>, port: P, delay: Del) -> Self {
        Self {
            config,
            port,
            delay,
            layout: FairyLayout::default(),
            current: 0,
        }
    }

    /// Override the controller layout.
    ///
    /// The off/on positions are wrapped into the pattern cycle.
    #[must_use]
    pub fn with_layout(mut self, layout: FairyLayout) -> Self {
        let count = layout.pattern_count.max(1);
        self.layout = FairyLayout {
            pattern_count: count,
            off_pattern: layout.off_pattern % count,
            on_pattern: layout.on_pattern % count,
        };
        self
    }

    /// Forward distance around the button cycle.
    fn pattern_distance(&self, from: u8, to: u8) -> u8 {
        let count = u16::from(self.layout.pattern_count);
        #[allow(clippy::cast_possible_truncation)]
        let distance = ((u16::from(to) + count - u16::from(from)) % count) as u8;
        distance
    }

    /// Emulate button presses, blocking through each one.
    fn press(&mut self, presses: u8) {
        for _ in 0..presses {
            self.port.set(false);
            self.delay.delay_ms(PRESS_LOW_MS);
            self.port.set(true);
            self.delay.delay_ms(PRESS_HIGH_MS);
        }
    }
}

impl<P: DigitalPort, Del: DelayNs> Light for FairyLightChannel<'_, P, Del> {
    fn setup(&mut self, _now: Instant) {
        // The button line idles high.
        self.port.set(true);
    }

    fn update(&mut self, _now: Instant) -> bool {
        let desired = self.config.snapshot().pattern_id;
        if desired == self.current {
            return false;
        }
        let presses = self.pattern_distance(self.current, desired);
        self.press(presses);
        self.current = desired;
        true
    }

    fn next_pattern(&mut self) {
        let count = self.layout.pattern_count;
        self.config
            .update(|config| config.pattern_id = (config.pattern_id + 1) % count);
    }

    fn selected_pattern(&self) -> u8 {
        self.config.snapshot().pattern_id
    }

    /// Acknowledge by blinking the whole string: walk to the on position,
    /// toggle off and back on twice, then walk back to the selection.
    fn pulse(&mut self) {
        let desired = self.config.snapshot().pattern_id;
        let layout = self.layout;

        self.press(self.pattern_distance(desired, layout.on_pattern));
        for _ in 0..2 {
            self.delay.delay_ms(PULSE_ON_HOLD_MS);
            self.press(self.pattern_distance(layout.on_pattern, layout.off_pattern));
            self.delay.delay_ms(PULSE_OFF_HOLD_MS);
            self.press(self.pattern_distance(layout.off_pattern, layout.on_pattern));
        }
        self.press(self.pattern_distance(layout.on_pattern, desired));
    }

    fn serialize(&self) -> ConfigRecord {
        ConfigRecord::pack(self.config.snapshot())
    }

    fn deserialize(&mut self, record: &ConfigRecord) {
        let mut config = record.unpack();
        config.pattern_id %= self.layout.pattern_count;
        self.config.replace(config);
    }
}
