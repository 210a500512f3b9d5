//! On/off digital channel.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

use crate::DigitalPort;
use crate::animation::{Frame, PatternAnimation};
use crate::config::{ConfigHandle, ConfigRecord};
use crate::generator::FlickerFn;
use crate::light::Light;

const PULSE_TOGGLES: u8 = 4;
const PULSE_PHASE_MS: u32 = 100;

/// A pattern light on one on/off pin.
///
/// The flicker brightness is thresholded: any nonzero value drives the
/// pin high. Known limitation: with on/off output many pattern ids are
/// visually indistinguishable, and no deduplication is performed.
pub struct DigitalChannel<'a, P: DigitalPort, Del: DelayNs> {
    config: ConfigHandle<'a>,
    anim: PatternAnimation,
    port: P,
    delay: Del,
}

impl<'a, P: DigitalPort, Del: DelayNs> DigitalChannel<'a, P, Del> {
    pub fn new(
        config: ConfigHandle<'a>,
        flicker: FlickerFn,
        flicker_patterns: u8,
        port: P,
        delay: Del,
    ) -> Self {
        Self {
            config,
            anim: PatternAnimation::new(flicker, flicker_patterns),
            port,
            delay,
        }
    }
}

impl<P: DigitalPort, Del: DelayNs> Light for DigitalChannel<'_, P, Del> {
    fn setup(&mut self, now: Instant) {
        self.port.set(false);
        self.anim.setup(now);
    }

    fn update(&mut self, now: Instant) -> bool {
        match self.anim.tick(now, self.config.snapshot().pattern_id) {
            Frame::Flicker(value) => {
                self.port.set(value != 0);
                true
            }
            Frame::Skipped | Frame::Idle => false,
        }
    }

    fn next_pattern(&mut self) {
        let count = self.anim.flicker_patterns();
        self.config
            .update(|config| config.pattern_id = (config.pattern_id + 1) % count);
    }

    fn selected_pattern(&self) -> u8 {
        self.config.snapshot().pattern_id
    }

    fn pulse(&mut self) {
        for _ in 0..PULSE_TOGGLES {
            self.port.set(true);
            self.delay.delay_ms(PULSE_PHASE_MS);
            self.port.set(false);
            self.delay.delay_ms(PULSE_PHASE_MS);
        }
    }

    fn serialize(&self) -> ConfigRecord {
        ConfigRecord::pack(self.config.snapshot())
    }

    fn deserialize(&mut self, record: &ConfigRecord) {
        let mut config = record.unpack();
        config.pattern_id %= self.anim.flicker_patterns();
        self.config.replace(config);
    }
}
