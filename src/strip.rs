//! Addressable LED strip channel.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use heapless::Vec;
use smart_leds::hsv::hsv2rgb;

use crate::animation::{Frame, PatternAnimation};
use crate::color::{Hsv, Rgb, fill};
use crate::color_cycle::ColorCycle;
use crate::config::{ConfigHandle, ConfigRecord};
use crate::generator::{FlickerFn, IdleFn};
use crate::light::Light;
use crate::math8::scale8_video;
use crate::{StripDriver, ticks};

/// Most physical strips one channel can bind.
pub const MAX_STRIPS: usize = 3;

const PULSE_FLASHES: u8 = 4;
const PULSE_PHASE_MS: u32 = 100;

const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

struct Binding<D> {
    driver: D,
    buffer: usize,
    len: usize,
}

/// A pattern light across one to three addressable strips.
///
/// Flicker frames fill every pixel with one HSV color, scaled by the
/// `max_brightness` ceiling; the idle slot hands the whole buffer to the
/// external color-wash generator instead.
///
/// Strips bound without an explicit length reuse strip 1's length and
/// share its pixel buffer: both bindings present the same pixels. The
/// aliasing is an indexed relationship, not pointer reuse; see
/// [`LedStripChannel::buffer_index`].
pub struct LedStripChannel<'a, D: StripDriver, Del: DelayNs, const MAX_LEDS: usize> {
    config: ConfigHandle<'a>,
    cycle: ColorCycle,
    anim: PatternAnimation,
    idle: IdleFn,
    delay: Del,
    max_brightness: u8,
    bindings: Vec<Binding<D>, MAX_STRIPS>,
    buffers: Vec<Vec<Rgb, MAX_LEDS>, MAX_STRIPS>,
}

impl<'a, D: StripDriver, Del: DelayNs, const MAX_LEDS: usize>
    LedStripChannel<'a, D, Del, MAX_LEDS>
{
    /// Create a channel bound to its first strip.
    ///
    /// `len` is capped at `MAX_LEDS`.
    pub fn new(
        config: ConfigHandle<'a>,
        flicker: FlickerFn,
        flicker_patterns: u8,
        idle: IdleFn,
        driver: D,
        len: usize,
        delay: Del,
    ) -> Self {
        let len = len.min(MAX_LEDS);
        let mut buffer = Vec::new();
        let _ = buffer.resize(len, BLACK);

        let mut buffers = Vec::new();
        let _ = buffers.push(buffer);
        let mut bindings = Vec::new();
        let _ = bindings.push(Binding {
            driver,
            buffer: 0,
            len,
        });

        Self {
            config,
            cycle: ColorCycle::new(),
            anim: PatternAnimation::new(flicker, flicker_patterns),
            idle,
            delay,
            max_brightness: 255,
            bindings,
            buffers,
        }
    }

    /// Bind an additional strip.
    ///
    /// With `len: None` the strip reuses strip 1's length and shares its
    /// pixel buffer. Returns the driver back when all strip slots are
    /// taken.
    pub fn add_strip(&mut self, driver: D, len: Option<usize>) -> Result<(), D> {
        if self.bindings.is_full() {
            return Err(driver);
        }
        let (buffer, len) = match len {
            Some(len) => {
                let len = len.min(MAX_LEDS);
                let mut pixels = Vec::new();
                let _ = pixels.resize(len, BLACK);
                // bindings and buffers grow in lockstep, so this fits
                let _ = self.buffers.push(pixels);
                (self.buffers.len() - 1, len)
            }
            None => (0, self.bindings[0].len),
        };
        let _ = self.bindings.push(Binding { driver, buffer, len });
        Ok(())
    }

    /// Cap the flicker brightness ceiling.
    pub fn set_max_brightness(&mut self, max_brightness: u8) {
        self.max_brightness = max_brightness;
    }

    /// Index of the pixel buffer backing the given strip binding.
    ///
    /// Aliased bindings report the same index.
    pub fn buffer_index(&self, strip: usize) -> Option<usize> {
        self.bindings.get(strip).map(|binding| binding.buffer)
    }

    /// Pixels currently presented by the given strip binding.
    pub fn pixels(&self, strip: usize) -> Option<&[Rgb]> {
        let binding = self.bindings.get(strip)?;
        Some(&self.buffers[binding.buffer][..binding.len])
    }

    /// Selectable pattern count: the flicker range plus the idle slot.
    fn selectable_patterns(&self) -> u8 {
        self.anim.flicker_patterns() + 1
    }

    fn fill_all(&mut self, color: Rgb) {
        for buffer in &mut self.buffers {
            fill(buffer, color);
        }
    }

    fn present(&mut self) {
        for binding in &mut self.bindings {
            binding
                .driver
                .write(&self.buffers[binding.buffer][..binding.len]);
        }
    }
}

impl<D: StripDriver, Del: DelayNs, const MAX_LEDS: usize> Light
    for LedStripChannel<'_, D, Del, MAX_LEDS>
{
    fn setup(&mut self, now: Instant) {
        self.cycle.setup(now);
        self.anim.setup(now);
        self.fill_all(BLACK);
        self.present();
    }

    fn update(&mut self, now: Instant) -> bool {
        self.cycle.tick(now, self.config);

        let config = self.config.snapshot();
        match self.anim.tick(now, config.pattern_id) {
            Frame::Skipped => {}
            Frame::Flicker(value) => {
                let color = hsv2rgb(Hsv {
                    hue: config.hue,
                    sat: config.saturation,
                    val: scale8_video(value, self.max_brightness),
                });
                self.fill_all(color);
                self.present();
            }
            Frame::Idle => {
                let now_ms = ticks::millis(now);
                for buffer in &mut self.buffers {
                    (self.idle)(now_ms, buffer);
                }
                self.present();
            }
        }

        // Color cycling keeps this channel continuously active.
        true
    }

    fn next_pattern(&mut self) {
        let selectable = self.selectable_patterns();
        self.config
            .update(|config| config.pattern_id = (config.pattern_id + 1) % selectable);
    }

    fn selected_pattern(&self) -> u8 {
        self.config.snapshot().pattern_id
    }

    fn pulse(&mut self) {
        for _ in 0..PULSE_FLASHES {
            self.fill_all(WHITE);
            self.present();
            self.delay.delay_ms(PULSE_PHASE_MS);
            self.fill_all(BLACK);
            self.present();
            self.delay.delay_ms(PULSE_PHASE_MS);
        }
    }

    fn serialize(&self) -> ConfigRecord {
        ConfigRecord::pack(self.config.snapshot())
    }

    fn deserialize(&mut self, record: &ConfigRecord) {
        let mut config = record.unpack();
        config.pattern_id %= self.selectable_patterns();
        self.config.replace(config);
    }
}
