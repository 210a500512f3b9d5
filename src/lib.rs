#![no_std]

pub mod animation;
pub mod color;
pub mod color_cycle;
pub mod config;
pub mod controller;
pub mod digital;
pub mod fairy;
pub mod generator;
pub mod light;
pub mod math8;
pub mod pwm;
pub mod strip;
pub mod ticks;

pub use animation::{Frame, PatternAnimation};
pub use color::{Hsv, Rgb};
pub use color_cycle::ColorCycle;
pub use config::{ConfigCell, ConfigHandle, ConfigRecord, LightConfig, MAX_PATTERN_ID};
pub use controller::{DEFAULT_TICK_DURATION, LightController, TickResult};
pub use digital::DigitalChannel;
pub use fairy::{FairyLayout, FairyLightChannel};
pub use generator::{FlickerFn, IdleFn};
pub use light::Light;
pub use pwm::PwmChannel;
pub use strip::{LedStripChannel, MAX_STRIPS};

pub use embassy_time::{Duration, Instant};

/// Abstract addressable-strip driver trait
///
/// Implement this trait to support different LED bus hardware. Given a
/// pixel buffer, the driver transmits it; failures are not reported.
pub trait StripDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// One PWM-dimmable output pin.
pub trait PwmPort {
    /// Set the duty cycle, 0 (off) to 255 (fully on).
    fn set_duty(&mut self, duty: u8);
}

/// One on/off output pin.
///
/// Also backs the fairy-light button line, which idles high.
pub trait DigitalPort {
    fn set(&mut self, high: bool);
}
