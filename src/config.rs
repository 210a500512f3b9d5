//! Shared light configuration state and its wire mirror.
//!
//! Configuration is written by the control transport (often from a radio
//! callback context) and read by the owning light once per tick. Built on
//! `critical-section` and interior mutability so multi-field writes are
//! applied atomically and a reader never observes a torn update.

use core::cell::RefCell;

use bytemuck::{Pod, Zeroable};
use critical_section::Mutex;

/// Highest pattern id representable on the wire (7 bits).
pub const MAX_PATTERN_ID: u8 = 127;

/// Live settings of one light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Automatic hue rotation on color-capable channels.
    pub cycle_color: bool,
    /// Selected pattern id, kept within the owning variant's range.
    pub pattern_id: u8,
    pub hue: u8,
    pub saturation: u8,
}

/// Fixed-layout wire mirror of [`LightConfig`].
///
/// Byte 0 packs the color-cycle flag (bit 0) and the pattern id
/// (bits 1-7). Bytes 1 and 2 carry hue and saturation; byte 3 is reserved
/// padding and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct ConfigRecord {
    flags: u8,
    hue: u8,
    saturation: u8,
    reserved: u8,
}

impl ConfigRecord {
    /// Pack a configuration into its wire form.
    pub const fn pack(config: LightConfig) -> Self {
        Self {
            flags: (config.pattern_id << 1) | config.cycle_color as u8,
            hue: config.hue,
            saturation: config.saturation,
            reserved: 0,
        }
    }

    /// Unpack the wire form.
    ///
    /// The pattern id comes back in the full wire range; callers apply
    /// their variant's wrap policy before storing it.
    pub const fn unpack(self) -> LightConfig {
        LightConfig {
            cycle_color: self.flags & 1 != 0,
            pattern_id: self.flags >> 1,
            hue: self.hue,
            saturation: self.saturation,
        }
    }

    /// Raw wire bytes, ready for a characteristic write.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Parse a record from raw wire bytes.
    ///
    /// Returns `None` unless `bytes` is exactly four bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytemuck::try_from_bytes(bytes).ok().copied()
    }
}

struct Shared {
    config: LightConfig,
    changed: bool,
}

/// Shared configuration cell.
///
/// One cell per light; the light and the transport each hold a
/// [`ConfigHandle`] onto it.
pub struct ConfigCell {
    inner: Mutex<RefCell<Shared>>,
}

impl ConfigCell {
    /// Create a cell with default settings (pattern 0, cycling off,
    /// hue and saturation 0).
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Shared {
                config: LightConfig {
                    cycle_color: false,
                    pattern_id: 0,
                    hue: 0,
                    saturation: 0,
                },
                changed: false,
            })),
        }
    }

    /// Get a handle onto this cell.
    ///
    /// Handles are lightweight references; the owning light and the
    /// transport share access through their own copies.
    pub const fn handle(&self) -> ConfigHandle<'_> {
        ConfigHandle { cell: self }
    }
}

impl Default for ConfigCell {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle onto a [`ConfigCell`].
#[derive(Clone, Copy)]
pub struct ConfigHandle<'a> {
    cell: &'a ConfigCell,
}

impl ConfigHandle<'_> {
    /// Coherent read of the whole configuration.
    pub fn snapshot(&self) -> LightConfig {
        critical_section::with(|cs| self.cell.inner.borrow(cs).borrow().config)
    }

    /// Apply a multi-field update atomically.
    pub fn update(&self, f: impl FnOnce(&mut LightConfig)) {
        critical_section::with(|cs| {
            f(&mut self.cell.inner.borrow(cs).borrow_mut().config);
        });
    }

    /// Replace the whole configuration (bulk deserialization path).
    ///
    /// Raises the change flag: bulk writes bypass the transport's own
    /// setters, so external observers need a forced resynchronization.
    pub fn replace(&self, config: LightConfig) {
        critical_section::with(|cs| {
            let mut shared = self.cell.inner.borrow(cs).borrow_mut();
            shared.config = config;
            shared.changed = true;
        });
    }

    /// Read and clear the change flag.
    pub fn take_changed(&self) -> bool {
        critical_section::with(|cs| {
            let mut shared = self.cell.inner.borrow(cs).borrow_mut();
            core::mem::replace(&mut shared.changed, false)
        })
    }

    pub fn set_hue(&self, hue: u8) {
        self.update(|config| config.hue = hue);
    }

    pub fn set_saturation(&self, saturation: u8) {
        self.update(|config| config.saturation = saturation);
    }

    pub fn set_cycle_color(&self, cycle_color: bool) {
        self.update(|config| config.cycle_color = cycle_color);
    }

    /// Select a pattern, masked to the wire id range.
    ///
    /// The transport is expected to send ids valid for the owning variant;
    /// channels additionally treat out-of-range ids as their fallback
    /// (idle wash or no-op) until the next wrap point.
    pub fn set_pattern(&self, pattern_id: u8) {
        self.update(|config| config.pattern_id = pattern_id & MAX_PATTERN_ID);
    }
}
