/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Like [`scale8`], but a nonzero value never scales to zero.
///
/// Port of the `FastLED` "video" variant. Keeps dim pixels lit instead of
/// flooring them off entirely.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = ((value as u16 * scale as u16) >> 8) as u8;
    if value != 0 && scale != 0 { scaled + 1 } else { scaled }
}
