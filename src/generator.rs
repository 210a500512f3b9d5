//! Pluggable pattern generator seams.
//!
//! The concrete flicker and idle math lives outside this crate; channels
//! take these function types at construction.

use crate::color::Rgb;

/// Per-frame brightness generator for the flicker pattern family.
///
/// Receives the milliseconds elapsed since the last accepted frame, the
/// selected and previous pattern ids, and the frame step counter.
pub type FlickerFn = fn(elapsed_ms: u32, pattern: u8, prev_pattern: u8, step: u8) -> u8;

/// Whole-buffer color wash rendered when the idle slot is selected.
pub type IdleFn = fn(now_ms: u32, pixels: &mut [Rgb]);
