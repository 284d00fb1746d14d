//! Integer PCM to floating-point amplitude conversion
//!
//! Samples are scaled by a fixed divisor of `32767.0` for both polarities, so
//! `i16::MAX` maps to exactly `1.0` and `i16::MIN` to `-32768 / 32767`, just
//! below `-1.0`. Values are never clamped.
//!
//! # Example
//!
//! ```
//! use pcm_extract::preprocessing::normalization::{normalize_i16, I16_SCALE};
//!
//! assert_eq!(normalize_i16(16384), 16384.0 / I16_SCALE);
//! assert_eq!(normalize_i16(i16::MAX), 1.0);
//! ```

/// Divisor applied to every signed 16-bit sample
pub const I16_SCALE: f64 = 32767.0;

/// Normalize a signed 16-bit sample to a floating-point amplitude
#[inline]
pub fn normalize_i16(value: i16) -> f64 {
    value as f64 / I16_SCALE
}

/// Assemble a little-endian signed 16-bit sample from its two bytes
#[inline]
pub fn i16_from_le(low: u8, high: u8) -> i16 {
    i16::from_le_bytes([low, high])
}
