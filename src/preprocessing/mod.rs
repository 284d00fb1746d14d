//! Sample processing modules
//!
//! Everything that happens to a sample after it has been decoded from bytes:
//! - Normalization (i16 to floating point)
//! - Channel mixing (N channels to mono)
//! - Temporal aggregation
//! - Pluggable processors (default mix/aggregate, peak, RMS, closures)

pub mod aggregation;
pub mod channel_mixer;
pub mod level;
pub mod normalization;
pub mod processor;
