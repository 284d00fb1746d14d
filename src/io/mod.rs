//! Audio I/O modules
//!
//! Decoder process spawning, byte-to-sample decoding, and streaming.

pub mod pcm_decoder;
pub mod sample_buffer;
pub mod source;
pub mod stream;
