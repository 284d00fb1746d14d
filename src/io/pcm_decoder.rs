//! Streaming s16le byte-to-sample decoding
//!
//! [`DecodeTransform`] consumes raw interleaved signed 16-bit little-endian
//! PCM in chunks of any size. Chunk boundaries need not line up with samples:
//! a trailing odd byte is carried over and completed by the first byte of the
//! next chunk. Every decoded sample is normalized and handed to a
//! [`SampleProcessor`] together with its channel index.
//!
//! # Example
//!
//! ```
//! use pcm_extract::io::pcm_decoder::DecodeTransform;
//! use pcm_extract::DecodeConfig;
//!
//! let mut transform = DecodeTransform::new(DecodeConfig::default())?;
//!
//! // One stereo frame split across two chunks, mid-sample
//! let mut samples = transform.decode_chunk(&[0x00, 0x40, 0x00]);
//! samples.extend(transform.decode_chunk(&[0xC0]));
//!
//! assert_eq!(samples, vec![16384.0 / 32767.0, -16384.0 / 32767.0]);
//! # Ok::<(), pcm_extract::ExtractError>(())
//! ```

use crate::config::{DecodeConfig, TailPolicy};
use crate::error::ExtractError;
use crate::preprocessing::normalization::{i16_from_le, normalize_i16};
use crate::preprocessing::processor::{Emitter, MixAggregate, SampleProcessor};

/// Byte-level decode state carried between chunks
#[derive(Debug, Clone, Default)]
struct DecodeState {
    /// Low byte of a sample whose high byte has not arrived yet
    carry: Option<u8>,
    /// Channel the next decoded sample belongs to
    cursor: usize,
}

/// Stateful s16le decoder feeding a sample processor
#[derive(Debug, Clone)]
pub struct DecodeTransform<P = MixAggregate> {
    config: DecodeConfig,
    state: DecodeState,
    processor: P,
}

impl DecodeTransform<MixAggregate> {
    /// Create a transform using the built-in mixing and aggregation policy
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidInput` if `channels` or `aggregate` is zero.
    pub fn new(config: DecodeConfig) -> Result<Self, ExtractError> {
        Self::with_processor(config, MixAggregate::default())
    }
}

impl<P: SampleProcessor> DecodeTransform<P> {
    /// Create a transform delivering decoded samples to `processor`
    ///
    /// Calls [`SampleProcessor::init`] once before returning.
    pub fn with_processor(config: DecodeConfig, mut processor: P) -> Result<Self, ExtractError> {
        config.validate()?;
        processor.init(&config);

        log::debug!(
            "Decode transform: {} channels, mixed={}, aggregate={}, tail={:?}",
            config.channels,
            config.mixed,
            config.aggregate,
            config.tail
        );

        Ok(Self {
            config,
            state: DecodeState::default(),
            processor,
        })
    }

    /// Decode one chunk, appending every emitted value to `out`
    ///
    /// An empty chunk is a no-op. At most one trailing byte is kept for the
    /// next call.
    pub fn process_chunk(&mut self, chunk: &[u8], out: &mut Vec<f64>) {
        let Some((&first, rest)) = chunk.split_first() else {
            return;
        };
        let mut emitter = Emitter::new(out);

        let remaining = match self.state.carry.take() {
            Some(low) => {
                self.decode(i16_from_le(low, first), &mut emitter);
                rest
            }
            None => chunk,
        };

        let mut pairs = remaining.chunks_exact(2);
        for pair in &mut pairs {
            self.decode(i16_from_le(pair[0], pair[1]), &mut emitter);
        }
        self.state.carry = pairs.remainder().first().copied();

        log::trace!(
            "Decoded chunk of {} bytes, carry={:?}, next channel {}",
            chunk.len(),
            self.state.carry,
            self.state.cursor
        );
    }

    /// Decode one chunk and return the values it produced
    pub fn decode_chunk(&mut self, chunk: &[u8]) -> Vec<f64> {
        let mut out = Vec::with_capacity(chunk.len() / 2);
        self.process_chunk(chunk, &mut out);
        out
    }

    /// Signal end of stream
    ///
    /// Under [`TailPolicy::Flush`] the processor emits its partial state into
    /// `out`; under [`TailPolicy::Drop`] nothing is emitted. A dangling carry
    /// byte is discarded either way, and all per-stream state is discarded
    /// with it.
    pub fn finish(&mut self, out: &mut Vec<f64>) {
        if let Some(byte) = self.state.carry {
            log::debug!("Discarding incomplete trailing sample byte {:#04x}", byte);
        }

        match self.config.tail {
            TailPolicy::Flush => {
                let before = out.len();
                self.processor.flush(&mut Emitter::new(out));
                log::debug!("Flushed {} partial values at end of stream", out.len() - before);
            }
            TailPolicy::Drop => {}
        }

        self.state = DecodeState::default();
        self.processor.init(&self.config);
    }

    /// Configuration this transform was built with
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Byte held over from the previous chunk, if the stream stopped mid-sample
    pub fn carry_byte(&self) -> Option<u8> {
        self.state.carry
    }

    /// Channel index the next decoded sample will be tagged with
    pub fn channel_cursor(&self) -> usize {
        self.state.cursor
    }

    /// The sample processor
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Consume the transform, returning its processor
    pub fn into_processor(self) -> P {
        self.processor
    }

    fn decode(&mut self, raw: i16, out: &mut Emitter<'_>) {
        let channel = self.state.cursor;
        self.state.cursor = (channel + 1) % self.config.channels;
        self.processor.process_sample(normalize_i16(raw), channel, out);
    }
}
