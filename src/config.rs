//! Configuration parameters for PCM extraction

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// What happens to partially filled accumulators when the byte stream ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailPolicy {
    /// Discard incomplete frames and aggregation windows (default)
    #[default]
    Drop,
    /// Emit the average of whatever was accumulated
    Flush,
}

/// Configuration of the byte-to-sample decode transform
///
/// Immutable for the lifetime of a [`DecodeTransform`](crate::io::pcm_decoder::DecodeTransform).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Number of interleaved channels in the byte stream (default: 2)
    pub channels: usize,

    /// Collapse every frame into one averaged value (default: false)
    pub mixed: bool,

    /// Number of consecutive same-channel values averaged into one output (default: 1)
    pub aggregate: usize,

    /// End-of-stream handling of partial accumulators (default: Drop)
    pub tail: TailPolicy,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            mixed: false,
            aggregate: 1,
            tail: TailPolicy::Drop,
        }
    }
}

impl DecodeConfig {
    /// Number of independent output channels: 1 when mixed, otherwise `channels`
    pub fn output_channels(&self) -> usize {
        if self.mixed {
            1
        } else {
            self.channels
        }
    }

    /// Check that the configuration describes a usable stream
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.channels == 0 {
            return Err(ExtractError::InvalidInput(
                "Channel count must be > 0".to_string(),
            ));
        }
        if self.aggregate == 0 {
            return Err(ExtractError::InvalidInput(
                "Aggregation factor must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of the whole extraction facility
///
/// Fields consumed by the decoder process (`sample_rate`, `start_ms`, `end_ms`,
/// `track`, `ffmpeg_path`) never reach the decode transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Number of audio channels requested from the decoder (default: 2)
    pub channels: usize,

    /// Samples per channel per second requested from the decoder (default: 44100)
    pub sample_rate: u32,

    /// Average all channels into one (default: false)
    pub mixed: bool,

    /// Average values over `aggregate` samples per channel (default: 1, no aggregation)
    pub aggregate: usize,

    /// Start time in milliseconds (default: beginning of file)
    pub start_ms: Option<u64>,

    /// End time in milliseconds (default: end of file)
    pub end_ms: Option<u64>,

    /// Index of the input audio track (default: decoder's choice)
    pub track: Option<usize>,

    /// End-of-stream handling of partial accumulators (default: Drop)
    pub tail: TailPolicy,

    /// Bytes read from the decoder per chunk (default: 4096)
    pub chunk_size: usize,

    /// Decoder executable (default: "ffmpeg")
    pub ffmpeg_path: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            mixed: false,
            aggregate: 1,
            start_ms: None,
            end_ms: None,
            track: None,
            tail: TailPolicy::Drop,
            chunk_size: 4096,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

impl ExtractConfig {
    /// The subset of this configuration used by the decode transform
    pub fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            channels: self.channels,
            mixed: self.mixed,
            aggregate: self.aggregate,
            tail: self.tail,
        }
    }

    /// Check every parameter, including the ones only the decoder process sees
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.decode_config().validate()?;

        if self.sample_rate == 0 {
            return Err(ExtractError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ExtractError::InvalidInput(
                "Chunk size must be > 0".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_ms, self.end_ms) {
            if end < start {
                return Err(ExtractError::InvalidInput(format!(
                    "End time {} ms is before start time {} ms",
                    end, start
                )));
            }
        }
        if self.ffmpeg_path.is_empty() {
            return Err(ExtractError::InvalidInput(
                "Decoder executable path is empty".to_string(),
            ));
        }
        Ok(())
    }
}
