//! # PCM Extract
//!
//! Streaming extraction of normalized PCM samples from any audio or video
//! file, for waveform rendering, level metering and feature extraction.
//!
//! ## Features
//!
//! - **Decoding via ffmpeg**: demuxing, codec decoding, resampling and
//!   channel shaping happen in an ffmpeg child process
//! - **Chunk-agnostic decoding**: s16le bytes may arrive split anywhere, even
//!   in the middle of a sample
//! - **Mixing and aggregation**: collapse channels to mono and average
//!   consecutive samples to reduce the output rate
//! - **Pluggable processing**: swap the default policy for peak, RMS or any
//!   closure
//!
//! ## Quick Start
//!
//! ```no_run
//! use pcm_extract::{extract_samples, ExtractConfig};
//!
//! let config = ExtractConfig {
//!     mixed: true,
//!     aggregate: 441,
//!     ..ExtractConfig::default()
//! };
//!
//! // 100 mono values per second of audio
//! let samples = extract_samples("song.mp3", &config)?;
//! println!("{} values", samples.len());
//! # Ok::<(), pcm_extract::ExtractError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ffmpeg stdout (s16le bytes) → DecodeTransform → SampleProcessor → PcmStream
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod preprocessing;

use std::path::Path;
use std::process::ChildStdout;

// Re-export main types
pub use config::{DecodeConfig, ExtractConfig, TailPolicy};
pub use error::ExtractError;
pub use io::pcm_decoder::DecodeTransform;
pub use io::stream::PcmStream;
pub use preprocessing::processor::{Emitter, MixAggregate, SampleProcessor};

/// Open a stream of normalized samples decoded from `path`
///
/// Spawns ffmpeg with the decoder-side parameters of `config` and pipes its
/// output through a [`DecodeTransform`]. When not mixed, values alternate
/// between channels (L, R, L, R, ...).
///
/// # Errors
///
/// Returns `ExtractError` if the configuration is invalid or the decoder
/// cannot be started. Decoder failures during playback surface as an `Err`
/// item of the stream.
pub fn open_stream(
    path: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<PcmStream<ChildStdout>, ExtractError> {
    open_stream_with(path, config, MixAggregate::default())
}

/// Open a stream whose samples go through a custom `processor`
///
/// The mixing and aggregation settings of `config` are only honored by the
/// default [`MixAggregate`] processor.
pub fn open_stream_with<P: SampleProcessor>(
    path: impl AsRef<Path>,
    config: &ExtractConfig,
    processor: P,
) -> Result<PcmStream<ChildStdout, P>, ExtractError> {
    let path = path.as_ref();
    let transform = DecodeTransform::with_processor(config.decode_config(), processor)?;

    let mut child = io::source::FfmpegSource::spawn(path, config)?;
    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(ExtractError::DecoderProcess(
            "Decoder stdout was not captured".to_string(),
        ));
    };

    log::debug!("Extracting PCM from {}", path.display());

    Ok(PcmStream::with_transform(stdout, transform, config.chunk_size)?.with_child(child))
}

/// Decode `path` completely and return every emitted sample
///
/// # Example
///
/// ```no_run
/// use pcm_extract::{extract_samples, ExtractConfig};
///
/// let config = ExtractConfig {
///     start_ms: Some(30_000),
///     end_ms: Some(40_000),
///     ..ExtractConfig::default()
/// };
/// let stereo = extract_samples("interview.mp4", &config)?;
/// # Ok::<(), pcm_extract::ExtractError>(())
/// ```
pub fn extract_samples(
    path: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<Vec<f64>, ExtractError> {
    open_stream(path, config)?.collect_samples()
}
