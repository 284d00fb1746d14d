//! Raw PCM byte source backed by an ffmpeg child process
//!
//! ffmpeg does all container demuxing, decoding, resampling and channel
//! shaping; its stdout carries signed 16-bit little-endian PCM at the
//! requested channel count and sample rate.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::config::ExtractConfig;
use crate::error::ExtractError;

/// Builds and launches the decoder command line
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegSource;

impl FfmpegSource {
    /// Command-line arguments for decoding `path` with `config`
    ///
    /// Seeks only for a non-zero start time; the duration is `end - start`
    /// when an end time is given.
    pub fn args(path: &Path, config: &ExtractConfig) -> Vec<String> {
        let start_ms = config.start_ms.unwrap_or(0);
        let mut args = Vec::new();

        if start_ms > 0 {
            args.push("-ss".to_string());
            args.push(ms_to_seconds(start_ms));
        }

        args.push("-i".to_string());
        args.push(path.to_string_lossy().into_owned());

        if let Some(end_ms) = config.end_ms {
            args.push("-t".to_string());
            args.push(ms_to_seconds(end_ms.saturating_sub(start_ms)));
        }

        if let Some(track) = config.track {
            args.push("-map".to_string());
            args.push(format!("0:a:{}", track));
        }

        args.extend([
            "-f".to_string(),
            "s16le".to_string(),
            "-ac".to_string(),
            config.channels.to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ar".to_string(),
            config.sample_rate.to_string(),
            "-y".to_string(),
            "pipe:1".to_string(),
        ]);
        args
    }

    /// Spawn the decoder with stdout piped
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidInput` for an invalid configuration and
    /// `ExtractError::DecoderProcess` if the executable cannot be started.
    pub fn spawn(path: &Path, config: &ExtractConfig) -> Result<Child, ExtractError> {
        config.validate()?;
        let args = Self::args(path, config);

        log::debug!("Spawning {} {}", config.ffmpeg_path, args.join(" "));

        Command::new(&config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ExtractError::DecoderProcess(format!(
                    "Failed to start {}: {}",
                    config.ffmpeg_path, e
                ))
            })
    }
}

fn ms_to_seconds(ms: u64) -> String {
    (ms as f64 / 1000.0).to_string()
}
