//! Example: Render a peak waveform as JSON
//!
//! Usage:
//!   cargo run --release --example waveform -- <file> [points_per_second]
//!
//! Prints `{"sample_rate":..,"points_per_second":..,"peaks":[..]}` for a mono
//! mixdown of the file.

use pcm_extract::io::pcm_decoder::DecodeTransform;
use pcm_extract::io::source::FfmpegSource;
use pcm_extract::io::stream::PcmStream;
use pcm_extract::preprocessing::level::PeakProcessor;
use pcm_extract::ExtractConfig;
use serde_json::json;
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("Usage: waveform <file> [points_per_second]");
        std::process::exit(2);
    };
    let points_per_second = match args.get(1) {
        Some(v) => v.parse::<u32>()?.max(1),
        None => 50,
    };

    // Let ffmpeg downmix so the peak processor sees a single channel
    let config = ExtractConfig {
        channels: 1,
        sample_rate: 22050,
        ..ExtractConfig::default()
    };
    let window = (config.sample_rate / points_per_second).max(1) as usize;

    let transform =
        DecodeTransform::with_processor(config.decode_config(), PeakProcessor::new(window)?)?;
    let mut child = FfmpegSource::spawn(Path::new(path), &config)?;
    let stdout = child.stdout.take().ok_or("decoder stdout not captured")?;

    let peaks = PcmStream::with_transform(stdout, transform, config.chunk_size)?
        .with_child(child)
        .collect_samples()?;

    let output = json!({
        "sample_rate": config.sample_rate,
        "points_per_second": points_per_second,
        "peaks": peaks,
    });
    println!("{}", output);

    Ok(())
}
