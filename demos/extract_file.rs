//! Example: Extract PCM samples from a single file
//!
//! Usage:
//!   cargo run --release --example extract_file -- \
//!       [--config config.json] [--mixed] [--aggregate N] <file>
//!
//! Requires `ffmpeg` on the PATH (or `ffmpeg_path` in the JSON config).

use pcm_extract::{open_stream, ExtractConfig};
use std::env;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = ExtractConfig::default();
    let mut path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--config" => {
                let file = args.first().ok_or("--config requires a path")?;
                config = serde_json::from_str(&std::fs::read_to_string(file)?)?;
                args.remove(0);
            }
            "--mixed" => config.mixed = true,
            "--aggregate" => {
                config.aggregate = args
                    .first()
                    .ok_or("--aggregate requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: extract_file [--config FILE] [--mixed] [--aggregate N] <file>\n\
                     \n\
                     --config FILE  JSON extraction config\n\
                     --mixed        Average all channels into one\n\
                     --aggregate N  Average every N samples per channel\n"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let t0 = Instant::now();
    let mut count = 0usize;
    let mut peak = 0.0f64;
    let mut sum_sq = 0.0f64;

    for sample in open_stream(&path, &config)? {
        let sample = sample?;
        count += 1;
        peak = peak.max(sample.abs());
        sum_sq += sample * sample;
    }

    let rms = if count > 0 { (sum_sq / count as f64).sqrt() } else { 0.0 };
    let output_channels = config.decode_config().output_channels();

    println!("Extraction Results:");
    println!("  File: {}", path);
    println!("  Values: {} ({} per channel)", count, count / output_channels);
    println!("  Peak: {:.4}", peak);
    println!("  RMS: {:.4}", rms);
    println!("  Processing time: {:.2} ms", t0.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
