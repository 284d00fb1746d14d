//! Integration tests for PCM extraction

use std::io::Cursor;

use pcm_extract::io::pcm_decoder::DecodeTransform;
use pcm_extract::preprocessing::level::PeakProcessor;
use pcm_extract::{
    open_stream, DecodeConfig, ExtractConfig, ExtractError, PcmStream, TailPolicy,
};

/// Write interleaved i16 samples to an in-memory WAV file
fn build_wav(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("WAV header");
        for &s in samples {
            writer.write_sample(s).expect("WAV sample");
        }
        writer.finalize().expect("WAV finalize");
    }
    cursor.into_inner()
}

/// Reference decoding through hound, normalized the same way
fn hound_samples(wav: &[u8]) -> (Vec<f64>, u16) {
    let mut reader = hound::WavReader::new(Cursor::new(wav)).expect("WAV reader");
    let channels = reader.spec().channels;
    let samples = reader
        .samples::<i16>()
        .map(|s| s.expect("WAV sample") as f64 / 32767.0)
        .collect();
    (samples, channels)
}

/// Two-tone stereo test signal
fn stereo_signal(frames: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|i| {
            let t = i as f64 / 44100.0;
            let left = (t * 440.0 * 2.0 * std::f64::consts::PI).sin() * 20000.0;
            let right = (t * 660.0 * 2.0 * std::f64::consts::PI).sin() * 12000.0;
            [left as i16, right as i16]
        })
        .collect()
}

/// PCM stream positioned at the data chunk of a WAV file
fn wav_stream(wav: &[u8], config: DecodeConfig, chunk_size: usize) -> PcmStream<Cursor<&[u8]>> {
    let reader = hound::WavReader::new(Cursor::new(wav)).expect("WAV reader");
    let data = reader.into_inner();
    let transform = DecodeTransform::new(config).expect("valid config");
    PcmStream::with_transform(data, transform, chunk_size).expect("valid chunk size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_data_matches_hound() {
        let wav = build_wav(&stereo_signal(2000), 2, 44100);
        let (expected, channels) = hound_samples(&wav);
        assert_eq!(channels, 2);

        for chunk_size in [1, 3, 4096] {
            let samples = wav_stream(&wav, DecodeConfig::default(), chunk_size)
                .collect_samples()
                .expect("decode should succeed");
            assert_eq!(samples, expected, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn test_wav_mixed_to_mono() {
        let wav = build_wav(&stereo_signal(1000), 2, 44100);
        let (reference, _) = hound_samples(&wav);
        let expected: Vec<f64> = reference.chunks(2).map(|f| (f[0] + f[1]) / 2.0).collect();

        let config = DecodeConfig {
            mixed: true,
            ..DecodeConfig::default()
        };
        let samples = wav_stream(&wav, config, 333).collect_samples().unwrap();
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_wav_aggregated_waveform() {
        let frames = 1000;
        let aggregate = 64;
        let wav = build_wav(&stereo_signal(frames), 2, 44100);

        let config = DecodeConfig {
            aggregate,
            ..DecodeConfig::default()
        };
        let samples = wav_stream(&wav, config.clone(), 1024)
            .collect_samples()
            .unwrap();
        // Incomplete windows are dropped
        assert_eq!(samples.len(), (frames / aggregate) * 2);

        let flushed = wav_stream(
            &wav,
            DecodeConfig {
                tail: TailPolicy::Flush,
                ..config
            },
            1024,
        )
        .collect_samples()
        .unwrap();
        assert_eq!(flushed.len(), samples.len() + 2);
        assert_eq!(&flushed[..samples.len()], &samples[..]);
    }

    #[test]
    fn test_aggregate_matches_window_average() {
        let frames = 300;
        let n = 10;
        let signal = stereo_signal(frames);
        let wav = build_wav(&signal, 2, 44100);

        let config = DecodeConfig {
            aggregate: n,
            ..DecodeConfig::default()
        };
        let samples = wav_stream(&wav, config, 77).collect_samples().unwrap();

        let right: Vec<f64> = samples.iter().skip(1).step_by(2).copied().collect();
        for (k, value) in right.iter().enumerate() {
            let expected = signal
                .iter()
                .skip(1)
                .step_by(2)
                .skip(k * n)
                .take(n)
                .map(|&s| s as f64 / 32767.0)
                .sum::<f64>()
                / n as f64;
            assert!((value - expected).abs() < 1e-12, "window {}", k);
        }
    }

    #[test]
    fn test_peak_waveform_from_wav() {
        let wav = build_wav(&stereo_signal(4410), 2, 44100);
        let reader = hound::WavReader::new(Cursor::new(&wav[..])).unwrap();
        let transform = DecodeTransform::with_processor(
            DecodeConfig::default(),
            PeakProcessor::new(441).unwrap(),
        )
        .unwrap();
        let peaks = PcmStream::with_transform(reader.into_inner(), transform, 4096)
            .unwrap()
            .collect_samples()
            .unwrap();

        assert_eq!(peaks.len(), 20);
        // 10 ms windows contain several full cycles of both tones
        for pair in peaks.chunks(2) {
            assert!((pair[0] - 20000.0 / 32767.0).abs() < 0.01);
            assert!((pair[1] - 12000.0 / 32767.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_open_stream_missing_decoder() {
        let config = ExtractConfig {
            ffmpeg_path: "pcm-extract-missing-ffmpeg".to_string(),
            ..ExtractConfig::default()
        };
        let err = open_stream("does-not-matter.wav", &config).unwrap_err();
        assert!(matches!(err, ExtractError::DecoderProcess(_)));
    }

    #[test]
    fn test_open_stream_invalid_config() {
        let config = ExtractConfig {
            aggregate: 0,
            ..ExtractConfig::default()
        };
        let err = open_stream("does-not-matter.wav", &config).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_decoder_failure_status_ends_stream() {
        let config = ExtractConfig {
            ffmpeg_path: "false".to_string(),
            ..ExtractConfig::default()
        };
        let items: Vec<_> = open_stream("input.wav", &config)
            .expect("decoder should start")
            .collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ExtractError::DecoderProcess(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_decoder_success_without_output() {
        let config = ExtractConfig {
            ffmpeg_path: "true".to_string(),
            ..ExtractConfig::default()
        };
        let samples = open_stream("input.wav", &config)
            .expect("decoder should start")
            .collect_samples()
            .expect("clean exit is not an error");
        assert!(samples.is_empty());
    }
}
