//! Pluggable per-sample processing
//!
//! The decode transform turns bytes into normalized samples and hands each one
//! to a [`SampleProcessor`], which decides what (if anything) to emit. The
//! default [`MixAggregate`] implements channel mixing followed by temporal
//! aggregation; other strategies (peak, RMS, closures) replace it without
//! touching the byte decoding.
//!
//! # Example
//!
//! ```
//! use pcm_extract::io::pcm_decoder::DecodeTransform;
//! use pcm_extract::preprocessing::processor::from_fn;
//! use pcm_extract::DecodeConfig;
//!
//! // Keep only the left channel, inverted
//! let left_only = from_fn(|sample, channel, out| {
//!     if channel == 0 {
//!         out.emit(-sample);
//!     }
//! });
//! let mut transform = DecodeTransform::with_processor(DecodeConfig::default(), left_only)?;
//! let samples = transform.decode_chunk(&[0x00, 0x40, 0x00, 0xC0]);
//! assert_eq!(samples, vec![-16384.0 / 32767.0]);
//! # Ok::<(), pcm_extract::ExtractError>(())
//! ```

use crate::config::DecodeConfig;
use crate::preprocessing::aggregation::Aggregator;
use crate::preprocessing::channel_mixer::MixAccumulator;

/// Output handle given to processors for the duration of one call
#[derive(Debug)]
pub struct Emitter<'a> {
    out: &'a mut Vec<f64>,
}

impl<'a> Emitter<'a> {
    /// Wrap an output buffer; emitted values are appended to it
    pub fn new(out: &'a mut Vec<f64>) -> Self {
        Self { out }
    }

    /// Emit one output value
    #[inline]
    pub fn emit(&mut self, value: f64) {
        self.out.push(value);
    }
}

/// Strategy receiving every decoded sample of a stream
pub trait SampleProcessor {
    /// Prepare per-stream state; called once before the first sample and again
    /// after [`DecodeTransform::finish`](crate::io::pcm_decoder::DecodeTransform::finish)
    fn init(&mut self, config: &DecodeConfig);

    /// Handle one normalized sample belonging to input `channel`
    fn process_sample(&mut self, sample: f64, channel: usize, out: &mut Emitter<'_>);

    /// Emit whatever partial state is pending at end of stream
    ///
    /// Only called under [`TailPolicy::Flush`](crate::config::TailPolicy::Flush).
    fn flush(&mut self, _out: &mut Emitter<'_>) {}
}

/// Default policy: optional channel mixing, then per-channel aggregation
#[derive(Debug, Clone, Default)]
pub struct MixAggregate {
    mixer: Option<MixAccumulator>,
    aggregator: Option<Aggregator>,
}

impl MixAggregate {
    /// Samples waiting for their frame to complete (always 0 when not mixing)
    pub fn pending_mix(&self) -> usize {
        self.mixer.as_ref().map_or(0, MixAccumulator::pending)
    }

    /// Values waiting in `channel`'s aggregation window
    pub fn pending_aggregate(&self, channel: usize) -> usize {
        self.aggregator.as_ref().map_or(0, |agg| agg.pending(channel))
    }

    fn aggregate(&mut self, value: f64, channel: usize, out: &mut Emitter<'_>) {
        if let Some(aggregator) = self.aggregator.as_mut() {
            if let Some(average) = aggregator.push(channel, value) {
                out.emit(average);
            }
        }
    }
}

impl SampleProcessor for MixAggregate {
    fn init(&mut self, config: &DecodeConfig) {
        self.mixer = config.mixed.then(|| MixAccumulator::new(config.channels));
        self.aggregator = Some(Aggregator::new(config.output_channels(), config.aggregate));
    }

    fn process_sample(&mut self, sample: f64, channel: usize, out: &mut Emitter<'_>) {
        match self.mixer.as_mut() {
            Some(mixer) => {
                if let Some(mixed) = mixer.push(sample) {
                    self.aggregate(mixed, 0, out);
                }
            }
            None => self.aggregate(sample, channel, out),
        }
    }

    fn flush(&mut self, out: &mut Emitter<'_>) {
        if let Some(partial) = self.mixer.as_mut().and_then(MixAccumulator::take_partial) {
            self.aggregate(partial, 0, out);
        }
        if let Some(aggregator) = self.aggregator.as_mut() {
            for value in aggregator.take_partials() {
                out.emit(value);
            }
        }
    }
}

/// Processor backed by a closure
pub struct FnProcessor<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcessor").finish_non_exhaustive()
    }
}

/// Build a processor from `f(sample, channel, emitter)`
pub fn from_fn<F>(f: F) -> FnProcessor<F>
where
    F: FnMut(f64, usize, &mut Emitter<'_>),
{
    FnProcessor { f }
}

impl<F> SampleProcessor for FnProcessor<F>
where
    F: FnMut(f64, usize, &mut Emitter<'_>),
{
    fn init(&mut self, _config: &DecodeConfig) {}

    fn process_sample(&mut self, sample: f64, channel: usize, out: &mut Emitter<'_>) {
        (self.f)(sample, channel, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TailPolicy;

    fn run(processor: &mut impl SampleProcessor, samples: &[(f64, usize)]) -> Vec<f64> {
        let mut out = Vec::new();
        let mut emitter = Emitter::new(&mut out);
        for &(sample, channel) in samples {
            processor.process_sample(sample, channel, &mut emitter);
        }
        out
    }

    fn config(channels: usize, mixed: bool, aggregate: usize) -> DecodeConfig {
        DecodeConfig {
            channels,
            mixed,
            aggregate,
            tail: TailPolicy::Drop,
        }
    }

    #[test]
    fn test_passthrough() {
        let mut p = MixAggregate::default();
        p.init(&config(2, false, 1));
        let out = run(&mut p, &[(0.1, 0), (0.2, 1), (0.3, 0)]);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_mix_then_aggregate() {
        let mut p = MixAggregate::default();
        p.init(&config(2, true, 2));
        // Frames average to 0.2 and 0.4, aggregated to 0.3
        let out = run(&mut p, &[(0.1, 0), (0.3, 1), (0.3, 0)]);
        assert!(out.is_empty());
        assert_eq!(p.pending_mix(), 1);
        assert_eq!(p.pending_aggregate(0), 1);
        let out = run(&mut p, &[(0.5, 1)]);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_flush_partial_mix_and_aggregate() {
        let mut p = MixAggregate::default();
        p.init(&config(2, true, 4));
        let out = run(&mut p, &[(0.2, 0), (0.4, 1), (0.8, 0)]);
        assert!(out.is_empty());

        let mut out = Vec::new();
        p.flush(&mut Emitter::new(&mut out));
        // Pending window holds 0.3 (full frame) and 0.8 (half frame)
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.55).abs() < 1e-12);
        assert_eq!(p.pending_mix(), 0);
        assert_eq!(p.pending_aggregate(0), 0);
    }

    #[test]
    fn test_init_resets_state() {
        let mut p = MixAggregate::default();
        p.init(&config(2, false, 3));
        run(&mut p, &[(0.1, 0), (0.1, 1)]);
        p.init(&config(2, false, 3));
        assert_eq!(p.pending_aggregate(0), 0);
        assert_eq!(p.pending_aggregate(1), 0);
    }

    #[test]
    fn test_closure_processor() {
        let mut seen = 0usize;
        {
            let mut p = from_fn(|sample: f64, channel: usize, out: &mut Emitter<'_>| {
                seen += 1;
                if channel == 1 {
                    out.emit(sample * 2.0);
                }
            });
            let out = run(&mut p, &[(0.1, 0), (0.2, 1), (0.3, 0), (0.4, 1)]);
            assert_eq!(out, vec![0.4, 0.8]);
        }
        assert_eq!(seen, 4);
    }
}
