//! Windowed level processors (peak and RMS)
//!
//! Alternatives to the default mix/aggregate policy, useful for waveform
//! rendering and level metering. Each input channel is windowed independently;
//! one value is emitted per channel every `window` samples.

use crate::config::DecodeConfig;
use crate::error::ExtractError;
use crate::preprocessing::processor::{Emitter, SampleProcessor};

/// Per-channel fixed-size windows folding samples into one statistic
#[derive(Debug, Clone)]
struct ChannelWindows {
    window: usize,
    acc: Vec<f64>,
    counts: Vec<usize>,
}

impl ChannelWindows {
    fn new(window: usize) -> Self {
        Self {
            window,
            acc: Vec::new(),
            counts: Vec::new(),
        }
    }

    fn reset(&mut self, channels: usize) {
        self.acc = vec![0.0; channels];
        self.counts = vec![0; channels];
    }

    /// Fold `sample` into `channel`; returns (accumulated, count) when the window is full
    fn push(
        &mut self,
        channel: usize,
        sample: f64,
        fold: impl Fn(f64, f64) -> f64,
    ) -> Option<(f64, usize)> {
        self.acc[channel] = fold(self.acc[channel], sample);
        self.counts[channel] += 1;

        if self.counts[channel] == self.window {
            let full = (self.acc[channel], self.counts[channel]);
            self.acc[channel] = 0.0;
            self.counts[channel] = 0;
            Some(full)
        } else {
            None
        }
    }

    fn drain_partials(&mut self) -> Vec<(f64, usize)> {
        let partials = self
            .acc
            .iter()
            .zip(&self.counts)
            .filter(|(_, &count)| count > 0)
            .map(|(&acc, &count)| (acc, count))
            .collect();
        let channels = self.counts.len();
        self.reset(channels);
        partials
    }
}

fn check_window(window: usize) -> Result<(), ExtractError> {
    if window == 0 {
        return Err(ExtractError::InvalidInput(
            "Window size must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Emits the largest absolute amplitude of every window
#[derive(Debug, Clone)]
pub struct PeakProcessor {
    windows: ChannelWindows,
}

impl PeakProcessor {
    /// Create a peak processor over windows of `window` samples per channel
    pub fn new(window: usize) -> Result<Self, ExtractError> {
        check_window(window)?;
        Ok(Self {
            windows: ChannelWindows::new(window),
        })
    }
}

impl SampleProcessor for PeakProcessor {
    fn init(&mut self, config: &DecodeConfig) {
        self.windows.reset(config.channels);
    }

    fn process_sample(&mut self, sample: f64, channel: usize, out: &mut Emitter<'_>) {
        if let Some((peak, _)) = self.windows.push(channel, sample, |acc, s| acc.max(s.abs())) {
            out.emit(peak);
        }
    }

    fn flush(&mut self, out: &mut Emitter<'_>) {
        for (peak, _) in self.windows.drain_partials() {
            out.emit(peak);
        }
    }
}

/// Emits the root-mean-square amplitude of every window
#[derive(Debug, Clone)]
pub struct RmsProcessor {
    windows: ChannelWindows,
}

impl RmsProcessor {
    /// Create an RMS processor over windows of `window` samples per channel
    pub fn new(window: usize) -> Result<Self, ExtractError> {
        check_window(window)?;
        Ok(Self {
            windows: ChannelWindows::new(window),
        })
    }
}

impl SampleProcessor for RmsProcessor {
    fn init(&mut self, config: &DecodeConfig) {
        self.windows.reset(config.channels);
    }

    fn process_sample(&mut self, sample: f64, channel: usize, out: &mut Emitter<'_>) {
        if let Some((sum_sq, count)) = self.windows.push(channel, sample, |acc, s| acc + s * s) {
            out.emit((sum_sq / count as f64).sqrt());
        }
    }

    fn flush(&mut self, out: &mut Emitter<'_>) {
        for (sum_sq, count) in self.windows.drain_partials() {
            out.emit((sum_sq / count as f64).sqrt());
        }
    }
}
