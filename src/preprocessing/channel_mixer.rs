//! Channel mixing (N channels to mono)
//!
//! Interleaved samples are summed frame by frame; once a full frame (one
//! sample per channel) has been seen, its average is released and the
//! accumulator starts over.

/// Running sum over the samples of the current frame
#[derive(Debug, Clone)]
pub struct MixAccumulator {
    channels: usize,
    sum: f64,
    count: usize,
}

impl MixAccumulator {
    /// Create an accumulator for frames of `channels` samples
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            sum: 0.0,
            count: 0,
        }
    }

    /// Add one sample; returns the frame average once the frame is complete
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        self.sum += sample;
        self.count += 1;

        if self.count == self.channels {
            let mixed = self.sum / self.count as f64;
            self.reset();
            Some(mixed)
        } else {
            None
        }
    }

    /// Average of an incomplete frame, if any samples are pending
    ///
    /// Resets the accumulator.
    pub fn take_partial(&mut self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let mixed = self.sum / self.count as f64;
        self.reset();
        Some(mixed)
    }

    /// Number of samples accumulated for the current frame
    pub fn pending(&self) -> usize {
        self.count
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}
