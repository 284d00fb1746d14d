//! Temporal aggregation
//!
//! Averages `factor` consecutive values of the same channel into one output,
//! reducing the output rate by `factor`. Each channel keeps its own window and
//! resets independently.

/// Per-channel running sums for temporal averaging
#[derive(Debug, Clone)]
pub struct Aggregator {
    factor: usize,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl Aggregator {
    /// Create an aggregator over `channels` independent channels
    pub fn new(channels: usize, factor: usize) -> Self {
        Self {
            factor,
            sums: vec![0.0; channels],
            counts: vec![0; channels],
        }
    }

    /// Add a value on `channel`; returns the window average once `factor` values were seen
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn push(&mut self, channel: usize, value: f64) -> Option<f64> {
        self.sums[channel] += value;
        self.counts[channel] += 1;

        if self.counts[channel] == self.factor {
            let average = self.sums[channel] / self.counts[channel] as f64;
            self.sums[channel] = 0.0;
            self.counts[channel] = 0;
            Some(average)
        } else {
            None
        }
    }

    /// Averages of every incomplete window, in ascending channel order
    ///
    /// Channels with nothing pending are skipped. Resets all windows.
    pub fn take_partials(&mut self) -> Vec<f64> {
        let partials = self
            .sums
            .iter()
            .zip(&self.counts)
            .filter(|(_, &count)| count > 0)
            .map(|(&sum, &count)| sum / count as f64)
            .collect();

        self.sums.iter_mut().for_each(|s| *s = 0.0);
        self.counts.iter_mut().for_each(|c| *c = 0);
        partials
    }

    /// Number of values waiting in `channel`'s window
    pub fn pending(&self, channel: usize) -> usize {
        self.counts[channel]
    }
}
