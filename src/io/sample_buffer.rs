//! Output buffering between the decode transform and a pulling consumer

/// Values produced by one decoded chunk, handed out one at a time
///
/// Holds at most the output of a single chunk; it is refilled only after
/// every value has been taken.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    /// Buffer data
    data: Vec<f64>,
    /// Next value to hand out
    position: usize,
}

impl SampleBuffer {
    /// Create a new sample buffer
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            position: 0,
        }
    }

    /// Next buffered value, if any are left
    pub fn next_sample(&mut self) -> Option<f64> {
        let value = self.data.get(self.position).copied()?;
        self.position += 1;
        Some(value)
    }

    /// Whether every buffered value has been handed out
    pub fn is_drained(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Discard buffered values and return the storage for refilling
    pub fn refill(&mut self) -> &mut Vec<f64> {
        self.clear();
        &mut self.data
    }

    /// Discard all buffered values
    pub fn clear(&mut self) {
        self.data.clear();
        self.position = 0;
    }
}
