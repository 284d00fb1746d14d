//! Pull-based sample stream over any byte source
//!
//! [`PcmStream`] reads one chunk at a time from a [`Read`] source, runs it
//! through a [`DecodeTransform`] and yields the resulting values one by one.
//! The next chunk is only read once every value of the previous one has been
//! consumed, so a slow consumer pauses the producer.

use std::io::{ErrorKind, Read};
use std::process::Child;

use crate::config::DecodeConfig;
use crate::error::ExtractError;
use crate::io::pcm_decoder::DecodeTransform;
use crate::io::sample_buffer::SampleBuffer;
use crate::preprocessing::processor::{MixAggregate, SampleProcessor};

/// Bytes read per chunk unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Iterator of normalized samples decoded from a byte source
///
/// Yields `Err` at most once; the stream is finished afterwards. When the
/// source is a decoder process, its exit status is checked at end of input
/// and the process is killed if the stream is dropped early.
pub struct PcmStream<R, P = MixAggregate> {
    reader: R,
    transform: DecodeTransform<P>,
    chunk: Vec<u8>,
    pending: SampleBuffer,
    child: Option<Child>,
    done: bool,
}

impl<R: Read> PcmStream<R> {
    /// Decode `reader` with the built-in mixing and aggregation policy
    pub fn new(reader: R, config: DecodeConfig) -> Result<Self, ExtractError> {
        Self::with_transform(reader, DecodeTransform::new(config)?, DEFAULT_CHUNK_SIZE)
    }
}

impl<R: Read, P: SampleProcessor> PcmStream<R, P> {
    /// Decode `reader` through `transform`, reading `chunk_size` bytes at a time
    pub fn with_transform(
        reader: R,
        transform: DecodeTransform<P>,
        chunk_size: usize,
    ) -> Result<Self, ExtractError> {
        if chunk_size == 0 {
            return Err(ExtractError::InvalidInput(
                "Chunk size must be > 0".to_string(),
            ));
        }

        Ok(Self {
            reader,
            transform,
            chunk: vec![0; chunk_size],
            pending: SampleBuffer::new(chunk_size / 2),
            child: None,
            done: false,
        })
    }

    /// Tie the lifetime of a decoder process to this stream
    pub fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }

    /// Drain the stream into a vector, stopping at the first error
    pub fn collect_samples(self) -> Result<Vec<f64>, ExtractError> {
        self.collect()
    }

    /// The underlying decode transform
    pub fn transform(&self) -> &DecodeTransform<P> {
        &self.transform
    }

    /// Read and decode the next chunk into the pending buffer
    fn fill(&mut self) -> Result<(), ExtractError> {
        debug_assert!(self.pending.is_drained());

        let read = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.done = true;
            self.transform.finish(self.pending.refill());
            self.wait_child()?;
            log::debug!("PCM stream reached end of input");
            return Ok(());
        }

        self.transform
            .process_chunk(&self.chunk[..read], self.pending.refill());
        Ok(())
    }

    fn wait_child(&mut self) -> Result<(), ExtractError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        if !status.success() {
            log::warn!("Decoder process exited with {}", status);
            return Err(ExtractError::DecoderProcess(format!(
                "Decoder exited with {}",
                status
            )));
        }
        Ok(())
    }
}

impl<R: Read, P: SampleProcessor> Iterator for PcmStream<R, P> {
    type Item = Result<f64, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.pending.next_sample() {
                return Some(Ok(value));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.fill() {
                self.done = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<R, P> Drop for PcmStream<R, P> {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited processes make kill fail; reaping is what matters
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl<R, P> std::fmt::Debug for PcmStream<R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcmStream")
            .field("chunk_size", &self.chunk.len())
            .field("child", &self.child.as_ref().map(Child::id))
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
