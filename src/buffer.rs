//! Growable byte sink for HTTP response bodies.

use crate::error::AllocationFailure;
use tracing::debug;

/// Accumulates body chunks in arrival order.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    trace: bool,
}

impl ResponseBuffer {
    /// Create an empty buffer. With `trace` set every append is logged.
    pub fn new(trace: bool) -> Self {
        Self {
            data: Vec::new(),
            trace,
        }
    }

    /// Append a chunk to the end of the buffer.
    ///
    /// Space for the chunk plus one spare byte is reserved up front, so a
    /// failed reservation leaves the existing contents untouched.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), AllocationFailure> {
        let requested = self
            .data
            .len()
            .checked_add(chunk.len())
            .and_then(|n| n.checked_add(1))
            .ok_or(AllocationFailure {
                requested: usize::MAX,
            })?;

        self.data
            .try_reserve(requested - self.data.len())
            .map_err(|_| AllocationFailure { requested })?;
        self.data.extend_from_slice(chunk);

        if self.trace {
            debug!(
                "Received {} bytes from API, total size: {}",
                chunk.len(),
                self.data.len()
            );
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Hand the accumulated bytes to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
