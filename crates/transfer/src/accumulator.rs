//! Segmented buffer for assembling a file read into memory.

use crate::{MAX_SEGMENTS, MERGE_SEGMENT_SIZE};

/// Append-only byte accumulator.
///
/// Chunks are merged into the last segment while it stays within
/// [`MERGE_SEGMENT_SIZE`]; a chunk that would overflow it opens a new
/// segment. Once more than [`MAX_SEGMENTS`] segments exist they are
/// coalesced into one.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    segments: Vec<Vec<u8>>,
    len: usize,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();

        match self.segments.last_mut() {
            Some(last) if last.len() + chunk.len() <= MERGE_SEGMENT_SIZE => {
                last.extend_from_slice(chunk);
            }
            _ => self.segments.push(chunk.to_vec()),
        }

        if self.segments.len() > MAX_SEGMENTS {
            self.coalesce();
        }
    }

    /// Folds every later segment into the first one. The first segment
    /// grows with `Vec`'s amortized doubling, so earlier bytes are not
    /// copied again on each coalesce.
    fn coalesce(&mut self) {
        let tail = self.segments.split_off(1);
        let Some(base) = self.segments.first_mut() else {
            return;
        };
        base.reserve(tail.iter().map(Vec::len).sum());
        for segment in &tail {
            base.extend_from_slice(segment);
        }
        tracing::trace!(bytes = base.len(), "coalesced read segments");
    }

    /// Total bytes accumulated.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the accumulated bytes as one contiguous buffer.
    pub fn finalize(mut self) -> Vec<u8> {
        match self.segments.len() {
            0 => Vec::new(),
            1 => self.segments.swap_remove(0),
            _ => self.segments.concat(),
        }
    }
}
