//! Non-blocking FIFO hand-off of published generations.
//!
//! [`GenerationQueue`] is single-producer, multi-consumer: the pipeline's
//! producer pushes `Arc<Generation>` snapshots and any thread pops them.
//! Neither side ever blocks. The queue is unbounded at the channel level;
//! the producer bounds it softly through backpressure and, optionally,
//! hard through a cap that evicts the oldest entries.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::generation::Generation;

/// FIFO of published generations.
#[derive(Debug)]
pub struct GenerationQueue {
    tx: Sender<Arc<Generation>>,
    rx: Receiver<Arc<Generation>>,
    cap: Option<usize>,
}

// Compile-time assertion: the queue is shared between producer and
// consumers.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<GenerationQueue>();
    assert::<GenerationConsumer>();
};

impl GenerationQueue {
    /// An uncapped queue.
    pub fn new() -> Self {
        Self::with_cap(None)
    }

    /// A queue holding at most `cap` generations, if `Some`.
    pub fn with_cap(cap: Option<usize>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx, cap }
    }

    /// Append a generation. Never blocks.
    ///
    /// Returns how many of the oldest waiting generations were evicted to
    /// respect the cap (always zero when uncapped).
    pub fn push(&self, generation: Arc<Generation>) -> usize {
        // The queue owns a receiver, so the channel cannot be disconnected.
        let _ = self.tx.send(generation);

        let Some(cap) = self.cap else {
            return 0;
        };
        let mut evicted = 0;
        while self.rx.len() > cap {
            // A consumer may have drained it concurrently.
            if self.rx.try_recv().is_err() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    /// Oldest waiting generation, or `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<Arc<Generation>> {
        self.rx.try_recv().ok()
    }

    /// Number of waiting generations.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// The configured hard cap.
    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    /// A cloneable read-only handle on this queue.
    pub fn consumer(&self) -> GenerationConsumer {
        GenerationConsumer {
            rx: self.rx.clone(),
        }
    }
}

impl Default for GenerationQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer-side handle on a [`GenerationQueue`].
///
/// Handles share the queue: each generation is delivered to exactly one
/// of them, oldest first. Dropping every handle does not affect the
/// producer.
#[derive(Clone, Debug)]
pub struct GenerationConsumer {
    rx: Receiver<Arc<Generation>>,
}

impl GenerationConsumer {
    /// Oldest waiting generation, or `None` if the queue is empty.
    pub fn try_next(&self) -> Option<Arc<Generation>> {
        self.rx.try_recv().ok()
    }

    /// Number of waiting generations.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
