//! Producer-side counters for the generation pipeline.
//!
//! The producer updates a `MetricsRecorder` with relaxed atomics after
//! every frame; any thread can take a [`PipelineMetrics`] snapshot.
//! Fields are read individually, so a snapshot taken mid-frame may mix
//! values from adjacent frames.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of the pipeline's counters.
///
/// Counters are cumulative since the pipeline was created; timings
/// describe the most recent frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    /// Generations pushed to the queue, including the seed.
    pub generations_published: u64,
    /// Frames discarded because the engine failed or panicked.
    pub faults: u64,
    /// Frames whose pause included a backpressure penalty.
    pub backpressure_events: u64,
    /// Generations evicted from the queue by the hard cap.
    pub evicted_generations: u64,
    /// Compute time of the most recent frame, in microseconds.
    pub last_frame_us: u64,
    /// Rolling average compute time, in milliseconds.
    pub average_frame_ms: u64,
    /// Generations waiting in the queue.
    pub backlog: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    generations_published: AtomicU64,
    faults: AtomicU64,
    backpressure_events: AtomicU64,
    evicted_generations: AtomicU64,
    last_frame_us: AtomicU64,
    average_frame_ms: AtomicU64,
}

impl MetricsRecorder {
    pub(crate) fn record_publish(&self, evicted: usize) {
        self.generations_published.fetch_add(1, Ordering::Relaxed);
        if evicted > 0 {
            self.evicted_generations
                .fetch_add(evicted as u64, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_backpressure(&self) {
        self.backpressure_events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame(&self, last_frame_us: u64, average_frame_ms: u64) {
        self.last_frame_us.store(last_frame_us, Ordering::Relaxed);
        self.average_frame_ms
            .store(average_frame_ms, Ordering::Relaxed);
    }

    pub(crate) fn average_frame_ms(&self) -> u64 {
        self.average_frame_ms.load(Ordering::Relaxed)
    }

    pub(crate) fn snapshot(&self, backlog: usize) -> PipelineMetrics {
        PipelineMetrics {
            generations_published: self.generations_published.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            backpressure_events: self.backpressure_events.load(Ordering::Relaxed),
            evicted_generations: self.evicted_generations.load(Ordering::Relaxed),
            last_frame_us: self.last_frame_us.load(Ordering::Relaxed),
            average_frame_ms: self.average_frame_ms.load(Ordering::Relaxed),
            backlog,
        }
    }
}
