//! The paced producer loop and its consumer-facing handle.
//!
//! [`GenerationPipeline`] owns the current generation, a
//! [`LifeEngine`], and a [`GenerationQueue`]. One thread calls
//! [`run`](GenerationPipeline::run) (or [`spawn`](GenerationPipeline::spawn)
//! starts one); it computes generations until [`stop`](GenerationPipeline::stop)
//! and publishes each as an `Arc<Generation>`. Any number of consumers
//! poll with [`try_get_next`](GenerationPipeline::try_get_next) or a
//! [`GenerationConsumer`]; nothing on the consumer side blocks.
//!
//! # Frame lifecycle
//!
//! 1. Compose the current generation and advance it (panics caught).
//!    A failed or panicking frame is logged, counted and skipped.
//! 2. Publish the new generation and make it current.
//! 3. Pause for the rest of the frame budget, plus a backpressure penalty
//!    while the backlog exceeds its threshold. `stop` cuts the pause short.
//! 4. Fold the frame time into the rolling average and metrics.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, Thread};
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::config::PipelineConfig;
use crate::conway::ConwayEngine;
use crate::engine::{LifeEngine, SeedMode};
use crate::error::{ConfigError, PipelineError, StepError};
use crate::generation::Generation;
use crate::metrics::{MetricsRecorder, PipelineMetrics};
use crate::pacing::FramePacer;
use crate::queue::{GenerationConsumer, GenerationQueue};

/// Name given to the thread started by [`GenerationPipeline::spawn`].
pub const PRODUCER_THREAD_NAME: &str = "petri-producer";

// ── PipelineState ─────────────────────────────────────────────────

/// Lifecycle of a pipeline. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed; the producer loop has not started.
    Idle,
    /// The producer loop is running.
    Running,
    /// The producer loop has exited, or `stop` was called before it began.
    Stopped,
}

// ── GenerationPipeline ────────────────────────────────────────────

/// Paced, backpressured producer of generations.
///
/// ```
/// use std::sync::Arc;
/// use petri_engine::{GenerationPipeline, PipelineConfig};
///
/// let pipeline = Arc::new(GenerationPipeline::new(PipelineConfig {
///     target_frame_ms: 1,
///     ..PipelineConfig::default()
/// }).unwrap());
/// pipeline.set_cell_at(0, 0, true);
///
/// let producer = Arc::clone(&pipeline).spawn().unwrap();
/// let seed = loop {
///     if let Some(generation) = pipeline.try_get_next() {
///         break generation;
///     }
///     std::thread::yield_now();
/// };
/// assert_eq!(seed.id().0, 0);
/// assert!(seed.live().get(0, 0));
///
/// pipeline.stop();
/// producer.join().unwrap().unwrap();
/// ```
pub struct GenerationPipeline {
    config: PipelineConfig,
    engine: Box<dyn LifeEngine>,
    current: Mutex<Arc<Generation>>,
    queue: GenerationQueue,
    metrics: MetricsRecorder,
    state: Mutex<PipelineState>,
    stop_flag: AtomicBool,
    /// The thread inside `run`, so `stop` can wake it from a pause.
    producer: Mutex<Option<Thread>>,
}

// Compile-time assertion: the pipeline is shared with its producer thread.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<GenerationPipeline>();
};

impl GenerationPipeline {
    /// A pipeline running Conway's rule over an empty board.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        Self::with_engine(config, ConwayEngine::default())
    }

    /// A pipeline running `engine` over an empty board.
    pub fn with_engine(
        config: PipelineConfig,
        engine: impl LifeEngine,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let queue = GenerationQueue::with_cap(config.max_backlog);
        Ok(Self {
            config,
            engine: Box::new(engine),
            current: Mutex::new(Arc::new(Generation::default())),
            queue,
            metrics: MetricsRecorder::default(),
            state: Mutex::new(PipelineState::Idle),
            stop_flag: AtomicBool::new(false),
            producer: Mutex::new(None),
        })
    }

    // ── Board access ──────────────────────────────────────────────

    /// Replace the current generation, deltas included.
    ///
    /// Only allowed before the producer starts.
    pub fn initialize(&self, generation: Generation) -> Result<(), PipelineError> {
        let state = lock(&self.state);
        match *state {
            PipelineState::Idle => {
                *lock(&self.current) = Arc::new(generation);
                Ok(())
            }
            PipelineState::Running => Err(PipelineError::AlreadyRunning),
            PipelineState::Stopped => Err(PipelineError::AlreadyStopped),
        }
    }

    /// Liveness of `(x, y)` on the current live board (deltas ignored).
    pub fn get_cell_at(&self, x: i32, y: i32) -> bool {
        lock(&self.current).live().get(x, y)
    }

    /// Set the liveness of `(x, y)` on the current live board.
    ///
    /// The edit is one critical section. If a consumer still holds the
    /// current snapshot, the board is cloned first and the consumer's copy
    /// is untouched. Edits made while the producer is computing a frame
    /// are superseded when that frame is published.
    pub fn set_cell_at(&self, x: i32, y: i32, alive: bool) {
        let mut current = lock(&self.current);
        Arc::make_mut(&mut current).live_mut().set(x, y, alive);
    }

    /// The current generation.
    pub fn current_generation(&self) -> Arc<Generation> {
        Arc::clone(&lock(&self.current))
    }

    // ── Consumer side ─────────────────────────────────────────────

    /// Oldest published generation not yet taken, without blocking.
    pub fn try_get_next(&self) -> Option<Arc<Generation>> {
        self.queue.try_pop()
    }

    /// A cloneable handle for polling from other threads.
    pub fn consumer(&self) -> GenerationConsumer {
        self.queue.consumer()
    }

    // ── Control ───────────────────────────────────────────────────

    /// Run the producer loop on the calling thread until [`stop`](Self::stop).
    ///
    /// Publishes the current generation first, so consumers always see the
    /// seed. Fails without doing anything unless the pipeline is `Idle`.
    pub fn run(&self) -> Result<(), PipelineError> {
        self.begin()?;
        info!(
            "pipeline started: engine={}, target_frame_ms={}, start_from_previous={}",
            self.engine.name(),
            self.config.target_frame_ms,
            self.config.start_from_previous,
        );

        self.publish(self.current_generation());

        let seed_mode = self.config.seed_mode();
        let mut pacer = FramePacer::new(&self.config);
        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }
            let frame_start = Instant::now();

            // 1-2. Advance and publish.
            let current = self.current_generation();
            match self.advance(&current, seed_mode) {
                Ok(next) => {
                    let next = Arc::new(next);
                    *lock(&self.current) = Arc::clone(&next);
                    self.publish(next);
                }
                Err(e) => {
                    warn!("discarding generation {}: {e}", current.id().next());
                    self.metrics.record_fault();
                }
            }

            // 3. Pace.
            let elapsed = frame_start.elapsed();
            let pause = pacer.pause(elapsed, self.queue.len());
            if pause.is_backpressured() {
                debug!(
                    "backpressure: backlog {} above {}, pausing extra {:?}",
                    self.queue.len(),
                    self.config.backpressure.backlog_threshold,
                    pause.backpressure,
                );
                self.metrics.record_backpressure();
            }
            self.sleep(pause.total());

            // 4. Account.
            pacer.record(elapsed);
            let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
            self.metrics.record_frame(elapsed_us, pacer.average_ms());
        }

        self.finish();
        Ok(())
    }

    /// Run the producer loop on a new thread named
    /// [`PRODUCER_THREAD_NAME`].
    ///
    /// The handle yields `run`'s result.
    pub fn spawn(self: Arc<Self>) -> Result<JoinHandle<Result<(), PipelineError>>, PipelineError> {
        thread::Builder::new()
            .name(PRODUCER_THREAD_NAME.into())
            .spawn(move || self.run())
            .map_err(|e| PipelineError::ThreadSpawnFailed {
                reason: format!("{PRODUCER_THREAD_NAME}: {e}"),
            })
    }

    /// Ask the producer loop to exit.
    ///
    /// The flag is checked at the top of every frame; a pacing pause in
    /// progress is cut short. A pipeline that never started becomes
    /// `Stopped` immediately. Idempotent.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        {
            let mut state = lock(&self.state);
            if *state == PipelineState::Idle {
                *state = PipelineState::Stopped;
            }
        }
        if let Some(producer) = lock(&self.producer).as_ref() {
            producer.unpark();
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        *lock(&self.state)
    }

    /// Snapshot of the producer's counters.
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.snapshot(self.queue.len())
    }

    /// Rolling average frame compute time, in milliseconds.
    pub fn average_frame_ms(&self) -> u64 {
        self.metrics.average_frame_ms()
    }

    /// The validated configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The engine computing each generation.
    pub fn engine(&self) -> &dyn LifeEngine {
        self.engine.as_ref()
    }

    // ── Internals ─────────────────────────────────────────────────

    /// `Idle → Running`, registering the calling thread for `stop` wake-ups.
    fn begin(&self) -> Result<(), PipelineError> {
        let mut state = lock(&self.state);
        match *state {
            PipelineState::Idle => {}
            PipelineState::Running => return Err(PipelineError::AlreadyRunning),
            PipelineState::Stopped => return Err(PipelineError::AlreadyStopped),
        }
        *state = PipelineState::Running;
        *lock(&self.producer) = Some(thread::current());
        Ok(())
    }

    fn finish(&self) {
        lock(&self.producer).take();
        *lock(&self.state) = PipelineState::Stopped;
        let m = self.metrics();
        info!(
            "pipeline stopped: published={}, faults={}, backlog={}",
            m.generations_published, m.faults, m.backlog,
        );
    }

    /// One engine step with panics turned into [`StepError::EnginePanicked`].
    fn advance(&self, current: &Generation, seed: SeedMode) -> Result<Generation, StepError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.engine.advance(current, seed)))
            .unwrap_or_else(|payload| {
                Err(StepError::EnginePanicked {
                    name: self.engine.name().to_owned(),
                    message: panic_message(payload.as_ref()),
                })
            })
    }

    fn publish(&self, generation: Arc<Generation>) {
        trace!(
            "publishing generation {} ({} live)",
            generation.id(),
            generation.live().len()
        );
        let evicted = self.queue.push(generation);
        if evicted > 0 {
            debug!("backlog cap reached, evicted {evicted} oldest generation(s)");
        }
        self.metrics.record_publish(evicted);
    }

    /// Park until `duration` has passed or `stop` is called.
    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

impl fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("engine", &self.engine.name())
            .field("state", &self.state())
            .field("config", &self.config)
            .field("backlog", &self.queue.len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
