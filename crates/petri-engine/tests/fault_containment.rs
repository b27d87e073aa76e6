//! Integration test: engine faults stay inside the producer.
//!
//! A failing or panicking engine must never kill the producer thread or
//! publish a half-computed board: faulted frames are counted and skipped,
//! the current generation stays put, and `stop` still ends the run
//! cleanly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use petri_engine::{
    Generation, GenerationId, GenerationPipeline, LifeEngine, PipelineConfig, PipelineState,
    SeedMode, StepError,
};
use petri_test_utils::{blinker_horizontal, block, FailingEngine, PanickingEngine};

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        target_frame_ms: 1,
        ..PipelineConfig::default()
    }
}

fn wait_for_faults(pipeline: &GenerationPipeline, n: u64) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while pipeline.metrics().faults < n {
        assert!(Instant::now() < deadline, "timed out waiting for {n} faults");
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn drain_ids(pipeline: &GenerationPipeline) -> Vec<u64> {
    std::iter::from_fn(|| pipeline.try_get_next())
        .map(|g| g.id().0)
        .collect()
}

#[test]
fn failing_engine_publishes_only_good_frames() {
    let pipeline = Arc::new(
        GenerationPipeline::with_engine(fast_config(), FailingEngine::new(3)).unwrap(),
    );
    pipeline.initialize(Generation::seed(block())).unwrap();
    let producer = Arc::clone(&pipeline).spawn().unwrap();
    wait_for_faults(&pipeline, 5);
    assert_eq!(pipeline.state(), PipelineState::Running);
    pipeline.stop();
    assert_eq!(producer.join().unwrap(), Ok(()));

    assert_eq!(drain_ids(&pipeline), vec![0, 1, 2, 3]);
    let m = pipeline.metrics();
    assert_eq!(m.generations_published, 4);
    assert!(m.faults >= 5);

    // The last good generation is still current and unchanged.
    let current = pipeline.current_generation();
    assert_eq!(current.id(), GenerationId(3));
    assert_eq!(current.live(), &block());
}

#[test]
fn panicking_engine_is_contained() {
    let pipeline = Arc::new(
        GenerationPipeline::with_engine(fast_config(), PanickingEngine::new(1)).unwrap(),
    );
    pipeline
        .initialize(Generation::seed(blinker_horizontal()))
        .unwrap();
    let producer = Arc::clone(&pipeline).spawn().unwrap();
    wait_for_faults(&pipeline, 3);

    // The board can still be edited while every frame panics.
    pipeline.set_cell_at(10, 10, true);
    assert!(pipeline.get_cell_at(10, 10));

    pipeline.stop();
    assert_eq!(producer.join().unwrap(), Ok(()));
    assert_eq!(pipeline.state(), PipelineState::Stopped);
    assert_eq!(drain_ids(&pipeline), vec![0, 1]);
    assert!(pipeline.get_cell_at(10, 10));
}

/// Fails on odd calls only, so faults and good frames interleave.
struct Intermittent(std::sync::atomic::AtomicU64);

impl LifeEngine for Intermittent {
    fn name(&self) -> &str {
        "intermittent"
    }

    fn step(
        &self,
        current: &petri_grid::SparseBoolGrid,
        next: &mut petri_grid::SparseBoolGrid,
    ) -> Result<(), StepError> {
        let n = self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if n % 2 == 1 {
            return Err(StepError::EngineFailed {
                name: self.name().into(),
                reason: format!("odd call {n}"),
            });
        }
        next.add(current);
        Ok(())
    }
}

#[test]
fn ids_stay_contiguous_across_faults() {
    let pipeline = Arc::new(
        GenerationPipeline::with_engine(
            fast_config(),
            Intermittent(std::sync::atomic::AtomicU64::new(0)),
        )
        .unwrap(),
    );
    let producer = Arc::clone(&pipeline).spawn().unwrap();
    wait_for_faults(&pipeline, 4);
    pipeline.stop();
    producer.join().unwrap().unwrap();

    let ids = drain_ids(&pipeline);
    assert!(ids.len() >= 5);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(*id, i as u64);
    }
}

#[test]
fn mock_engines_behave_as_labelled_outside_the_pipeline() {
    let seed = Generation::seed(block());
    let failing = FailingEngine::new(1);
    assert!(failing.advance(&seed, SeedMode::Empty).is_ok());
    assert!(matches!(
        failing.advance(&seed, SeedMode::Empty),
        Err(StepError::EngineFailed { .. })
    ));
    assert_eq!(failing.calls(), 2);
}
