//! Petri GenerationPipeline: a Life board evolving on a background thread.
//!
//! Demonstrates:
//!   1. Loading a pattern (with its rule) from RLE text
//!   2. Starting the paced producer on its own thread
//!   3. Polling generations without blocking, printing a small window
//!   4. Editing a cell while the producer runs
//!   5. Reading metrics and stopping cleanly
//!
//! Run with:
//!   cargo run -p petri-engine --example realtime_pipeline

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use petri_engine::{ConwayEngine, Generation, GenerationPipeline, PipelineConfig};
use petri_grid::{parse_rle_pattern, SparseBoolGrid};

// ─── Pattern ────────────────────────────────────────────────────

const GLIDER: &str = "\
#N Glider
#C Travels one cell diagonally every four generations.
x = 3, y = 3, rule = B3/S23
bo$2bo$3o!
";

const FRAMES: usize = 12;

// ─── Rendering ──────────────────────────────────────────────────

fn render(grid: &SparseBoolGrid, width: i32, height: i32) -> String {
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            out.push(if grid.get(x, y) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

// ─── Main ───────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Petri GenerationPipeline Example ===\n");

    // 1. Parse the pattern; the header's rule picks the engine.
    let pattern = parse_rle_pattern(GLIDER);
    for comment in &pattern.comments {
        println!("  {comment}");
    }
    let engine = ConwayEngine::for_pattern(&pattern)?;
    println!("Rule: {}, {} live cells\n", engine.rule(), pattern.grid.len());

    // 2. Start the producer at 20 frames per second.
    let config = PipelineConfig {
        target_frame_ms: 50,
        ..PipelineConfig::default()
    };
    let pipeline = Arc::new(GenerationPipeline::with_engine(config, engine)?);
    pipeline.initialize(Generation::seed(pattern.grid))?;
    let producer = Arc::clone(&pipeline).spawn()?;

    // 3. Poll. `try_get_next` never blocks, so this loop could just as
    //    well be a render loop doing other work between polls.
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut shown = 0;
    while shown < FRAMES && Instant::now() < deadline {
        let Some(generation) = pipeline.try_get_next() else {
            thread::sleep(Duration::from_millis(5));
            continue;
        };
        println!("generation {}:", generation.id());
        print!("{}", render(generation.live(), 8, 8));
        println!();
        shown += 1;

        // 4. Drop a block in the corner halfway through.
        if shown == FRAMES / 2 {
            for (x, y) in [(6, 0), (7, 0), (6, 1), (7, 1)] {
                pipeline.set_cell_at(x, y, true);
            }
            println!("(added a block at (6, 0))\n");
        }
    }

    // 5. Report and shut down.
    pipeline.stop();
    producer.join().map_err(|_| "producer thread panicked")??;

    let m = pipeline.metrics();
    println!(
        "published={}, faults={}, backpressure_events={}, avg_frame={}ms, backlog={}",
        m.generations_published, m.faults, m.backpressure_events, m.average_frame_ms, m.backlog,
    );
    Ok(())
}
