//! Petri: sparse Game of Life simulation with a paced generation pipeline.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Petri sub-crates. For most users, adding `petri` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use petri::prelude::*;
//!
//! // Load a glider and let the pipeline run it.
//! let pattern = parse_rle_pattern("#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!");
//! let engine = ConwayEngine::for_pattern(&pattern).unwrap();
//!
//! let config = PipelineConfig {
//!     target_frame_ms: 1,
//!     ..PipelineConfig::default()
//! };
//! let pipeline = Arc::new(GenerationPipeline::with_engine(config, engine).unwrap());
//! pipeline.initialize(Generation::seed(pattern.grid)).unwrap();
//!
//! let producer = Arc::clone(&pipeline).spawn().unwrap();
//! let consumer = pipeline.consumer();
//! let mut seen = Vec::new();
//! while seen.len() < 5 {
//!     match consumer.try_next() {
//!         Some(generation) => seen.push(generation),
//!         None => std::thread::yield_now(),
//!     }
//! }
//! pipeline.stop();
//! producer.join().unwrap().unwrap();
//!
//! // After four generations the glider has moved one cell diagonally.
//! let moved: Vec<Cell> = seen[4].live().cells().collect();
//! let start: Vec<Cell> = seen[0].live().cells().collect();
//! assert_eq!(moved.len(), 5);
//! assert!(start.iter().zip(&moved).all(|(a, b)| (b.x, b.y) == (a.x + 1, a.y + 1)));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`grid`] | `petri-grid` | Sparse board, enumeration, RLE loading |
//! | [`engine`] | `petri-engine` | Rules, engines, generation pipeline |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Sparse bit-packed board and RLE loading (`petri-grid`).
///
/// [`grid::SparseBoolGrid`] is the board; [`grid::parse_rle`] and
/// [`grid::read_rle`] load patterns into one.
pub use petri_grid as grid;

/// Rules, engines and the generation pipeline (`petri-engine`).
///
/// [`engine::GenerationPipeline`] runs a [`engine::LifeEngine`] on a
/// producer thread and hands generations to consumers.
pub use petri_engine as engine;

/// Common imports for typical Petri usage.
///
/// ```rust
/// use petri::prelude::*;
/// ```
pub mod prelude {
    // Board
    pub use petri_grid::{parse_rle, parse_rle_pattern, read_rle, Cell, RlePattern, SparseBoolGrid};

    // Engines and rules
    pub use petri_engine::{ConwayEngine, LifeEngine, Rule, SeedMode};

    // Pipeline
    pub use petri_engine::{
        Generation, GenerationConsumer, GenerationId, GenerationPipeline, PipelineConfig,
        PipelineMetrics, PipelineState,
    };

    // Errors
    pub use petri_engine::{ConfigError, PipelineError, StepError};
    pub use petri_grid::GridError;
}
