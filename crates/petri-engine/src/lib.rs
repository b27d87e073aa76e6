//! Life engine and paced generation pipeline for Petri simulations.
//!
//! Builds on [`petri_grid`]'s board to provide:
//!
//! - [`Generation`]: an immutable board snapshot with optional born/dead
//!   deltas.
//! - [`LifeEngine`]: the generation-to-generation transition, with
//!   [`ConwayEngine`] applying any `B.../S...` [`Rule`] across the board.
//! - [`GenerationPipeline`]: a producer loop that advances generations at
//!   a target frame rate, backs off when consumers fall behind, and hands
//!   generations over through a non-blocking FIFO.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod conway;
pub mod engine;
pub mod error;
pub mod generation;
pub mod metrics;
pub mod pacing;
pub mod pipeline;
pub mod queue;
pub mod rule;

pub use config::{BackpressureConfig, PipelineConfig};
pub use conway::ConwayEngine;
pub use engine::{LifeEngine, SeedMode};
pub use error::{ConfigError, PipelineError, RuleError, StepError};
pub use generation::{Generation, GenerationId};
pub use metrics::PipelineMetrics;
pub use pacing::{FramePacer, FramePause};
pub use pipeline::{GenerationPipeline, PipelineState, PRODUCER_THREAD_NAME};
pub use queue::{GenerationConsumer, GenerationQueue};
pub use rule::Rule;
