//! Benchmark profiles for the Petri simulation framework.
//!
//! Provides pre-built boards and configs for benchmarking:
//!
//! - [`reference_soup`]: 100x100 random soup (~3.5K live cells)
//! - [`stress_soup`]: 316x316 random soup (~35K live cells)
//! - [`gosper_gun`]: the Gosper glider gun, a long-lived growing pattern
//! - [`unpaced_config`]: a pipeline config with no frame pacing

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use petri_engine::PipelineConfig;
use petri_grid::SparseBoolGrid;
use petri_test_utils::random_soup;

/// Live-cell probability used by the soup profiles.
pub const SOUP_DENSITY: f64 = 0.35;

/// Gosper's glider gun in RLE.
pub const GOSPER_GUN_RLE: &str = "\
#N Gosper glider gun
x = 36, y = 9, rule = B3/S23
24bo$22bobo$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o$2o8bo3bob2o4b
obo$10bo5bo7bo$11bo3bo$12b2o!
";

/// 100x100 soup (10K coordinates).
pub fn reference_soup(seed: u64) -> SparseBoolGrid {
    random_soup(seed, 100, 100, SOUP_DENSITY)
}

/// 316x316 soup (~100K coordinates), 10x the reference profile.
pub fn stress_soup(seed: u64) -> SparseBoolGrid {
    random_soup(seed, 316, 316, SOUP_DENSITY)
}

/// The Gosper glider gun.
pub fn gosper_gun() -> SparseBoolGrid {
    petri_grid::parse_rle(GOSPER_GUN_RLE)
}

/// Pipeline config that never sleeps for pacing and never backs off, so
/// throughput is bounded only by the engine.
pub fn unpaced_config() -> PipelineConfig {
    PipelineConfig {
        target_frame_ms: 0,
        backpressure: petri_engine::BackpressureConfig {
            backlog_threshold: usize::MAX,
            penalty_factor: 1,
        },
        ..PipelineConfig::default()
    }
}
