//! Sparse bit-packed boolean grid for Petri simulations.
//!
//! This is the leaf crate of the Petri workspace. It defines the board
//! representation used by every other crate:
//!
//! - [`SparseBoolGrid`]: an unbounded 2D set of live cells, stored as
//!   ordered rows of 64-bit words. Memory is proportional to the number of
//!   live words, not to the board extent.
//! - [`Cursor`] and [`Cells`]: ordered enumeration (row, then word, then
//!   bit) with structural-modification detection.
//! - [`Bounds`]: the monotone scan rectangle maintained on every write.
//! - [`rle`]: the run-length-encoded pattern loader.
//!
//! # Single-writer contract
//!
//! A grid has exactly one mutator at a time, enforced by `&mut self` on
//! every write. Cross-thread sharing goes through clones, which never share
//! storage with their source.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod cells;
pub mod error;
pub mod grid;
pub mod neighbourhood;
pub mod rle;

pub use bounds::Bounds;
pub use cells::{Cell, Cells, Cursor};
pub use error::GridError;
pub use grid::SparseBoolGrid;
pub use neighbourhood::moore_neighbours;
pub use rle::{parse_rle, parse_rle_pattern, read_rle, RleHeader, RlePattern};
