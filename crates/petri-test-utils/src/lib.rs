//! Test utilities and mock engines for Petri development.
//!
//! Provides well-known patterns and seeded random soups ([`fixtures`]),
//! plus mock [`LifeEngine`](petri_engine::LifeEngine) implementations
//! ([`engines`]) for exercising the pipeline's fault handling.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engines;
pub mod fixtures;

pub use engines::{FailingEngine, IdentityEngine, PanickingEngine};
pub use fixtures::{
    block, blinker_horizontal, blinker_vertical, glider, live_set, random_soup, GLIDER_RLE,
};
