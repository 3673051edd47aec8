//! Data layer for the game sales analysis.
//!
//! Loads the sales CSV, cleans it into a typed table, groups and summarizes
//! records, and runs the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod filters;
pub mod reader;
pub mod stats;
pub mod writer;

pub use sales_core as core;
