//! Core types for the game sales analysis.
//!
//! Holds the sales data model, the error taxonomy, command-line settings
//! and the number formatting shared by the data and UI layers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, SalesError};
