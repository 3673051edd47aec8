//! Terminal reporting for the game sales analysis.
//!
//! Provides themes, the bar chart and boxplot widgets, printed tables, the
//! text chart plotter and the interactive viewer, all built on top of
//! [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use sales_core as core;
