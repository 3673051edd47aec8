//! Chart widgets drawn straight into a ratatui buffer.

pub mod bar_chart;
pub mod box_plot;
