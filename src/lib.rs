pub mod chart;
pub mod config;
pub mod dataset;
pub mod format;
pub mod logging;
pub mod output;
pub mod shape;
