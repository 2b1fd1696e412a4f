//! UI layer for desktop GUI: app shell, season/race pickers, and results table.

pub mod app;
pub mod pickers;
pub mod results_table;

pub use app::{ResultsApp, StartupConfig};
