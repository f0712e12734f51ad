//! Wastewater health-impact dashboard.
//!
//! The `data` module holds the pipeline (load → filter → aggregate /
//! select series); the binary renders its output with egui.

pub mod config;
pub mod data;
pub mod error;

pub use error::{CriteriaError, LoadError};
