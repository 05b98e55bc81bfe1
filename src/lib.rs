//! Reshape column-oriented survey measurements into pass/measurement reports.
//!
//! This crate provides tools for:
//! - Loading ragged measurement CSV files into a flat, column-major series
//! - Slicing a series by a (measurements per go, passes) grid
//! - Rendering reports one value per line for spreadsheet transcription
//!
//! # Example
//!
//! ```no_run
//! use pass_report::{core::loaders::load_series, core::report::build_report, ReportConfig};
//!
//! let config = ReportConfig::default();
//! let spec = &config.files[0];
//! let series = load_series(spec.path_in(&config.data_dir)).unwrap();
//! let report = build_report(spec, &series);
//! print!("{}", pass_report::core::render_report(&report));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;

pub use config::{ConfigError, GridSpec, ReportConfig};
pub use self::core::loaders::FlatSeries;
pub use self::core::report::Report;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
