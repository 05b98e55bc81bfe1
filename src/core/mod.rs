//! Core data types, loading, slicing and rendering.

pub mod classify;
pub mod loaders;
pub mod report;
pub mod writers;

pub use classify::{classify, is_numeric, Cell};
pub use loaders::{load_series, FlatSeries, LoaderError, RawTable};
pub use report::{build_report, MeasurementBlock, Report, ReportHeader};
pub use writers::{render_report, write_report, write_report_file, WriteError};
