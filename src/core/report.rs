//! Pass/measurement slicing of a flat series.
//!
//! A file holding `number_of_passes` repetitions of `measurements_per_go`
//! interleaved quantities is split into one block per (pass, measurement).
//! When the series length is not a multiple of the grid, every block falls
//! back to the full, unsliced stride subsequence of its measurement.

use crate::config::GridSpec;

use super::loaders::FlatSeries;

/// Diagnostic header of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub file: String,
    pub meta: String,
    pub measurements_per_go: usize,
    pub number_of_passes: usize,
    /// Length of the flat series.
    pub total_values: usize,
    /// `total_values / (measurements_per_go * number_of_passes)`, before truncation.
    pub points_per_row: f64,
    /// Whether the grid evenly divides the series.
    pub is_exact: bool,
}

/// Values of one measurement within one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementBlock {
    pub pass: usize,
    pub measurement: usize,
    pub values: Vec<f64>,
    /// Set when the grid did not divide the data and `values` is the unsliced subsequence.
    pub degraded: bool,
}

/// Report for a single file, blocks in pass-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub header: ReportHeader,
    pub blocks: Vec<MeasurementBlock>,
}

impl Report {
    /// Block for a given pass and measurement.
    pub fn block(&self, pass: usize, measurement: usize) -> Option<&MeasurementBlock> {
        self.blocks
            .iter()
            .find(|b| b.pass == pass && b.measurement == measurement)
    }
}

/// Slice a series according to its grid declaration.
pub fn build_report(spec: &GridSpec, series: &FlatSeries) -> Report {
    let nmeas = spec.measurements_per_go.get();
    let npasses = spec.number_of_passes.get();
    let total_slots = spec.total_slots();
    let len = series.len();

    let points_per_row = len as f64 / total_slots as f64;
    let is_exact = len % total_slots == 0;
    let row_len = len / total_slots;

    // One stride subsequence per measurement, shared by every pass.
    let strides: Vec<Vec<f64>> = (0..nmeas).map(|i| series.stride(i, nmeas)).collect();

    let mut blocks = Vec::with_capacity(total_slots);
    for pass in 0..npasses {
        for (measurement, stride) in strides.iter().enumerate() {
            let values = if is_exact {
                let start = (row_len * pass).min(stride.len());
                let end = (row_len * (pass + 1)).min(stride.len());
                stride[start..end].to_vec()
            } else {
                stride.clone()
            };

            blocks.push(MeasurementBlock {
                pass,
                measurement,
                values,
                degraded: !is_exact,
            });
        }
    }

    Report {
        header: ReportHeader {
            file: spec.file.clone(),
            meta: spec.meta.clone(),
            measurements_per_go: nmeas,
            number_of_passes: npasses,
            total_values: len,
            points_per_row,
            is_exact,
        },
        blocks,
    }
}
