//! Report run over a declared list of files.

use std::io::Write;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::ReportConfig;
use crate::core::loaders::load_series;
use crate::core::report::build_report;
use crate::core::writers::write_report;

/// Outcome counts of a report run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub exact: usize,
    pub degraded: usize,
}

/// Load, slice and write every configured file, in declaration order.
///
/// # Errors
///
/// The first file that cannot be read aborts the run.
pub fn run_report<W: Write>(config: &ReportConfig, out: &mut W) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for spec in &config.files {
        let path = spec.path_in(&config.data_dir);
        info!("Loading {}", path.display());

        let series =
            load_series(&path).with_context(|| format!("failed to load {}", path.display()))?;
        let report = build_report(spec, &series);

        if report.header.is_exact {
            summary.exact += 1;
        } else {
            warn!(
                "{}: {} values do not divide into {} measurements x {} passes",
                spec.file,
                series.len(),
                spec.measurements_per_go,
                spec.number_of_passes
            );
            summary.degraded += 1;
        }

        write_report(out, &report)
            .with_context(|| format!("failed to write report for {}", spec.file))?;
        summary.files += 1;
    }

    out.flush().context("failed to flush report output")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use std::fs;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_run_counts_exact_and_degraded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "No,A,B\n1,1,2\n2,3,4\n").unwrap();
        fs::write(dir.path().join("b.csv"), "No,A\n1,1\n2,2\n3,3\n").unwrap();

        let config = ReportConfig {
            data_dir: dir.path().to_path_buf(),
            files: vec![
                GridSpec::new("a.csv", nz(2), nz(1), "exact"),
                GridSpec::new("b.csv", nz(2), nz(1), "degraded"),
            ],
        };

        let mut out = Vec::new();
        let summary = run_report(&config, &mut out).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                files: 2,
                exact: 1,
                degraded: 1
            }
        );
    }

    #[test]
    fn test_missing_file_aborts_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "1,1\n").unwrap();

        let config = ReportConfig {
            data_dir: dir.path().to_path_buf(),
            files: vec![
                GridSpec::new("a.csv", nz(1), nz(1), ""),
                GridSpec::new("missing.csv", nz(1), nz(1), ""),
            ],
        };

        let mut out = Vec::new();
        let err = run_report(&config, &mut out).unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
        // The first report was already written before the failure.
        assert!(String::from_utf8(out).unwrap().starts_with("fname: a.csv"));
    }
}
