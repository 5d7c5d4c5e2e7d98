//! Parse command: extract metrics from an existing artifact.

use std::path::Path;

use rvmark_report::{Backend, CalibrationTable, MetricReport, WorkloadKind, extract};
use tracing::error;

use crate::cli::{BackendArg, EXIT_FAILURE, EXIT_SUCCESS, WorkloadKindArg};
use crate::commands::print_report;

/// Handle the `parse` command.
pub fn cmd_parse(
    artifact: &Path,
    backend: BackendArg,
    kind: WorkloadKindArg,
    no_calibration: bool,
) -> i32 {
    let backend: Backend = backend.into();
    let kind: WorkloadKind = kind.into();

    let raw = match extract(backend.artifact_format(), artifact) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "extraction failed");
            return EXIT_FAILURE;
        }
    };

    let calibration = if no_calibration {
        CalibrationTable::zero()
    } else {
        CalibrationTable::builtin(backend, kind)
    };

    let report = MetricReport::build(&raw, &calibration);
    crate::metrics::record_report(backend, &report);
    print_report(
        &format!(
            "Artifact report ({backend}, {kind}): {}",
            artifact.display()
        ),
        &report,
    );
    EXIT_SUCCESS
}
