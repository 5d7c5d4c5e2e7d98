//! End-to-end extraction -> correction -> report scenarios.

use std::fs;

use rvmark_report::{
    ArtifactFormat, Backend, CalibrationTable, ExtractError, Metric, MetricReport, WorkloadKind,
    extract,
};

#[test]
fn register_dump_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("fib.cv64a6_imafdc_sv39.log");
    fs::write(&log, "x18 0x64\nx19 0x0A\nx24 0x2\n").unwrap();

    let raw = extract(ArtifactFormat::RegisterDump, &log).unwrap();
    let table =
        CalibrationTable::from_pairs(&[(Metric::Cycles, 40.0), (Metric::Instructions, 5.0)]);
    let report = MetricReport::build(&raw, &table);

    let cycles = report.rows().iter().find(|r| r.metric == Metric::Cycles).unwrap();
    assert_eq!(cycles.raw, 100.0);
    assert_eq!(cycles.corrected, 60.0);
    let insts = report
        .rows()
        .iter()
        .find(|r| r.metric == Metric::Instructions)
        .unwrap();
    assert_eq!(insts.corrected, 5.0);

    let ipc = report.ipc();
    assert!((ipc.raw - 0.10).abs() < 1e-12);
    assert!((ipc.corrected - 5.0 / 60.0).abs() < 1e-12);
}

#[test]
fn stats_block_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let stats = dir.path().join("stats.txt");
    fs::write(
        &stats,
        "---------- Begin Simulation Statistics ----------\n\
         board.processor.cores.core.numCycles 1000\n\
         board.processor.cores.core.commitStats0.numInsts 500\n",
    )
    .unwrap();

    let raw = extract(ArtifactFormat::StatisticsBlock, &stats).unwrap();
    let table =
        CalibrationTable::from_pairs(&[(Metric::Cycles, 33.0), (Metric::Instructions, 5.0)]);
    let report = MetricReport::build(&raw, &table);

    let cycles = report.rows().iter().find(|r| r.metric == Metric::Cycles).unwrap();
    assert_eq!(cycles.corrected, 967.0);
    let insts = report
        .rows()
        .iter()
        .find(|r| r.metric == Metric::Instructions)
        .unwrap();
    assert_eq!(insts.corrected, 495.0);
    assert!((report.ipc().corrected - 495.0 / 967.0).abs() < 1e-12);
}

#[test]
fn zero_cycle_run_still_reports() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("empty.log");
    fs::write(&log, "x19 0x05\n").unwrap();

    let raw = extract(ArtifactFormat::RegisterDump, &log).unwrap();
    let report = MetricReport::build(&raw, &CalibrationTable::zero());

    let ipc = report.ipc();
    assert_eq!(ipc.raw, 0.0);
    assert_eq!(ipc.corrected, 5.0);
    let cycles = report.rows().iter().find(|r| r.metric == Metric::Cycles).unwrap();
    assert_eq!(cycles.corrected, 1.0);
}

#[test]
fn missing_artifact_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract(ArtifactFormat::StatisticsBlock, &dir.path().join("stats.txt")).unwrap_err();
    assert!(matches!(err, ExtractError::ArtifactMissing(_)));
}

#[test]
fn unmatched_metric_reports_zero_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("partial.log");
    fs::write(&log, "x18 0x100\n").unwrap();

    let raw = extract(ArtifactFormat::RegisterDump, &log).unwrap();
    let report = MetricReport::build(
        &raw,
        &CalibrationTable::builtin(Backend::Rtl, WorkloadKind::Assembly),
    );
    let branches = report
        .rows()
        .iter()
        .find(|r| r.metric == Metric::Branches)
        .unwrap();
    assert_eq!(branches.raw, 0.0);
    assert_eq!(branches.corrected, 0.0);
}

#[test]
fn builtin_tables_keep_values_at_or_above_floor() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("tiny.log");
    // Every counter smaller than the compiled-C overhead table.
    fs::write(&log, "x18 0x05\nx19 0x02\nx22 0x03\n").unwrap();

    let raw = extract(ArtifactFormat::RegisterDump, &log).unwrap();
    let report = MetricReport::build(
        &raw,
        &CalibrationTable::builtin(Backend::Rtl, WorkloadKind::C),
    );
    for row in report.rows() {
        assert!(row.corrected >= row.metric.correction_floor());
    }
    let ipc = report.ipc();
    assert!(ipc.corrected.is_finite() && ipc.corrected >= 0.0);
}
