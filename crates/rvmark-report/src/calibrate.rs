//! Calibration tables and overhead correction.
//!
//! Instrumentation (PMU setup, CSR readout, crt startup) costs a fixed
//! number of events per run. The tables below were measured with empty
//! workloads on each backend and are subtracted from the raw counters to
//! produce the "net" view.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::extract::{ArtifactFormat, RawReport};
use crate::schema::Metric;

/// Simulation backend that produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// CVA6 RTL co-simulation under Verilator.
    Rtl,
    /// gem5 microarchitectural simulator.
    Uarch,
}

impl Backend {
    /// Artifact layout this backend emits.
    pub fn artifact_format(self) -> ArtifactFormat {
        match self {
            Backend::Rtl => ArtifactFormat::RegisterDump,
            Backend::Uarch => ArtifactFormat::StatisticsBlock,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Rtl => "rtl",
            Backend::Uarch => "uarch",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workload flavor.
///
/// Overhead differs between a bare assembly test and a compiled C test (call
/// frames, crt startup, PMU configuration code), so each gets its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Assembly,
    C,
}

impl WorkloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::Assembly => "assembly",
            WorkloadKind::C => "c",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Measured overhead constants, one table per backend/workload pair.
// Branches and mispredicts carry no instrumentation overhead on either
// backend; metrics absent from a table are zero.

const RTL_C: &[(Metric, f64)] = &[
    (Metric::Cycles, 162.0),
    (Metric::Instructions, 32.0),
    (Metric::IcacheMisses, 8.0),
    (Metric::DcacheMisses, 8.0),
    (Metric::IcacheAccesses, 56.0),
    (Metric::DcacheAccesses, 24.0),
    (Metric::TimeMicros, 3.0),
];

const RTL_ASSEMBLY: &[(Metric, f64)] = &[
    (Metric::Cycles, 40.0),
    (Metric::Instructions, 17.0),
    (Metric::IcacheMisses, 3.0),
    (Metric::DcacheMisses, 1.0),
    (Metric::IcacheAccesses, 31.0),
    (Metric::DcacheAccesses, 9.0),
];

const UARCH_C: &[(Metric, f64)] = &[
    (Metric::Cycles, 33.0),
    (Metric::Instructions, 5.0),
    (Metric::IcacheMisses, 1.0),
    (Metric::IcacheAccesses, 9.0),
];

const UARCH_ASSEMBLY: &[(Metric, f64)] = &[
    (Metric::Cycles, 37.0),
    (Metric::Instructions, 5.0),
    (Metric::IcacheAccesses, 11.0),
];

/// Per-metric instrumentation overhead for one backend/workload pair.
///
/// Static configuration: built once, never mutated at runtime.
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
    overheads: FxHashMap<Metric, f64>,
}

impl CalibrationTable {
    /// Empty table. Correction becomes a floor-only pass.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(Metric, f64)]) -> Self {
        Self {
            overheads: pairs.iter().copied().collect(),
        }
    }

    /// The measured overhead table for a backend/workload pair.
    pub fn builtin(backend: Backend, kind: WorkloadKind) -> Self {
        let pairs = match (backend, kind) {
            (Backend::Rtl, WorkloadKind::C) => RTL_C,
            (Backend::Rtl, WorkloadKind::Assembly) => RTL_ASSEMBLY,
            (Backend::Uarch, WorkloadKind::C) => UARCH_C,
            (Backend::Uarch, WorkloadKind::Assembly) => UARCH_ASSEMBLY,
        };
        Self::from_pairs(pairs)
    }

    /// Overhead for a metric, zero when the table has no entry.
    pub fn overhead(&self, metric: Metric) -> f64 {
        self.overheads.get(&metric).copied().unwrap_or(0.0)
    }
}

/// Overhead-corrected counter values.
///
/// Same key set as the raw report it was derived from; every value is
/// `max(floor, raw - overhead)`, so counts never go negative and the cycle
/// count never reaches zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectedReport {
    values: FxHashMap<Metric, f64>,
}

impl CorrectedReport {
    /// Apply a calibration table to a raw report.
    ///
    /// Pure: the same inputs always produce the same corrected report.
    pub fn from_raw(raw: &RawReport, calibration: &CalibrationTable) -> Self {
        let mut values = FxHashMap::default();
        for &metric in Metric::ALL {
            let observed = raw.get(metric);
            let overhead = calibration.overhead(metric);
            if overhead > observed && observed > 0.0 {
                // Clamped below; likely over-calibration for this workload.
                warn!(
                    metric = metric.as_str(),
                    observed, overhead, "overhead exceeds observed value"
                );
            }
            values.insert(metric, (observed - overhead).max(metric.correction_floor()));
        }
        Self { values }
    }

    /// Corrected value for a metric.
    pub fn get(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_non_negative() {
        for backend in [Backend::Rtl, Backend::Uarch] {
            for kind in [WorkloadKind::Assembly, WorkloadKind::C] {
                let table = CalibrationTable::builtin(backend, kind);
                for &metric in Metric::ALL {
                    assert!(table.overhead(metric) >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_correction_subtracts_overhead() {
        let mut raw = RawReport::default();
        raw.set(Metric::Cycles, 100.0);
        raw.set(Metric::Instructions, 10.0);
        let table = CalibrationTable::from_pairs(&[
            (Metric::Cycles, 40.0),
            (Metric::Instructions, 5.0),
        ]);
        let corrected = CorrectedReport::from_raw(&raw, &table);
        assert_eq!(corrected.get(Metric::Cycles), 60.0);
        assert_eq!(corrected.get(Metric::Instructions), 5.0);
    }

    #[test]
    fn test_correction_respects_floors() {
        let mut raw = RawReport::default();
        raw.set(Metric::Cycles, 10.0);
        raw.set(Metric::Instructions, 3.0);
        let table = CalibrationTable::from_pairs(&[
            (Metric::Cycles, 50.0),
            (Metric::Instructions, 50.0),
        ]);
        let corrected = CorrectedReport::from_raw(&raw, &table);
        // Cycles is the IPC denominator and floors at 1, counts at 0.
        assert_eq!(corrected.get(Metric::Cycles), 1.0);
        assert_eq!(corrected.get(Metric::Instructions), 0.0);
    }

    #[test]
    fn test_all_zero_report_floors_cycles() {
        let corrected = CorrectedReport::from_raw(&RawReport::default(), &CalibrationTable::zero());
        assert_eq!(corrected.get(Metric::Cycles), 1.0);
        for &metric in Metric::ALL {
            if metric != Metric::Cycles {
                assert_eq!(corrected.get(metric), 0.0);
            }
        }
    }

    #[test]
    fn test_zero_table_is_identity_above_floor() {
        let mut raw = RawReport::default();
        for &metric in Metric::ALL {
            raw.set(metric, 7.0);
        }
        let corrected = CorrectedReport::from_raw(&raw, &CalibrationTable::zero());
        for &metric in Metric::ALL {
            assert_eq!(corrected.get(metric), raw.get(metric));
        }
    }

    #[test]
    fn test_correction_is_idempotent() {
        let mut raw = RawReport::default();
        raw.set(Metric::Cycles, 500.0);
        raw.set(Metric::Instructions, 123.0);
        let table = CalibrationTable::builtin(Backend::Rtl, WorkloadKind::C);
        let a = CorrectedReport::from_raw(&raw, &table);
        let b = CorrectedReport::from_raw(&raw, &table);
        assert_eq!(a, b);
    }
}
