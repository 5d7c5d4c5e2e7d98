//! Instructions-per-cycle derivation.

use crate::calibrate::CorrectedReport;
use crate::extract::RawReport;
use crate::schema::Metric;

/// IPC under the raw and overhead-corrected interpretations.
///
/// Values are kept at full precision; rounding happens at render time only,
/// so downstream arithmetic does not compound rounding error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IpcPair {
    /// Raw instructions / raw cycles; 0 when the run reported no cycles.
    pub raw: f64,
    /// Corrected instructions / corrected cycles. The corrected cycle count
    /// is floored at 1, so this is always defined.
    pub corrected: f64,
}

impl IpcPair {
    pub fn compute(raw: &RawReport, corrected: &CorrectedReport) -> Self {
        let raw_cycles = raw.get(Metric::Cycles);
        let raw_ipc = if raw_cycles > 0.0 {
            raw.get(Metric::Instructions) / raw_cycles
        } else {
            0.0
        };
        Self {
            raw: raw_ipc,
            corrected: corrected.get(Metric::Instructions) / corrected.get(Metric::Cycles),
        }
    }
}
