//! Canonical metric schema shared by both backends.

use std::fmt;

/// Canonical performance metrics, in report order.
///
/// Both backends map their counters onto this set; backend-specific
/// sub-counters (per-kind branch predictor stats) are aggregated before they
/// reach the schema. Elapsed time is carried in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cycles,
    Instructions,
    IcacheMisses,
    DcacheMisses,
    IcacheAccesses,
    DcacheAccesses,
    Branches,
    BranchMispredicts,
    TimeMicros,
}

impl Metric {
    /// All canonical metrics, in the order reports are emitted.
    pub const ALL: &'static [Metric] = &[
        Metric::Cycles,
        Metric::Instructions,
        Metric::IcacheMisses,
        Metric::DcacheMisses,
        Metric::IcacheAccesses,
        Metric::DcacheAccesses,
        Metric::Branches,
        Metric::BranchMispredicts,
        Metric::TimeMicros,
    ];

    /// Human-readable label used in report tables.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Cycles => "Cycles",
            Metric::Instructions => "Instructions",
            Metric::IcacheMisses => "I-Cache Misses",
            Metric::DcacheMisses => "D-Cache Misses",
            Metric::IcacheAccesses => "I-Cache Accesses",
            Metric::DcacheAccesses => "D-Cache Accesses",
            Metric::Branches => "Branches",
            Metric::BranchMispredicts => "Branch Mispredicts",
            Metric::TimeMicros => "Time (us)",
        }
    }

    /// Identifier-style name, used for logging and metric recording.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Cycles => "cycles",
            Metric::Instructions => "instructions",
            Metric::IcacheMisses => "icache_misses",
            Metric::DcacheMisses => "dcache_misses",
            Metric::IcacheAccesses => "icache_accesses",
            Metric::DcacheAccesses => "dcache_accesses",
            Metric::Branches => "branches",
            Metric::BranchMispredicts => "branch_mispredicts",
            Metric::TimeMicros => "time_us",
        }
    }

    /// Elapsed-time metric; displayed with decimals, everything else is a
    /// count.
    pub fn is_time(self) -> bool {
        matches!(self, Metric::TimeMicros)
    }

    /// Lower bound for corrected values. Cycles is the IPC denominator and
    /// never corrects below 1; counts clamp at 0.
    pub fn correction_floor(self) -> f64 {
        match self {
            Metric::Cycles => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
