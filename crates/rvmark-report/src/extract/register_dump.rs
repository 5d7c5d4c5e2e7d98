//! Register-dump extraction (CVA6 co-simulation logs).
//!
//! The log prints register-file snapshots as the simulated program runs; the
//! benchmark template parks its counter deltas in x18-x26 right before
//! exiting, so the LAST value printed for each register is authoritative.

use std::sync::OnceLock;

use regex::Regex;

use super::RawReport;
use crate::schema::Metric;

static REG_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Map a metric-carrying register number to its canonical metric.
///
/// x18-x26 are s2-s10, the callee-saved registers the benchmark template
/// writes its final counter readout into.
fn register_metric(reg: u32) -> Option<Metric> {
    match reg {
        18 => Some(Metric::Cycles),
        19 => Some(Metric::Instructions),
        20 => Some(Metric::IcacheMisses),
        21 => Some(Metric::DcacheMisses),
        22 => Some(Metric::IcacheAccesses),
        23 => Some(Metric::DcacheAccesses),
        24 => Some(Metric::Branches),
        25 => Some(Metric::BranchMispredicts),
        26 => Some(Metric::TimeMicros),
        _ => None,
    }
}

/// Scan a register-dump log for `x<N> 0x<HEX>` pairs.
///
/// Last write per register wins. Lines without a pair, unrecognized
/// registers, and hex values that fail to parse are skipped; a skipped value
/// keeps whatever was stored before it.
pub fn parse_register_dump(text: &str) -> RawReport {
    let pattern =
        REG_PATTERN.get_or_init(|| Regex::new(r"x\s*(\d+)\s+0x([0-9a-fA-F]+)").unwrap());

    let mut report = RawReport::default();
    for line in text.lines() {
        for caps in pattern.captures_iter(line) {
            let Some(metric) = caps[1].parse::<u32>().ok().and_then(register_metric) else {
                continue;
            };
            if let Ok(value) = u64::from_str_radix(&caps[2], 16) {
                report.set(metric, value as f64);
            }
        }
    }
    report
}
