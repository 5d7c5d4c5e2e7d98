//! Statistics-block extraction (gem5 stats.txt).
//!
//! gem5 prints one statistics block per dump. The region of interest is the
//! first block; end-of-simulation drain dumps follow it and are ignored.

use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::RawReport;
use crate::schema::Metric;

const BLOCK_MARKER: &str = "Begin Simulation Statistics";

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Raw stats matched inside a block, before aggregation onto the canonical
/// schema. Branch predictor lookups and mispredicts arrive as per-kind
/// sub-counters and are summed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stat {
    Cycles,
    Insts,
    IcacheMisses,
    DcacheMisses,
    IcacheAccesses,
    DcacheAccesses,
    LookupsDirectCond,
    LookupsDirectUncond,
    LookupsIndirectUncond,
    MispredictsDirectCond,
    MispredictsIndirectUncond,
    SimSeconds,
}

fn patterns() -> &'static [(Stat, Regex)] {
    static PATTERNS: OnceLock<Vec<(Stat, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Stat::Cycles, r"cores\.core\.numCycles"),
            (
                Stat::Insts,
                r"board\.processor\.cores\.core\.commitStats0\.numInsts\s",
            ),
            (Stat::IcacheMisses, r"l1icaches\.overallMisses::total"),
            (Stat::DcacheMisses, r"l1dcaches\.overallMisses::total"),
            (Stat::IcacheAccesses, r"l1icaches\.overallAccesses::total"),
            (Stat::DcacheAccesses, r"l1dcaches\.overallAccesses::total"),
            (Stat::LookupsDirectCond, r"branchPred\.btb\.lookups::DirectCond"),
            (
                Stat::LookupsDirectUncond,
                r"branchPred\.btb\.lookups::DirectUncond",
            ),
            (
                Stat::LookupsIndirectUncond,
                r"branchPred\.btb\.lookups::IndirectUncond",
            ),
            (
                Stat::MispredictsDirectCond,
                r"branchPred\.btb\.mispredict::DirectCond",
            ),
            (
                Stat::MispredictsIndirectUncond,
                r"branchPred\.btb\.mispredict::IndirectUncond",
            ),
            (Stat::SimSeconds, r"simSeconds"),
        ]
        .into_iter()
        .map(|(stat, pattern)| (stat, Regex::new(pattern).unwrap()))
        .collect()
    })
}

/// Scan a statistics artifact.
///
/// Only the first block is authoritative. Within it, the first successfully
/// parsed match per stat wins; a value token that fails to parse leaves the
/// stat open for a later line. `simSeconds` is converted to microseconds so
/// the canonical time unit is uniform across backends.
pub fn parse_stats_block(text: &str) -> RawReport {
    let mut block_count = 0usize;
    let mut values: FxHashMap<Stat, f64> = FxHashMap::default();

    for line in text.lines() {
        if line.contains(BLOCK_MARKER) {
            block_count += 1;
            if block_count > 1 {
                break;
            }
            continue;
        }
        if block_count != 1 {
            continue;
        }
        for (stat, pattern) in patterns() {
            if values.contains_key(stat) || !pattern.is_match(line) {
                continue;
            }
            let parsed = line
                .split_whitespace()
                .nth(1)
                .and_then(|tok| tok.parse::<f64>().ok());
            if let Some(value) = parsed {
                values.insert(*stat, value);
            }
        }
    }

    let get = |stat: Stat| values.get(&stat).copied().unwrap_or(0.0);

    let mut report = RawReport::default();
    report.set(Metric::Cycles, get(Stat::Cycles));
    report.set(Metric::Instructions, get(Stat::Insts));
    report.set(Metric::IcacheMisses, get(Stat::IcacheMisses));
    report.set(Metric::DcacheMisses, get(Stat::DcacheMisses));
    report.set(Metric::IcacheAccesses, get(Stat::IcacheAccesses));
    report.set(Metric::DcacheAccesses, get(Stat::DcacheAccesses));
    report.set(
        Metric::Branches,
        get(Stat::LookupsDirectCond)
            + get(Stat::LookupsDirectUncond)
            + get(Stat::LookupsIndirectUncond),
    );
    report.set(
        Metric::BranchMispredicts,
        get(Stat::MispredictsDirectCond) + get(Stat::MispredictsIndirectUncond),
    );
    report.set(Metric::TimeMicros, get(Stat::SimSeconds) * MICROS_PER_SEC);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "---------- Begin Simulation Statistics ----------\n";

    #[test]
    fn test_parse_basic_stats() {
        let text = format!(
            "{HEADER}\
             board.processor.cores.core.numCycles 1000 # Number of cpu cycles\n\
             board.processor.cores.core.commitStats0.numInsts 500 # committed\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Cycles), 1000.0);
        assert_eq!(report.get(Metric::Instructions), 500.0);
    }

    #[test]
    fn test_first_match_wins_within_block() {
        let text = format!(
            "{HEADER}\
             board.processor.cores.core.numCycles 1000\n\
             board.processor.cores.core.numCycles 2000\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Cycles), 1000.0);
    }

    #[test]
    fn test_only_first_block_is_authoritative() {
        let text = format!(
            "{HEADER}\
             board.processor.cores.core.numCycles 1000\n\
             ---------- End Simulation Statistics   ----------\n\
             {HEADER}\
             board.processor.cores.core.numCycles 9999\n\
             board.cache_hierarchy.ruby_system.l1icaches.overallMisses::total 7\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Cycles), 1000.0);
        // Appears only in the second block, so it must not be reported.
        assert_eq!(report.get(Metric::IcacheMisses), 0.0);
    }

    #[test]
    fn test_text_before_first_block_ignored() {
        let text = format!(
            "board.processor.cores.core.numCycles 5\n\
             {HEADER}\
             board.processor.cores.core.numCycles 1000\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Cycles), 1000.0);
    }

    #[test]
    fn test_branch_subcounters_are_summed() {
        let text = format!(
            "{HEADER}\
             board.processor.cores.core.branchPred.btb.lookups::DirectCond 10\n\
             board.processor.cores.core.branchPred.btb.lookups::DirectUncond 4\n\
             board.processor.cores.core.branchPred.btb.lookups::IndirectUncond 1\n\
             board.processor.cores.core.branchPred.btb.mispredict::DirectCond 3\n\
             board.processor.cores.core.branchPred.btb.mispredict::IndirectUncond 2\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Branches), 15.0);
        assert_eq!(report.get(Metric::BranchMispredicts), 5.0);
    }

    #[test]
    fn test_sim_seconds_converted_to_micros() {
        let text = format!("{HEADER}simSeconds 0.000052 # simulated seconds\n");
        let report = parse_stats_block(&text);
        assert!((report.get(Metric::TimeMicros) - 52.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_value_leaves_stat_open() {
        let text = format!(
            "{HEADER}\
             board.processor.cores.core.numCycles nan?\n\
             board.processor.cores.core.numCycles 42\n"
        );
        let report = parse_stats_block(&text);
        assert_eq!(report.get(Metric::Cycles), 42.0);
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let report = parse_stats_block(HEADER);
        for &metric in Metric::ALL {
            assert_eq!(report.get(metric), 0.0);
        }
    }
}
