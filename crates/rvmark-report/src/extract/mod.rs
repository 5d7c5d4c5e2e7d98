//! Raw counter extraction from backend artifacts.
//!
//! Both backends produce line-oriented text, but with different layouts and
//! different authority rules: the register dump reflects final CPU state
//! (last write wins), the statistics block is a point-in-time snapshot
//! (first block, first match wins). The two variants are deliberately NOT
//! unified to one policy.

mod register_dump;
mod stats_block;

pub use register_dump::parse_register_dump;
pub use stats_block::parse_stats_block;

use std::fs;
use std::io;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{ExtractError, Result};
use crate::schema::Metric;

/// Text artifact layout produced by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Register-identifier / hex-value pairs (CVA6 co-simulation log).
    RegisterDump,
    /// `Begin Simulation Statistics` blocks of dotted stat names (gem5).
    StatisticsBlock,
}

/// Raw counter values for one simulation run.
///
/// Missing metrics read as zero. Immutable once returned by an extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReport {
    values: FxHashMap<Metric, f64>,
}

impl RawReport {
    /// Value for a metric, zero if it never matched.
    pub fn get(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }

    /// Store a value, replacing any previous one.
    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }
}

/// Extract a raw report from an artifact file.
///
/// A missing or unreadable file is fatal; a metric that never matches inside
/// the file is not (it reads as zero in the report).
pub fn extract(format: ArtifactFormat, path: &Path) -> Result<RawReport> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExtractError::ArtifactMissing(path.to_path_buf()),
        _ => ExtractError::ArtifactUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(extract_str(format, &text))
}

/// Extract a raw report from artifact text already in memory.
pub fn extract_str(format: ArtifactFormat, text: &str) -> RawReport {
    match format {
        ArtifactFormat::RegisterDump => parse_register_dump(text),
        ArtifactFormat::StatisticsBlock => parse_stats_block(text),
    }
}
