//! Metric report assembly and rendering.

use crate::calibrate::{CalibrationTable, CorrectedReport};
use crate::extract::RawReport;
use crate::ipc::IpcPair;
use crate::schema::Metric;

/// One canonical metric with its raw ("official") and corrected ("net")
/// value.
#[derive(Debug, Clone, Copy)]
pub struct MetricRow {
    pub metric: Metric,
    pub raw: f64,
    pub corrected: f64,
}

/// Final per-run report: canonical rows in schema order plus derived IPC.
///
/// Owned by the caller; rendering never mutates the underlying values, it
/// only chooses display precision.
#[derive(Debug, Clone)]
pub struct MetricReport {
    rows: Vec<MetricRow>,
    ipc: IpcPair,
}

const LABEL_WIDTH: usize = 25;
const VALUE_WIDTH: usize = 15;
const TABLE_WIDTH: usize = LABEL_WIDTH + 2 * (VALUE_WIDTH + 3);

impl MetricReport {
    /// Correct a raw report and derive IPC in one pass.
    pub fn build(raw: &RawReport, calibration: &CalibrationTable) -> Self {
        let corrected = CorrectedReport::from_raw(raw, calibration);
        let ipc = IpcPair::compute(raw, &corrected);
        let rows = Metric::ALL
            .iter()
            .map(|&metric| MetricRow {
                metric,
                raw: raw.get(metric),
                corrected: corrected.get(metric),
            })
            .collect();
        Self { rows, ipc }
    }

    /// Rows in canonical schema order (IPC is not a row; see [`Self::ipc`]).
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn ipc(&self) -> IpcPair {
        self.ipc
    }

    /// Aligned label/official/net table with IPC as the final row.
    pub fn render_table(&self) -> String {
        let heavy = "=".repeat(TABLE_WIDTH);
        let light = "-".repeat(TABLE_WIDTH);

        let mut out = String::new();
        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&format!(
            "{:<lw$} | {:>vw$} | {:>vw$}\n",
            "METRIC",
            "OFFICIAL",
            "NET",
            lw = LABEL_WIDTH,
            vw = VALUE_WIDTH
        ));
        out.push_str(&light);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{:<lw$} | {:>vw$} | {:>vw$}\n",
                row.metric.label(),
                display_value(row.metric, row.raw),
                display_value(row.metric, row.corrected),
                lw = LABEL_WIDTH,
                vw = VALUE_WIDTH
            ));
        }
        out.push_str(&format!(
            "{:<lw$} | {:>vw$.4} | {:>vw$.4}\n",
            "IPC",
            self.ipc.raw,
            self.ipc.corrected,
            lw = LABEL_WIDTH,
            vw = VALUE_WIDTH
        ));
        out.push_str(&heavy);
        out.push('\n');
        out
    }

    /// Flat official-value vector with IPC as the trailing element.
    ///
    /// Stable, parseable line meant for diffing two runs or feeding
    /// downstream tooling.
    pub fn official_vector(&self) -> String {
        render_vector(self.rows.iter().map(|r| (r.metric, r.raw)), self.ipc.raw)
    }

    /// Flat corrected-value vector with IPC as the trailing element.
    pub fn corrected_vector(&self) -> String {
        render_vector(
            self.rows.iter().map(|r| (r.metric, r.corrected)),
            self.ipc.corrected,
        )
    }
}

/// Display formatting: counts as plain integers, time in microseconds with
/// two decimals.
fn display_value(metric: Metric, value: f64) -> String {
    if metric.is_time() {
        format!("{value:.2}")
    } else {
        format!("{}", value as i64)
    }
}

/// Vector formatting: time rounds to the nearest microsecond so every
/// element except IPC stays integer-valued.
fn vector_value(metric: Metric, value: f64) -> String {
    if metric.is_time() {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value as i64)
    }
}

fn render_vector(values: impl Iterator<Item = (Metric, f64)>, ipc: f64) -> String {
    let mut parts: Vec<String> = values.map(|(m, v)| vector_value(m, v)).collect();
    parts.push(format!("{ipc:.4}"));
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> MetricReport {
        let mut raw = RawReport::default();
        raw.set(Metric::Cycles, 100.0);
        raw.set(Metric::Instructions, 10.0);
        raw.set(Metric::TimeMicros, 52.4);
        let table =
            CalibrationTable::from_pairs(&[(Metric::Cycles, 40.0), (Metric::Instructions, 5.0)]);
        MetricReport::build(&raw, &table)
    }

    #[test]
    fn test_rows_follow_schema_order() {
        let report = sample_report();
        let metrics: Vec<Metric> = report.rows().iter().map(|r| r.metric).collect();
        assert_eq!(metrics, Metric::ALL);
    }

    #[test]
    fn test_table_has_ipc_row_and_formatting() {
        let report = sample_report();
        let table = report.render_table();
        assert!(table.contains("METRIC"));
        assert!(table.contains("OFFICIAL"));
        assert!(table.contains("NET"));
        // Counts render as integers, time with two decimals, IPC with four.
        assert!(table.contains("100"));
        assert!(table.contains("52.40"));
        assert!(table.contains("0.1000"));
        assert!(table.contains("0.0833"));
    }

    #[test]
    fn test_vectors_are_ordered_and_terminated_by_ipc() {
        let report = sample_report();
        let official = report.official_vector();
        let corrected = report.corrected_vector();
        assert_eq!(official, "[100, 10, 0, 0, 0, 0, 0, 0, 52, 0.1000]");
        assert_eq!(corrected, "[60, 5, 0, 0, 0, 0, 0, 0, 52, 0.0833]");
    }

    #[test]
    fn test_vector_length_is_schema_plus_ipc() {
        let report = sample_report();
        let official = report.official_vector();
        let elements = official.trim_matches(['[', ']']).split(", ").count();
        assert_eq!(elements, Metric::ALL.len() + 1);
    }

    #[test]
    fn test_rendering_does_not_alter_values() {
        let report = sample_report();
        let before: Vec<f64> = report.rows().iter().map(|r| r.raw).collect();
        let _ = report.render_table();
        let _ = report.official_vector();
        let after: Vec<f64> = report.rows().iter().map(|r| r.raw).collect();
        assert_eq!(before, after);
    }
}
