//! Metrics collection and reporting using metrics-rs.
//!
//! Records each run's counters under the `metrics` facade so they can be
//! inspected with `--metrics` (in-process CLI recorder) or exported through
//! any installed recorder.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_gauge, gauge,
};
use parking_lot::RwLock;
use rvmark_report::{Backend, Metric, MetricReport};

// ============================================================================
// Metric descriptions
// ============================================================================

/// Initialize metric descriptions.
///
/// Call this once at startup to register metric descriptions.
pub fn init() {
    describe_counter!("rvmark_cycles_total", Unit::Count, "Guest CPU cycles");
    describe_counter!(
        "rvmark_instructions_total",
        Unit::Count,
        "Guest instructions retired"
    );
    describe_counter!(
        "rvmark_icache_misses_total",
        Unit::Count,
        "L1 instruction cache misses"
    );
    describe_counter!(
        "rvmark_dcache_misses_total",
        Unit::Count,
        "L1 data cache misses"
    );
    describe_counter!(
        "rvmark_icache_accesses_total",
        Unit::Count,
        "L1 instruction cache accesses"
    );
    describe_counter!(
        "rvmark_dcache_accesses_total",
        Unit::Count,
        "L1 data cache accesses"
    );
    describe_counter!("rvmark_branches_total", Unit::Count, "Branch lookups");
    describe_counter!(
        "rvmark_branch_mispredicts_total",
        Unit::Count,
        "Branch mispredictions"
    );

    describe_gauge!(
        "rvmark_sim_time_microseconds",
        Unit::Microseconds,
        "Simulated elapsed time"
    );
    describe_gauge!("rvmark_ipc", Unit::Count, "Guest instructions per cycle");
}

fn metric_name(metric: Metric) -> &'static str {
    match metric {
        Metric::Cycles => "rvmark_cycles_total",
        Metric::Instructions => "rvmark_instructions_total",
        Metric::IcacheMisses => "rvmark_icache_misses_total",
        Metric::DcacheMisses => "rvmark_dcache_misses_total",
        Metric::IcacheAccesses => "rvmark_icache_accesses_total",
        Metric::DcacheAccesses => "rvmark_dcache_accesses_total",
        Metric::Branches => "rvmark_branches_total",
        Metric::BranchMispredicts => "rvmark_branch_mispredicts_total",
        Metric::TimeMicros => "rvmark_sim_time_microseconds",
    }
}

/// Record one finished report, both views, labelled by backend.
pub fn record_report(backend: Backend, report: &MetricReport) {
    for view in ["official", "net"] {
        let labels = [
            ("backend", backend.as_str().to_string()),
            ("view", view.to_string()),
        ];
        for row in report.rows() {
            let value = if view == "official" {
                row.raw
            } else {
                row.corrected
            };
            if row.metric.is_time() {
                gauge!(metric_name(row.metric), &labels).set(value);
            } else {
                counter!(metric_name(row.metric), &labels).absolute(value as u64);
            }
        }
        let ipc = report.ipc();
        gauge!("rvmark_ipc", &labels).set(if view == "official" {
            ipc.raw
        } else {
            ipc.corrected
        });
    }
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// Storage for counter values.
#[derive(Default)]
struct CounterStorage {
    values: RwLock<HashMap<String, u64>>,
}

/// Storage for gauge values.
#[derive(Default)]
struct GaugeStorage {
    values: RwLock<HashMap<String, f64>>,
}

/// A simple counter handle for the CLI recorder.
struct CliCounter {
    key: String,
    storage: Arc<CounterStorage>,
}

impl metrics::CounterFn for CliCounter {
    fn increment(&self, value: u64) {
        let mut values = self.storage.values.write();
        *values.entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        let mut values = self.storage.values.write();
        values.insert(self.key.clone(), value);
    }
}

/// A simple gauge handle for the CLI recorder.
struct CliGauge {
    key: String,
    storage: Arc<GaugeStorage>,
}

impl metrics::GaugeFn for CliGauge {
    fn increment(&self, value: f64) {
        let mut values = self.storage.values.write();
        *values.entry(self.key.clone()).or_insert(0.0) += value;
    }

    fn decrement(&self, value: f64) {
        let mut values = self.storage.values.write();
        *values.entry(self.key.clone()).or_insert(0.0) -= value;
    }

    fn set(&self, value: f64) {
        let mut values = self.storage.values.write();
        values.insert(self.key.clone(), value);
    }
}

/// CLI recorder that stores metrics in memory for a summary at exit.
///
/// rvmark records point values per run, so only counters and gauges are
/// backed; histograms are registered as no-ops.
pub struct CliRecorder {
    counters: Arc<CounterStorage>,
    gauges: Arc<GaugeStorage>,
}

impl CliRecorder {
    /// Create a new CLI recorder.
    pub fn new() -> Self {
        Self {
            counters: Arc::new(CounterStorage::default()),
            gauges: Arc::new(GaugeStorage::default()),
        }
    }

    /// Install this recorder as the global metrics recorder.
    ///
    /// Returns a handle that can be used to retrieve metrics later.
    pub fn install(self) -> Option<CliRecorderHandle> {
        let counters = Arc::clone(&self.counters);
        let gauges = Arc::clone(&self.gauges);

        metrics::set_global_recorder(self).ok()?;

        Some(CliRecorderHandle { counters, gauges })
    }
}

impl Default for CliRecorder {
    fn default() -> Self {
        Self::new()
    }
}

fn key_to_string(key: &Key) -> String {
    let name = key.name();
    let labels = key.labels();
    if labels.len() == 0 {
        name.to_string()
    } else {
        let label_str: Vec<String> = labels
            .map(|l| format!("{}={}", l.key(), l.value()))
            .collect();
        format!("{}{{{}}}", name, label_str.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CliCounter {
            key: key_to_string(key),
            storage: Arc::clone(&self.counters),
        }))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(CliGauge {
            key: key_to_string(key),
            storage: Arc::clone(&self.gauges),
        }))
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

/// Handle for accessing recorded metrics after installing the CLI recorder.
pub struct CliRecorderHandle {
    counters: Arc<CounterStorage>,
    gauges: Arc<GaugeStorage>,
}

impl CliRecorderHandle {
    /// Print all collected metrics in a human-readable format.
    pub fn print_summary(&self) {
        let counters = self.counters.values.read();
        let gauges = self.gauges.values.read();

        if counters.is_empty() && gauges.is_empty() {
            println!("No metrics collected.");
            return;
        }

        println!();
        println!("## Metrics Summary");
        println!();

        if !counters.is_empty() {
            println!("### Counters");
            let mut keys: Vec<_> = counters.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = counters.get(key) {
                    println!("  {}: {}", key, value);
                }
            }
            println!();
        }

        if !gauges.is_empty() {
            println!("### Gauges");
            let mut keys: Vec<_> = gauges.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = gauges.get(key) {
                    println!("  {}: {:.6}", key, value);
                }
            }
            println!();
        }
    }
}
