//! rvmark-report - canonical metric schema, artifact extraction, and
//! overhead correction.
//!
//! The pipeline is a pure transformation: backend artifact text in,
//! [`MetricReport`] out. Nothing here runs a simulator or keeps state
//! between invocations.
//!
//! ```
//! use rvmark_report::{extract_str, ArtifactFormat, CalibrationTable, MetricReport};
//!
//! let raw = extract_str(ArtifactFormat::RegisterDump, "x18 0x64\nx19 0x0A\n");
//! let report = MetricReport::build(&raw, &CalibrationTable::zero());
//! println!("{}", report.render_table());
//! ```

mod calibrate;
mod error;
mod extract;
mod ipc;
mod report;
mod schema;

pub use calibrate::{Backend, CalibrationTable, CorrectedReport, WorkloadKind};
pub use error::{ExtractError, Result};
pub use extract::{ArtifactFormat, RawReport, extract, extract_str};
pub use ipc::IpcPair;
pub use report::{MetricReport, MetricRow};
pub use schema::Metric;
