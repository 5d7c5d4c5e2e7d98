//! CLI definitions and argument types.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use rvmark_report::{Backend, WorkloadKind};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "rvmark")]
#[command(about = "RISC-V microarchitecture benchmark harness")]
#[command(version)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workload on the CVA6 RTL co-simulation harness
    Rtl {
        /// Architecture target (e.g. cv64a6_imafdc_sv39)
        #[arg(value_name = "TARGET")]
        target: String,

        /// Workload source file (.c, .S or .asm)
        #[arg(value_name = "FILE")]
        workload: PathBuf,

        /// CVA6 checkout root
        #[arg(long, default_value = "/cva6")]
        cva6_root: PathBuf,

        /// Reuse the previously built simulator (skip deleting work-ver)
        #[arg(long)]
        keep_build: bool,

        /// Show disassembly of the compiled workload
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        disasm: bool,

        /// Workload kind (default: inferred from the file extension)
        #[arg(long, value_enum)]
        kind: Option<WorkloadKindArg>,
    },
    /// Run a workload on the gem5 microarchitectural simulator
    Uarch {
        /// gem5 board configuration script
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Workload source file (.c, .S or .asm)
        #[arg(value_name = "FILE")]
        workload: PathBuf,

        /// gem5 checkout root
        #[arg(long, default_value = ".")]
        gem5_root: PathBuf,

        /// Output directory for simulation results
        #[arg(short, long, default_value = "results")]
        outdir: PathBuf,

        /// Workload kind (default: inferred from the file extension)
        #[arg(long, value_enum)]
        kind: Option<WorkloadKindArg>,
    },
    /// Extract metrics from an existing log or statistics file
    Parse {
        /// Path to the artifact
        #[arg(value_name = "ARTIFACT")]
        artifact: PathBuf,

        /// Backend that produced the artifact
        #[arg(long, value_enum)]
        backend: BackendArg,

        /// Workload kind selecting the calibration table
        #[arg(long, value_enum, default_value = "c")]
        kind: WorkloadKindArg,

        /// Apply no overhead correction (zero calibration table)
        #[arg(long)]
        no_calibration: bool,
    },
}

// ============================================================================
// Argument types with conversions
// ============================================================================

/// Simulation backend argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BackendArg {
    /// CVA6 RTL co-simulation under Verilator
    Rtl,
    /// gem5 microarchitectural simulator
    Uarch,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Rtl => Backend::Rtl,
            BackendArg::Uarch => Backend::Uarch,
        }
    }
}

/// Workload kind argument.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum WorkloadKindArg {
    /// Bare assembly test
    Asm,
    /// Compiled C test
    #[default]
    C,
}

impl From<WorkloadKindArg> for WorkloadKind {
    fn from(arg: WorkloadKindArg) -> Self {
        match arg {
            WorkloadKindArg::Asm => WorkloadKind::Assembly,
            WorkloadKindArg::C => WorkloadKind::C,
        }
    }
}

/// Resolve the workload kind: explicit flag wins, extension otherwise.
pub fn resolve_workload_kind(
    arg: Option<WorkloadKindArg>,
    workload: &Path,
) -> Result<WorkloadKind, String> {
    match arg {
        Some(kind) => Ok(kind.into()),
        None => infer_workload_kind(workload),
    }
}

/// Infer the workload kind from the source file extension.
pub fn infer_workload_kind(path: &Path) -> Result<WorkloadKind, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("c") => Ok(WorkloadKind::C),
        Some("S" | "s" | "asm") => Ok(WorkloadKind::Assembly),
        _ => Err(format!(
            "cannot infer workload kind of '{}', pass --kind",
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_workload_kind() {
        assert_eq!(
            infer_workload_kind(Path::new("tests/fib.c")).unwrap(),
            WorkloadKind::C
        );
        assert_eq!(
            infer_workload_kind(Path::new("loop.S")).unwrap(),
            WorkloadKind::Assembly
        );
        assert_eq!(
            infer_workload_kind(Path::new("loop.asm")).unwrap(),
            WorkloadKind::Assembly
        );
        assert!(infer_workload_kind(Path::new("program.elf")).is_err());
        assert!(infer_workload_kind(Path::new("noext")).is_err());
    }

    #[test]
    fn test_explicit_kind_wins() {
        let kind = resolve_workload_kind(Some(WorkloadKindArg::Asm), Path::new("weird.c")).unwrap();
        assert_eq!(kind, WorkloadKind::Assembly);
    }
}
