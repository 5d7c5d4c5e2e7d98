//! uArch backend: gem5 with a board configuration script.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rvmark_report::{Backend, CalibrationTable, MetricReport, WorkloadKind, extract};
use tracing::{debug, error, warn};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, WorkloadKindArg, resolve_workload_kind};
use crate::commands::print_report;
use crate::terminal::{self, StepTracker};
use crate::toolchain;

const GEM5_BIN: &str = "build/RISCV/gem5.opt";
const M5_INCLUDE: &str = "include";
const M5_OPS_ASM: &str = "util/m5/src/abi/riscv/m5op.S";

/// Handle the `uarch` command.
pub fn cmd_uarch(
    config: &Path,
    workload: &Path,
    gem5_root: &Path,
    outdir: &Path,
    kind: Option<WorkloadKindArg>,
) -> i32 {
    let kind = match resolve_workload_kind(kind, workload) {
        Ok(kind) => kind,
        Err(err) => {
            error!("{err}");
            return EXIT_FAILURE;
        }
    };

    if !config.exists() {
        error!(path = %config.display(), "configuration script not found");
        return EXIT_FAILURE;
    }
    if !workload.exists() {
        error!(path = %workload.display(), "workload not found");
        return EXIT_FAILURE;
    }

    let mut steps = StepTracker::new(3);

    let spinner = steps.step(&format!("Compiling {}", workload.display()));
    let binary = match compile_workload(gem5_root, workload, kind) {
        Ok(binary) => {
            spinner.finish_with_success(&format!("Compiled {}", binary.display()));
            binary
        }
        Err(err) => {
            spinner.finish_with_failure("Compilation failed");
            error!("{err}");
            return EXIT_FAILURE;
        }
    };

    // Leftover stats from a previous run would mask a failed simulation.
    let stats_path = outdir.join("stats.txt");
    if stats_path.exists() {
        if let Err(e) = fs::remove_file(&stats_path) {
            warn!(error = %e, path = %stats_path.display(), "failed to remove previous stats");
        }
    }

    let spinner = steps.step(&format!("Simulating with {}", config.display()));
    match run_gem5(gem5_root, config, &binary, outdir) {
        Ok(()) => spinner.finish_with_success("Simulation finished"),
        Err(err) => {
            spinner.finish_with_failure("Simulation failed");
            error!("{err}");
            return EXIT_FAILURE;
        }
    }

    let spinner = steps.step("Analyzing statistics");
    let raw = match extract(Backend::Uarch.artifact_format(), &stats_path) {
        Ok(raw) => {
            spinner.finish_with_success("Statistics extracted");
            raw
        }
        Err(e) => {
            spinner.finish_with_failure("Extraction failed");
            error!(error = %e, "extraction failed");
            return EXIT_FAILURE;
        }
    };
    terminal::path_output(&stats_path);

    let test_name = workload
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test");
    let report = MetricReport::build(&raw, &CalibrationTable::builtin(Backend::Uarch, kind));
    crate::metrics::record_report(Backend::Uarch, &report);
    print_report(
        &format!("Performance results: {test_name} ({kind}) [uarch]"),
        &report,
    );
    EXIT_SUCCESS
}

/// Cross-compile the workload together with gem5's m5 ops.
fn compile_workload(
    gem5_root: &Path,
    workload: &Path,
    kind: WorkloadKind,
) -> Result<PathBuf, String> {
    let gcc = toolchain::find_gcc()
        .ok_or_else(|| "no RISC-V GCC cross-compiler found in PATH".to_string())?;
    let binary = workload.with_extension("");
    let include = gem5_root.join(M5_INCLUDE);
    let m5ops = gem5_root.join(M5_OPS_ASM);

    let mut cmd = Command::new(&gcc);
    cmd.arg("-static").arg("-nostdlib");
    if kind == WorkloadKind::C {
        // Freestanding build entered straight at main; libgcc supplies the
        // soft float/div helpers.
        cmd.arg("-fno-builtin").args(["-e", "main"]);
    }
    cmd.arg(format!("-I{}", include.display()))
        .arg(workload)
        .arg(&m5ops);
    if kind == WorkloadKind::C {
        cmd.arg("-lgcc");
    }
    cmd.arg("-o").arg(&binary);
    debug!(command = ?cmd, "compiling workload");

    let output = cmd
        .output()
        .map_err(|e| format!("failed to run {gcc}: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "compilation failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(binary)
}

/// Run gem5 with the given configuration and workload binary.
fn run_gem5(gem5_root: &Path, config: &Path, binary: &Path, outdir: &Path) -> Result<(), String> {
    let gem5 = gem5_root.join(GEM5_BIN);
    if !gem5.exists() {
        return Err(format!("gem5 binary not found: {}", gem5.display()));
    }

    let mut cmd = Command::new(&gem5);
    cmd.arg("-d").arg(outdir).arg(config).arg(binary);
    debug!(command = ?cmd, "running gem5");

    let output = cmd
        .output()
        .map_err(|e| format!("failed to run gem5: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "gem5 failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(())
}
