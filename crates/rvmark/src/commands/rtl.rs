//! RTL backend: CVA6 co-simulation under Verilator via the verif/sim flow.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use rvmark_report::{Backend, CalibrationTable, MetricReport, WorkloadKind, extract};
use tracing::{debug, error, warn};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, WorkloadKindArg, resolve_workload_kind};
use crate::commands::print_report;
use crate::disasm;
use crate::terminal::{self, Spinner};

const SIMULATOR: &str = "veri-testharness";

/// Handle the `rtl` command.
pub fn cmd_rtl(
    target: &str,
    workload: &Path,
    cva6_root: &Path,
    keep_build: bool,
    show_disasm: bool,
    kind: Option<WorkloadKindArg>,
) -> i32 {
    let kind = match resolve_workload_kind(kind, workload) {
        Ok(kind) => kind,
        Err(err) => {
            error!("{err}");
            return EXIT_FAILURE;
        }
    };

    let workload = match workload.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, path = %workload.display(), "workload not found");
            return EXIT_FAILURE;
        }
    };

    let sim_dir = cva6_root.join("verif/sim");
    if !sim_dir.is_dir() {
        error!(path = %sim_dir.display(), "CVA6 simulation directory not found");
        return EXIT_FAILURE;
    }

    let test_name = workload
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test")
        .to_string();
    let log_name = format!("{test_name}.{target}.log");

    // The simulator binary bakes in the hardware config; delete work-ver so
    // cva6.py regenerates it.
    if !keep_build {
        let work_ver = cva6_root.join("work-ver");
        if work_ver.exists() {
            match fs::remove_dir_all(&work_ver) {
                Ok(()) => terminal::info("Removed work-ver (hardware will be rebuilt)"),
                Err(e) => warn!(error = %e, path = %work_ver.display(), "failed to remove work-ver"),
            }
        }
    }

    remove_stale_logs(&sim_dir, &log_name);

    let spinner = Spinner::new(format!("Simulating {test_name} on {target} ({kind})"));
    match run_cva6(&sim_dir, target, &workload, kind) {
        Ok(()) => spinner.finish_with_success(&format!("Simulation finished: {test_name}")),
        Err(err) => {
            // The flow sometimes exits nonzero after the log was written;
            // keep going and let the artifact check decide.
            spinner.finish_with_warning(&err);
        }
    }

    let Some(run_dir) = find_run_dir(&sim_dir) else {
        error!(path = %sim_dir.display(), "no out_* run directory found");
        return EXIT_FAILURE;
    };
    debug!(path = %run_dir.display(), "using run directory");

    if show_disasm {
        let object = run_dir.join("directed_tests").join(format!("{test_name}.o"));
        disasm::show_listing(&object);
    }

    let log_path = run_dir.join(format!("{SIMULATOR}_sim")).join(&log_name);
    let raw = match extract(Backend::Rtl.artifact_format(), &log_path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "extraction failed");
            return EXIT_FAILURE;
        }
    };

    let report = MetricReport::build(&raw, &CalibrationTable::builtin(Backend::Rtl, kind));
    crate::metrics::record_report(Backend::Rtl, &report);
    print_report(
        &format!("Performance results: {test_name} ({kind}) on {target} [rtl]"),
        &report,
    );
    EXIT_SUCCESS
}

/// Invoke the cva6.py verification flow for one workload.
fn run_cva6(sim_dir: &Path, target: &str, workload: &Path, kind: WorkloadKind) -> Result<(), String> {
    let rel_workload = workload.strip_prefix(sim_dir).unwrap_or(workload);
    let tests_flag = match kind {
        WorkloadKind::C => "--c_tests",
        WorkloadKind::Assembly => "--asm_tests",
    };

    let gcc_opts = "-static -mcmodel=medany -fvisibility=hidden -nostdlib -nostartfiles -g \
                    ../tests/custom/common/syscalls.c ../tests/custom/common/crt.S -lgcc \
                    -I../tests/custom/env -I../tests/custom/common";

    let cva6_cmd = format!(
        "source setup-env.sh && python3 cva6.py --target {target} --iss={SIMULATOR} \
         --iss_yaml=cva6.yaml {tests_flag} {workload} \
         --linker=../../config/gen_from_riscv_config/linker/link.ld --gcc_opts='{gcc_opts}'",
        workload = rel_workload.display(),
    );
    debug!(command = %cva6_cmd, "invoking cva6 flow");

    let status = Command::new("bash")
        .arg("-c")
        .arg(&cva6_cmd)
        .current_dir(sim_dir)
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .env("DV_SIMULATORS", SIMULATOR)
        .stdout(Stdio::null())
        .status()
        .map_err(|e| format!("failed to launch cva6 flow: {e}"))?;

    if !status.success() {
        return Err(format!("cva6 flow exited with {status}"));
    }
    Ok(())
}

/// Locate the newest `out_*` run directory under the simulation directory.
///
/// cva6.py stamps the directory with the run date; taking the most recently
/// modified one avoids reconstructing its naming scheme here.
fn find_run_dir(sim_dir: &Path) -> Option<PathBuf> {
    let mut best: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(sim_dir).ok()?.flatten() {
        let path = entry.path();
        if !is_run_dir(&path) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if best.as_ref().is_none_or(|(t, _)| modified > *t) {
            best = Some((modified, path));
        }
    }
    best.map(|(_, path)| path)
}

fn is_run_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("out_"))
}

/// Remove logs for this test left over from earlier runs, in every run
/// directory. A stale log would otherwise be picked up when the new run
/// fails to produce one.
fn remove_stale_logs(sim_dir: &Path, log_name: &str) {
    let Ok(entries) = fs::read_dir(sim_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !is_run_dir(&path) {
            continue;
        }
        for name in [log_name.to_string(), format!("{log_name}.iss")] {
            let log = path.join(format!("{SIMULATOR}_sim")).join(&name);
            if log.exists() {
                if let Err(e) = fs::remove_file(&log) {
                    warn!(error = %e, path = %log.display(), "failed to remove stale log");
                }
            }
        }
    }
}
