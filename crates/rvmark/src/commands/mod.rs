//! Command implementations.
//!
//! Each submodule handles one CLI command. Handlers return an exit code and
//! log failures through `tracing`; they never panic on external-tool errors.

mod parse;
mod rtl;
mod uarch;

use rvmark_report::MetricReport;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Rtl { .. } => handle_rtl(cli),
        Commands::Uarch { .. } => handle_uarch(cli),
        Commands::Parse { .. } => handle_parse(cli),
    }
}

fn handle_rtl(cli: &Cli) -> i32 {
    let Commands::Rtl {
        target,
        workload,
        cva6_root,
        keep_build,
        disasm,
        kind,
    } = &cli.command
    else {
        unreachable!("rtl command variant mismatch");
    };

    rtl::cmd_rtl(target, workload, cva6_root, *keep_build, *disasm, *kind)
}

fn handle_uarch(cli: &Cli) -> i32 {
    let Commands::Uarch {
        config,
        workload,
        gem5_root,
        outdir,
        kind,
    } = &cli.command
    else {
        unreachable!("uarch command variant mismatch");
    };

    uarch::cmd_uarch(config, workload, gem5_root, outdir, *kind)
}

fn handle_parse(cli: &Cli) -> i32 {
    let Commands::Parse {
        artifact,
        backend,
        kind,
        no_calibration,
    } = &cli.command
    else {
        unreachable!("parse command variant mismatch");
    };

    parse::cmd_parse(artifact, *backend, *kind, *no_calibration)
}

// ============================================================================
// Output formatting helpers
// ============================================================================

/// Print a finished report: header, aligned table, and the two flat vectors.
pub fn print_report(title: &str, report: &MetricReport) {
    println!();
    println!("{title}");
    print!("{}", report.render_table());
    println!();
    println!("Clean result (OFFICIAL):  {}", report.official_vector());
    println!("Clean result (CORRECTED): {}", report.corrected_vector());
    println!();
}
