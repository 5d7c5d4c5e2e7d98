//! Disassembly display for compiled workloads.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::warn;

use crate::terminal;

const OBJDUMP: &str = "riscv64-linux-gnu-objdump";

/// Source markers delimiting the region of interest in the listing.
/// Workload sources carry these comments around the measured section.
const START_MARKER: &str = "// bench: start";
const END_MARKER: &str = "// bench: end";

/// Disassemble a compiled workload into a `.list` file next to it and print
/// the region between the bench markers.
///
/// Display-only: every failure is a warning, never fatal to the run.
pub fn show_listing(object: &Path) {
    if !object.exists() {
        warn!(path = %object.display(), "no binary to disassemble");
        return;
    }

    let output = match Command::new(OBJDUMP)
        .args(["-d", "-S", "-l"])
        .arg(object)
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            warn!(status = %output.status, "objdump failed");
            return;
        }
        Err(e) => {
            warn!(error = %e, "objdump not found, skipping disassembly");
            return;
        }
    };

    let list_path = object.with_extension("list");
    match fs::write(&list_path, &output.stdout) {
        Ok(()) => terminal::path_output(&list_path),
        Err(e) => warn!(error = %e, path = %list_path.display(), "failed to write listing"),
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    let region = marked_region(&listing);
    if region.is_empty() {
        warn!("bench markers not found in listing, nothing to show");
        return;
    }

    terminal::header("Disassembly (region of interest)");
    for line in &region {
        println!("{line}");
    }
    println!();
}

/// Lines between the start and end markers.
///
/// Interleaved-source noise from `-l` (path/comment lines) is dropped,
/// except discriminator annotations which mark distinct code paths on one
/// source line.
fn marked_region(listing: &str) -> Vec<String> {
    let mut region = Vec::new();
    let mut printing = false;
    for line in listing.lines() {
        if line.contains(END_MARKER) {
            break;
        }
        if line.contains(START_MARKER) {
            printing = true;
            continue;
        }
        if !printing {
            continue;
        }
        if line.trim_start().starts_with('/') && !line.contains("(discriminator") {
            continue;
        }
        region.push(line.to_string());
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_region_filters_outside_lines() {
        let listing = concat!(
            "prologue instructions\n",
            "// bench: start\n",
            "  10: 00000013  nop\n",
            "/path/to/src.c:12\n",
            "/path/to/src.c:12 (discriminator 1)\n",
            "  14: 00108093  addi ra,ra,1\n",
            "// bench: end\n",
            "epilogue instructions\n",
        );
        let region = marked_region(listing);
        assert_eq!(
            region,
            vec![
                "  10: 00000013  nop".to_string(),
                "/path/to/src.c:12 (discriminator 1)".to_string(),
                "  14: 00108093  addi ra,ra,1".to_string(),
            ]
        );
    }

    #[test]
    fn test_marked_region_without_markers_is_empty() {
        assert!(marked_region("  10: nop\n  14: ret\n").is_empty());
    }

    #[test]
    fn test_marked_region_unterminated_runs_to_eof() {
        let region = marked_region("// bench: start\n  10: nop\n");
        assert_eq!(region, vec!["  10: nop".to_string()]);
    }
}
