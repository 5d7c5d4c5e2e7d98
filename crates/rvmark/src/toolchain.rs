//! RISC-V toolchain discovery.

use std::process::Command;

/// Find a RISC-V GCC cross-compiler in PATH.
///
/// linux-gnu flavors are preferred because the gem5 m5 ops are built against
/// the linux-gnu ABI in this flow. Returns the full command name.
#[must_use]
pub fn find_gcc() -> Option<String> {
    const PREFIXES: &[&str] = &[
        "riscv64-linux-gnu-",
        "riscv64-unknown-elf-",
        "riscv32-linux-gnu-",
        "riscv32-unknown-elf-",
    ];

    for prefix in PREFIXES {
        let gcc = format!("{prefix}gcc");
        if Command::new("which")
            .arg(&gcc)
            .output()
            .is_ok_and(|o| o.status.success())
        {
            return Some(gcc);
        }
    }
    None
}
