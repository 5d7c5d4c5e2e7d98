//! Terminal UI utilities for progress indication and styled output.

use std::borrow::Cow;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for indeterminate progress.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with a message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish the spinner with a success message.
    pub fn finish_with_success(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("✓").green().bold(), message);
    }

    /// Finish the spinner with a failure message.
    pub fn finish_with_failure(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    /// Finish the spinner with a warning message.
    pub fn finish_with_warning(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("!").yellow().bold(), message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

// ============================================================================
// Styled output helpers
// ============================================================================

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").cyan(), message);
}

/// Print a header/section title.
pub fn header(message: &str) {
    eprintln!("\n{}", style(message).bold());
}

/// Print a path output (like "-> /path/to/file").
pub fn path_output(path: &std::path::Path) {
    eprintln!("  {} {}", style("→").dim(), style(path.display()).dim());
}

// ============================================================================
// Multi-step task tracking
// ============================================================================

/// Track progress through multiple steps.
pub struct StepTracker {
    current: usize,
    total: usize,
}

impl StepTracker {
    /// Create a new step tracker.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Start the next step with a message.
    pub fn step(&mut self, message: &str) -> Spinner {
        self.current += 1;
        let step_msg = format!("[{}/{}] {}", self.current, self.total, message);
        Spinner::new(step_msg)
    }
}
