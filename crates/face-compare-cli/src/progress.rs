use colored::*;
use face_compare_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner while the comparator runs, one-line summaries for everything else.
pub struct CliReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        match self.spinner.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_stage_complete(&self, source: &Path, staged: &Path, copied: bool) {
        if copied {
            eprintln!(
                "  {} Staged {} as {}",
                "✓".green(),
                source.display(),
                staged.display()
            );
        } else {
            eprintln!("  {} Reusing {}", "✓".green(), staged.display());
        }
    }

    fn on_compare_start(&self, _command_line: &str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message("Comparing faces...");
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(old) = self.take_spinner() {
            old.finish_and_clear();
        }
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_compare_complete(&self, success: bool, duration_secs: f64) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        if success {
            eprintln!("  {} Comparison finished in {:.2}s", "✓".green(), duration_secs);
        } else {
            eprintln!("  {} Comparison failed after {:.2}s", "✗".red(), duration_secs);
        }
    }

    fn on_history_cleared(&self, deleted: usize, failed: usize) {
        if failed == 0 {
            eprintln!("  {} Deleted {} history files", "✓".green(), deleted);
        } else {
            eprintln!(
                "  {} Deleted {} history files, {} could not be removed",
                "!".yellow(),
                deleted,
                failed
            );
        }
    }
}
