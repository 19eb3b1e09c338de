use std::path::Path;

/// Trait for reporting session activity.
///
/// The CLI implements it with an indicatif spinner; tests and embedders use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_stage_complete(&self, _source: &Path, _staged: &Path, _copied: bool) {}
    fn on_compare_start(&self, _command_line: &str) {}
    fn on_compare_complete(&self, _success: bool, _duration_secs: f64) {}
    fn on_history_cleared(&self, _deleted: usize, _failed: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
