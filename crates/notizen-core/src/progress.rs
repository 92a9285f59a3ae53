use std::path::Path;

/// Trait for reporting run progress.
///
/// CLI implements with indicatif, library callers use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_relocate_start(&self) {}
    fn on_relocate_complete(&self, _notes: usize, _moved: usize, _duration_secs: f64) {}
    fn on_compile_start(&self, _total_jobs: usize) {}
    fn on_job_complete(&self, _finished: usize, _total_jobs: usize) {}
    fn on_compile_complete(&self, _compiled: usize, _failed: usize, _duration_secs: f64) {}
    fn on_index_written(&self, _path: &Path) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
