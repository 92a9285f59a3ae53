use indicatif::{ProgressBar, ProgressStyle};
use notizen_core::ProgressReporter;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Relocate phase: spinner
/// - Compile phase: progress bar over launched jobs
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_relocate_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars(TICK_CHARS),
        );
        pb.set_message("Organizing notes...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_relocate_complete(&self, notes: usize, moved: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Organized {} notes ({} moved) in {:.2}s",
            notes, moved, duration_secs
        );
    }

    fn on_compile_start(&self, total_jobs: usize) {
        let pb = ProgressBar::new(total_jobs as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Compiling [{bar:30.cyan/dim}] {pos}/{len} notes",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_job_complete(&self, finished: usize, _total_jobs: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_position(finished as u64);
        }
    }

    fn on_compile_complete(&self, compiled: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        let mark = if failed == 0 {
            "\x1b[32m✓\x1b[0m"
        } else {
            "\x1b[33m!\x1b[0m"
        };
        eprintln!(
            "  {} Compiled {} notes, {} failed in {:.2}s",
            mark, compiled, failed, duration_secs
        );
    }

    fn on_index_written(&self, path: &Path) {
        eprintln!("  \x1b[32m✓\x1b[0m Wrote {}", path.display());
    }
}
