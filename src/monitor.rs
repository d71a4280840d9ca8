//! Terminal progress display using indicatif.
//!
//! The engine never talks to the terminal. [`Monitor`] runs on the calling
//! thread while the engine works on another, polling the finder's
//! [`ProgressState`] every refresh interval and redrawing its bars:
//!
//! - "Finding files": a spinner counting discovered files
//! - "Processing files": a bar over the discovered file count
//! - "Deleting duplicates": a bar over the files scheduled for removal

use std::thread;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::progress::ProgressState;

/// Polls a [`ProgressState`] and renders it.
pub struct Monitor {
    multi: MultiProgress,
    refresh: Duration,
    quiet: bool,
}

impl Monitor {
    /// Create a monitor redrawing every `refresh`.
    ///
    /// A quiet monitor still waits for the phase to end but draws nothing.
    #[must_use]
    pub fn new(refresh: Duration, quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            refresh: refresh.max(Duration::from_millis(1)),
            quiet,
        }
    }

    fn add_bar(&self, bar: ProgressBar) -> ProgressBar {
        if self.quiet {
            ProgressBar::hidden()
        } else {
            self.multi.add(bar)
        }
    }

    /// Follow a scan until `has_finished` is set or `worker_done` reports
    /// that the worker has stopped (for example after an error).
    pub fn watch_scan(&self, progress: &ProgressState, worker_done: impl Fn() -> bool) {
        let finding = self.add_bar(ProgressBar::new_spinner());
        finding.set_style(spinner_style());
        finding.set_message("Finding files");
        finding.enable_steady_tick(self.refresh);

        while !progress.has_found_files() {
            if worker_done() {
                finding.abandon();
                return;
            }
            finding.set_position(progress.file_count() as u64);
            thread::sleep(self.refresh);
        }
        finding.set_position(progress.file_count() as u64);
        finding.finish_with_message("Found files");

        let processing = self.add_bar(ProgressBar::new(progress.file_count() as u64));
        processing.set_style(bar_style());
        processing.set_message("Processing files");

        while !progress.has_finished() {
            if worker_done() {
                processing.abandon();
                return;
            }
            processing.set_position(progress.processed_count() as u64);
            thread::sleep(self.refresh);
        }
        processing.set_position(progress.processed_count() as u64);
        processing.finish_with_message("Processed files");
    }

    /// Follow a deletion pass over `total` files until `has_deleted` is set
    /// or `worker_done` reports that the worker has stopped.
    pub fn watch_delete(
        &self,
        progress: &ProgressState,
        total: usize,
        worker_done: impl Fn() -> bool,
    ) {
        let start = progress.deleted_count();
        let deleting = self.add_bar(ProgressBar::new(total as u64));
        deleting.set_style(bar_style());
        deleting.set_message("Deleting duplicates");

        let position = || progress.deleted_count().saturating_sub(start) as u64;
        while !progress.has_deleted() {
            if worker_done() {
                break;
            }
            deleting.set_position(position());
            thread::sleep(self.refresh);
        }
        deleting.set_position(position());
        deleting.finish_with_message("Deleted duplicates");
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█>-")
}
