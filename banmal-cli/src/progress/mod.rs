//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for file processing
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize progress bar for file processing
    pub fn init_files(&mut self, total_files: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Update progress for a completed file
    pub fn file_completed(&self, filename: &str, documents: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{filename} ({documents} documents)"));
            pb.inc(1);
        }
    }

    /// Print a line without tearing the bar
    pub fn println(&self, message: &str) {
        match &self.progress_bar {
            Some(pb) => pb.println(message),
            None => eprintln!("{message}"),
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_files(3);
        assert!(reporter.progress_bar.is_none());
        reporter.file_completed("posts.jsonl", 10);
        reporter.finish();
    }

    #[test]
    fn test_bar_counts_files() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_files(2);
        reporter.file_completed("a.jsonl", 1);
        assert_eq!(reporter.progress_bar.as_ref().unwrap().position(), 1);
        reporter.finish();
    }
}
