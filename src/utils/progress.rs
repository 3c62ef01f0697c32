use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// File-count progress bar for directory ingestion; a no-op when silent.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total: u64, message: &str, silent: bool) -> Self {
        if silent {
            return Self { progress_bar: None };
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
        }
    }

    /// Drawn nowhere but still tracks position and length
    #[cfg(test)]
    pub(crate) fn hidden() -> Self {
        Self {
            progress_bar: Some(ProgressBar::hidden()),
        }
    }

    #[cfg(test)]
    pub(crate) fn length(&self) -> Option<u64> {
        self.progress_bar.as_ref().and_then(|pb| pb.length())
    }

    pub fn set_length(&self, total: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_length(total);
        }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_set_after_creation() {
        let progress = ProgressReporter::hidden();
        progress.set_length(3);
        progress.increment(1);
        assert_eq!(progress.length(), Some(3));
    }

    #[test]
    fn test_silent_reporter_is_noop() {
        let progress = ProgressReporter::new(0, "quiet", true);
        progress.set_length(5);
        progress.increment(1);
        progress.finish_with_message("done");
        assert_eq!(progress.length(), None);
    }
}
