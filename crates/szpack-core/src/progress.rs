//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the external 7-Zip process runs.
///
/// 7-Zip gives no machine-readable progress on its standard streams when
/// they are captured, so this is an indeterminate spinner.
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self {
            spinner: None,
            enabled,
        }
    }

    /// Reporter that never draws anything
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Stop the spinner, leaving a final message on screen
    pub fn finish(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(message.to_string());
        }
    }

    /// Stop the spinner and erase it
    pub fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.clear();
    }
}
