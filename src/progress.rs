//! # Progress Module
//!
//! Spinner shown while oxipng runs. The optimizer gives no per-file
//! progress, so there is nothing to count; the spinner only shows elapsed
//! time. indicatif hides it when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner around a single optimizer run
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Start a spinner with a message
    pub fn spinner(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A spinner that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Stop and erase the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressManager {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_is_idempotent() {
        let progress = ProgressManager::hidden();
        progress.finish();
        progress.finish();
    }
}
