//! Progress reporting for batch commands.

use declarative::{ProgressCallback, TaskOutcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar on stderr, hidden with `--quiet`.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl ProgressCallback for BarProgress {
    fn on_batch_start(&mut self, count: usize) {
        self.bar.set_length(count as u64);
        self.bar.set_position(0);
    }

    fn on_task_start(&mut self, _id: &str, description: &str) {
        self.bar.set_message(description.to_string());
    }

    fn on_task_complete(&mut self, id: &str, outcome: &TaskOutcome) {
        if let TaskOutcome::Failed { diagnostic } = outcome {
            log::debug!("{id}: {diagnostic}");
        }
        self.bar.inc(1);
    }

    fn on_batch_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
