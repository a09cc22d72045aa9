//! Stage progress bar for long-running commands.
//!
//! Drawing is cosmetic and goes to stderr only when it is a terminal, so
//! piped output and log files stay clean.

use std::io::{self, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Progress over a fixed number of named stages.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    /// Creates a bar over `stages` steps, hidden unless stderr is a terminal.
    pub fn new(stages: u64) -> Self {
        Self::with_visibility(stages, io::stderr().is_terminal())
    }

    pub fn hidden(stages: u64) -> Self {
        Self::with_visibility(stages, false)
    }

    fn with_visibility(stages: u64, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(stages)
        } else {
            ProgressBar::hidden()
        };
        if !visible {
            bar.set_length(stages);
        }
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    /// Marks the start of a stage.
    pub fn start(&self, label: &'static str) {
        self.bar.set_message(label);
    }

    /// Marks the current stage as done.
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clears the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
