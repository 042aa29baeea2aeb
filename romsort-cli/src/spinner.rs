//! Spinner for long-running archive work.
//!
//! Extraction and packing shell out to 7-Zip and can take minutes on large
//! disc images. The spinner keeps the terminal alive meanwhile and is
//! hidden entirely in quiet or JSON mode.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub(crate) fn start(msg: impl Into<String>, hidden: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg} ({elapsed})")
            .expect("static pattern")
            .tick_chars("/-\\|");
        pb.set_style(style);
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub(crate) fn set_message(&self, msg: impl Into<String>) {
        self.pb.set_message(msg.into());
    }

    /// Stop ticking and clear the line.
    pub(crate) fn finish(self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}
