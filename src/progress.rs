use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Below this many files no bar is drawn
const PROGRESS_THRESHOLD: u64 = 50;

const TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress over the files of a run, drawn on stderr so property output on
/// stdout stays clean.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total: u64, enabled: bool) -> Self {
        if !enabled || total < PROGRESS_THRESHOLD {
            return Self::hidden();
        }

        let style = match ProgressStyle::with_template(TEMPLATE) {
            Ok(style) => style.progress_chars("=>-"),
            Err(_) => ProgressStyle::default_bar(),
        };
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr()).with_style(style);
        Self { bar: Some(bar) }
    }

    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Advance by one file, showing its path
    pub fn advance(&self, path: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(path.to_string());
            bar.inc(1);
        }
    }

    /// Print a line above the bar without tearing it
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
