use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// ANSI escapes for terminal output; all empty when disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct Colors {
    pub error: &'static str,
    pub warning: &'static str,
    /// Section headers such as `[path]`
    pub info: &'static str,
    reset: &'static str,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            error: RED,
            warning: YELLOW,
            info: CYAN,
            reset: RESET,
        }
    }

    pub fn reset(&self) -> &'static str {
        self.reset
    }
}

/// Priority: `--no-color` > `--color` > `NO_COLOR` > stdout is a terminal
pub fn should_use_colors(force_color: bool, no_color: bool) -> bool {
    if no_color {
        return false;
    }
    if force_color {
        return true;
    }
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    io::stdout().is_terminal()
}
