//! Terminal presentation surface.
//!
//! A terminal can't replace text it already printed, so each region write
//! is printed as it happens: the banner on stderr when it changes, results
//! on stdout, errors on stderr.

use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

use linkwatch_core::{ErrorRegion, OFFLINE_BANNER_TEXT, ResultsRegion, StatusBanner, UserEntry};

use crate::cli::ColorMode;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub struct TerminalSurface {
    color: bool,
    banner_visible: AtomicBool,
}

impl TerminalSurface {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            banner_visible: AtomicBool::new(false),
        }
    }

    fn entry_line(&self, entry: &UserEntry) -> String {
        if self.color {
            format!("{} ({})", entry.name.bold(), entry.email)
        } else {
            entry.to_string()
        }
    }
}

impl StatusBanner for TerminalSurface {
    fn set_visible(&self, visible: bool) {
        let was_visible = self.banner_visible.swap(visible, Ordering::SeqCst);
        if visible {
            if self.color {
                eprintln!("{}", format!("⚠ {OFFLINE_BANNER_TEXT}").black().on_yellow());
            } else {
                eprintln!("! {OFFLINE_BANNER_TEXT}");
            }
        } else if was_visible {
            if self.color {
                eprintln!("{}", "✓ Back online".green().dimmed());
            } else {
                eprintln!("Back online");
            }
        }
    }
}

impl ResultsRegion for TerminalSurface {
    fn clear(&self) {}

    fn show_placeholder(&self, text: &str) {
        if self.color {
            println!("{}", text.dimmed());
        } else {
            println!("{text}");
        }
    }

    fn show_entries(&self, entries: &[UserEntry]) {
        for entry in entries {
            println!("{}", self.entry_line(entry));
        }
    }
}

impl ErrorRegion for TerminalSurface {
    fn clear(&self) {}

    fn show(&self, message: &str) {
        if self.color {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{message}");
        }
    }
}
