//! Shell output abstraction for the CLI.
//!
//! This module provides a global `Shell` for CLI output, handling terminal
//! detection, colors, and progress spinners. Status lines go to stderr;
//! stdout is reserved for command results.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

use anstyle::{AnsiColor, Style};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Global shell instance.
static SHELL: OnceLock<Shell> = OnceLock::new();

/// ANSI styles for output.
mod styles {
    use super::{AnsiColor, Style};

    pub const SUCCESS: Style = Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)));
    pub const ERROR: Style = Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)));
}

/// Get a reference to the global shell, initializing it on first use.
pub fn get() -> &'static Shell {
    SHELL.get_or_init(Shell::new)
}

/// Shell output abstraction.
pub struct Shell {
    multi_progress: MultiProgress,
}

impl Shell {
    fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
        }
    }

    /// Check if stderr is a terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        io::stderr().is_terminal()
    }

    /// Print a status message with a styled marker.
    pub fn status(&self, marker: impl Display, style: Style, message: impl Display) -> io::Result<()> {
        let mut stderr = anstream::stderr().lock();
        writeln!(
            stderr,
            "{style}{marker}{} {message}",
            style.render_reset()
        )?;
        stderr.flush()
    }

    /// Print a command result line to stdout.
    pub fn print_result(&self, message: impl Display) -> io::Result<()> {
        let mut stdout = anstream::stdout().lock();
        writeln!(stdout, "{message}")?;
        stdout.flush()
    }

    /// Start a progress spinner for a fetch stage.
    ///
    /// Outside a terminal the spinner degrades to plain status lines emitted
    /// by the terminal calls, so messages stay observable.
    #[must_use]
    pub fn spinner(&self, message: impl Into<String>) -> Spinner {
        let message = message.into();

        if !self.is_terminal() {
            return Spinner { bar: None, message };
        }

        let bar = self.multi_progress.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("valid template"),
        );
        bar.set_message(message.clone());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Spinner {
            bar: Some(bar),
            message,
        }
    }
}

/// A progress spinner owned by one fetch stage.
///
/// Consuming `succeed*`/`fail` methods guarantee exactly one terminal call
/// per stage; the handle cannot be finished twice or left spinning.
pub struct Spinner {
    bar: Option<ProgressBar>,
    message: String,
}

impl Spinner {
    /// Finish the spinner keeping its original message.
    pub fn succeed_quiet(self) {
        let message = self.message.clone();
        self.finish(true, message);
    }

    /// Finish the spinner with a success message.
    pub fn succeed(self, message: impl Into<String>) {
        self.finish(true, message.into());
    }

    /// Finish the spinner with a failure message.
    pub fn fail(self, message: impl Into<String>) {
        self.finish(false, message.into());
    }

    fn finish(self, success: bool, message: String) {
        let (marker, style) = if success {
            ("✔", styles::SUCCESS)
        } else {
            ("✖", styles::ERROR)
        };

        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
        let _ = get().status(marker, style, message);
    }
}

// Convenience functions that use the global shell

/// Start a spinner.
pub fn spinner(message: impl Into<String>) -> Spinner {
    get().spinner(message)
}

/// Check if running in an interactive terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && get().is_terminal()
}

/// Print a result line to stdout (use `result!` macro instead).
#[doc(hidden)]
pub fn result_fn(message: impl Display) {
    let _ = get().print_result(message);
}

// ============================================================================
// Convenience macros
// ============================================================================

/// Print a command result line to stdout.
#[macro_export]
macro_rules! result {
    () => {
        $crate::shell::result_fn("")
    };
    ($($arg:tt)*) => {
        $crate::shell::result_fn(format!($($arg)*))
    };
}
