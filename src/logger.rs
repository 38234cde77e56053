//! Logging utilities with colored output.
//!
//! - `log!` prints a message behind a colored `[module]` prefix
//! - `debug!` does the same, but only with `--verbose`
//!
//! ```ignore
//! log!("build"; "{} pages", count);
//! debug!("site"; "plugin {}", name);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
///
/// Honours `--color` and whether stdout is a terminal.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let colored = |apply: fn(&String) -> String| {
        prefix.if_supports_color(Stream::Stdout, apply).to_string()
    };
    match module_lower {
        "init" | "done" => colored(|p| p.bright_green().bold().to_string()),
        "error" => colored(|p| p.bright_red().bold().to_string()),
        "warning" => colored(|p| p.bright_magenta().bold().to_string()),
        "feed" | "copy" => colored(|p| p.bright_blue().bold().to_string()),
        _ => colored(|p| p.bright_yellow().bold().to_string()),
    }
}
