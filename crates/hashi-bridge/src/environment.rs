//! Terminal environment bootstrap.
//!
//! The session's output is consumed by a host process, not a real
//! terminal, so the usual capability detection would turn everything
//! off. Startup sets the conventional color-capability hints
//! unconditionally and forces color on. Purely cosmetic; not part of
//! the transport contract.

use std::io::IsTerminal;

/// Color capability for the traceback renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Detect from the stderr terminal state.
    #[default]
    Auto,
    /// Always colorize (host consumes ANSI, e.g. a web frontend).
    Forced,
    /// Never colorize.
    Never,
}

impl ColorMode {
    /// Whether ANSI sequences should be emitted right now.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Forced => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stderr().is_terminal(),
        }
    }
}

/// The hints set at startup, in order.
const TERMINAL_HINTS: &[(&str, &str)] = &[
    ("TERM", "xterm-256color"),
    ("FORCE_COLOR", "1"),
    ("COLORTERM", "truecolor"),
    ("CLICOLOR", "1"),
    ("CLICOLOR_FORCE", "1"),
];

/// Set the terminal/color hints and return the forced color mode.
pub fn bootstrap_terminal_env() -> ColorMode {
    for (key, value) in TERMINAL_HINTS {
        std::env::set_var(key, value);
    }
    tracing::debug!("terminal color hints set for embedded session");
    ColorMode::Forced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_sets_hints_and_forces_color() {
        let mode = bootstrap_terminal_env();
        assert_eq!(mode, ColorMode::Forced);
        assert!(mode.enabled());
        assert_eq!(std::env::var("TERM").as_deref(), Ok("xterm-256color"));
        assert_eq!(std::env::var("CLICOLOR_FORCE").as_deref(), Ok("1"));
    }

    #[test]
    fn never_mode_disables_color() {
        assert!(!ColorMode::Never.enabled());
    }
}
