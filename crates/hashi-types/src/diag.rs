//! Out-of-band diagnostic lines.
//!
//! When a host reads raw text streams instead of registering sinks, these
//! single-line messages with recognizable prefixes are the only channel
//! the bridge has. The prefixes are a wire contract; hosts pattern-match
//! on them, so `Display` here is authoritative.

use std::fmt;

/// Which standard stream a diagnostic belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagStream {
    Out,
    Err,
}

/// A structured diagnostic emitted by the bridge's own bookkeeping.
///
/// These never represent user errors: they report that the bridge
/// recovered from something (a value it could not encode, a formatter
/// that failed) or that an out-of-band event happened (interrupt,
/// clear-output fallback).
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A payload value failed the JSON probe and was stringified.
    SerializationWarning { key: String, reason: String },
    /// The rich-result formatter itself failed; a degraded payload was sent.
    DisplayHookError { detail: String },
    /// The exception formatter's primary path failed.
    FormatterError { detail: String },
    /// An interrupt signal tripped the cancellation token.
    Interrupt { detail: String },
    /// Clear-output sentinel, emitted when no clear sink is registered.
    ClearOutput { wait: bool },
}

impl Diagnostic {
    /// The stream this diagnostic is written to when no structured
    /// channel is available.
    pub fn stream(&self) -> DiagStream {
        match self {
            // Hook errors interleave with the host's own error output.
            Diagnostic::DisplayHookError { .. } => DiagStream::Err,
            _ => DiagStream::Out,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SerializationWarning { key, reason } => write!(
                f,
                "[SERIALIZATION_WARNING] Non-serializable value for key '{key}': {reason}"
            ),
            Diagnostic::DisplayHookError { detail } => {
                write!(f, "[DISPLAY_HOOK_ERROR] {detail}")
            }
            Diagnostic::FormatterError { detail } => {
                write!(f, "[FORMATTER_ERROR] {detail}")
            }
            Diagnostic::Interrupt { detail } => write!(f, "[INTERRUPT] {detail}"),
            Diagnostic::ClearOutput { wait } => write!(f, "[CLEAR_OUTPUT:{wait}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_warning_names_key_and_reason() {
        let d = Diagnostic::SerializationWarning {
            key: "image".into(),
            reason: "non-finite float".into(),
        };
        assert_eq!(
            d.to_string(),
            "[SERIALIZATION_WARNING] Non-serializable value for key 'image': non-finite float"
        );
        assert_eq!(d.stream(), DiagStream::Out);
    }

    #[test]
    fn clear_output_sentinel_encodes_wait() {
        assert_eq!(
            Diagnostic::ClearOutput { wait: true }.to_string(),
            "[CLEAR_OUTPUT:true]"
        );
        assert_eq!(
            Diagnostic::ClearOutput { wait: false }.to_string(),
            "[CLEAR_OUTPUT:false]"
        );
    }

    #[test]
    fn hook_errors_go_to_stderr() {
        let d = Diagnostic::DisplayHookError {
            detail: "boom".into(),
        };
        assert_eq!(d.stream(), DiagStream::Err);
        assert_eq!(d.to_string(), "[DISPLAY_HOOK_ERROR] boom");
    }
}
