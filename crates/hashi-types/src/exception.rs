//! Exception data handed to the traceback formatter.

use serde::{Deserialize, Serialize};

/// One frame of a captured traceback, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Source file (or pseudo-file like `<session>`).
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// Enclosing function name.
    pub function: String,
    /// The source line itself, when the host captured it.
    pub source: Option<String>,
}

impl TraceFrame {
    /// Create a frame without source text.
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            source: None,
        }
    }

    /// Attach the source line.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A raised exception's type, value, and traceback.
///
/// `traceback: None` is valid — exceptions raised before any frame was
/// entered (or whose traceback the host dropped) still format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    /// Exception type name (e.g. "ValueError").
    pub kind: String,
    /// Exception message.
    pub message: String,
    /// Captured frames, outermost first.
    pub traceback: Option<Vec<TraceFrame>>,
}

impl ExceptionInfo {
    /// Create exception info without a traceback.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            traceback: None,
        }
    }

    /// Attach a traceback.
    pub fn with_traceback(mut self, frames: Vec<TraceFrame>) -> Self {
        self.traceback = Some(frames);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_frames() {
        let info = ExceptionInfo::new("ValueError", "bad input")
            .with_traceback(vec![TraceFrame::new("<session>", 3, "<module>")]);
        assert_eq!(info.traceback.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn none_traceback_is_representable() {
        let info = ExceptionInfo::new("KeyboardInterrupt", "");
        assert!(info.traceback.is_none());
    }
}
