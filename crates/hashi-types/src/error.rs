//! Bridge error types.
//!
//! The policy split matters more than the variants: only `Interrupted` is
//! allowed to cross the bridge boundary into the host's evaluation loop.
//! Everything else is recovered locally and surfaced as a diagnostic.

use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge operation errors.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Cooperative cancellation: the interrupt token tripped. Propagates
    /// through any number of enclosing calls until the host loop catches
    /// it and treats the current unit of work as aborted.
    #[error("execution interrupted by signal")]
    Interrupted,

    /// Figure rendering failed. Recovered by the capture adapter.
    #[error("figure render failed: {0}")]
    Render(String),

    /// Rich formatting failed. Recovered by the result hook.
    #[error("rich formatting failed: {0}")]
    Format(String),

    /// Underlying I/O failure (blocking input, stream writes).
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

impl BridgeError {
    /// True if this error is the cancellation condition rather than a
    /// recoverable bridge failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, BridgeError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_is_interrupt() {
        assert!(BridgeError::Interrupted.is_interrupt());
        assert!(!BridgeError::Format("x".into()).is_interrupt());
    }

    #[test]
    fn io_error_converts() {
        let err: BridgeError = std::io::Error::new(std::io::ErrorKind::Other, "pipe").into();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
