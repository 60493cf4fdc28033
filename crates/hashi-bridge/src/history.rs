//! History recording, reduced to a no-op stub.
//!
//! An embedded web session has no durable home directory to persist
//! history into, and the host keeps its own transcript anyway. The
//! recorder keeps the interface the session loop expects while storing
//! nothing.

/// Accepts history entries and drops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryRecorder {
    enabled: bool,
}

impl HistoryRecorder {
    /// The stub recorder. `enabled` is permanently false.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether entries are being persisted. Always false.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one input unit. No-op.
    pub fn record(&mut self, _input: &str) {}

    /// Number of persisted entries. Always zero.
    pub fn len(&self) -> usize {
        0
    }

    /// Always true.
    pub fn is_empty(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_stores_nothing() {
        let mut history = HistoryRecorder::disabled();
        history.record("x = 1");
        history.record("plot(x)");
        assert!(!history.is_enabled());
        assert_eq!(history.len(), 0);
        assert!(history.is_empty());
    }
}
