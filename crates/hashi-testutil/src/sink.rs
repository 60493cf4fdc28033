//! Recording sinks: capture every sink invocation for assertion.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value as JsonValue;

/// One captured display-sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCall {
    pub data: JsonValue,
    pub metadata: JsonValue,
    pub transient: JsonValue,
    pub update: bool,
}

/// One captured result-sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCall {
    pub count: u64,
    pub data: JsonValue,
    pub metadata: JsonValue,
}

/// One captured clear-sink invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearCall {
    pub wait: bool,
}

/// Shared recorders for all three bridge sinks.
///
/// Register via closures that clone the inner `Rc`s:
///
/// ```ignore
/// let rec = RecordedSinks::new();
/// ctx.on_result(rec.result_sink());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordedSinks {
    pub displays: Rc<RefCell<Vec<DisplayCall>>>,
    pub results: Rc<RefCell<Vec<ResultCall>>>,
    pub clears: Rc<RefCell<Vec<ClearCall>>>,
}

impl RecordedSinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closure suitable for `BridgeContext::on_display`.
    pub fn display_sink(&self) -> impl FnMut(JsonValue, JsonValue, JsonValue, bool) + 'static {
        let calls = self.displays.clone();
        move |data, metadata, transient, update| {
            calls.borrow_mut().push(DisplayCall {
                data,
                metadata,
                transient,
                update,
            });
        }
    }

    /// A closure suitable for `BridgeContext::on_result`.
    pub fn result_sink(&self) -> impl FnMut(u64, JsonValue, JsonValue) + 'static {
        let calls = self.results.clone();
        move |count, data, metadata| {
            calls.borrow_mut().push(ResultCall {
                count,
                data,
                metadata,
            });
        }
    }

    /// A closure suitable for `BridgeContext::on_clear`.
    pub fn clear_sink(&self) -> impl FnMut(bool) + 'static {
        let calls = self.clears.clone();
        move |wait| {
            calls.borrow_mut().push(ClearCall { wait });
        }
    }
}
