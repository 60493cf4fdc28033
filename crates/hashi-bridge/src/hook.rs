//! Result hook: intercepts the value produced by each completed
//! top-level evaluation.
//!
//! The hook owns the execution counter. Each present value bumps it,
//! gets rich-formatted into MIME bundles, serialized, and forwarded to
//! the result sink. A formatting failure is downgraded to a plain-text
//! payload and a diagnostic — it never reaches the host's execution loop.

use serde_json::{Map as JsonMap, Value as JsonValue};

use hashi_types::{mime, Diagnostic, RichValue};

use crate::context::BridgeContext;
use crate::format::{compute_format_data, FormatterFn};
use crate::serialize::serialize_value;

/// Intercepts top-level evaluation results.
pub struct ResultHook {
    count: u64,
    formatter: FormatterFn,
}

impl Default for ResultHook {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultHook {
    /// Hook with the built-in rich formatter.
    pub fn new() -> Self {
        Self {
            count: 0,
            formatter: Box::new(|value, opts| compute_format_data(value, opts)),
        }
    }

    /// Hook with a host-supplied formatter.
    pub fn with_formatter(formatter: FormatterFn) -> Self {
        Self {
            count: 0,
            formatter,
        }
    }

    /// The number of results processed so far.
    pub fn execution_count(&self) -> u64 {
        self.count
    }

    /// Handle the value of a completed evaluation, if any.
    ///
    /// Absent values are a no-op ("no result to show"). The hook borrows
    /// the value and never alters it, so the host's own result tracking
    /// is unaffected.
    pub fn process(&mut self, ctx: &mut BridgeContext, value: Option<&RichValue>) {
        let Some(value) = value else {
            return;
        };
        self.count += 1;

        match (self.formatter)(value, &ctx.options) {
            Ok((data, metadata)) => {
                let data = serialize_value(&mut ctx.diag, &data);
                let metadata = serialize_value(&mut ctx.diag, &metadata);
                if let Some(sink) = ctx.result_sink.as_mut() {
                    sink(self.count, data, metadata);
                }
            }
            Err(err) => {
                ctx.diag.emit(&Diagnostic::DisplayHookError {
                    detail: format!("Error formatting result: {err}"),
                });
                // Degraded payload: plain text only, empty metadata.
                if let Some(sink) = ctx.result_sink.as_mut() {
                    let mut fallback = JsonMap::new();
                    fallback.insert(
                        mime::TEXT_PLAIN.to_string(),
                        JsonValue::String(value.display_string()),
                    );
                    sink(
                        self.count,
                        JsonValue::Object(fallback),
                        JsonValue::Object(JsonMap::new()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::failing_formatter;
    use hashi_testutil::{RecordedSinks, SharedBuf};
    use hashi_types::Frame;
    use serde_json::json;

    fn wired() -> (BridgeContext, RecordedSinks, SharedBuf) {
        let mut ctx = BridgeContext::new();
        let err = SharedBuf::new();
        ctx.diag = crate::context::Diagnostics::with_writers(
            Box::new(SharedBuf::new()),
            Box::new(err.clone()),
        );
        let rec = RecordedSinks::new();
        ctx.on_result(rec.result_sink());
        (ctx, rec, err)
    }

    #[test]
    fn absent_value_is_a_no_op() {
        let (mut ctx, rec, _) = wired();
        let mut hook = ResultHook::new();
        hook.process(&mut ctx, None);
        assert_eq!(hook.execution_count(), 0);
        assert!(rec.results.borrow().is_empty());
    }

    #[test]
    fn present_value_bumps_counter_and_invokes_sink_once() {
        let (mut ctx, rec, _) = wired();
        let mut hook = ResultHook::new();
        hook.process(&mut ctx, Some(&RichValue::Int(42)));

        assert_eq!(hook.execution_count(), 1);
        let results = rec.results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 1);
        assert_eq!(results[0].data["text/plain"], json!("42"));
    }

    #[test]
    fn counter_is_monotonic_across_results() {
        let (mut ctx, rec, _) = wired();
        let mut hook = ResultHook::new();
        hook.process(&mut ctx, Some(&RichValue::Int(1)));
        hook.process(&mut ctx, None);
        hook.process(&mut ctx, Some(&RichValue::Int(2)));

        assert_eq!(hook.execution_count(), 2);
        let results = rec.results.borrow();
        assert_eq!(results[1].count, 2);
    }

    #[test]
    fn formatter_failure_sends_degraded_payload() {
        let (mut ctx, rec, err) = wired();
        let mut hook = ResultHook::with_formatter(failing_formatter());
        hook.process(&mut ctx, Some(&RichValue::str("value")));

        let results = rec.results.borrow();
        assert_eq!(results.len(), 1, "sink still invoked exactly once");
        assert_eq!(results[0].data, json!({"text/plain": "value"}));
        assert_eq!(results[0].metadata, json!({}));
        assert!(err.contents().starts_with("[DISPLAY_HOOK_ERROR]"));
    }

    #[test]
    fn no_sink_still_counts() {
        let mut ctx = BridgeContext::new();
        let mut hook = ResultHook::new();
        hook.process(&mut ctx, Some(&RichValue::Bool(true)));
        assert_eq!(hook.execution_count(), 1);
    }

    #[test]
    fn frame_result_reaches_sink_with_html() {
        let (mut ctx, rec, _) = wired();
        let mut hook = ResultHook::new();
        let frame = Frame::new(vec!["x"]).with_row(vec![RichValue::Int(9)]);
        hook.process(&mut ctx, Some(&RichValue::Frame(frame)));

        let results = rec.results.borrow();
        let html = results[0].data["text/html"].as_str().unwrap();
        assert!(html.contains("<td>9</td>"));
    }
}
