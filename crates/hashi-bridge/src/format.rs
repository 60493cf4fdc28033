//! Rich formatting: expand a value into every MIME representation the
//! bridge knows how to produce for its shape.
//!
//! The output pair is `(format bundle, metadata bundle)`, both plain
//! mappings that still go through the serializer before reaching a sink.
//! `text/plain` is always present as the fallback representation.

use hashi_types::{mime, BridgeResult, RichValue};
use hashi_types::frame::DisplayOptions;

use crate::serialize::probe;

/// A replaceable formatter: `(value, options) -> (data, metadata)`.
///
/// Hosts with their own formatting protocol install one via
/// `ResultHook::with_formatter`; the default is [`compute_format_data`].
pub type FormatterFn =
    Box<dyn Fn(&RichValue, &DisplayOptions) -> BridgeResult<(RichValue, RichValue)>>;

/// Expand `value` into its MIME representations.
///
/// - every shape gets `text/plain` (display string, table text for frames)
/// - frames additionally get `text/html` plus size metadata
/// - JSON-safe shapes additionally get `application/json` carrying the
///   value itself
pub fn compute_format_data(
    value: &RichValue,
    opts: &DisplayOptions,
) -> BridgeResult<(RichValue, RichValue)> {
    let mut data: Vec<(RichValue, RichValue)> = Vec::new();
    let mut metadata: Vec<(RichValue, RichValue)> = Vec::new();

    match value {
        RichValue::Frame(frame) => {
            data.push((
                RichValue::str(mime::TEXT_PLAIN),
                RichValue::Str(frame.text_table(opts)),
            ));
            data.push((
                RichValue::str(mime::TEXT_HTML),
                RichValue::Str(frame.html_table(opts)),
            ));
            metadata.push((
                RichValue::str(mime::TEXT_HTML),
                RichValue::map(vec![
                    ("rows", RichValue::Int(frame.len() as i64)),
                    ("columns", RichValue::Int(frame.columns.len() as i64)),
                    (
                        "truncated",
                        RichValue::Bool(
                            frame.len() > opts.max_rows || frame.columns.len() > opts.max_cols,
                        ),
                    ),
                ]),
            ));
        }
        other => {
            data.push((
                RichValue::str(mime::TEXT_PLAIN),
                RichValue::Str(other.display_string()),
            ));
            // Structured shapes that survive the probe also travel as JSON.
            if matches!(
                other,
                RichValue::List(_) | RichValue::Map(_) | RichValue::Bool(_) | RichValue::Int(_)
            ) && probe(other, 0).is_ok()
            {
                data.push((RichValue::str(mime::APPLICATION_JSON), other.clone()));
            }
        }
    }

    Ok((RichValue::Map(data), RichValue::Map(metadata)))
}

/// A formatter that always fails; exercises the hook's degraded path.
#[cfg(test)]
pub(crate) fn failing_formatter() -> FormatterFn {
    Box::new(|_, _| Err(hashi_types::BridgeError::Format("injected failure".into())))
}
