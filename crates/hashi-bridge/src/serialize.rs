//! Total serialization of rich values to JSON-safe form.
//!
//! The contract: `serialize` never fails, whatever flows in. Values are
//! probed with an actual encode attempt; anything the probe rejects is
//! replaced by its display string, and (for mapping entries) a
//! `[SERIALIZATION_WARNING]` diagnostic names the offending key and the
//! reason. The probe cost is paid once per value — payloads here are small
//! rich-display bundles, not bulk data.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use hashi_types::{Diagnostic, RichValue};

use crate::context::Diagnostics;

/// Recursion cap for the probe. A value nested deeper than this fails the
/// probe and is stringified, which keeps hostile or accidentally enormous
/// shapes from blowing the stack.
pub(crate) const MAX_DEPTH: usize = 64;

/// Serialize an optional value; absent means "empty mapping".
///
/// This is the entry point for the envelope positions (`metadata`,
/// `transient`) that are mappings by contract.
pub fn serialize(diag: &mut Diagnostics, value: Option<&RichValue>) -> JsonValue {
    match value {
        None => JsonValue::Object(JsonMap::new()),
        Some(value) => serialize_value(diag, value),
    }
}

/// Serialize a present value. Total: always returns a JSON value that
/// re-encodes through any JSON encoder without error.
pub fn serialize_value(diag: &mut Diagnostics, value: &RichValue) -> JsonValue {
    // Canonical dict conversion first (DataFrame-like shapes).
    if let RichValue::Frame(frame) = value {
        return serialize_value(diag, &frame.to_dict());
    }

    match value {
        RichValue::Map(pairs) => {
            let mut out = JsonMap::new();
            for (key, val) in pairs {
                let key = coerce_key(key);
                match probe(val, 0) {
                    Ok(json) => {
                        out.insert(key, json);
                    }
                    Err(reason) => {
                        diag.emit(&Diagnostic::SerializationWarning {
                            key: key.clone(),
                            reason,
                        });
                        out.insert(key, JsonValue::String(val.display_string()));
                    }
                }
            }
            JsonValue::Object(out)
        }
        other => probe(other, 0)
            .unwrap_or_else(|_| JsonValue::String(other.display_string())),
    }
}

/// String-coerce a mapping key the way a dynamic host stringifies
/// non-string dictionary keys.
fn coerce_key(key: &RichValue) -> String {
    key.to_string()
}

/// The JSON-compatibility probe: attempt the actual encode.
///
/// Returns the encoded value on success, or a human-readable reason on
/// failure. Failure reasons end up verbatim in diagnostics, so they name
/// what was wrong rather than which code path rejected it.
pub(crate) fn probe(value: &RichValue, depth: usize) -> Result<JsonValue, String> {
    if depth > MAX_DEPTH {
        return Err(format!("nesting exceeds depth limit of {MAX_DEPTH}"));
    }
    match value {
        RichValue::Null => Ok(JsonValue::Null),
        RichValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        RichValue::Int(i) => Ok(JsonValue::Number((*i).into())),
        RichValue::Float(x) => Number::from_f64(*x)
            .map(JsonValue::Number)
            .ok_or_else(|| format!("non-finite float {x} is not JSON serializable")),
        RichValue::Str(s) => Ok(JsonValue::String(s.clone())),
        RichValue::Bytes(b) => Err(format!("{} bytes of binary data", b.len())),
        RichValue::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(probe(item, depth + 1)?);
            }
            Ok(JsonValue::Array(out))
        }
        RichValue::Map(pairs) => {
            let mut out = JsonMap::new();
            for (key, val) in pairs {
                out.insert(coerce_key(key), probe(val, depth + 1)?);
            }
            Ok(JsonValue::Object(out))
        }
        // A frame nested inside another value does not get the dict
        // conversion; like any direct encode of the host object, it fails
        // the probe and is stringified by the caller.
        RichValue::Frame(_) => Err("frame object is not directly JSON serializable".into()),
        RichValue::Opaque(handle) => Err(format!(
            "opaque host object of type '{}'",
            handle.type_name
        )),
    }
}
