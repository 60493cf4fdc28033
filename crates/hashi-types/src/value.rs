//! Rich values produced by an interactive execution session.
//!
//! The host interpreter hands the bridge arbitrary result objects. Rather
//! than duck-typing a "does it look serializable" probe, hashi models the
//! shapes the bridge actually distinguishes as a closed tagged union:
//! scalars, sequences, mappings, table-like frames with a canonical dict
//! conversion, and opaque host handles that only carry a display string.

use std::fmt;

use crate::frame::Frame;

/// A value flowing out of the host interpreter.
///
/// `Map` keys are themselves values; the serializer string-coerces them,
/// mirroring how a dynamic host stringifies non-string dictionary keys.
#[derive(Debug, Clone, PartialEq)]
pub enum RichValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Raw binary data. Never JSON-safe; always stringified on the wire.
    Bytes(Vec<u8>),
    List(Vec<RichValue>),
    /// Insertion-ordered key/value pairs. Keys are string-coerced on
    /// serialization; later duplicates win.
    Map(Vec<(RichValue, RichValue)>),
    /// Table-like value with a canonical dict conversion (DataFrame analog).
    Frame(Frame),
    /// Arbitrary host object the bridge cannot introspect.
    Opaque(OpaqueHandle),
}

impl RichValue {
    /// Build a string value.
    pub fn str(s: impl Into<String>) -> Self {
        RichValue::Str(s.into())
    }

    /// Build a mapping from key/value pairs with string keys.
    pub fn map<K: Into<String>>(pairs: Vec<(K, RichValue)>) -> Self {
        RichValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (RichValue::Str(k.into()), v))
                .collect(),
        )
    }

    /// True for the shapes the serializer treats as a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, RichValue::Map(_))
    }

    /// Dynamic-host truthiness: empty containers, zero, empty strings and
    /// null are falsy. The display publisher treats falsy data as "nothing
    /// to show".
    pub fn is_truthy(&self) -> bool {
        match self {
            RichValue::Null => false,
            RichValue::Bool(b) => *b,
            RichValue::Int(i) => *i != 0,
            RichValue::Float(x) => *x != 0.0,
            RichValue::Str(s) => !s.is_empty(),
            RichValue::Bytes(b) => !b.is_empty(),
            RichValue::List(items) => !items.is_empty(),
            RichValue::Map(pairs) => !pairs.is_empty(),
            RichValue::Frame(frame) => !frame.is_empty(),
            RichValue::Opaque(_) => true,
        }
    }

    /// The display string used when a value cannot cross the wire as JSON.
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RichValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Top-level strings print bare, like str() in a dynamic host.
            RichValue::Str(s) => f.write_str(s),
            other => fmt_nested(other, f),
        }
    }
}

/// Repr-style formatting for values inside containers (strings quoted).
fn fmt_nested(value: &RichValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        RichValue::Null => f.write_str("null"),
        RichValue::Bool(b) => write!(f, "{b}"),
        RichValue::Int(i) => write!(f, "{i}"),
        RichValue::Float(x) => write!(f, "{x}"),
        RichValue::Str(s) => write!(f, "{s:?}"),
        RichValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        RichValue::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_nested(item, f)?;
            }
            f.write_str("]")
        }
        RichValue::Map(pairs) => {
            f.write_str("{")?;
            for (i, (k, v)) in pairs.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_nested(k, f)?;
                f.write_str(": ")?;
                fmt_nested(v, f)?;
            }
            f.write_str("}")
        }
        RichValue::Frame(frame) => f.write_str(&frame.text_table(&Default::default())),
        RichValue::Opaque(handle) => f.write_str(&handle.repr),
    }
}

/// A host object the bridge cannot serialize — only its type name and
/// display string survive.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueHandle {
    /// Host-side type name (e.g. "socket", "module").
    pub type_name: String,
    /// Host-side display string (e.g. "<socket fd=3>").
    pub repr: String,
}

impl OpaqueHandle {
    /// Create an opaque handle.
    pub fn new(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn top_level_string_prints_bare() {
        assert_eq!(RichValue::str("hello").to_string(), "hello");
    }

    #[test]
    fn nested_string_prints_quoted() {
        let v = RichValue::List(vec![RichValue::str("a"), RichValue::Int(1)]);
        assert_eq!(v.to_string(), r#"["a", 1]"#);
    }

    #[test]
    fn map_displays_pairs_in_order() {
        let v = RichValue::map(vec![
            ("x", RichValue::Int(1)),
            ("y", RichValue::Bool(true)),
        ]);
        assert_eq!(v.to_string(), r#"{"x": 1, "y": true}"#);
    }

    #[test]
    fn opaque_displays_repr() {
        let v = RichValue::Opaque(OpaqueHandle::new("socket", "<socket fd=3>"));
        assert_eq!(v.to_string(), "<socket fd=3>");
    }

    #[test]
    fn bytes_display_length_only() {
        let v = RichValue::List(vec![RichValue::Bytes(vec![1, 2, 3])]);
        assert_eq!(v.to_string(), "[<3 bytes>]");
    }

    #[rstest]
    #[case::null(RichValue::Null, false)]
    #[case::empty_map(RichValue::Map(vec![]), false)]
    #[case::empty_str(RichValue::str(""), false)]
    #[case::zero(RichValue::Int(0), false)]
    #[case::negative(RichValue::Int(-1), true)]
    #[case::nonempty_map(RichValue::map(vec![("k", RichValue::Null)]), true)]
    #[case::opaque(RichValue::Opaque(OpaqueHandle::new("socket", "<socket>")), true)]
    fn truthiness_matches_dynamic_host_rules(#[case] value: RichValue, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn non_finite_float_displays() {
        assert_eq!(RichValue::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(RichValue::Float(f64::INFINITY).to_string(), "inf");
    }
}
