//! The transport envelope handed to host sinks.
//!
//! Every intercepted event — an execution result, an explicit display
//! call, a clear-output signal — is normalized into one `OutputEnvelope`
//! before it leaves the bridge. Envelopes are built once, never mutated,
//! and handed to the sink by value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Well-known MIME type identifiers used in payload bundles.
pub mod mime {
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const TEXT_HTML: &str = "text/html";
    pub const IMAGE_SVG: &str = "image/svg+xml";
    pub const APPLICATION_JSON: &str = "application/json";
}

/// Mapping from MIME type to the rendered representation for that type.
pub type MimeBundle = BTreeMap<String, JsonValue>;

/// What kind of event this envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Explicit display call from library code (plots, rich objects).
    Display,
    /// The value produced by a completed top-level evaluation.
    Result,
    /// Clear-output signal.
    Clear,
}

/// One intercepted output event, in transport-safe form.
///
/// All payload values are already JSON-safe: the bridge serializes before
/// constructing the envelope, so re-encoding an envelope never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    /// Event kind.
    pub kind: OutputKind,
    /// MIME type → rendered representation.
    pub payload: MimeBundle,
    /// Per-MIME-type metadata (e.g. image dimensions).
    pub metadata: MimeBundle,
    /// Ephemeral identifiers (display id) used to target updates.
    pub transient: MimeBundle,
    /// Execution counter for `Result` events; 0 otherwise.
    pub sequence: u64,
    /// For `Display`: replace the previous display with the same
    /// transient id instead of appending a new one.
    pub update: bool,
}

impl OutputEnvelope {
    /// Envelope for an explicit display event.
    pub fn display(
        payload: MimeBundle,
        metadata: MimeBundle,
        transient: MimeBundle,
        update: bool,
    ) -> Self {
        Self {
            kind: OutputKind::Display,
            payload,
            metadata,
            transient,
            sequence: 0,
            update,
        }
    }

    /// Envelope for an execution result.
    pub fn result(sequence: u64, payload: MimeBundle, metadata: MimeBundle) -> Self {
        Self {
            kind: OutputKind::Result,
            payload,
            metadata,
            transient: MimeBundle::new(),
            sequence,
            update: false,
        }
    }

    /// Envelope for a clear-output signal. The wait flag travels in
    /// `transient` so the payload stays a pure MIME bundle.
    pub fn clear(wait: bool) -> Self {
        let mut transient = MimeBundle::new();
        transient.insert("wait".to_string(), JsonValue::Bool(wait));
        Self {
            kind: OutputKind::Clear,
            payload: MimeBundle::new(),
            metadata: MimeBundle::new(),
            transient,
            sequence: 0,
            update: false,
        }
    }
}

/// Coerce a serialized JSON value into a MIME bundle.
///
/// Serialized mappings become the bundle directly; anything else is
/// wrapped under `text/plain` so no payload shape is ever dropped.
pub fn bundle_from_json(value: JsonValue) -> MimeBundle {
    match value {
        JsonValue::Object(map) => map.into_iter().collect(),
        JsonValue::Null => MimeBundle::new(),
        other => {
            let mut bundle = MimeBundle::new();
            let text = match other {
                JsonValue::String(s) => s,
                v => v.to_string(),
            };
            bundle.insert(mime::TEXT_PLAIN.to_string(), JsonValue::String(text));
            bundle
        }
    }
}
