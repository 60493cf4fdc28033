//! Bridge context: host sink slots, diagnostics, and the interrupt token.
//!
//! Instead of module-level globals holding host callbacks, all mutable
//! bridge state lives in one `BridgeContext` constructed at startup and
//! passed by reference to every component that emits output. The host
//! overwrites the sink slots after initialization; defaults are no-ops so
//! the bridge is safe to drive standalone.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde_json::Value as JsonValue;

use hashi_types::{
    bundle_from_json, DiagStream, Diagnostic, OutputEnvelope,
};
use hashi_types::frame::DisplayOptions;

use crate::environment::ColorMode;
use crate::interrupt::InterruptToken;

/// Display sink: `(data, metadata, transient, update)`.
pub type DisplaySink = Box<dyn FnMut(JsonValue, JsonValue, JsonValue, bool)>;
/// Result sink: `(execution_count, data, metadata)`.
pub type ResultSink = Box<dyn FnMut(u64, JsonValue, JsonValue)>;
/// Clear sink: `(wait)`.
pub type ClearSink = Box<dyn FnMut(bool)>;
/// Externally supplied interrupt probe; `true` means "an interrupt is
/// pending" (e.g. the host runtime's own interrupt buffer).
pub type InterruptProbe = Box<dyn Fn() -> bool>;

/// Writers for the out-of-band diagnostic lines.
///
/// Defaults to the process stdout/stderr; tests install capture buffers.
/// Diagnostics also go through `tracing` so a structured subscriber sees
/// them, but the raw prefixed line is the wire contract.
pub struct Diagnostics {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            out: Box::new(std::io::stdout()),
            err: Box::new(std::io::stderr()),
        }
    }
}

impl Diagnostics {
    /// Use custom writers (test capture, host-redirected streams).
    pub fn with_writers(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self { out, err }
    }

    /// Emit one diagnostic line, flushed immediately.
    ///
    /// Write failures are swallowed: a broken diagnostic stream must not
    /// take down the evaluation loop it is reporting on.
    pub fn emit(&mut self, diag: &Diagnostic) {
        tracing::warn!(diagnostic = %diag, "bridge diagnostic");
        let w = match diag.stream() {
            DiagStream::Out => &mut self.out,
            DiagStream::Err => &mut self.err,
        };
        let _ = writeln!(w, "{diag}");
        let _ = w.flush();
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Diagnostics { .. }")
    }
}

/// All bridge state touched on the evaluation thread.
pub struct BridgeContext {
    pub(crate) display_sink: Option<DisplaySink>,
    pub(crate) result_sink: Option<ResultSink>,
    pub(crate) clear_sink: Option<ClearSink>,
    /// Out-of-band diagnostic channel.
    pub diag: Diagnostics,
    /// Cooperative cancellation token, shared with the signal handler.
    pub interrupt: InterruptToken,
    /// Optional host-runtime interrupt probe, polled alongside the token.
    pub interrupt_probe: Option<InterruptProbe>,
    /// Table rendering limits used by the rich formatter.
    pub options: DisplayOptions,
    /// Color capability decided at bootstrap.
    pub color: ColorMode,
}

impl Default for BridgeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeContext {
    /// Context with no sinks registered and default streams.
    pub fn new() -> Self {
        Self {
            display_sink: None,
            result_sink: None,
            clear_sink: None,
            diag: Diagnostics::default(),
            interrupt: InterruptToken::new(),
            interrupt_probe: None,
            options: DisplayOptions::default(),
            color: ColorMode::Auto,
        }
    }

    /// Full startup path: terminal environment hints, signal handler,
    /// readiness line. The returned context has forced color (the session
    /// output is consumed by a host, not a real terminal).
    pub fn bootstrap() -> std::io::Result<Self> {
        let mut ctx = Self::new();
        ctx.color = crate::environment::bootstrap_terminal_env();
        crate::interrupt::install_signal_handler(&ctx.interrupt)?;
        tracing::info!("bridge ready with rich display support");
        Ok(ctx)
    }

    /// Register the display sink `(data, metadata, transient, update)`.
    pub fn on_display(&mut self, sink: impl FnMut(JsonValue, JsonValue, JsonValue, bool) + 'static) {
        self.display_sink = Some(Box::new(sink));
    }

    /// Register the result sink `(execution_count, data, metadata)`.
    pub fn on_result(&mut self, sink: impl FnMut(u64, JsonValue, JsonValue) + 'static) {
        self.result_sink = Some(Box::new(sink));
    }

    /// Register the clear sink `(wait)`.
    pub fn on_clear(&mut self, sink: impl FnMut(bool) + 'static) {
        self.clear_sink = Some(Box::new(sink));
    }

    /// Register the host-runtime interrupt probe.
    pub fn on_interrupt_probe(&mut self, probe: impl Fn() -> bool + 'static) {
        self.interrupt_probe = Some(Box::new(probe));
    }

    /// Drop all sinks, returning to the standalone no-op state.
    pub fn clear_sinks(&mut self) {
        self.display_sink = None;
        self.result_sink = None;
        self.clear_sink = None;
    }

    /// Wire all three sink slots to a single envelope-consuming callback.
    ///
    /// Convenience for hosts that transport one unified record: every
    /// display, result, and clear event arrives as an `OutputEnvelope`.
    pub fn install_envelope_sink(&mut self, sink: impl FnMut(OutputEnvelope) + 'static) {
        let shared = Rc::new(RefCell::new(sink));

        let s = shared.clone();
        self.display_sink = Some(Box::new(move |data, metadata, transient, update| {
            (&mut *s.borrow_mut())(OutputEnvelope::display(
                bundle_from_json(data),
                bundle_from_json(metadata),
                bundle_from_json(transient),
                update,
            ));
        }));

        let s = shared.clone();
        self.result_sink = Some(Box::new(move |count, data, metadata| {
            (&mut *s.borrow_mut())(OutputEnvelope::result(
                count,
                bundle_from_json(data),
                bundle_from_json(metadata),
            ));
        }));

        let s = shared;
        self.clear_sink = Some(Box::new(move |wait| {
            (&mut *s.borrow_mut())(OutputEnvelope::clear(wait));
        }));
    }
}
