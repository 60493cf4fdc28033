//! hashi-bridge (橋): the execution output & interrupt bridge.
//!
//! This crate provides:
//!
//! - **Serializer**: total conversion of arbitrary rich values to JSON-safe form
//! - **Result Hook**: intercepts top-level evaluation results, rich-formats
//!   them, and forwards them to the host's result sink
//! - **Display Publisher**: intercepts explicit display and clear-output calls
//! - **Figure Capture**: routes a plotting renderer's "show" into the publisher
//! - **Interrupt Coordinator**: cooperative cancellation for sleep and input
//! - **Traceback Formatter**: colorized exception rendering with total fallback
//!
//! The bridge never executes code and never renders figures itself; the host
//! interpreter calls in with results and display payloads, and registered
//! sinks receive transport-safe envelopes. Nothing originating from the
//! bridge's own bookkeeping ever escapes as an error into the host's
//! evaluation loop — only explicit interrupts propagate.

pub mod context;
pub mod environment;
pub mod figure;
pub mod format;
pub mod history;
pub mod hook;
pub mod interrupt;
pub mod publish;
pub mod serialize;
pub mod traceback;

pub use context::{BridgeContext, ClearSink, Diagnostics, DisplaySink, ResultSink};
pub use environment::{bootstrap_terminal_env, ColorMode};
pub use figure::{FigureRegistry, RenderOptions, Renderable, ShowMode};
pub use format::{compute_format_data, FormatterFn};
pub use history::HistoryRecorder;
pub use hook::ResultHook;
pub use interrupt::{
    check_interrupt, install_signal_handler, read_line, sleep, InterruptToken, SLEEP_CHUNK,
};
pub use publish::{clear_output, publish};
pub use serialize::{serialize, serialize_value};
pub use traceback::{format_exception, format_exception_with, render_plain, render_verbose};

// Re-export the data contract so embedders only need one dependency.
pub use hashi_types as types;
