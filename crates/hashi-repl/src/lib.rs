//! Driver session: a minimal host loop around the bridge.
//!
//! This is the host side the bridge expects to be embedded in — it owns
//! the context, the result hook, and the figure registry, evaluates
//! small driver commands, and catches the cancellation error at the top
//! of the loop. It is deliberately not a language: every command maps
//! straight onto one bridge operation.
//!
//! Commands:
//!
//! - `:sleep <seconds>`   interrupt-aware sleep (Ctrl-C aborts promptly)
//! - `:plot`              capture a demo figure as SVG via the publisher
//! - `:frame`             produce a table-like result
//! - `:json <text>`       parse JSON and produce it as a result
//! - `:clear [wait]`      clear-output signal
//! - anything else        produce the line itself as a string result

use std::time::Duration;

use hashi_bridge::{
    clear_output, sleep, BridgeContext, FigureRegistry, HistoryRecorder, RenderOptions,
    Renderable, ResultHook, ShowMode,
};
use hashi_types::{BridgeError, BridgeResult, Frame, RichValue};

/// Upper bound on a requested sleep; anything longer is a typo.
const MAX_SLEEP_SECS: f64 = 3_600.0;

/// A trivially renderable figure for the `:plot` command.
struct DemoPlot;

impl Renderable for DemoPlot {
    fn render_svg(&self, opts: &RenderOptions) -> BridgeResult<String> {
        Ok(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 60\" \
             style=\"background:{}\"><polyline fill=\"none\" stroke=\"black\" \
             points=\"0,50 25,20 50,35 75,10 100,25\"/></svg>",
            opts.background
        ))
    }
}

/// One driver session: bridge context plus the stateful interceptors.
pub struct Session {
    ctx: BridgeContext,
    hook: ResultHook,
    figures: FigureRegistry,
    history: HistoryRecorder,
}

impl Session {
    pub fn new(ctx: BridgeContext) -> Self {
        Self {
            ctx,
            hook: ResultHook::new(),
            figures: FigureRegistry::new(),
            history: HistoryRecorder::disabled(),
        }
    }

    /// The bridge context, for sink registration and blocking primitives.
    pub fn ctx_mut(&mut self) -> &mut BridgeContext {
        &mut self.ctx
    }

    /// Results produced so far.
    pub fn execution_count(&self) -> u64 {
        self.hook.execution_count()
    }

    /// Evaluate one input line.
    ///
    /// Only the cancellation error propagates; everything else the
    /// bridge already downgraded to diagnostics.
    pub fn eval(&mut self, line: &str) -> BridgeResult<()> {
        self.history.record(line);
        let line = line.trim();

        if line.is_empty() {
            return Ok(());
        }

        // A command is the first whitespace-delimited token, matched
        // exactly; `:sleepy` is plain text, not `:sleep` with garbage.
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            ":sleep" => {
                // Duration::from_secs_f64 panics on non-finite or
                // overflowing input.
                let seconds = rest
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .unwrap_or(1.0)
                    .clamp(0.0, MAX_SLEEP_SECS);
                sleep(&mut self.ctx, Duration::from_secs_f64(seconds))
            }
            ":plot" => {
                self.figures.set_figure(Box::new(DemoPlot));
                self.figures.show(&mut self.ctx, ShowMode::Auto);
                Ok(())
            }
            ":frame" => {
                let frame = Frame::new(vec!["label", "value"])
                    .with_row(vec![RichValue::str("alpha"), RichValue::Float(0.61803)])
                    .with_row(vec![RichValue::str("beta"), RichValue::Float(1.41421)])
                    .with_row(vec![RichValue::str("gamma"), RichValue::Float(2.71828)]);
                self.hook.process(&mut self.ctx, Some(&RichValue::Frame(frame)));
                Ok(())
            }
            ":json" => {
                let value = match serde_json::from_str::<serde_json::Value>(rest) {
                    Ok(json) => json_to_rich(json),
                    Err(err) => RichValue::str(format!("invalid json: {err}")),
                };
                self.hook.process(&mut self.ctx, Some(&value));
                Ok(())
            }
            ":clear" => {
                clear_output(&mut self.ctx, rest == "wait");
                Ok(())
            }
            _ => {
                self.hook.process(&mut self.ctx, Some(&RichValue::str(line)));
                Ok(())
            }
        }
    }

    /// Top-of-loop recovery: true if `err` was the cancellation
    /// condition (now re-armed), false if the loop should stop.
    pub fn recover(&mut self, err: &BridgeError) -> bool {
        if err.is_interrupt() {
            self.ctx.interrupt.rearm();
            true
        } else {
            false
        }
    }
}

/// Convert parsed JSON into the bridge's value model.
pub fn json_to_rich(json: serde_json::Value) -> RichValue {
    match json {
        serde_json::Value::Null => RichValue::Null,
        serde_json::Value::Bool(b) => RichValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                RichValue::Int(i)
            } else {
                RichValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => RichValue::Str(s),
        serde_json::Value::Array(items) => {
            RichValue::List(items.into_iter().map(json_to_rich).collect())
        }
        serde_json::Value::Object(map) => RichValue::Map(
            map.into_iter()
                .map(|(k, v)| (RichValue::Str(k), json_to_rich(v)))
                .collect(),
        ),
    }
}
