//! End-to-end bridge flow: a fake host session drives results, displays,
//! clears, interrupts, and exceptions through one context.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hashi_bridge::{
    check_interrupt, clear_output, format_exception, publish, sleep, BridgeContext,
    ColorMode, Diagnostics, FigureRegistry, RenderOptions, Renderable, ResultHook,
    ShowMode,
};
use hashi_testutil::SharedBuf;
use hashi_types::{
    BridgeResult, ExceptionInfo, Frame, OutputEnvelope, OutputKind, RichValue, TraceFrame,
};
use serde_json::json;

struct LinePlot;

impl Renderable for LinePlot {
    fn render_svg(&self, opts: &RenderOptions) -> BridgeResult<String> {
        Ok(format!(
            "<svg style=\"background:{}\"><polyline points=\"0,0 1,1\"/></svg>",
            opts.background
        ))
    }
}

fn session() -> (BridgeContext, Rc<RefCell<Vec<OutputEnvelope>>>, SharedBuf, SharedBuf) {
    let mut ctx = BridgeContext::new();
    ctx.color = ColorMode::Never;
    let out = SharedBuf::new();
    let err = SharedBuf::new();
    ctx.diag = Diagnostics::with_writers(Box::new(out.clone()), Box::new(err.clone()));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink_events = events.clone();
    ctx.install_envelope_sink(move |env| sink_events.borrow_mut().push(env));

    (ctx, events, out, err)
}

#[test]
fn full_session_produces_ordered_envelopes() {
    let (mut ctx, events, _, _) = session();
    let mut hook = ResultHook::new();
    let mut figures = FigureRegistry::new();

    // 1 + 1
    hook.process(&mut ctx, Some(&RichValue::Int(2)));

    // df = frame; df
    let frame = Frame::new(vec!["city", "temp"])
        .with_row(vec![RichValue::str("osaka"), RichValue::Float(31.5)])
        .with_row(vec![RichValue::str("sapporo"), RichValue::Float(22.25)]);
    hook.process(&mut ctx, Some(&RichValue::Frame(frame)));

    // plot(df); show()
    figures.set_figure(Box::new(LinePlot));
    figures.show(&mut ctx, ShowMode::Auto);

    // clear_output(wait=False)
    clear_output(&mut ctx, false);

    let events = events.borrow();
    assert_eq!(events.len(), 4);

    assert_eq!(events[0].kind, OutputKind::Result);
    assert_eq!(events[0].sequence, 1);
    assert_eq!(events[0].payload.get("text/plain"), Some(&json!("2")));

    assert_eq!(events[1].kind, OutputKind::Result);
    assert_eq!(events[1].sequence, 2);
    let html = events[1].payload.get("text/html").unwrap().as_str().unwrap();
    assert!(html.contains("<td>osaka</td>"));
    assert_eq!(
        events[1].metadata.get("text/html").unwrap()["rows"],
        json!(2)
    );

    assert_eq!(events[2].kind, OutputKind::Display);
    let svg = events[2].payload.get("image/svg+xml").unwrap().as_str().unwrap();
    assert!(svg.contains("background:white"));

    assert_eq!(events[3].kind, OutputKind::Clear);
    assert_eq!(events[3].transient.get("wait"), Some(&json!(false)));
}

#[test]
fn hostile_display_payload_degrades_but_still_flows() {
    let (mut ctx, events, out, _) = session();

    let hostile = RichValue::map(vec![
        ("metrics", RichValue::Float(f64::NAN)),
        ("ok", RichValue::Int(1)),
    ]);
    publish(&mut ctx, &hostile, None, None, false);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    // The whole envelope must re-encode even though a value was hostile.
    serde_json::to_string(&events[0]).expect("envelope re-encodes");
    assert_eq!(events[0].payload.get("metrics"), Some(&json!("NaN")));
    assert_eq!(events[0].payload.get("ok"), Some(&json!(1)));
    // The warning names the offending key.
    assert!(out.contents().contains("[SERIALIZATION_WARNING]"));
    assert!(out.contents().contains("'metrics'"));
}

#[test]
fn hostile_result_keeps_only_safe_representations() {
    let (mut ctx, events, _, _) = session();
    let mut hook = ResultHook::new();

    let hostile = RichValue::map(vec![("metrics", RichValue::Float(f64::NAN))]);
    hook.process(&mut ctx, Some(&hostile));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    serde_json::to_string(&events[0]).expect("envelope re-encodes");
    // The application/json representation is dropped, text/plain survives.
    assert!(events[0].payload.contains_key("text/plain"));
    assert!(!events[0].payload.contains_key("application/json"));
}

#[test]
fn interrupted_evaluation_rearms_and_continues() {
    let (mut ctx, events, _, _) = session();
    let mut hook = ResultHook::new();

    // Host evaluation loop, iteration 1: user code sleeps, gets interrupted.
    let token = ctx.interrupt.clone();
    let tripper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(80));
        token.trip();
    });
    let err = sleep(&mut ctx, Duration::from_millis(400)).unwrap_err();
    tripper.join().unwrap();
    assert!(err.is_interrupt());

    // The host loop catches the cancellation, formats it, re-arms.
    let info = ExceptionInfo::new("KeyboardInterrupt", "Execution interrupted by signal")
        .with_traceback(vec![TraceFrame::new("<session>", 1, "<module>")]);
    let text = format_exception(&mut ctx, &info);
    assert!(text.contains("KeyboardInterrupt"));
    ctx.interrupt.rearm();

    // Iteration 2 proceeds normally.
    assert!(check_interrupt(&mut ctx).is_ok());
    hook.process(&mut ctx, Some(&RichValue::str("recovered")));
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0].sequence, 1);
}

#[test]
fn standalone_context_swallows_everything_silently() {
    // No sinks registered at all: every path is a safe no-op.
    let mut ctx = BridgeContext::new();
    let out = SharedBuf::new();
    ctx.diag = Diagnostics::with_writers(Box::new(out.clone()), Box::new(SharedBuf::new()));

    let mut hook = ResultHook::new();
    hook.process(&mut ctx, Some(&RichValue::Int(5)));
    publish(
        &mut ctx,
        &RichValue::map(vec![("text/plain", RichValue::str("x"))]),
        None,
        None,
        false,
    );
    clear_output(&mut ctx, true);

    assert_eq!(hook.execution_count(), 1);
    // Only the clear sentinel reaches stdout; nothing else escapes.
    assert_eq!(out.contents(), "[CLEAR_OUTPUT:true]\n");
}
