//! Exception formatting with a guaranteed non-throwing fallback.
//!
//! The primary path renders a verbose, colorized traceback frame by
//! frame. Any failure there is reported as a `[FORMATTER_ERROR]`
//! diagnostic and the plain linear rendering takes over; the function
//! always returns a non-empty string.

use std::fmt::Write as _;

use hashi_types::{BridgeResult, Diagnostic, ExceptionInfo};

use crate::context::BridgeContext;

const RED: &str = "\x1b[31m";
const BOLD_RED: &str = "\x1b[1;31m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Format an exception for the host's error stream.
///
/// Total: never panics, never returns an empty string, accepts a missing
/// traceback.
pub fn format_exception(ctx: &mut BridgeContext, info: &ExceptionInfo) -> String {
    format_exception_with(ctx, info, render_verbose)
}

/// Like [`format_exception`], with a replaceable primary renderer.
///
/// Hosts with their own traceback machinery plug it in here; when it
/// fails, the plain path takes over and the failure is surfaced as a
/// diagnostic only.
pub fn format_exception_with(
    ctx: &mut BridgeContext,
    info: &ExceptionInfo,
    primary: impl Fn(&ExceptionInfo, bool) -> BridgeResult<String>,
) -> String {
    let color = ctx.color.enabled();

    match primary(info, color) {
        Ok(text) if !text.trim().is_empty() => return text,
        Ok(_) => {}
        Err(err) => {
            ctx.diag.emit(&Diagnostic::FormatterError {
                detail: format!("Failed to format exception: {err}"),
            });
        }
    }

    let plain = render_plain(info);
    if plain.trim().is_empty() {
        // Both kind and message empty; still return something greppable.
        "Error".to_string()
    } else {
        plain
    }
}

/// Verbose frame-by-frame rendering, optionally colorized.
///
/// Falls back internally: frames without source lines render without the
/// source arrow, and a missing traceback degrades to header plus
/// exception line rather than failing.
pub fn render_verbose(info: &ExceptionInfo, color: bool) -> BridgeResult<String> {
    let (red, bold_red, cyan, green, blue, reset) = if color {
        (RED, BOLD_RED, CYAN, GREEN, BLUE, RESET)
    } else {
        ("", "", "", "", "", "")
    };

    let mut out = String::new();
    let kind = nonempty(&info.kind, "Error");
    let _ = writeln!(
        out,
        "{bold_red}{:-<75}{reset}",
        format!("{kind} ")
    );

    if let Some(frames) = info.traceback.as_deref() {
        if !frames.is_empty() {
            out.push_str("Traceback (most recent call last):\n");
        }
        for frame in frames {
            let _ = writeln!(
                out,
                "  File {cyan}{}{reset}, line {green}{}{reset}, in {blue}{}{reset}",
                frame.file, frame.line, frame.function
            );
            if let Some(source) = frame.source.as_deref() {
                let _ = writeln!(out, "----> {}", source.trim_end());
            }
        }
    }

    let _ = write!(out, "{red}{kind}{reset}: {}", info.message);
    Ok(out)
}

/// Standard linear traceback text. Total.
pub fn render_plain(info: &ExceptionInfo) -> String {
    let mut out = String::new();
    if let Some(frames) = info.traceback.as_deref() {
        if !frames.is_empty() {
            out.push_str("Traceback (most recent call last):\n");
        }
        for frame in frames {
            let _ = writeln!(
                out,
                "  File \"{}\", line {}, in {}",
                frame.file, frame.line, frame.function
            );
            if let Some(source) = frame.source.as_deref() {
                let _ = writeln!(out, "    {}", source.trim());
            }
        }
    }
    let kind = nonempty(&info.kind, "Error");
    if info.message.is_empty() {
        out.push_str(kind);
    } else {
        let _ = write!(out, "{kind}: {}", info.message);
    }
    out
}

fn nonempty<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.is_empty() {
        fallback
    } else {
        s
    }
}
