//! hashi CLI entry point.
//!
//! Usage:
//!   hashi                      # Interactive driver loop
//!   hashi -c <line>            # Evaluate one line and exit

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use hashi_bridge::{format_exception, read_line, BridgeContext};
use hashi_repl::Session;
use hashi_types::{ExceptionInfo, OutputEnvelope, TraceFrame};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            run_interactive()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("hashi {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let line = args.get(2).context("-c requires a line argument")?;
            let mut session = new_session()?;
            if let Err(err) = session.eval(line) {
                report_interrupt(&mut session, &err);
            }
            Ok(ExitCode::SUCCESS)
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'hashi --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_help() {
    println!(
        r#"橋 — hashi v{}

Usage:
  hashi                        Interactive driver loop
  hashi -c <line>              Evaluate one line and exit

Options:
  -c <line>                    Evaluate a line and exit
  -h, --help                   Show this help
  -V, --version                Show version

Commands inside the loop:
  :sleep <seconds>             Interrupt-aware sleep (Ctrl-C aborts)
  :plot                        Capture a demo figure as SVG
  :frame                       Produce a table-like result
  :json <text>                 Parse JSON and produce it as a result
  :clear [wait]                Emit a clear-output signal
  anything else                Produce the line as a string result
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Build a session whose sinks print envelopes as JSON lines on stdout.
fn new_session() -> Result<Session> {
    let mut ctx = BridgeContext::bootstrap().context("Failed to start bridge")?;
    ctx.install_envelope_sink(print_envelope);
    Ok(Session::new(ctx))
}

fn print_envelope(env: OutputEnvelope) {
    match serde_json::to_string(&env) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("envelope failed to encode: {e}"),
    }
}

fn run_interactive() -> Result<()> {
    let mut session = new_session()?;

    loop {
        let line = match read_line(session.ctx_mut(), ">> ") {
            Ok(line) => line,
            Err(err) if err.is_interrupt() => {
                session.recover(&err);
                continue;
            }
            // EOF or a closed stdin ends the loop.
            Err(_) => break,
        };

        if line == ":quit" || line == ":exit" {
            break;
        }

        if let Err(err) = session.eval(&line) {
            if !report_interrupt(&mut session, &err) {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}

/// Print an interrupt the way the host runtime would, then re-arm.
/// Returns false if the error was not an interrupt.
fn report_interrupt(session: &mut Session, err: &hashi_types::BridgeError) -> bool {
    if !err.is_interrupt() {
        return false;
    }
    let info = ExceptionInfo::new("KeyboardInterrupt", "Execution interrupted by signal")
        .with_traceback(vec![TraceFrame::new("<session>", 1, "<module>")]);
    let text = format_exception(session.ctx_mut(), &info);
    eprintln!("{text}");
    session.recover(err);
    true
}
