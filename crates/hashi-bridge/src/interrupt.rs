//! Cooperative interrupts for blocking primitives.
//!
//! The signal handler's only job is to flip an atomic flag; everything
//! else is polling. Blocking primitives (sleep, input) and long user
//! loops call [`check_interrupt`] at fine granularity, and the resulting
//! `BridgeError::Interrupted` unwinds via `?` until the host's evaluation
//! loop catches it and re-arms the token.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hashi_types::{BridgeError, BridgeResult, Diagnostic};

use crate::context::BridgeContext;

/// Polling granularity for wrapped sleeps; also the worst-case
/// interrupt latency.
pub const SLEEP_CHUNK: Duration = Duration::from_millis(50);

/// Process-wide cancellation token. Clones share the flag.
///
/// Two states: **Armed** (flag clear) and **Tripped** (cancellation in
/// flight). The SIGINT handler trips it; the host loop re-arms it after
/// catching the cancellation error.
#[derive(Debug, Clone, Default)]
pub struct InterruptToken {
    flag: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip to Tripped. Called from the signal handler or tests.
    pub fn trip(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True while a cancellation is in flight.
    pub fn is_tripped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Back to Armed. Called by the host loop once the cancellation
    /// error has been caught.
    pub fn rearm(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub(crate) fn shared_flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

/// Install the SIGINT handler that trips `token`.
///
/// Installed once at bridge startup and never torn down; the
/// registration lives for the rest of the process.
pub fn install_signal_handler(token: &InterruptToken) -> std::io::Result<()> {
    signal_hook::flag::register(signal_hook::consts::SIGINT, token.shared_flag())?;
    tracing::debug!("SIGINT handler installed");
    Ok(())
}

/// Poll for a pending interrupt.
///
/// Consults the host-runtime probe first (when registered), then the
/// token. Exposed to user code for cooperative polling inside
/// long-running pure loops, which have no other poll points.
pub fn check_interrupt(ctx: &mut BridgeContext) -> BridgeResult<()> {
    if let Some(probe) = ctx.interrupt_probe.as_ref() {
        if probe() {
            ctx.interrupt.trip();
        }
    }
    if ctx.interrupt.is_tripped() {
        ctx.diag.emit(&Diagnostic::Interrupt {
            detail: "signal received, aborting current call".to_string(),
        });
        return Err(BridgeError::Interrupted);
    }
    Ok(())
}

/// Interrupt-aware sleep.
///
/// Decomposes the duration into [`SLEEP_CHUNK`] increments and polls
/// before each one, so an interrupt aborts within roughly one increment
/// instead of waiting out the remainder.
pub fn sleep(ctx: &mut BridgeContext, duration: Duration) -> BridgeResult<()> {
    let mut remaining = duration;
    while !remaining.is_zero() {
        check_interrupt(ctx)?;
        let chunk = SLEEP_CHUNK.min(remaining);
        std::thread::sleep(chunk);
        remaining -= chunk;
    }
    Ok(())
}

/// Interrupt-guarded line input.
///
/// Polls once before blocking, then delegates to the underlying stdin
/// read. Known limitation: the read itself cannot be interrupted
/// mid-block — the underlying primitive offers no cooperative yield
/// point.
pub fn read_line(ctx: &mut BridgeContext, prompt: &str) -> BridgeResult<String> {
    check_interrupt(ctx)?;

    if !prompt.is_empty() {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
    }

    let mut line = String::new();
    let bytes = std::io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Err(BridgeError::Io("end of input".to_string()));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Diagnostics;
    use hashi_testutil::SharedBuf;
    use std::time::Instant;

    fn quiet_ctx() -> BridgeContext {
        let mut ctx = BridgeContext::new();
        ctx.diag = Diagnostics::with_writers(
            Box::new(SharedBuf::new()),
            Box::new(SharedBuf::new()),
        );
        ctx
    }

    #[test]
    fn armed_token_checks_clean() {
        let mut ctx = quiet_ctx();
        assert!(check_interrupt(&mut ctx).is_ok());
    }

    #[test]
    fn tripped_token_raises_interrupted() {
        let mut ctx = quiet_ctx();
        ctx.interrupt.trip();
        let err = check_interrupt(&mut ctx).unwrap_err();
        assert!(err.is_interrupt());
    }

    #[test]
    fn rearm_restores_clean_checks() {
        let mut ctx = quiet_ctx();
        ctx.interrupt.trip();
        assert!(check_interrupt(&mut ctx).is_err());
        ctx.interrupt.rearm();
        assert!(check_interrupt(&mut ctx).is_ok());
    }

    #[test]
    fn probe_result_trips_the_token() {
        let mut ctx = quiet_ctx();
        ctx.on_interrupt_probe(|| true);
        let err = check_interrupt(&mut ctx).unwrap_err();
        assert!(err.is_interrupt());
        assert!(ctx.interrupt.is_tripped(), "probe hit is latched");
    }

    #[test]
    fn uninterrupted_sleep_runs_to_completion() {
        let mut ctx = quiet_ctx();
        let start = Instant::now();
        sleep(&mut ctx, Duration::from_millis(120)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[test]
    fn sleep_aborts_within_one_chunk_of_the_interrupt() {
        let mut ctx = quiet_ctx();
        let token = ctx.interrupt.clone();
        let tripper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(120));
            token.trip();
        });

        let start = Instant::now();
        let result = sleep(&mut ctx, Duration::from_millis(500));
        let elapsed = start.elapsed();
        tripper.join().unwrap();

        assert!(result.unwrap_err().is_interrupt());
        assert!(
            elapsed < Duration::from_millis(300),
            "aborted promptly, took {elapsed:?}"
        );
        assert!(
            elapsed >= Duration::from_millis(100),
            "ran until the interrupt arrived, took {elapsed:?}"
        );
    }

    #[test]
    fn zero_sleep_returns_immediately_even_when_tripped() {
        let mut ctx = quiet_ctx();
        ctx.interrupt.trip();
        assert!(sleep(&mut ctx, Duration::ZERO).is_ok());
    }

    #[test]
    fn interrupt_diagnostic_has_wire_prefix() {
        let out = SharedBuf::new();
        let mut ctx = BridgeContext::new();
        ctx.diag =
            Diagnostics::with_writers(Box::new(out.clone()), Box::new(SharedBuf::new()));
        ctx.interrupt.trip();
        let _ = check_interrupt(&mut ctx);
        assert!(out.contents().starts_with("[INTERRUPT]"));
    }
}
