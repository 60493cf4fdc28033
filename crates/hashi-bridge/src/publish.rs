//! Display publisher: explicit "show this" and "clear the output"
//! requests issued by library code outside the normal result path.

use hashi_types::{Diagnostic, RichValue};

use crate::context::BridgeContext;
use crate::serialize::{serialize, serialize_value};

/// Publish a rich object to the display sink.
///
/// No-op when no display sink is registered or `data` is empty. The
/// three mappings are serialized independently; `update = true` means
/// "replace the previous display with this transient id" — honoring that
/// is the sink's job, the bridge only forwards the flag.
pub fn publish(
    ctx: &mut BridgeContext,
    data: &RichValue,
    metadata: Option<&RichValue>,
    transient: Option<&RichValue>,
    update: bool,
) {
    if ctx.display_sink.is_none() || !data.is_truthy() {
        return;
    }

    let data = serialize_value(&mut ctx.diag, data);
    let metadata = serialize(&mut ctx.diag, metadata);
    let transient = serialize(&mut ctx.diag, transient);

    if let Some(sink) = ctx.display_sink.as_mut() {
        sink(data, metadata, transient, update);
    }
}

/// Signal that previous output should be cleared.
///
/// With a clear sink registered the signal goes there; otherwise the
/// recognizable sentinel line lands on the standard output stream so a
/// host reading raw text can still detect the intent.
pub fn clear_output(ctx: &mut BridgeContext, wait: bool) {
    match ctx.clear_sink.as_mut() {
        Some(sink) => sink(wait),
        None => ctx.diag.emit(&Diagnostic::ClearOutput { wait }),
    }
}
