//! Shared test helpers for hashi crates.

mod buffer;
mod sink;

pub use buffer::SharedBuf;
pub use sink::{ClearCall, DisplayCall, RecordedSinks, ResultCall};
