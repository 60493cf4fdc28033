//! Pure data types for hashi — output envelopes, rich values, diagnostics.
//!
//! This crate is a leaf dependency with no I/O and no callback machinery.
//! It exists so that hosts embedding the bridge can work with hashi's
//! type system without pulling in hashi-bridge's sink and signal layers.

pub mod diag;
pub mod envelope;
pub mod error;
pub mod exception;
pub mod frame;
pub mod value;

// Flat re-exports for convenience
pub use diag::*;
pub use envelope::*;
pub use error::*;
pub use exception::*;
pub use frame::*;
pub use value::*;
