//! Versioned identity snapshot — record, validation, codec, write path.
//!
//! A [`Snapshot`] is the unit that gets hashed, persisted into a
//! content-addressed store, and chained by an external history
//! assembler into a full identity timeline ordered by Lamport time.

pub mod codec;
#[allow(clippy::module_inception)]
pub mod snapshot;

pub use codec::FORMAT_VERSION;
pub use snapshot::{Snapshot, MAX_NONCE_LEN};
