//! identity-snapshot — immutable, content-addressed identity records.
//!
//! One snapshot captures a point-in-time view of an actor's identity
//! attributes (name, email, login, avatar, valid public keys, free-form
//! metadata) inside a distributed, append-only identity history. The
//! crate covers the snapshot's data shape, its validation contract, its
//! deterministic versioned wire encoding, and its validation-gated
//! write path into a content-addressed blob store.
//!
//! Chain assembly, history merging, and logical-clock allocation are
//! external collaborators and live outside this crate.

pub mod crypto;
pub mod error;
pub mod key;
pub mod snapshot;
pub mod store;
pub mod text;
pub mod time;

// Re-export primary types
pub use crypto::make_nonce;
pub use error::{Result, SnapshotError};
pub use key::Key;
pub use snapshot::{Snapshot, FORMAT_VERSION, MAX_NONCE_LEN};
pub use store::{BlobStore, DirBlobStore, MemoryBlobStore, ObjectHash};
pub use time::{now_unix_seconds, LamportTime};
