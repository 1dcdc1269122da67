//! Content-addressed blob storage.
//!
//! Snapshots are persisted as opaque byte payloads addressed by the
//! SHA-256 of their content. The store is append-only: identical bytes
//! always resolve to the identical hash, and stored bytes are never
//! rewritten.
//!
//! - [`blob_store::BlobStore`] — the trait the write path depends on.
//! - [`blob_store::DirBlobStore`] — one file per blob, named by hash.
//! - [`blob_store::MemoryBlobStore`] — in-memory store for tests.

pub mod blob_store;

pub use blob_store::{BlobStore, DirBlobStore, MemoryBlobStore, ObjectHash};
