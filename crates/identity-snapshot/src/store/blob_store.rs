//! Blob store trait and implementations.
//!
//! The write path only needs `store_data`; everything else here is
//! plumbing for the two provided stores. Retry policy for transient
//! failures belongs to callers, not to this layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SnapshotError};

/// Content hash addressing a stored blob.
///
/// Lowercase hex SHA-256 of the blob bytes. Identical bytes always
/// produce the identical hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl ObjectHash {
    /// Compute the hash of a byte payload.
    pub fn of(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }
}

impl std::fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A content-addressed, append-only byte store.
///
/// Storing the same bytes twice returns the same hash and must not
/// fail. Transient failures are surfaced unchanged; this layer never
/// retries.
pub trait BlobStore {
    /// Store an opaque byte payload and return its content hash.
    fn store_data(&self, data: &[u8]) -> Result<ObjectHash>;
}

/// Filesystem-backed blob store.
///
/// Each blob is written to `{base_dir}/{hash}`. Safe for
/// single-process use; concurrent writers from multiple processes are
/// not coordinated.
pub struct DirBlobStore {
    base_dir: PathBuf,
}

impl DirBlobStore {
    /// Create a store rooted at `base_dir`, creating the directory and
    /// any missing parents.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Read a stored blob back by its hash.
    pub fn read(&self, hash: &ObjectHash) -> Result<Vec<u8>> {
        let path = self.blob_path(hash);
        std::fs::read(&path).map_err(SnapshotError::Io)
    }

    fn blob_path(&self, hash: &ObjectHash) -> PathBuf {
        self.base_dir.join(&hash.0)
    }
}

impl BlobStore for DirBlobStore {
    fn store_data(&self, data: &[u8]) -> Result<ObjectHash> {
        let hash = ObjectHash::of(data);
        let path = self.blob_path(&hash);

        // Content-addressed: an existing file already holds these bytes.
        if !path.exists() {
            std::fs::write(&path, data)?;
            log::debug!("stored blob {} ({} bytes)", hash, data.len());
        }

        Ok(hash)
    }
}

/// In-memory blob store for tests.
///
/// Counts `store_data` calls so tests can assert the validation gate:
/// an invalid snapshot must never reach the store.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<ObjectHash, Vec<u8>>>,
    calls: RefCell<usize>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `store_data` calls made so far.
    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }

    /// Read a stored blob back by its hash.
    pub fn read(&self, hash: &ObjectHash) -> Option<Vec<u8>> {
        self.blobs.borrow().get(hash).cloned()
    }

    /// Number of distinct blobs stored.
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    /// True if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn store_data(&self, data: &[u8]) -> Result<ObjectHash> {
        *self.calls.borrow_mut() += 1;
        let hash = ObjectHash::of(data);
        self.blobs
            .borrow_mut()
            .entry(hash.clone())
            .or_insert_with(|| data.to_vec());
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_hash_deterministic() {
        let a = ObjectHash::of(b"payload");
        let b = ObjectHash::of(b"payload");
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
    }

    #[test]
    fn test_object_hash_distinct_inputs() {
        assert_ne!(ObjectHash::of(b"a"), ObjectHash::of(b"b"));
    }

    #[test]
    fn test_memory_store_same_bytes_same_hash() {
        let store = MemoryBlobStore::new();
        let h1 = store.store_data(b"bytes").unwrap();
        let h2 = store.store_data(b"bytes").unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.call_count(), 2);
    }

    #[test]
    fn test_memory_store_read_back() {
        let store = MemoryBlobStore::new();
        let hash = store.store_data(b"hello").unwrap();
        assert_eq!(store.read(&hash).unwrap(), b"hello");
        assert!(store.read(&ObjectHash::of(b"other")).is_none());
    }

    #[test]
    fn test_dir_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("blobs").join("v1");
        assert!(!nested.exists());

        let _store = DirBlobStore::new(&nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_dir_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path()).unwrap();

        let hash = store.store_data(b"snapshot bytes").unwrap();
        assert_eq!(store.read(&hash).unwrap(), b"snapshot bytes");

        // One file, named by the hash.
        let path = dir.path().join(&hash.0);
        assert!(path.exists());
    }

    #[test]
    fn test_dir_store_restore_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path()).unwrap();

        let h1 = store.store_data(b"same payload").unwrap();
        let h2 = store.store_data(b"same payload").unwrap();
        assert_eq!(h1, h2);

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
