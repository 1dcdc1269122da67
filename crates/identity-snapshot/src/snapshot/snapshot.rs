//! The snapshot record — one point-in-time view of an identity.

use std::collections::HashMap;

use crate::error::{Result, SnapshotError};
use crate::key::Key;
use crate::store::{BlobStore, ObjectHash};
use crate::text;
use crate::time::LamportTime;

/// Maximum accepted nonce length, in bytes.
pub const MAX_NONCE_LEN: usize = 64;

/// A complete set of information about an identity at a point in time.
///
/// Snapshots are built and mutated freely in memory by the chain
/// assembler, then handed to [`Snapshot::write`]. After a successful
/// write the record is considered immutable and is identified by its
/// content hash. A snapshot is single-writer: concurrent mutation of
/// one instance is not supported.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// The Lamport time at which this snapshot becomes effective,
    /// assigned by the chain assembler.
    pub time: LamportTime,
    /// Wall-clock time in Unix seconds. Zero means "unset" and fails
    /// validation, not "epoch".
    pub unix_time: i64,

    pub name: String,
    pub email: String,
    pub login: String,
    pub avatar_url: String,

    /// The set of keys valid from this snapshot onward, until removed
    /// by a later snapshot. Multiple keys per identity are expected
    /// (e.g. one per device).
    pub keys: Vec<Key>,

    /// Random padding to avoid content-hash collisions between
    /// otherwise-identical snapshots of distinct identities. No
    /// semantic meaning. Fill it when there is little other entropy,
    /// e.g. when there are no keys.
    pub nonce: Vec<u8>,

    /// Arbitrary key/value annotations. Never validated or
    /// interpreted here.
    pub(crate) metadata: HashMap<String, String>,

    /// Content hash of the stored bytes. Not serialized; populated
    /// only by a successful write.
    pub(crate) stored_hash: Option<ObjectHash>,
}

impl Snapshot {
    /// Create an empty snapshot at the given clocks.
    pub fn new(time: LamportTime, unix_time: i64) -> Self {
        Self {
            time,
            unix_time,
            ..Self::default()
        }
    }

    /// Content hash assigned by the last successful write, if any.
    pub fn stored_hash(&self) -> Option<&ObjectHash> {
        self.stored_hash.as_ref()
    }

    /// Check every field invariant. Side-effect free; returns the
    /// first violated rule, never an aggregate.
    pub fn validate(&self) -> Result<()> {
        if self.unix_time == 0 {
            return Err(SnapshotError::UnsetTime);
        }

        if self.name.is_empty() && self.login.is_empty() {
            return Err(SnapshotError::NameOrLoginRequired);
        }

        for (field, value) in [
            ("name", &self.name),
            ("login", &self.login),
            ("email", &self.email),
        ] {
            if !text::is_single_line(value) {
                return Err(SnapshotError::NotSingleLine { field });
            }
            if !text::is_safe(value) {
                return Err(SnapshotError::NotPrintable { field });
            }
        }

        if !self.avatar_url.is_empty() && !text::is_valid_url(&self.avatar_url) {
            return Err(SnapshotError::InvalidAvatarUrl(self.avatar_url.clone()));
        }

        if self.nonce.len() > MAX_NONCE_LEN {
            return Err(SnapshotError::NonceTooLong {
                len: self.nonce.len(),
            });
        }

        // First failing key short-circuits; Key::validate already
        // identifies the cause.
        for key in &self.keys {
            key.validate()?;
        }

        Ok(())
    }

    /// Validate, encode, and submit this snapshot to a content-addressed
    /// store, returning the resulting hash.
    ///
    /// This is the only path by which a snapshot becomes durable: an
    /// invalid snapshot never reaches the store (the violated rule is
    /// wrapped as [`SnapshotError::Validation`]), and store failures
    /// propagate unchanged with nothing assumed stored.
    pub fn write(&mut self, store: &impl BlobStore) -> Result<ObjectHash> {
        self.validate()
            .map_err(|e| SnapshotError::Validation(Box::new(e)))?;

        let data = self.encode()?;
        let hash = store.store_data(&data)?;
        log::debug!("wrote snapshot at lamport time {} as {}", self.time, hash);

        self.stored_hash = Some(hash.clone());
        Ok(hash)
    }

    /// Store an arbitrary annotation, overwriting any previous value.
    ///
    /// If the snapshot has already been written, the new entry is a
    /// local-only annotation: the stored bytes are content-addressed
    /// and immutable, so it only affects future writes.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Look up an annotation by key.
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// All annotations, as a direct view. Callers must not assume
    /// isolation from subsequent mutation.
    pub fn all_metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::make_nonce;
    use crate::store::MemoryBlobStore;
    use ed25519_dalek::SigningKey;

    fn valid_snapshot() -> Snapshot {
        let mut s = Snapshot::new(1, 1_700_000_000);
        s.name = "Alice".into();
        s
    }

    #[test]
    fn test_validate_passes_minimal() {
        assert!(valid_snapshot().validate().is_ok());
    }

    #[test]
    fn test_validate_unset_time() {
        let mut s = valid_snapshot();
        s.unix_time = 0;
        assert!(matches!(s.validate(), Err(SnapshotError::UnsetTime)));
    }

    #[test]
    fn test_validate_name_login_disjunction() {
        let mut s = Snapshot::new(1, 1_700_000_000);
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::NameOrLoginRequired)
        ));

        s.login = "alice".into();
        assert!(s.validate().is_ok());

        s.login.clear();
        s.name = "Alice".into();
        assert!(s.validate().is_ok());

        s.login = "alice".into();
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_multiline_fields() {
        for field in ["name", "login", "email"] {
            let mut s = valid_snapshot();
            match field {
                "name" => s.name = "two\nlines".into(),
                "login" => s.login = "two\nlines".into(),
                _ => s.email = "two\nlines".into(),
            }
            assert!(
                matches!(s.validate(), Err(SnapshotError::NotSingleLine { field: f }) if f == field)
            );
        }
    }

    #[test]
    fn test_validate_unprintable_fields() {
        let mut s = valid_snapshot();
        s.name = "Ali\u{0007}ce".into();
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::NotPrintable { field: "name" })
        ));

        // Same text with the control character removed passes.
        s.name = "Alice".into();
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_avatar_url() {
        let mut s = valid_snapshot();
        s.avatar_url = "https://example.com/a.png".into();
        assert!(s.validate().is_ok());

        s.avatar_url = "definitely not a url".into();
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::InvalidAvatarUrl(_))
        ));

        // Empty is always fine.
        s.avatar_url.clear();
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_nonce_bound() {
        let mut s = valid_snapshot();
        s.nonce = make_nonce(64);
        assert!(s.validate().is_ok());

        s.nonce = make_nonce(65);
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::NonceTooLong { len: 65 })
        ));
    }

    #[test]
    fn test_validate_delegates_to_keys() {
        let signing = SigningKey::generate(&mut rand::thread_rng());
        let good = Key::from_verifying_key(&signing.verifying_key());
        let mut bad = good.clone();
        bad.pub_key = "???".into();

        let mut s = valid_snapshot();
        s.keys = vec![good, bad];
        assert!(matches!(s.validate(), Err(SnapshotError::InvalidKey(_))));
    }

    #[test]
    fn test_write_returns_content_hash() {
        let store = MemoryBlobStore::new();
        let mut s = valid_snapshot();

        let hash = s.write(&store).unwrap();
        assert_eq!(s.stored_hash(), Some(&hash));
        assert_eq!(store.read(&hash).unwrap(), s.encode().unwrap());
    }

    #[test]
    fn test_write_same_bytes_same_hash() {
        let store = MemoryBlobStore::new();
        let mut a = valid_snapshot();
        let mut b = valid_snapshot();

        let h1 = a.write(&store).unwrap();
        let h2 = b.write(&store).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_gate_blocks_invalid() {
        let store = MemoryBlobStore::new();
        let mut s = Snapshot::new(1, 0); // unset time

        let err = s.write(&store).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Validation(ref inner)
                if matches!(**inner, SnapshotError::UnsetTime)
        ));
        assert_eq!(store.call_count(), 0);
        assert!(s.stored_hash().is_none());
    }

    #[test]
    fn test_write_wraps_validation_error() {
        let store = MemoryBlobStore::new();
        let mut s = Snapshot::new(1, 1_700_000_000); // no name, no login

        let err = s.write(&store).unwrap_err();
        assert!(err.to_string().starts_with("validation error: "));
        assert!(err.to_string().contains("either name or login"));

        // validate() alone returns the rule unwrapped.
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::NameOrLoginRequired)
        ));
    }

    #[test]
    fn test_metadata_accessors() {
        let mut s = valid_snapshot();
        assert!(s.get_metadata("origin").is_none());

        s.set_metadata("origin", "import");
        assert_eq!(s.get_metadata("origin"), Some("import"));

        // Idempotent overwrite.
        s.set_metadata("origin", "manual");
        assert_eq!(s.get_metadata("origin"), Some("manual"));
        assert_eq!(s.all_metadata().len(), 1);
    }

    #[test]
    fn test_metadata_after_write_does_not_change_stored_bytes() {
        let store = MemoryBlobStore::new();
        let mut s = valid_snapshot();

        let hash = s.write(&store).unwrap();
        let stored = store.read(&hash).unwrap();

        s.set_metadata("note", "added after write");

        // The already-stored bytes re-derive the same hash.
        assert_eq!(store.store_data(&stored).unwrap(), hash);

        // A future write produces a different record.
        let new_hash = s.write(&store).unwrap();
        assert_ne!(new_hash, hash);
    }
}
