//! Public-key record attached to a snapshot.
//!
//! A snapshot carries the set of keys valid from that version onward.
//! The snapshot core treats a key as an opaque validated unit: it only
//! depends on [`Key::validate`], never on the key material itself, so
//! key revocation semantics live entirely in higher layers.

use base64::Engine;
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SnapshotError};

/// An Ed25519 public key with its fingerprint.
///
/// The fingerprint is the lowercase hex of the first 16 bytes of
/// SHA-256(key bytes) and must match the key it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Hex fingerprint derived from the public key bytes.
    pub fingerprint: String,
    /// Base64-encoded Ed25519 public key (32 bytes).
    pub pub_key: String,
}

impl Key {
    /// Build a key record from a verifying key, deriving the fingerprint.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self {
            fingerprint: fingerprint_of(key.as_bytes()),
            pub_key: base64::engine::general_purpose::STANDARD.encode(key.as_bytes()),
        }
    }

    /// Check that this record holds a well-formed Ed25519 public key
    /// and that the fingerprint matches the key bytes.
    pub fn validate(&self) -> Result<()> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.pub_key)
            .map_err(|e| SnapshotError::InvalidKey(format!("invalid base64 public key: {e}")))?;

        let key_bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SnapshotError::InvalidKey("public key must be 32 bytes".into()))?;

        VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SnapshotError::InvalidKey(format!("invalid verifying key: {e}")))?;

        if self.fingerprint != fingerprint_of(&key_bytes) {
            return Err(SnapshotError::InvalidKey(
                "fingerprint does not match public key".into(),
            ));
        }

        Ok(())
    }

    /// Decode the verifying key. The record must validate first.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        self.validate()?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.pub_key)
            .map_err(|e| SnapshotError::InvalidKey(format!("invalid base64 public key: {e}")))?;
        let key_bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SnapshotError::InvalidKey("public key must be 32 bytes".into()))?;
        VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SnapshotError::InvalidKey(format!("invalid verifying key: {e}")))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fingerprint)
    }
}

fn fingerprint_of(key_bytes: &[u8]) -> String {
    let hash = Sha256::digest(key_bytes);
    hex::encode(&hash[..16])
}
