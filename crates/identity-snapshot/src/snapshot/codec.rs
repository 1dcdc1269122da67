//! Versioned wire encoding for snapshots.
//!
//! One JSON object per snapshot, tagged with an explicit format
//! version. Encoding is deterministic: repeated encodes of an
//! unchanged snapshot are byte-identical, which matters because the
//! encoded bytes are the input to content hashing. Metadata is
//! emitted in sorted key order; nonce and metadata are omitted when
//! empty to keep encodings compact and stable.
//!
//! Decoding any format version other than the current one is a hard
//! failure. There is no migration logic at this layer: when the
//! format evolves, handling older versions must be explicit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotError};
use crate::key::Key;
use crate::time::LamportTime;

use super::snapshot::Snapshot;

/// The single wire format version this crate reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// On-wire shape of a snapshot.
///
/// Every field defaults on decode: absent fields in historical
/// payloads resolve to empty rather than failing the parse, since
/// validation is a separate explicit step.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotWire {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    time: LamportTime,
    #[serde(default)]
    unix_time: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    login: String,
    #[serde(default)]
    avatar_url: String,
    #[serde(default)]
    pub_keys: Vec<Key>,
    #[serde(with = "base64_bytes", skip_serializing_if = "Vec::is_empty", default)]
    nonce: Vec<u8>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    metadata: BTreeMap<String, String>,
}

/// Minimal view reading only the version tag, so the format guard
/// fires before the rest of the payload is interpreted.
#[derive(Deserialize)]
struct WireHeader {
    #[serde(default)]
    version: u32,
}

impl Snapshot {
    /// Serialize this snapshot into its versioned wire form.
    ///
    /// Performs no validation; see [`Snapshot::write`] for the
    /// validation-gated persistence path.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let wire = SnapshotWire {
            version: FORMAT_VERSION,
            time: self.time,
            unix_time: self.unix_time,
            name: self.name.clone(),
            email: self.email.clone(),
            login: self.login.clone(),
            avatar_url: self.avatar_url.clone(),
            pub_keys: self.keys.clone(),
            nonce: self.nonce.clone(),
            metadata: self.all_metadata().clone().into_iter().collect(),
        };

        serde_json::to_vec(&wire).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    /// Parse a snapshot from its wire form.
    ///
    /// Fails with [`SnapshotError::FormatMismatch`] for any version tag
    /// other than [`FORMAT_VERSION`], no matter what shape the rest of
    /// the payload has. Every field is populated verbatim and nothing
    /// is validated, so partially-invalid historical payloads remain
    /// readable and inspectable.
    pub fn decode(data: &[u8]) -> Result<Snapshot> {
        // The version tag is checked before the full parse: a future
        // format with a different field set must fail the guard, not
        // the v1 schema.
        let header: WireHeader = serde_json::from_slice(data)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        if header.version != FORMAT_VERSION {
            return Err(SnapshotError::FormatMismatch {
                found: header.version,
            });
        }

        let wire: SnapshotWire = serde_json::from_slice(data)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        let mut snapshot = Snapshot::new(wire.time, wire.unix_time);
        snapshot.name = wire.name;
        snapshot.email = wire.email;
        snapshot.login = wire.login;
        snapshot.avatar_url = wire.avatar_url;
        snapshot.keys = wire.pub_keys;
        snapshot.nonce = wire.nonce;
        for (k, v) in wire.metadata {
            snapshot.set_metadata(k, v);
        }

        Ok(snapshot)
    }
}

/// Serde helper encoding byte fields as standard base64 strings.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}
