use std::fmt;

use serde::{Deserialize, Serialize};

/// Fingerprint length in bytes.
pub const ID_LEN: usize = 20;

/// Fixed-length fingerprint of an object's content.
///
/// Patch rendering treats the id as opaque: it is only ever printed as hex in
/// `index` lines. [`ObjectId::for_content`] is the fingerprint used by the
/// `upatch` tool, but any producer may supply its own 20-byte hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Fingerprint raw content: the first 20 bytes of its BLAKE3 XOF output.
    pub fn for_content(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(data);
        let mut out = [0u8; ID_LEN];
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    /// Create an `ObjectId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; ID_LEN]) -> Self {
        Self(hash)
    }

    /// The null object ID (all zeros). Stands for the missing side of a
    /// creation or deletion.
    pub const fn null() -> Self {
        Self([0u8; ID_LEN])
    }

    /// Returns `true` if this is the null object ID.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; ID_LEN]
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
