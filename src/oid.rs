use std::fmt;

use sha1::{Digest, Sha1};

use crate::error::{GitError, Result};

/// A content-addressing object id: the SHA-1 of an object's
/// `kind SP len NUL payload` bytes. Equality and ordering are byte-wise,
/// matching the canonical 40-hex-character rendering's lexicographic
/// order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid([u8; 20]);

impl Oid {
    pub fn from_bytes(bytes: [u8; 20]) -> Oid {
        Oid(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn hash(data: &[u8]) -> Oid {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Oid(hasher.finalize().into())
    }

    pub fn from_hex(s: &str) -> Result<Oid> {
        if s.len() != 40 {
            return Err(GitError::UsageError(format!(
                "not a 40-character hex oid: {s}"
            )));
        }
        let bytes = hex::decode(s)
            .map_err(|e| GitError::UsageError(format!("invalid hex oid {s}: {e}")))?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| GitError::UsageError(format!("invalid hex oid {s}")))?;
        Ok(Oid(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The `objects/<first-2-hex>/<remaining-38-hex>` fanout path, relative
    /// to the gitdir.
    pub fn fanout_path(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_roundtrip_hex() {
        let oid = Oid::hash(b"blob 6\0hello\n");
        let hex = oid.to_hex();
        assert_eq!(hex.len(), 40);
        let back = Oid::from_hex(&hex).unwrap();
        assert_eq!(oid, back);
    }

    #[test]
    fn known_blob_hash() {
        // S1 from the spec: "hello\n" as a blob.
        let data = b"blob 6\0hello\n";
        let oid = Oid::hash(data);
        assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Oid::from_hex("not-hex").is_err());
        assert!(Oid::from_hex("abcd").is_err());
    }
}
