//! Digests and the hash construction shared by tree building and proof
//! verification.
//!
//! - Leaves:         `H(value)`
//! - Internal nodes: `H(H(left || right))`
//!
//! `left || right` is the raw 64-byte concatenation of the two child digests,
//! left first.

use std::{fmt, str::FromStr};

use bincode::{Decode, Encode};
use sha2::{Digest as _, Sha256};

use crate::MerkleTreeError;

/// Byte length of every digest produced by a [`MerkleHasher`].
pub const DIGEST_LEN: usize = 32;

/// A fixed-length hash output.
///
/// The canonical text form is lowercase hex, 64 characters long. `Debug` and
/// `Display` both print that form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Encode, Decode)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes.
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex digest. Upper and lower case are both accepted.
    pub fn from_hex(s: &str) -> Result<Self, MerkleTreeError> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| {
            MerkleTreeError::InvalidDigest(format!(
                "expected {} hex characters, got {:?}: {}",
                DIGEST_LEN * 2,
                s,
                e
            ))
        })?;
        Ok(Digest(bytes))
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = MerkleTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// A fixed-output cryptographic hash used to build and verify trees.
///
/// Implementors only supply the base function; [`leaf_hash`] and
/// [`node_hash`] are fixed so that every hasher shares the same tree
/// construction.
///
/// [`leaf_hash`]: MerkleHasher::leaf_hash
/// [`node_hash`]: MerkleHasher::node_hash
pub trait MerkleHasher {
    /// One application of the base hash function.
    fn hash(data: &[u8]) -> Digest;

    /// Digest of a raw leaf value: a single pass of the base hash.
    fn leaf_hash(value: &[u8]) -> Digest {
        Self::hash(value)
    }

    /// Combine two child digests: `H(H(left || right))`.
    fn node_hash(left: &Digest, right: &Digest) -> Digest {
        let mut input = [0u8; DIGEST_LEN * 2];
        input[..DIGEST_LEN].copy_from_slice(left.as_bytes());
        input[DIGEST_LEN..].copy_from_slice(right.as_bytes());
        let inner = Self::hash(&input);
        Self::hash(inner.as_bytes())
    }
}

/// SHA-256 base hash, giving double SHA-256 for internal nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleSha256;

impl MerkleHasher for DoubleSha256 {
    fn hash(data: &[u8]) -> Digest {
        Digest(Sha256::digest(data).into())
    }
}

/// Blake3 base hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

impl MerkleHasher for Blake3 {
    fn hash(data: &[u8]) -> Digest {
        Digest(*blake3::hash(data).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use sha2::Digest as _;

    use super::*;

    #[test]
    fn test_sha256_leaf_hash_vector() {
        let leaf = DoubleSha256::leaf_hash(b"abc");
        assert_eq!(
            leaf.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_node_hash_is_double_hash_of_concatenation() {
        let a = DoubleSha256::leaf_hash(b"a");
        let b = DoubleSha256::leaf_hash(b"b");
        assert_eq!(
            DoubleSha256::node_hash(&a, &b).to_hex(),
            "029fd80ca2dd66e7c527428fc148e812a9d99a5e41483f28892ef9013eee4a19"
        );

        // H(H(x)) over the raw bytes, not over hex text
        let mut input = Vec::with_capacity(64);
        input.extend_from_slice(a.as_bytes());
        input.extend_from_slice(b.as_bytes());
        let expected = Sha256::digest(Sha256::digest(&input));
        assert_eq!(DoubleSha256::node_hash(&a, &b).as_bytes()[..], expected[..]);
    }

    #[test]
    fn test_node_hash_is_order_sensitive() {
        let a = DoubleSha256::leaf_hash(b"a");
        let b = DoubleSha256::leaf_hash(b"b");
        assert_ne!(DoubleSha256::node_hash(&a, &b), DoubleSha256::node_hash(&b, &a));
    }

    #[test]
    fn test_blake3_hasher() {
        let leaf = Blake3::leaf_hash(b"abc");
        assert_eq!(leaf.as_bytes(), blake3::hash(b"abc").as_bytes());

        let mut input = leaf.as_bytes().to_vec();
        input.extend_from_slice(leaf.as_bytes());
        let inner = blake3::hash(&input);
        let expected = blake3::hash(inner.as_bytes());
        assert_eq!(Blake3::node_hash(&leaf, &leaf).as_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_digest_hex_is_lowercase_and_fixed_width() {
        let digest = Digest::new([0xAB; DIGEST_LEN]);
        let text = digest.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text, "ab".repeat(32));
        assert_eq!(format!("{:?}", digest), format!("Digest({})", text));
    }

    #[test]
    fn test_digest_from_hex() {
        let leaf = DoubleSha256::leaf_hash(b"abc");
        assert_eq!(Digest::from_hex(&leaf.to_hex()), Ok(leaf));
        assert_eq!(leaf.to_hex().to_uppercase().parse::<Digest>(), Ok(leaf));
    }

    #[test]
    fn test_digest_from_hex_rejects_bad_input() {
        assert_matches!(Digest::from_hex("abcd"), Err(MerkleTreeError::InvalidDigest(_)));
        assert_matches!(
            Digest::from_hex(&"zz".repeat(32)),
            Err(MerkleTreeError::InvalidDigest(_))
        );
        assert_matches!(
            Digest::from_hex(&"00".repeat(33)),
            Err(MerkleTreeError::InvalidDigest(_))
        );
    }
}
