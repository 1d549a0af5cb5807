//! Inclusion proof generation.
//!
//! A `MerkleProof` holds one `(sibling, side)` entry per level between a leaf
//! and the root, ordered bottom to top. A level where the path node was the
//! carried (unpaired) digest contributes no entry.

use bincode::{Decode, Encode};
use log::trace;

use crate::{Digest, Levels, MerkleTreeError};


/// Upper bound on entries in a decoded proof: one per level of a tree over
/// at most `usize::MAX` leaves.
const MAX_PROOF_ENTRIES: usize = usize::BITS as usize;

/// Which side of the path node a sibling digest sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Side {
    /// Sibling is the left operand: `node_hash(sibling, path)`.
    Left,
    /// Sibling is the right operand: `node_hash(path, sibling)`.
    Right,
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ProofEntry {
    /// Digest of the sibling node.
    pub sibling: Digest,
    /// Position of the sibling relative to the path node.
    pub side: Side,
}

impl ProofEntry {
    /// Create an entry.
    pub fn new(sibling: Digest, side: Side) -> Self {
        Self { sibling, side }
    }
}

/// An inclusion proof for a single leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct MerkleProof {
    /// Sibling digests from the leaf level upward.
    pub entries: Vec<ProofEntry>,
}

impl MerkleProof {
    /// Wrap entries ordered from the leaf level upward.
    pub fn new(entries: Vec<ProofEntry>) -> Self {
        Self { entries }
    }

    /// Entries from the leaf level upward.
    pub fn entries(&self) -> &[ProofEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// An empty proof only verifies a leaf that is itself the root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generate the proof for the leaf at `index`.
    ///
    /// Walks from the leaf level up to, but not including, the root level.
    /// At each level an even position pairs with its right neighbour and an
    /// odd position with its left one, except the last position of an
    /// odd-length level, which was carried up and has no sibling.
    pub fn generate(levels: &Levels, index: usize) -> Result<Self, MerkleTreeError> {
        let leaf_count = levels.leaf_count();
        if index >= leaf_count {
            return Err(MerkleTreeError::InvalidIndex { index, leaf_count });
        }

        let mut entries = Vec::with_capacity(levels.height().saturating_sub(1));
        let mut pos = index;
        for level in levels.iter().take(levels.height() - 1) {
            let carried = pos == level.len() - 1 && pos % 2 == 0;
            if !carried {
                let entry = if pos % 2 == 0 {
                    ProofEntry::new(level[pos + 1], Side::Right)
                } else {
                    ProofEntry::new(level[pos - 1], Side::Left)
                };
                entries.push(entry);
            }
            pos /= 2;
        }

        trace!(
            "generated proof for leaf {} of {}: {} entries",
            index,
            leaf_count,
            entries.len()
        );
        Ok(MerkleProof { entries })
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleTreeError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects trailing bytes and proofs longer than any tree could produce.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleTreeError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>(); // 100MB limit
        let (proof, read): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        if proof.entries.len() > MAX_PROOF_ENTRIES {
            return Err(MerkleTreeError::InvalidProof(format!(
                "proof has {} entries (max {})",
                proof.entries.len(),
                MAX_PROOF_ENTRIES
            )));
        }
        Ok(proof)
    }
}
