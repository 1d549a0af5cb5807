use std::marker::PhantomData;

use crate::{Digest, MerkleHasher};

/// Ordered leaf digests awaiting tree construction.
///
/// A leaf's index is its insertion position and never changes.
#[derive(Debug, Clone)]
pub struct LeafStore<H> {
    leaves: Vec<Digest>,
    _hasher: PhantomData<fn() -> H>,
}

impl<H> Default for LeafStore<H> {
    fn default() -> Self {
        Self {
            leaves: Vec::new(),
            _hasher: PhantomData,
        }
    }
}

impl<H: MerkleHasher> LeafStore<H> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `value` and append it. Returns the new leaf's index.
    pub fn push_value(&mut self, value: &[u8]) -> usize {
        self.push_digest(H::leaf_hash(value))
    }

    /// Append an already hashed leaf. Returns its index.
    pub fn push_digest(&mut self, digest: Digest) -> usize {
        self.leaves.push(digest);
        self.leaves.len() - 1
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether no leaf was appended.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Leaf digest at `index`.
    pub fn get(&self, index: usize) -> Option<&Digest> {
        self.leaves.get(index)
    }

    /// All leaves in insertion order.
    pub fn as_slice(&self) -> &[Digest] {
        &self.leaves
    }

    /// Remove every leaf.
    pub fn clear(&mut self) {
        self.leaves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DoubleSha256;

    #[test]
    fn test_push_preserves_order_and_indices() {
        let mut store = LeafStore::<DoubleSha256>::new();
        assert!(store.is_empty());
        assert_eq!(store.push_value(b"first"), 0);
        assert_eq!(store.push_value(b"second"), 1);
        let digest = DoubleSha256::leaf_hash(b"third");
        assert_eq!(store.push_digest(digest), 2);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0), Some(&DoubleSha256::leaf_hash(b"first")));
        assert_eq!(store.get(1), Some(&DoubleSha256::leaf_hash(b"second")));
        assert_eq!(store.as_slice()[2], digest);
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_clear() {
        let mut store = LeafStore::<DoubleSha256>::new();
        store.push_value(b"x");
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.push_value(b"y"), 0);
    }
}
