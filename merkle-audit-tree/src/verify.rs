//! Proof verification.
//!
//! Pure functions, no tree required: the caller supplies the root, so a
//! proof can be checked against a previously recorded root.

use crate::{Digest, MerkleHasher, MerkleProof, Side};

impl MerkleProof {
    /// Fold the proof over `target` and return the root it implies.
    ///
    /// A `Right` sibling is hashed after the running digest, a `Left` one
    /// before it. An empty proof returns `target` unchanged.
    pub fn compute_root<H: MerkleHasher>(&self, target: &Digest) -> Digest {
        self.entries
            .iter()
            .fold(*target, |candidate, entry| match entry.side {
                Side::Right => H::node_hash(&candidate, &entry.sibling),
                Side::Left => H::node_hash(&entry.sibling, &candidate),
            })
    }

    /// Whether this proof places `target` under `root`.
    pub fn verify<H: MerkleHasher>(&self, target: &Digest, root: &Digest) -> bool {
        verify_proof::<H>(self, target, root)
    }
}

/// Whether `proof` places `target` under `root`.
///
/// A mismatch is an ordinary `false`, not an error.
pub fn verify_proof<H: MerkleHasher>(proof: &MerkleProof, target: &Digest, root: &Digest) -> bool {
    proof.compute_root::<H>(target) == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoubleSha256, ProofEntry};

    fn leaf(value: &[u8]) -> Digest {
        DoubleSha256::leaf_hash(value)
    }

    #[test]
    fn test_empty_proof_compares_target_with_root() {
        let a = leaf(b"a");
        let b = leaf(b"b");
        let proof = MerkleProof::default();
        assert!(verify_proof::<DoubleSha256>(&proof, &a, &a));
        assert!(!verify_proof::<DoubleSha256>(&proof, &a, &b));
    }

    #[test]
    fn test_side_controls_concatenation_order() {
        let a = leaf(b"a");
        let b = leaf(b"b");
        let root = DoubleSha256::node_hash(&a, &b);

        // b is the target, a sits on its left
        let left = MerkleProof::new(vec![ProofEntry::new(a, Side::Left)]);
        assert!(left.verify::<DoubleSha256>(&b, &root));

        // Same sibling on the wrong side yields node_hash(b, a)
        let right = MerkleProof::new(vec![ProofEntry::new(a, Side::Right)]);
        assert!(!right.verify::<DoubleSha256>(&b, &root));
        assert_eq!(
            right.compute_root::<DoubleSha256>(&b),
            DoubleSha256::node_hash(&b, &a)
        );
    }

    #[test]
    fn test_compute_root_folds_bottom_to_top() {
        let [a, b, c, d] = [b"a", b"b", b"c", b"d"].map(|v| leaf(v));
        let ab = DoubleSha256::node_hash(&a, &b);
        let cd = DoubleSha256::node_hash(&c, &d);
        let root = DoubleSha256::node_hash(&ab, &cd);

        let proof = MerkleProof::new(vec![
            ProofEntry::new(c, Side::Left),
            ProofEntry::new(ab, Side::Left),
        ]);
        assert_eq!(proof.compute_root::<DoubleSha256>(&d), root);

        // Reversed order does not reconstruct the root
        let reversed = MerkleProof::new(proof.entries.iter().rev().copied().collect());
        assert!(!reversed.verify::<DoubleSha256>(&d, &root));
    }
}
