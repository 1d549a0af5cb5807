use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    verify::verify_proof, Digest, DoubleSha256, LeafStore, MerkleHasher, MerkleProof,
    MerkleTreeError,
};

/// The levels of a built tree, from the leaves (level 0) up to the
/// single-digest root level.
///
/// Every level above the leaves holds `ceil(len(below) / 2)` digests. Only
/// [`build_levels`] constructs this type, so the top level is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<Vec<Digest>>,
    root: Digest,
    hash_calls: usize,
}

impl Levels {
    /// The Merkle root.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Level 0.
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels, counting the leaf level and the root level. A
    /// single-leaf tree has height 1.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// The level at `index`, with 0 being the leaves.
    pub fn level(&self, index: usize) -> Option<&[Digest]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Levels from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &[Digest]> {
        self.levels.iter().map(Vec::as_slice)
    }

    /// Number of `node_hash` calls made while building.
    pub fn hash_calls(&self) -> usize {
        self.hash_calls
    }
}

/// Build every level above `leaves`.
///
/// On an odd-length level the last digest is carried to the next level
/// unchanged instead of being paired. A single leaf is its own root.
///
/// Returns [`MerkleTreeError::EmptyInput`] when `leaves` is empty.
pub fn build_levels<H: MerkleHasher>(leaves: &[Digest]) -> Result<Levels, MerkleTreeError> {
    if leaves.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }

    let mut levels = vec![leaves.to_vec()];
    let mut hash_calls = 0;
    let mut current = leaves;
    while current.len() > 1 {
        let next = combine_level::<H>(current);
        hash_calls += current.len() / 2;
        levels.push(next);
        current = &levels[levels.len() - 1];
    }
    let root = current[0];

    Ok(Levels {
        levels,
        root,
        hash_calls,
    })
}

/// Pair adjacent digests of `level` into the level above it.
fn combine_level<H: MerkleHasher>(level: &[Digest]) -> Vec<Digest> {
    // An odd level sets its last digest aside; it is promoted, not rehashed.
    let even_len = level.len() - level.len() % 2;
    let (paired, carried) = level.split_at(even_len);

    #[cfg(feature = "parallel")]
    let mut next: Vec<Digest> = paired
        .par_chunks_exact(2)
        .map(|pair| H::node_hash(&pair[0], &pair[1]))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let mut next: Vec<Digest> = paired
        .chunks_exact(2)
        .map(|pair| H::node_hash(&pair[0], &pair[1]))
        .collect();

    next.extend_from_slice(carried);
    next
}

/// Build state of a [`MerkleTree`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TreeState {
    /// Leaves were appended since the last build, or nothing was ever built.
    #[default]
    Unbuilt,
    /// The levels reflect every appended leaf.
    Built(Levels),
}

/// An append-then-seal Merkle tree.
///
/// Leaves are appended, then [`build`](Self::build) materializes the levels.
/// Appending again discards the built levels; they must be rebuilt before a
/// root or proof can be requested.
///
/// ```
/// use merkle_audit_tree::{DoubleSha256, MerkleTree};
///
/// let mut tree = MerkleTree::new();
/// tree.append_leaves(["alpha", "beta", "gamma"]);
/// tree.build().unwrap();
///
/// let root = tree.root().unwrap();
/// let proof = tree.proof(2).unwrap();
/// let target = *tree.leaf(2).unwrap();
/// assert!(MerkleTree::<DoubleSha256>::verify_proof(&proof, &target, &root));
/// ```
#[derive(Debug, Clone)]
pub struct MerkleTree<H = DoubleSha256> {
    leaves: LeafStore<H>,
    state: TreeState,
}

impl<H: MerkleHasher> Default for MerkleTree<H> {
    fn default() -> Self {
        Self {
            leaves: LeafStore::new(),
            state: TreeState::Unbuilt,
        }
    }
}

impl MerkleTree<DoubleSha256> {
    /// Create an empty tree hashed with double SHA-256.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Create an empty tree hashed with `H`, chosen through the type
    /// parameter: `MerkleTree::<Blake3>::new_with()`.
    pub fn new_with() -> Self {
        Self::default()
    }

    /// Hash `value` and append it as the next leaf. Returns the leaf index.
    pub fn append_leaf(&mut self, value: impl AsRef<[u8]>) -> usize {
        self.state = TreeState::Unbuilt;
        self.leaves.push_value(value.as_ref())
    }

    /// Hash and append each value in order.
    pub fn append_leaves<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.state = TreeState::Unbuilt;
        for value in values {
            self.leaves.push_value(value.as_ref());
        }
    }

    /// Append a leaf that was hashed by the caller. Returns the leaf index.
    pub fn append_leaf_digest(&mut self, digest: Digest) -> usize {
        self.state = TreeState::Unbuilt;
        self.leaves.push_digest(digest)
    }

    /// Build the levels over all appended leaves.
    ///
    /// Does nothing when the tree is already built.
    pub fn build(&mut self) -> Result<(), MerkleTreeError> {
        if self.is_built() {
            return Ok(());
        }
        let levels = build_levels::<H>(self.leaves.as_slice())?;
        debug!(
            "built merkle tree: leaves={} levels={} hash_calls={} root={}",
            levels.leaf_count(),
            levels.height(),
            levels.hash_calls(),
            levels.root()
        );
        self.state = TreeState::Built(levels);
        Ok(())
    }

    /// Drop every leaf and any built levels.
    pub fn reset(&mut self) {
        self.leaves.clear();
        self.state = TreeState::Unbuilt;
    }

    /// Current build state.
    pub fn state(&self) -> &TreeState {
        &self.state
    }

    /// Whether the levels reflect every appended leaf.
    pub fn is_built(&self) -> bool {
        matches!(self.state, TreeState::Built(_))
    }

    /// The built levels, or [`MerkleTreeError::NotBuilt`].
    pub fn levels(&self) -> Result<&Levels, MerkleTreeError> {
        match &self.state {
            TreeState::Built(levels) => Ok(levels),
            TreeState::Unbuilt => Err(MerkleTreeError::NotBuilt),
        }
    }

    /// The Merkle root, or [`MerkleTreeError::NotBuilt`].
    pub fn root(&self) -> Result<Digest, MerkleTreeError> {
        self.levels().map(Levels::root)
    }

    /// Number of `node_hash` calls made by the last build.
    pub fn hash_calls(&self) -> Result<usize, MerkleTreeError> {
        self.levels().map(Levels::hash_calls)
    }

    /// Number of appended leaves, built or not.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf digests in insertion order.
    pub fn leaves(&self) -> &[Digest] {
        self.leaves.as_slice()
    }

    /// Leaf digest at `index`.
    pub fn leaf(&self, index: usize) -> Option<&Digest> {
        self.leaves.get(index)
    }

    /// Inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleTreeError> {
        MerkleProof::generate(self.levels()?, index)
    }

    /// Check `proof` for `target` against a supplied `root`. No built tree
    /// is needed.
    pub fn verify_proof(proof: &MerkleProof, target: &Digest, root: &Digest) -> bool {
        verify_proof::<H>(proof, target, root)
    }

    /// Check `proof` for `target` against this tree's own root.
    pub fn verify_against_root(
        &self,
        proof: &MerkleProof,
        target: &Digest,
    ) -> Result<bool, MerkleTreeError> {
        let root = self.root()?;
        Ok(verify_proof::<H>(proof, target, &root))
    }
}
