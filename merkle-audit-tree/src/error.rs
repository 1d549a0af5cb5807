use thiserror::Error;

/// Errors from Merkle tree operations.
///
/// A proof that fails to verify is not an error; verification reports it as
/// `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    /// `build` was called with no leaves.
    #[error("cannot build a merkle tree from zero leaves")]
    EmptyInput,
    /// Root or proof requested before a successful build, or after an
    /// append invalidated it.
    #[error("merkle tree not built")]
    NotBuilt,
    /// Proof requested for a leaf that does not exist.
    #[error("leaf index {index} is out of range (leaf count {leaf_count})")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Number of leaves in the built tree.
        leaf_count: usize,
    },
    /// Digest text that is not 64 hex characters.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
    /// Proof bytes that cannot be encoded or decoded.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
