//! Append-then-seal Merkle tree with inclusion proofs.
//!
//! Leaves are hashed once with the base hash function; internal nodes hash
//! their children twice:
//!
//! `node = H(H(left || right))`
//!
//! When a level has an odd number of digests the last one is carried up to
//! the next level unchanged. Proofs therefore tag every sibling with the
//! [`Side`] it sits on, and skip levels where the path node was carried.
//!
//! The default hasher is double SHA-256 ([`DoubleSha256`]); [`Blake3`] is
//! also provided and any [`MerkleHasher`] can be plugged in.
//!
//! # Features
//!
//! - `parallel`: combine the pairs of each level on the rayon thread pool.

#![warn(missing_docs)]

mod error;
pub(crate) mod hash;
mod leaves;
pub(crate) mod proof;
pub(crate) mod tree;
mod verify;


pub use error::MerkleTreeError;
pub use hash::{Blake3, Digest, DoubleSha256, MerkleHasher, DIGEST_LEN};
pub use leaves::LeafStore;
pub use proof::{MerkleProof, ProofEntry, Side};
pub use tree::{build_levels, Levels, MerkleTree, TreeState};
pub use verify::verify_proof;
