//! Fixed Merkle tree implementation
//!
//! This crate provides a fixed-capacity binary Merkle tree used as an
//! incremental accumulator: leaves are appended or updated one at a time and
//! only the path of the touched leaf is rehashed.
//!
//! The tree supports:
//! - Inclusion proofs that can be verified without the tree
//! - Slicing a tree and rebuilding it piece by piece with [`PartialMerkleTree`]
//! - Snapshots that reload without rehashing
//! - Any two-to-one hash function through the [`HashFunction`] trait

mod codec;
mod edge;
mod element;
mod error;
mod hasher;
mod proof;
mod tree;

pub use codec::{decode_elements, decode_layers, encode_elements, encode_layers};
pub use edge::{TreeEdge, TreeSlice};
pub use element::Element;
pub use error::TreeError;
#[cfg(feature = "poseidon")]
pub use hasher::{Poseidon2Hasher, PoseidonHasher};
pub use hasher::{HashFunction, Sha256Hasher};
pub use proof::{verify_proof, CompressedProof, ProofPath};
pub use tree::{
    build_zeros, BaseTree, Layer, MerkleTree, PartialMerkleTree, SerializedTreeState, TreeBuilder,
    DEFAULT_ZERO_ELEMENT,
};

#[cfg(test)]
mod tests;
