//! Example of plugging a custom hash function into the fixed Merkle tree
//!
//! This example demonstrates:
//! - Implementing `HashFunction` for a type
//! - Using a closure as a hash function
//! - Checking proofs with the custom hash function

use fixed_merkle_tree::{verify_proof, Element, HashFunction, MerkleTree, Sha256Hasher};
use sha2::{Digest, Sha256};

// Custom hasher that hashes the raw bytes of both children behind a prefix
#[derive(Clone)]
struct PrefixedSha256;

impl HashFunction for PrefixedSha256 {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        let mut hasher = Sha256::new();
        // node tag keeps these parents apart from plain sha256 digests
        hasher.update(b"fmt-node:");
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Element::new(hasher.finalize().to_vec())
    }
}

fn main() {
    let leaves = vec![Element::new(vec![1, 2, 3]), Element::new(vec![4, 5, 6])];

    // 16 levels, 32-byte zero leaf
    let tree = MerkleTree::new(16, leaves.clone(), Element::new([0u8; 32]), PrefixedSha256).unwrap();
    println!("Root hash with custom hasher: {}", tree.root());

    let proof = tree.path(1).unwrap();
    println!(
        "Proof verification: {}",
        verify_proof(&PrefixedSha256, &leaves[1], &proof).is_ok()
    );

    // A plain function works as well
    fn xor(left: &Element, right: &Element) -> Element {
        Element::new(
            left.as_bytes()
                .iter()
                .zip(right.as_bytes())
                .map(|(a, b)| a ^ b)
                .collect::<Vec<u8>>(),
        )
    }
    let xor_tree = MerkleTree::new(16, leaves.clone(), Element::new(vec![0, 0, 0]), xor).unwrap();
    println!("Root hash with xor: {}", xor_tree.root());

    // same leaves under the hex-operand sha256
    let standard_tree = MerkleTree::new(16, leaves, Element::from(0u8), Sha256Hasher).unwrap();
    println!("Root hash with standard SHA256: {}", standard_tree.root());

    println!("\nThe hashes are different because each tree uses its own hash function.");
}
