//! Basic example of using the fixed Merkle tree
//!
//! This example demonstrates:
//! - Creating a new tree
//! - Inserting and updating leaves
//! - Getting the root
//! - Verifying merkle proofs
//! - Saving and reloading the tree

use fixed_merkle_tree::{verify_proof, Element, MerkleTree, SerializedTreeState, Sha256Hasher};

fn main() {
    // Create a tree of 2^10 leaves hashed with the hex-concatenation SHA256
    let mut tree = MerkleTree::builder(10)
        .elements(vec![Element::from(1u8), Element::from(2u8), Element::from(3u8)])
        .hasher(Sha256Hasher)
        .build()
        .unwrap();
    println!("Root hash: {}", tree.root());

    // Append and update leaves, only one path is rehashed each time
    tree.insert(Element::from(4u8)).unwrap();
    tree.bulk_insert(vec![Element::from(5u8), Element::from(6u8)]).unwrap();
    tree.update(0, Element::from(42u8)).unwrap();
    println!("Leaves: {} / {}", tree.len(), tree.capacity());
    println!("Root hash after updates: {}", tree.root());

    // Get and verify a merkle proof, the verifier only needs the hash function
    let proof = tree.proof(&Element::from(5u8)).unwrap();
    println!("Merkle proof length: {}", proof.len());
    let result = verify_proof(&Sha256Hasher, &Element::from(5u8), &proof);
    println!("Proof verification: {}", result.is_ok());

    let compressed = proof.compress(tree.zeros());
    println!(
        "Compressed proof: {} of {} siblings, {} bytes",
        compressed.kept(),
        compressed.levels(),
        compressed.encode().len()
    );

    // Save the whole tree and reload it without hashing anything
    let bytes = tree.serialize().to_bytes();
    let state = SerializedTreeState::from_bytes(&bytes).unwrap();
    let restored = MerkleTree::deserialize(&state, Sha256Hasher).unwrap();
    println!("Snapshot: {} bytes, same root: {}", bytes.len(), restored.root() == tree.root());
}
