//! Example of splitting a tree into slices and rebuilding it elsewhere
//!
//! This example demonstrates:
//! - Cutting a full tree into slices
//! - Rebuilding a partial tree from the last slice
//! - Inserting into the partial tree
//! - Absorbing the earlier slices

use fixed_merkle_tree::{Element, MerkleTree, PartialMerkleTree, Sha256Hasher};

fn main() {
    let elements: Vec<Element> = (0..200u8).map(Element::from).collect();
    let mut tree = MerkleTree::new(10, elements, Element::from(0u8), Sha256Hasher).unwrap();

    let mut slices = tree.get_tree_slices(4).unwrap();
    for slice in &slices {
        println!(
            "Slice from {} to {} (edge root {})",
            slice.edge.edge_index,
            slice.end(),
            slice.edge.edge_path.path_root
        );
    }

    // Only the newest leaves are needed to keep appending
    let last = slices.pop().unwrap();
    let mut partial = PartialMerkleTree::from_slice(10, last, Element::from(0u8), Sha256Hasher).unwrap();
    println!("Partial tree from edge {} has root {}", partial.edge_index(), partial.root());

    tree.insert(Element::from(255u8)).unwrap();
    partial.insert(Element::from(255u8)).unwrap();
    println!("Roots match after insertion: {}", partial.root() == tree.root());

    // Absorb the remaining slices, newest first
    for slice in slices.into_iter().rev() {
        partial.shift_edge(slice.edge, slice.elements).unwrap();
    }
    println!("Rebuilt layers match: {}", partial.layers() == tree.layers());
}
