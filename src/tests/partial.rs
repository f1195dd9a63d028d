//! Slicing a full tree and rebuilding it from the slices.

use crate::{Element, MerkleTree, PartialMerkleTree, Sha256Hasher, TreeError};

const LEVELS: usize = 10;

fn full_tree() -> MerkleTree<Sha256Hasher> {
    let elements = (0..1u16 << LEVELS)
        .map(|value| Element::new(value.to_be_bytes()))
        .collect();
    MerkleTree::new(LEVELS, elements, Element::from(0u8), Sha256Hasher).unwrap()
}

#[test]
fn test_slice_count() {
    let tree = full_tree();
    let slices = tree.get_tree_slices(4).unwrap();
    assert_eq!(slices.len(), 4);
    for (index, slice) in slices.iter().enumerate() {
        assert_eq!(slice.edge.edge_index, index * 256);
        assert_eq!(slice.elements.len(), 256);
        assert_eq!(slice.edge.edge_elements_count, 1024);
    }
}

#[test]
fn test_partial_tree_from_last_slice() {
    let tree = full_tree();
    let last = tree.get_tree_slices(4).unwrap().pop().unwrap();
    let partial = PartialMerkleTree::from_slice(LEVELS, last, Element::from(0u8), Sha256Hasher).unwrap();
    assert_eq!(partial.root(), tree.root());
    assert_eq!(partial.edge_index(), 768);
    assert_eq!(partial.path(900).unwrap(), tree.path(900).unwrap());
}

#[test]
fn test_rebuild_full_tree_from_slices() {
    let tree = full_tree();
    let mut slices = tree.get_tree_slices(4).unwrap();
    let last = slices.pop().unwrap();
    let mut partial = PartialMerkleTree::from_slice(LEVELS, last, Element::from(0u8), Sha256Hasher).unwrap();
    for slice in slices.into_iter().rev() {
        partial.shift_edge(slice.edge, slice.elements).unwrap();
    }
    assert_eq!(partial.layers(), tree.layers());
    assert_eq!(partial.path(100).unwrap(), tree.path(100).unwrap());
    assert_eq!(partial.proof(&Element::new(100u16.to_be_bytes())).unwrap(), tree.path(100).unwrap());
}

#[test]
fn test_first_slice_alone_is_rejected() {
    let tree = full_tree();
    let first = tree.get_tree_slices(4).unwrap().swap_remove(0);
    assert_eq!(
        PartialMerkleTree::from_slice(LEVELS, first, Element::from(0u8), Sha256Hasher).unwrap_err(),
        TreeError::InvalidElementCount {
            expected: 1024,
            actual: 256
        }
    );
}

#[test]
fn test_partial_tree_keeps_growing() {
    let mut tree = MerkleTree::new(
        LEVELS,
        (0..100u8).map(Element::from).collect(),
        Element::from(0u8),
        Sha256Hasher,
    )
    .unwrap();
    let last = tree.get_tree_slices(3).unwrap().pop().unwrap();
    let mut partial = PartialMerkleTree::from_slice(LEVELS, last, Element::from(0u8), Sha256Hasher).unwrap();

    let extra: Vec<Element> = (100..130u8).map(Element::from).collect();
    tree.bulk_insert(extra.clone()).unwrap();
    partial.bulk_insert(extra).unwrap();
    assert_eq!(partial.root(), tree.root());
    assert_eq!(partial.path(129).unwrap(), tree.path(129).unwrap());
}
