//! Randomized checks of the tree invariants.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{verify_proof, Element, MerkleTree, SerializedTreeState, Sha256Hasher, TreeError};

const LEVELS: usize = 6;

fn random_elements(rng: &mut impl Rng, count: usize) -> Vec<Element> {
    (0..count).map(|_| Element::from(rng.gen::<[u8; 32]>())).collect()
}

fn empty_tree() -> MerkleTree<Sha256Hasher> {
    MerkleTree::new(LEVELS, vec![], Element::from(0u8), Sha256Hasher).unwrap()
}

#[test]
fn test_construction_insertion_and_bulk_agree() {
    let mut rng = StdRng::seed_from_u64(7);
    for count in [0, 1, 2, 3, 7, 16, 33, 64] {
        let elements = random_elements(&mut rng, count);
        let built = MerkleTree::new(LEVELS, elements.clone(), Element::from(0u8), Sha256Hasher).unwrap();

        let mut inserted = empty_tree();
        for element in elements.iter().cloned() {
            inserted.insert(element).unwrap();
        }
        assert_eq!(inserted.layers(), built.layers(), "one by one, {count} leaves");

        let mut bulk = empty_tree();
        bulk.bulk_insert(elements.clone()).unwrap();
        assert_eq!(bulk.layers(), built.layers(), "bulk, {count} leaves");
    }
}

#[test]
fn test_bulk_insert_on_top_of_existing_leaves() {
    let mut rng = StdRng::seed_from_u64(11);
    for split in 0..20 {
        let elements = random_elements(&mut rng, 20);
        let expected = MerkleTree::new(LEVELS, elements.clone(), Element::from(0u8), Sha256Hasher).unwrap();
        let mut tree =
            MerkleTree::new(LEVELS, elements[..split].to_vec(), Element::from(0u8), Sha256Hasher).unwrap();
        tree.bulk_insert(elements[split..].to_vec()).unwrap();
        assert_eq!(tree.layers(), expected.layers(), "split at {split}");
    }
}

#[test]
fn test_every_path_verifies() {
    let mut rng = StdRng::seed_from_u64(3);
    let elements = random_elements(&mut rng, 37);
    let tree = MerkleTree::new(LEVELS, elements.clone(), Element::from(0u8), Sha256Hasher).unwrap();
    for (index, element) in elements.iter().enumerate() {
        let path = tree.path(index).unwrap();
        assert_eq!(&path.compute_root(&Sha256Hasher, element), tree.root());
        verify_proof(&Sha256Hasher, element, &path).unwrap();
        tree.verify_proof(element, &path).unwrap();
        let compressed = path.compress(tree.zeros());
        assert_eq!(compressed.decompress(tree.zeros()).unwrap(), path);
    }
}

#[test]
fn test_update_only_touches_ancestors() {
    let mut rng = StdRng::seed_from_u64(5);
    let elements = random_elements(&mut rng, 40);
    let before = MerkleTree::new(LEVELS, elements, Element::from(0u8), Sha256Hasher).unwrap();
    for _ in 0..10 {
        let index = rng.gen_range(0..before.len());
        let mut after = before.clone();
        after
            .update(index, Element::from(rng.gen::<[u8; 32]>()))
            .unwrap();
        for (level, (old, new)) in before.layers().iter().zip(after.layers()).enumerate() {
            assert_eq!(old.len(), new.len());
            for position in 0..old.len() {
                if position != index >> level {
                    assert_eq!(old.get(position), new.get(position), "level {level} position {position}");
                }
            }
        }
        assert_ne!(after.root(), before.root());
    }
}

#[test]
fn test_serialization_round_trip() {
    let mut rng = StdRng::seed_from_u64(13);
    for count in [0, 1, 9, 64] {
        let tree = MerkleTree::new(
            LEVELS,
            random_elements(&mut rng, count),
            Element::from(0u8),
            Sha256Hasher,
        )
        .unwrap();
        let bytes = tree.serialize().to_bytes();
        let restored =
            MerkleTree::deserialize(&SerializedTreeState::from_bytes(&bytes).unwrap(), Sha256Hasher).unwrap();
        assert_eq!(restored.root(), tree.root());
        assert_eq!(restored.layers(), tree.layers());
        assert_eq!(restored.zeros(), tree.zeros());
    }
}

#[test]
fn test_bounds() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut tree = MerkleTree::new(
        LEVELS,
        random_elements(&mut rng, 1 << LEVELS),
        Element::from(0u8),
        Sha256Hasher,
    )
    .unwrap();
    let before = tree.clone();

    assert_eq!(
        tree.insert(Element::from(1u8)).unwrap_err(),
        TreeError::CapacityExceeded {
            capacity: 64,
            requested: 65
        }
    );
    assert_eq!(
        tree.bulk_insert(vec![Element::from(1u8)]).unwrap_err(),
        TreeError::CapacityExceeded {
            capacity: 64,
            requested: 65
        }
    );
    assert_eq!(
        tree.update(64, Element::from(1u8)).unwrap_err(),
        TreeError::IndexOutOfBounds { index: 64, len: 64 }
    );
    assert_eq!(
        tree.path(64).unwrap_err(),
        TreeError::IndexOutOfBounds { index: 64, len: 64 }
    );
    assert_eq!(tree, before);

    let mut small = empty_tree();
    small.insert(Element::from(1u8)).unwrap();
    assert_eq!(
        small.update(2, Element::from(1u8)).unwrap_err(),
        TreeError::IndexOutOfBounds { index: 2, len: 1 }
    );
    small.update(1, Element::from(2u8)).unwrap();
    assert_eq!(small.len(), 2);
    small.bulk_insert(vec![]).unwrap();
    assert_eq!(small.len(), 2);
}
