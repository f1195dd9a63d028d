//! Proofs are used to show that a leaf belongs to a tree with a given root.
//!
//! A proof is the list of siblings met on the way from the leaf to the root,
//! with the side of the path at each level.
//!
//! A proof can be compressed by dropping the siblings that are empty
//! subtrees, which are the majority in a sparsely filled tree.

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::{
    codec::{decode_error, write_element, write_usize, Reader},
    Element, HashFunction, TreeError,
};

/// Sibling path of one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProofPath {
    /// Sibling value at each level, leaves first.
    pub path_elements: Vec<Element>,
    /// `0` when the path goes through a left child at that level, `1` for a right child.
    pub path_indices: Vec<u8>,
    /// Index of the sibling within its layer, `0` when it is an empty subtree.
    pub path_positions: Vec<usize>,
    /// Root of the tree when the path was taken.
    pub path_root: Element,
}

impl ProofPath {
    /// Number of levels the path climbs.
    pub fn len(&self) -> usize {
        self.path_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_elements.is_empty()
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.path_indices.len() == self.path_elements.len()
            && self.path_positions.len() == self.path_elements.len()
            && self.path_indices.iter().all(|side| *side <= 1)
    }

    /// Hashes `element` up through the siblings and returns the root reached.
    pub fn compute_root<H: HashFunction>(&self, hasher: &H, element: &Element) -> Element {
        self.path_elements
            .iter()
            .zip(&self.path_indices)
            .fold(element.clone(), |current, (sibling, side)| {
                // order the children based on the path
                if *side == 0 {
                    hasher.hash(&current, sibling)
                } else {
                    hasher.hash(sibling, &current)
                }
            })
    }

    /// Drops the siblings that equal the zero cache entry of their level.
    pub fn compress(&self, zeros: &[Element]) -> CompressedProof {
        let mut empty = BitVec::with_capacity(self.len());
        let mut sides = BitVec::with_capacity(self.len());
        let mut elements = Vec::new();
        let mut positions = Vec::new();
        for (level, (sibling, position)) in self
            .path_elements
            .iter()
            .zip(&self.path_positions)
            .enumerate()
        {
            sides.push(self.path_indices.get(level).is_some_and(|side| *side == 1));
            if *position == 0 && zeros.get(level) == Some(sibling) {
                empty.push(true);
            } else {
                empty.push(false);
                elements.push(sibling.clone());
                positions.push(*position);
            }
        }
        CompressedProof {
            elements,
            positions,
            empty,
            sides,
            root: self.path_root.clone(),
        }
    }
}

/// Checks that `path` leads from `element` to `path.path_root`.
///
/// Needs nothing but the hash function, so it can run without the tree.
pub fn verify_proof<H: HashFunction>(
    hasher: &H,
    element: &Element,
    path: &ProofPath,
) -> Result<(), TreeError> {
    if !path.is_well_formed() {
        return Err(TreeError::InvalidMerkleProof);
    }
    if path.compute_root(hasher, element) == path.path_root {
        Ok(())
    } else {
        Err(TreeError::InvalidMerkleProof)
    }
}

/// A proof without its empty-subtree siblings.
/// One bit per level tells whether the sibling was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof {
    elements: Vec<Element>,
    positions: Vec<usize>,
    empty: BitVec<u8, Lsb0>,
    sides: BitVec<u8, Lsb0>,
    root: Element,
}

impl CompressedProof {
    /// Number of siblings kept.
    pub fn kept(&self) -> usize {
        self.elements.len()
    }

    /// Number of levels of the original path.
    pub fn levels(&self) -> usize {
        self.empty.len()
    }

    /// Rebuilds the full path using the zero cache of the tree.
    pub fn decompress(&self, zeros: &[Element]) -> Result<ProofPath, TreeError> {
        if self.elements.len() != self.empty.count_zeros()
            || self.positions.len() != self.elements.len()
            || self.sides.len() != self.empty.len()
        {
            return Err(TreeError::InvalidMerkleProof);
        }
        let mut kept = self.elements.iter().zip(&self.positions);
        let mut path_elements = Vec::with_capacity(self.levels());
        let mut path_positions = Vec::with_capacity(self.levels());
        for (level, bit) in self.empty.iter().enumerate() {
            if *bit {
                let zero = zeros.get(level).ok_or(TreeError::InvalidMerkleProof)?;
                path_elements.push(zero.clone());
                path_positions.push(0);
            } else {
                let (element, position) = kept.next().ok_or(TreeError::InvalidMerkleProof)?;
                path_elements.push(element.clone());
                path_positions.push(*position);
            }
        }
        Ok(ProofPath {
            path_elements,
            path_indices: self.sides.iter().map(|side| u8::from(*side)).collect(),
            path_positions,
            path_root: self.root.clone(),
        })
    }

    /// Encodes the proof: level count, kept siblings with their positions,
    /// the empty bits, the side bits and the root.
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::new();
        write_usize(&mut encoded, self.levels());
        write_usize(&mut encoded, self.elements.len());
        for (element, position) in self.elements.iter().zip(&self.positions) {
            write_element(&mut encoded, element);
            write_usize(&mut encoded, *position);
        }
        encoded.extend_from_slice(self.empty.as_raw_slice());
        encoded.extend_from_slice(self.sides.as_raw_slice());
        write_element(&mut encoded, &self.root);
        encoded
    }

    /// Decodes the output of [`CompressedProof::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, TreeError> {
        let mut reader = Reader::new(data);
        let levels = reader.read_usize()?;
        let bit_bytes = levels.div_ceil(8);
        let kept = reader.read_count(2)?;
        let mut elements = Vec::with_capacity(kept);
        let mut positions = Vec::with_capacity(kept);
        for _ in 0..kept {
            elements.push(reader.read_element()?);
            positions.push(reader.read_usize()?);
        }
        let mut empty = BitVec::<u8, Lsb0>::from_slice(reader.read_bytes(bit_bytes)?);
        empty.truncate(levels);
        let mut sides = BitVec::<u8, Lsb0>::from_slice(reader.read_bytes(bit_bytes)?);
        sides.truncate(levels);
        let root = reader.read_element()?;
        reader.finish()?;
        if elements.len() != empty.count_zeros() {
            return Err(decode_error(format!(
                "{} siblings kept but {} levels are not empty",
                elements.len(),
                empty.count_zeros()
            )));
        }
        Ok(Self {
            elements,
            positions,
            empty,
            sides,
            root,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{verify_proof, CompressedProof, ProofPath};
    use crate::{tree::build_zeros, Element, MerkleTree, Sha256Hasher, TreeError};

    fn tree(leaves: &[u8]) -> MerkleTree<Sha256Hasher> {
        MerkleTree::new(
            10,
            leaves.iter().copied().map(Element::from).collect(),
            Element::from(0u8),
            Sha256Hasher,
        )
        .unwrap()
    }

    #[test]
    fn test_verify_rejects_wrong_leaf() {
        let tree = tree(&[1, 2, 3, 4, 5]);
        let path = tree.path(2).unwrap();
        verify_proof(&Sha256Hasher, &Element::from(3u8), &path).unwrap();
        assert_eq!(
            verify_proof(&Sha256Hasher, &Element::from(4u8), &path).unwrap_err(),
            TreeError::InvalidMerkleProof
        );
    }

    #[test]
    fn test_verify_rejects_malformed_path() {
        let tree = tree(&[1, 2, 3]);
        let mut path = tree.path(0).unwrap();
        path.path_indices.pop();
        assert_eq!(
            verify_proof(&Sha256Hasher, &Element::from(1u8), &path).unwrap_err(),
            TreeError::InvalidMerkleProof
        );
        let mut path = tree.path(0).unwrap();
        path.path_indices[0] = 2;
        assert_eq!(
            verify_proof(&Sha256Hasher, &Element::from(1u8), &path).unwrap_err(),
            TreeError::InvalidMerkleProof
        );
    }

    #[test]
    fn test_compress_drops_empty_siblings() {
        let tree = tree(&[1, 2, 3]);
        let path = tree.path(0).unwrap();
        let compressed = path.compress(tree.zeros());
        // siblings at levels 0 and 1 are real, everything above is empty
        assert_eq!(compressed.kept(), 2);
        assert_eq!(compressed.levels(), 10);
        assert_eq!(compressed.decompress(tree.zeros()).unwrap(), path);
    }

    #[test]
    fn test_compress_keeps_real_sibling_equal_to_zero() {
        let zeros = build_zeros(2, Element::from(0u8), &Sha256Hasher);
        let tree = MerkleTree::new(
            2,
            vec![Element::from(9u8), Element::from(0u8)],
            Element::from(0u8),
            Sha256Hasher,
        )
        .unwrap();
        let path = tree.path(0).unwrap();
        assert_eq!(path.path_positions[0], 1);
        let compressed = path.compress(&zeros);
        assert_eq!(compressed.kept(), 1);
        assert_eq!(compressed.decompress(&zeros).unwrap(), path);
    }

    #[test]
    fn test_compressed_proof_encode_decode() {
        let tree = tree(&[1, 2, 3, 4, 5]);
        let path = tree.path(3).unwrap();
        let compressed = path.compress(tree.zeros());
        let decoded = CompressedProof::decode(&compressed.encode()).unwrap();
        assert_eq!(decoded, compressed);
        let decompressed = decoded.decompress(tree.zeros()).unwrap();
        verify_proof(&Sha256Hasher, &Element::from(4u8), &decompressed).unwrap();
    }

    #[test]
    fn test_decompress_with_short_zero_cache_fails() {
        let tree = tree(&[1]);
        let compressed = tree.path(0).unwrap().compress(tree.zeros());
        assert_eq!(
            compressed.decompress(&tree.zeros()[..3]).unwrap_err(),
            TreeError::InvalidMerkleProof
        );
    }

    #[test]
    fn test_empty_path_root_is_the_element() {
        let path = ProofPath {
            path_elements: vec![],
            path_indices: vec![],
            path_positions: vec![],
            path_root: Element::from(5u8),
        };
        verify_proof(&Sha256Hasher, &Element::from(5u8), &path).unwrap();
    }
}
