//! Merkle tree rebuilt from an edge and the leaves that follow it.
//!
//! Leaves below the edge are unknown and stay as holes. The left-hand
//! siblings on the edge path are taken from the edge proof, which is enough
//! to compute every node on the right of the path, the root included.
//! Earlier slices can be absorbed later with [`PartialMerkleTree::shift_edge`].
//! Only the nodes from the edge onward are stored, whatever the edge index.

use tracing::debug;

use crate::{
    tree::{base::process_nodes, build_zeros, capacity_for, BaseTree, Layer},
    verify_proof, Element, HashFunction, ProofPath, TreeEdge, TreeError, TreeSlice,
};

/// Lays out `leaves` from the edge index, fills the proof siblings and hashes
/// every layer above.
///
/// `check_root` compares the computed root with the root stored in the edge.
fn build_layers<H: HashFunction>(
    hasher: &H,
    zeros: &[Element],
    levels: usize,
    edge: &TreeEdge,
    leaves: Vec<Element>,
    check_root: bool,
) -> Result<Vec<Layer>, TreeError> {
    let mut current = Layer::new();
    for (offset, leaf) in leaves.into_iter().enumerate() {
        current.set(edge.edge_index + offset, leaf);
    }
    let mut layers = Vec::with_capacity(levels + 1);
    for level in 0..levels {
        let index = edge.edge_index >> level;
        if usize::from(edge.edge_path.path_indices[level]) != index % 2 {
            return Err(TreeError::InvalidMerkleProof);
        }
        if index % 2 == 1 && current.get(index - 1).is_none() {
            current.set(index - 1, edge.edge_path.path_elements[level].clone());
        }
        let parents = process_nodes(hasher, &current, &zeros[level]);
        layers.push(current);
        current = parents;
    }
    layers.push(current);
    if check_root && layers[levels].get(0).unwrap_or(&zeros[levels]) != &edge.edge_path.path_root {
        return Err(TreeError::InvalidMerkleProof);
    }
    Ok(layers)
}

fn check_edge(levels: usize, edge: &TreeEdge) -> Result<(), TreeError> {
    if edge.edge_path.len() != levels || !edge.edge_path.is_well_formed() {
        return Err(TreeError::InvalidMerkleProof);
    }
    Ok(())
}

/// Merkle tree holding only the leaves from its edge onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMerkleTree<H: HashFunction> {
    tree: BaseTree<H>,
    edge: TreeEdge,
}

impl<H: HashFunction> PartialMerkleTree<H> {
    /// Rebuilds a tree from `edge` and the leaves starting at the edge index.
    ///
    /// `leaves` must run up to the leaf count recorded in the edge, and the
    /// rebuilt root must match the root of the edge path.
    pub fn new(
        levels: usize,
        edge: TreeEdge,
        leaves: Vec<Element>,
        zero_element: Element,
        hasher: H,
    ) -> Result<Self, TreeError> {
        let capacity = capacity_for(levels)?;
        check_edge(levels, &edge)?;
        let expected = edge.edge_elements_count.saturating_sub(edge.edge_index);
        if edge.edge_index.checked_add(leaves.len()) != Some(edge.edge_elements_count) {
            return Err(TreeError::InvalidElementCount {
                expected,
                actual: leaves.len(),
            });
        }
        if edge.edge_elements_count > capacity {
            return Err(TreeError::CapacityExceeded {
                capacity,
                requested: edge.edge_elements_count,
            });
        }
        if leaves.first() != Some(&edge.edge_element) {
            return Err(TreeError::InvalidMerkleProof);
        }
        let zeros = build_zeros(levels, zero_element, &hasher);
        let layers = build_layers(&hasher, &zeros, levels, &edge, leaves, true)?;
        debug!(levels, edge = edge.edge_index, leaves = layers[0].len(), "built partial merkle tree");
        Ok(Self {
            tree: BaseTree::from_parts(levels, layers, zeros, hasher),
            edge,
        })
    }

    /// Rebuilds a tree from one slice of a full tree.
    pub fn from_slice(levels: usize, slice: TreeSlice, zero_element: Element, hasher: H) -> Result<Self, TreeError> {
        Self::new(levels, slice.edge, slice.elements, zero_element, hasher)
    }

    /// Moves the edge down to `edge`, taking the leaves between the new and
    /// the current edge from `elements`.
    ///
    /// Leaves inserted or updated since construction are kept, so the rebuilt
    /// root is not compared with the edge root. The edge path itself must
    /// still lead from `edge_element` to its own root.
    pub fn shift_edge(&mut self, edge: TreeEdge, elements: Vec<Element>) -> Result<(), TreeError> {
        let current = self.edge.edge_index;
        if edge.edge_index >= current {
            return Err(TreeError::InvalidEdgeShift {
                current,
                requested: edge.edge_index,
            });
        }
        check_edge(self.levels(), &edge)?;
        verify_proof(&self.tree.hasher, &edge.edge_element, &edge.edge_path)?;
        let expected = current - edge.edge_index;
        if elements.len() != expected {
            return Err(TreeError::InvalidElementCount {
                expected,
                actual: elements.len(),
            });
        }
        if elements.first() != Some(&edge.edge_element) {
            return Err(TreeError::InvalidMerkleProof);
        }
        let mut leaves = elements;
        leaves.extend(self.tree.layers[0].iter_from(current).flatten().cloned());
        let layers = build_layers(
            &self.tree.hasher,
            &self.tree.zeros,
            self.tree.levels,
            &edge,
            leaves,
            false,
        )?;
        debug!(from = current, to = edge.edge_index, "shifted partial tree edge");
        self.tree.layers = layers;
        self.edge = edge;
        Ok(())
    }

    pub fn levels(&self) -> usize {
        self.tree.levels()
    }

    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Leaf count, the unknown leaves below the edge included.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn root(&self) -> &Element {
        self.tree.root()
    }

    pub fn hasher(&self) -> &H {
        self.tree.hasher()
    }

    pub fn zeros(&self) -> &[Element] {
        self.tree.zeros()
    }

    /// Layers with holes where nodes are unknown.
    pub fn layers(&self) -> &[Layer] {
        self.tree.layers()
    }

    /// Leaves from the edge onward.
    pub fn elements(&self) -> Vec<Element> {
        self.tree.layers[0]
            .iter_from(self.edge.edge_index)
            .flatten()
            .cloned()
            .collect()
    }

    pub fn edge(&self) -> &TreeEdge {
        &self.edge
    }

    pub fn edge_index(&self) -> usize {
        self.edge.edge_index
    }

    pub fn edge_element(&self) -> &Element {
        &self.edge.edge_element
    }

    pub fn edge_path(&self) -> &ProofPath {
        &self.edge.edge_path
    }

    pub fn insert(&mut self, element: Element) -> Result<(), TreeError> {
        self.tree.insert(element)
    }

    pub fn bulk_insert(&mut self, elements: Vec<Element>) -> Result<(), TreeError> {
        self.tree.bulk_insert(elements)
    }

    pub fn update(&mut self, index: usize, element: Element) -> Result<(), TreeError> {
        self.check_index(index)?;
        self.tree.update(index, element)
    }

    pub fn path(&self, index: usize) -> Result<ProofPath, TreeError> {
        self.check_index(index)?;
        self.tree.path(index)
    }

    /// Index of the first leaf equal to `element`, searching from the edge.
    pub fn index_of(&self, element: &Element) -> Option<usize> {
        self.tree.find_from(self.edge.edge_index, element, |a, b| a == b)
    }

    pub fn index_of_by(&self, element: &Element, eq: impl Fn(&Element, &Element) -> bool) -> Option<usize> {
        self.tree.find_from(self.edge.edge_index, element, eq)
    }

    pub fn proof(&self, element: &Element) -> Result<ProofPath, TreeError> {
        let index = self.index_of(element).ok_or(TreeError::ElementNotFound)?;
        self.path(index)
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index < self.edge.edge_index {
            return Err(TreeError::BelowEdge {
                index,
                edge: self.edge.edge_index,
            });
        }
        Ok(())
    }
}
