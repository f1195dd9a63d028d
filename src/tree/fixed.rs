//! Merkle tree holding every leaf.

use tracing::debug;

use crate::{
    codec::{decode_error, encode_elements, encode_layers},
    tree::{capacity_for, BaseTree, Layer, SerializedTreeState, TreeBuilder},
    Element, HashFunction, ProofPath, TreeEdge, TreeError, TreeSlice,
};

/// Fixed-capacity Merkle tree.
/// * `H` - hash function combining two children.
///
/// Every layer is kept in memory so proofs never rehash anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree<H: HashFunction> {
    tree: BaseTree<H>,
}

impl<H: HashFunction> MerkleTree<H> {
    /// Builds a tree of `levels` levels holding `elements` as its first leaves.
    pub fn new(
        levels: usize,
        elements: Vec<Element>,
        zero_element: Element,
        hasher: H,
    ) -> Result<Self, TreeError> {
        Ok(Self {
            tree: BaseTree::new(levels, elements, zero_element, hasher)?,
        })
    }

    pub fn builder(levels: usize) -> TreeBuilder<H> {
        TreeBuilder::new(levels)
    }

    pub fn levels(&self) -> usize {
        self.tree.levels()
    }

    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

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

    pub fn zero_element(&self) -> &Element {
        self.tree.zero_element()
    }

    pub fn zeros(&self) -> &[Element] {
        self.tree.zeros()
    }

    pub fn layers(&self) -> &[Layer] {
        self.tree.layers()
    }

    pub fn elements(&self) -> Vec<Element> {
        self.tree.elements()
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.tree.element(index)
    }

    pub fn insert(&mut self, element: Element) -> Result<(), TreeError> {
        self.tree.insert(element)
    }

    pub fn bulk_insert(&mut self, elements: Vec<Element>) -> Result<(), TreeError> {
        self.tree.bulk_insert(elements)
    }

    pub fn update(&mut self, index: usize, element: Element) -> Result<(), TreeError> {
        self.tree.update(index, element)
    }

    pub fn path(&self, index: usize) -> Result<ProofPath, TreeError> {
        self.tree.path(index)
    }

    /// Index of the first leaf equal to `element`.
    pub fn index_of(&self, element: &Element) -> Option<usize> {
        self.tree.find_from(0, element, |a, b| a == b)
    }

    /// Index of the first leaf for which `eq(element, leaf)` holds.
    pub fn index_of_by(&self, element: &Element, eq: impl Fn(&Element, &Element) -> bool) -> Option<usize> {
        self.tree.find_from(0, element, eq)
    }

    /// Path of the first leaf equal to `element`.
    pub fn proof(&self, element: &Element) -> Result<ProofPath, TreeError> {
        let index = self.index_of(element).ok_or(TreeError::ElementNotFound)?;
        self.path(index)
    }

    /// Checks `path` with this tree's hash function.
    ///
    /// Only the path is trusted, the current root of the tree is not consulted.
    pub fn verify_proof(&self, element: &Element, path: &ProofPath) -> Result<(), TreeError> {
        if path.len() != self.levels() {
            return Err(TreeError::InvalidMerkleProof);
        }
        crate::verify_proof(self.hasher(), element, path)
    }

    /// Edge at `index`, from which a partial tree can be rebuilt.
    pub fn get_tree_edge(&self, index: usize) -> Result<TreeEdge, TreeError> {
        let count = self.len();
        if index >= count {
            return Err(TreeError::IndexOutOfRange { index, count });
        }
        let edge_element = self.element(index).ok_or(TreeError::ElementNotFound)?.clone();
        Ok(TreeEdge {
            edge_path: self.path(index)?,
            edge_element,
            edge_index: index,
            edge_elements_count: count,
        })
    }

    /// Splits the leaves into at most `count` slices of even size.
    pub fn get_tree_slices(&self, count: usize) -> Result<Vec<TreeSlice>, TreeError> {
        if count == 0 {
            return Err(TreeError::InvalidSliceCount);
        }
        let len = self.len();
        let mut size = len.div_ceil(count);
        if size % 2 == 1 {
            size += 1;
        }
        let mut slices = Vec::with_capacity(count);
        let mut start = 0;
        while start < len {
            let end = (start + size).min(len);
            slices.push(TreeSlice {
                edge: self.get_tree_edge(start)?,
                elements: (start..end).filter_map(|index| self.element(index).cloned()).collect(),
            });
            start = end;
        }
        debug!(leaves = len, slices = slices.len(), size, "sliced merkle tree");
        Ok(slices)
    }

    /// Snapshot of every layer and of the zero cache.
    pub fn serialize(&self) -> SerializedTreeState {
        debug!(levels = self.levels(), leaves = self.len(), "serializing merkle tree");
        SerializedTreeState {
            levels: self.levels(),
            layers: encode_layers(self.layers()),
            zeros: encode_elements(self.zeros()),
            root: self.root().clone(),
        }
    }

    /// Loads a snapshot without rehashing.
    ///
    /// The shape of the layers and the stored root are checked; the hashes
    /// themselves are trusted.
    pub fn deserialize(state: &SerializedTreeState, hasher: H) -> Result<Self, TreeError> {
        let levels = state.levels;
        let capacity = capacity_for(levels).map_err(|_| decode_error(format!("invalid level count {levels}")))?;
        let layers = state.layers()?;
        let zeros = state.zeros()?;
        if layers.len() != levels + 1 {
            return Err(decode_error(format!(
                "expected {} layers, found {}",
                levels + 1,
                layers.len()
            )));
        }
        if zeros.len() != levels + 1 {
            return Err(decode_error(format!(
                "expected {} zeros, found {}",
                levels + 1,
                zeros.len()
            )));
        }
        if layers[0].len() > capacity {
            return Err(decode_error(format!(
                "{} leaves exceed capacity {capacity}",
                layers[0].len()
            )));
        }
        let mut width = layers[0].len();
        for (level, layer) in layers.iter().enumerate() {
            if layer.len() != width || layer.has_holes() {
                return Err(decode_error(format!("malformed layer {level}")));
            }
            width = width.div_ceil(2);
        }
        let tree = BaseTree::from_parts(levels, layers, zeros, hasher);
        if *tree.root() != state.root {
            return Err(decode_error("stored root does not match the layers"));
        }
        debug!(levels, leaves = tree.len(), "deserialized merkle tree");
        Ok(Self { tree })
    }
}
