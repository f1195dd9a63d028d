//! Layered tree engine shared by the full and the partial tree.

use tracing::{debug, trace};

use crate::{
    tree::{build_zeros, Layer},
    Element, HashFunction, ProofPath, TreeError,
};

/// Default value of an empty leaf: a single zero byte.
pub const DEFAULT_ZERO_ELEMENT: u8 = 0;

/// Capacity of a tree with `levels` levels, `2^levels`.
pub(crate) fn capacity_for(levels: usize) -> Result<usize, TreeError> {
    if levels == 0 || levels >= usize::BITS as usize {
        return Err(TreeError::InvalidLevels(levels));
    }
    Ok(1 << levels)
}

/// Hashes every pair of `nodes` into the layer above.
///
/// A trailing left child without a sibling is paired with `zero`. Pairs are
/// processed from the right and processing stops at the first hole, so a
/// layer with a prefix of holes yields a parent layer with a prefix of holes.
pub(crate) fn process_nodes<H: HashFunction>(hasher: &H, nodes: &Layer, zero: &Element) -> Layer {
    let width = nodes.len().div_ceil(2);
    let mut parents = Vec::new();
    for index in (0..width).rev() {
        let Some(left) = nodes.get(index * 2) else {
            break;
        };
        let right = nodes.get(index * 2 + 1).unwrap_or(zero);
        parents.push(Some(hasher.hash(left, right)));
    }
    parents.reverse();
    Layer::with_offset(width - parents.len(), parents)
}

/// Fixed-capacity binary Merkle tree stored level by level.
///
/// * `levels` - height of the tree, the capacity is `2^levels` leaves.
/// * `H` - hash function combining two children.
///
/// Layer 0 holds the leaves and layer `levels` holds the root. Every mutation
/// recomputes the `levels` ancestors of the touched leaf and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTree<H: HashFunction> {
    pub(super) levels: usize,
    pub(super) hasher: H,
    pub(super) zeros: Vec<Element>,
    pub(super) layers: Vec<Layer>,
}

impl<H: HashFunction> BaseTree<H> {
    /// Builds a tree holding `elements` as its first leaves.
    pub fn new(
        levels: usize,
        elements: Vec<Element>,
        zero_element: Element,
        hasher: H,
    ) -> Result<Self, TreeError> {
        let capacity = capacity_for(levels)?;
        if elements.len() > capacity {
            return Err(TreeError::CapacityExceeded {
                capacity,
                requested: elements.len(),
            });
        }
        let zeros = build_zeros(levels, zero_element, &hasher);
        let mut tree = Self {
            levels,
            hasher,
            zeros,
            layers: vec![Layer::from(elements)],
        };
        tree.build_hashes();
        debug!(levels, leaves = tree.len(), "built merkle tree");
        Ok(tree)
    }

    /// Reassembles a tree from layers and a zero cache without hashing.
    pub(crate) fn from_parts(levels: usize, layers: Vec<Layer>, zeros: Vec<Element>, hasher: H) -> Self {
        Self {
            levels,
            hasher,
            zeros,
            layers,
        }
    }

    /// Recomputes every layer above the leaves.
    pub(super) fn build_hashes(&mut self) {
        self.layers.truncate(1);
        for level in 1..=self.levels {
            let layer = process_nodes(&self.hasher, &self.layers[level - 1], &self.zeros[level - 1]);
            self.layers.push(layer);
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Maximum number of leaves, `2^levels`.
    pub fn capacity(&self) -> usize {
        1 << self.levels
    }

    /// Number of leaf slots in use.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn zero_element(&self) -> &Element {
        &self.zeros[0]
    }

    /// Zero cache, `levels + 1` values.
    pub fn zeros(&self) -> &[Element] {
        &self.zeros
    }

    /// All layers, leaves first and root last.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Copy of the filled leaves in index order.
    pub fn elements(&self) -> Vec<Element> {
        self.layers[0].values().cloned().collect()
    }

    /// Leaf at `index`, `None` when it is past the end or a hole.
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.layers[0].get(index)
    }

    /// Root of the tree, the top zero when the tree is empty.
    pub fn root(&self) -> &Element {
        self.layers[self.levels]
            .get(0)
            .unwrap_or(&self.zeros[self.levels])
    }

    /// Appends a leaf at the next free index.
    pub fn insert(&mut self, element: Element) -> Result<(), TreeError> {
        let len = self.len();
        if len >= self.capacity() {
            return Err(TreeError::CapacityExceeded {
                capacity: self.capacity(),
                requested: len + 1,
            });
        }
        self.update(len, element)
    }

    /// Appends many leaves.
    ///
    /// Pairs are folded upwards as soon as they are complete and only the
    /// path of the last leaf is recomputed in full. The resulting tree is the
    /// one produced by inserting the elements one at a time.
    pub fn bulk_insert(&mut self, elements: Vec<Element>) -> Result<(), TreeError> {
        let Some(last_offset) = elements.len().checked_sub(1) else {
            return Ok(());
        };
        let requested = self.len() + elements.len();
        if requested > self.capacity() {
            return Err(TreeError::CapacityExceeded {
                capacity: self.capacity(),
                requested,
            });
        }
        debug!(count = elements.len(), from = self.len(), "bulk inserting leaves");

        let mut elements = elements.into_iter();
        for element in elements.by_ref().take(last_offset) {
            self.layers[0].push(element);
            let mut index = self.len() - 1;
            let mut level = 0;
            while index % 2 == 1 && level < self.levels {
                level += 1;
                index >>= 1;
                let parent = self.hash_children(level, index);
                self.layers[level].set(index, parent);
            }
        }
        match elements.next() {
            Some(last) => self.update(self.len(), last),
            None => Ok(()),
        }
    }

    /// Replaces the leaf at `index`, or appends when `index` is the leaf count.
    pub fn update(&mut self, index: usize, element: Element) -> Result<(), TreeError> {
        let len = self.len();
        if index > len || index >= self.capacity() {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.layers[0].set(index, element);
        self.process_update(index);
        Ok(())
    }

    /// Sibling path of the leaf at `index`.
    pub fn path(&self, index: usize) -> Result<ProofPath, TreeError> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let mut path_elements = Vec::with_capacity(self.levels);
        let mut path_indices = Vec::with_capacity(self.levels);
        let mut path_positions = Vec::with_capacity(self.levels);
        let mut current = index;
        for level in 0..self.levels {
            path_indices.push((current % 2) as u8);
            let sibling = current ^ 1;
            match self.layers[level].get(sibling) {
                Some(element) => {
                    path_elements.push(element.clone());
                    path_positions.push(sibling);
                }
                None => {
                    path_elements.push(self.zeros[level].clone());
                    path_positions.push(0);
                }
            }
            current >>= 1;
        }
        trace!(index, "computed merkle path");
        Ok(ProofPath {
            path_elements,
            path_indices,
            path_positions,
            path_root: self.root().clone(),
        })
    }

    /// First leaf at or after `from` for which `eq(element, leaf)` holds.
    pub(crate) fn find_from(
        &self,
        from: usize,
        element: &Element,
        eq: impl Fn(&Element, &Element) -> bool,
    ) -> Option<usize> {
        self.layers[0]
            .iter_from(from)
            .zip(from..)
            .find_map(|(leaf, index)| match leaf {
                Some(leaf) if eq(element, leaf) => Some(index),
                _ => None,
            })
    }

    /// Parent at `level`/`index` from its two children, missing children read as zero.
    fn hash_children(&self, level: usize, index: usize) -> Element {
        let below = &self.layers[level - 1];
        let zero = &self.zeros[level - 1];
        let left = below.get(index * 2).unwrap_or(zero);
        let right = below.get(index * 2 + 1).unwrap_or(zero);
        self.hasher.hash(left, right)
    }

    /// Recomputes the ancestors of the leaf at `index`.
    fn process_update(&mut self, mut index: usize) {
        for level in 1..=self.levels {
            index >>= 1;
            let parent = self.hash_children(level, index);
            self.layers[level].set(index, parent);
        }
        trace!(levels = self.levels, "recomputed leaf ancestors");
    }
}
