use crate::{tree::DEFAULT_ZERO_ELEMENT, Element, HashFunction, MerkleTree, TreeError};

/// Construction options of a [`MerkleTree`].
///
/// ```
/// use fixed_merkle_tree::{Element, MerkleTree, Sha256Hasher};
///
/// let tree = MerkleTree::builder(10)
///     .elements(vec![Element::from(1u8), Element::from(2u8)])
///     .hasher(Sha256Hasher)
///     .build()
///     .unwrap();
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder<H: HashFunction> {
    levels: usize,
    elements: Vec<Element>,
    zero_element: Element,
    hasher: Option<H>,
}

impl<H: HashFunction> TreeBuilder<H> {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            elements: Vec::new(),
            zero_element: Element::from(DEFAULT_ZERO_ELEMENT),
            hasher: None,
        }
    }

    /// Initial leaves.
    pub fn elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Value of an empty leaf.
    pub fn zero_element(mut self, zero_element: Element) -> Self {
        self.zero_element = zero_element;
        self
    }

    pub fn hasher(mut self, hasher: H) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn build(self) -> Result<MerkleTree<H>, TreeError> {
        let hasher = self.hasher.ok_or(TreeError::InvalidHashFunction)?;
        MerkleTree::new(self.levels, self.elements, self.zero_element, hasher)
    }
}
