use crate::{Element, ProofPath};

/// Boundary from which a partial tree can be rebuilt.
///
/// Captures the path of one leaf together with the number of leaves the
/// tree held at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TreeEdge {
    pub edge_path: ProofPath,
    pub edge_element: Element,
    pub edge_index: usize,
    pub edge_elements_count: usize,
}

/// An edge with the leaves that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSlice {
    pub edge: TreeEdge,
    /// Leaves starting at `edge.edge_index`.
    pub elements: Vec<Element>,
}

impl TreeSlice {
    /// Index one past the last leaf of the slice.
    pub fn end(&self) -> usize {
        self.edge.edge_index + self.elements.len()
    }
}
