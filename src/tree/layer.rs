use std::iter;

use crate::Element;

/// Node values of one tree level, indexed from the left.
///
/// A slot past [`Layer::len`] is absent and reads as the zero for the level.
/// A slot inside the length may be a hole; only partial trees leave holes,
/// below their edge.
///
/// The leading run of holes is kept as a count, so a partial tree far from
/// the left end only stores the nodes from its edge onward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    /// Number of leading holes. `nodes` is empty or starts with a value.
    offset: usize,
    nodes: Vec<Option<Element>>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer of `offset` holes followed by `nodes`.
    pub(crate) fn with_offset(offset: usize, mut nodes: Vec<Option<Element>>) -> Self {
        let leading = nodes.iter().take_while(|node| node.is_none()).count();
        nodes.drain(..leading);
        Self {
            offset: offset + leading,
            nodes,
        }
    }

    /// Number of slots, holes included.
    pub fn len(&self) -> usize {
        self.offset + self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of leading holes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Value at `index`, `None` for holes and for slots past the end.
    pub fn get(&self, index: usize) -> Option<&Element> {
        let index = index.checked_sub(self.offset)?;
        self.nodes.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Element>> + '_ {
        self.iter_from(0)
    }

    /// Slots from `start` to the end.
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = Option<&Element>> + '_ {
        let holes = self.offset.saturating_sub(start);
        let skip = start.saturating_sub(self.offset);
        iter::repeat(None)
            .take(holes)
            .chain(self.nodes.iter().skip(skip).map(Option::as_ref))
    }

    /// Values of the filled slots, in index order.
    pub fn values(&self) -> impl Iterator<Item = &Element> + '_ {
        self.nodes.iter().flatten()
    }

    pub fn has_holes(&self) -> bool {
        self.offset > 0 || self.nodes.iter().any(Option::is_none)
    }

    /// Writes `index`, growing the layer with holes when it is outside the
    /// stored nodes.
    pub(crate) fn set(&mut self, index: usize, element: Element) {
        if self.nodes.is_empty() {
            let len = self.len().max(index + 1);
            self.offset = index;
            self.nodes.resize(len - index, None);
        } else if index < self.offset {
            let mut nodes = vec![None; self.offset - index];
            nodes.append(&mut self.nodes);
            self.nodes = nodes;
            self.offset = index;
        } else if index >= self.len() {
            self.nodes.resize(index + 1 - self.offset, None);
        }
        self.nodes[index - self.offset] = Some(element);
    }

    pub(crate) fn push(&mut self, element: Element) {
        self.nodes.push(Some(element));
    }

    /// Slots from the first stored node onward.
    pub(crate) fn stored(&self) -> &[Option<Element>] {
        &self.nodes
    }
}

impl From<Vec<Element>> for Layer {
    fn from(elements: Vec<Element>) -> Self {
        Self {
            offset: 0,
            nodes: elements.into_iter().map(Some).collect(),
        }
    }
}

impl From<Vec<Option<Element>>> for Layer {
    fn from(nodes: Vec<Option<Element>>) -> Self {
        Self::with_offset(0, nodes)
    }
}

impl FromIterator<Element> for Layer {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            offset: 0,
            nodes: iter.into_iter().map(Some).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Layer;
    use crate::Element;

    #[test]
    fn test_set_past_the_end_leaves_holes() {
        let mut layer = Layer::new();
        layer.set(2, Element::from(7u8));
        assert_eq!(layer.len(), 3);
        assert!(layer.has_holes());
        assert_eq!(layer.get(0), None);
        assert_eq!(layer.get(2), Some(&Element::from(7u8)));
        assert_eq!(layer.get(3), None);
        assert_eq!(layer.values().count(), 1);
        assert_eq!(layer.stored().len(), 1);
    }

    #[test]
    fn test_from_elements_is_dense() {
        let layer = Layer::from(vec![Element::from(1u8), Element::from(2u8)]);
        assert!(!layer.has_holes());
        assert_eq!(layer.iter().flatten().cloned().collect::<Vec<_>>().len(), 2);
    }

    #[test]
    fn test_far_slot_stores_only_the_tail() {
        let mut layer = Layer::new();
        layer.set(1 << 40, Element::from(1u8));
        layer.push(Element::from(2u8));
        assert_eq!(layer.len(), (1 << 40) + 2);
        assert_eq!(layer.offset(), 1 << 40);
        assert_eq!(layer.stored().len(), 2);

        layer.set((1 << 40) - 1, Element::from(3u8));
        assert_eq!(layer.offset(), (1 << 40) - 1);
        assert_eq!(layer.stored().len(), 3);
        assert_eq!(layer.get((1 << 40) - 1), Some(&Element::from(3u8)));
        assert_eq!(layer.get(0), None);
    }

    #[test]
    fn test_leading_holes_are_normalized() {
        let mut built = Layer::new();
        built.set(2, Element::from(5u8));
        built.set(3, Element::from(6u8));
        let from_slots = Layer::from(vec![
            None,
            None,
            Some(Element::from(5u8)),
            Some(Element::from(6u8)),
        ]);
        assert_eq!(built, from_slots);
        assert_eq!(from_slots.offset(), 2);
        assert_eq!(
            from_slots.iter_from(1).collect::<Vec<_>>(),
            vec![None, Some(&Element::from(5u8)), Some(&Element::from(6u8))]
        );
        assert_eq!(
            from_slots.iter_from(3).collect::<Vec<_>>(),
            vec![Some(&Element::from(6u8))]
        );
    }

    #[test]
    fn test_all_holes_keep_their_length() {
        let layer = Layer::from(vec![None, None]);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.stored().len(), 0);
        assert!(layer.has_holes());
    }
}
