use crate::{
    codec::{decode_elements, decode_layers, write_element, write_usize, Reader},
    tree::Layer,
    Element, TreeError,
};

/// Snapshot of a tree with every intermediate layer.
///
/// Loading it back does not hash anything. Elements are stored as raw
/// bytes; interpreting them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializedTreeState {
    pub levels: usize,
    /// Layers encoded with [`crate::encode_layers`].
    pub layers: Vec<u8>,
    /// Zero cache encoded with [`crate::encode_elements`].
    pub zeros: Vec<u8>,
    /// Root at snapshot time, checked against the layers on load.
    pub root: Element,
}

impl SerializedTreeState {
    pub fn layers(&self) -> Result<Vec<Layer>, TreeError> {
        decode_layers(&self.layers)
    }

    pub fn zeros(&self) -> Result<Vec<Element>, TreeError> {
        decode_elements(&self.zeros)
    }

    /// Flattens the snapshot into one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.layers.len() + self.zeros.len() + self.root.len() + 16);
        write_usize(&mut buf, self.levels);
        write_usize(&mut buf, self.layers.len());
        buf.extend_from_slice(&self.layers);
        write_usize(&mut buf, self.zeros.len());
        buf.extend_from_slice(&self.zeros);
        write_element(&mut buf, &self.root);
        buf
    }

    /// Splits a buffer written by [`SerializedTreeState::to_bytes`].
    /// The inner layers and zeros are only decoded when the tree is loaded.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TreeError> {
        let mut reader = Reader::new(data);
        let levels = reader.read_usize()?;
        let len = reader.read_usize()?;
        let layers = reader.read_bytes(len)?.to_vec();
        let len = reader.read_usize()?;
        let zeros = reader.read_bytes(len)?.to_vec();
        let root = reader.read_element()?;
        reader.finish()?;
        Ok(Self {
            levels,
            layers,
            zeros,
            root,
        })
    }
}
