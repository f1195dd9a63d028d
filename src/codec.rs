//! Byte encoding of layers, zero caches and proofs.
//!
//! Every integer is an unsigned LEB128 varint. An element is its length
//! followed by its bytes. A layer is its count of leading holes, then the
//! count of the remaining slots and one tag per slot (`0` for a hole, `1` for
//! a value followed by the element). Nothing is hashed while encoding or
//! decoding.

use integer_encoding::VarInt;
use tracing::warn;

use crate::{tree::Layer, Element, TreeError};

const HOLE: u8 = 0;
const PRESENT: u8 = 1;

pub(crate) fn write_usize(buf: &mut Vec<u8>, value: usize) {
    buf.extend_from_slice(&(value as u64).encode_var_vec());
}

pub(crate) fn write_element(buf: &mut Vec<u8>, element: &Element) {
    write_usize(buf, element.len());
    buf.extend_from_slice(element.as_bytes());
}

pub(crate) fn decode_error(reason: impl Into<String>) -> TreeError {
    let reason = reason.into();
    warn!(%reason, "rejected encoded tree data");
    TreeError::DecodeFailure(reason)
}

/// Cursor over an encoded buffer.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub(crate) fn read_usize(&mut self) -> Result<usize, TreeError> {
        let (value, read) = u64::decode_var(self.data).ok_or_else(|| decode_error("truncated varint"))?;
        self.data = &self.data[read..];
        usize::try_from(value).map_err(|_| decode_error(format!("integer {value} does not fit in usize")))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, TreeError> {
        let (&byte, rest) = self
            .data
            .split_first()
            .ok_or_else(|| decode_error("unexpected end of data"))?;
        self.data = rest;
        Ok(byte)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], TreeError> {
        if len > self.data.len() {
            return Err(decode_error(format!(
                "length {len} runs past the end of data ({} bytes left)",
                self.data.len()
            )));
        }
        let (bytes, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(bytes)
    }

    pub(crate) fn read_element(&mut self) -> Result<Element, TreeError> {
        let len = self.read_usize()?;
        self.read_bytes(len).map(Element::from)
    }

    /// Reads a count and refuses one that could not fit in the rest of the
    /// buffer when every item takes at least `min_item_size` bytes.
    pub(crate) fn read_count(&mut self, min_item_size: usize) -> Result<usize, TreeError> {
        let count = self.read_usize()?;
        if count.saturating_mul(min_item_size) > self.data.len() {
            return Err(decode_error(format!(
                "count {count} does not fit in {} remaining bytes",
                self.data.len()
            )));
        }
        Ok(count)
    }

    pub(crate) fn finish(self) -> Result<(), TreeError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(decode_error(format!("{} trailing bytes", self.data.len())))
        }
    }
}

/// Encodes layers, holes included.
pub fn encode_layers(layers: &[Layer]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_usize(&mut buf, layers.len());
    for layer in layers {
        write_usize(&mut buf, layer.offset());
        write_usize(&mut buf, layer.stored().len());
        for slot in layer.stored() {
            match slot {
                Some(element) => {
                    buf.push(PRESENT);
                    write_element(&mut buf, element);
                }
                None => buf.push(HOLE),
            }
        }
    }
    buf
}

/// Decodes the output of [`encode_layers`].
pub fn decode_layers(data: &[u8]) -> Result<Vec<Layer>, TreeError> {
    let mut reader = Reader::new(data);
    let count = reader.read_count(1)?;
    let mut layers = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = reader.read_usize()?;
        let slots = reader.read_count(1)?;
        if offset.checked_add(slots).is_none() {
            return Err(decode_error(format!("layer of {offset} holes and {slots} slots overflows")));
        }
        let mut nodes = Vec::with_capacity(slots);
        for _ in 0..slots {
            match reader.read_u8()? {
                HOLE => nodes.push(None),
                PRESENT => nodes.push(Some(reader.read_element()?)),
                tag => return Err(decode_error(format!("unknown slot tag {tag}"))),
            }
        }
        layers.push(Layer::with_offset(offset, nodes));
    }
    reader.finish()?;
    Ok(layers)
}

/// Encodes a list of elements such as a zero cache.
pub fn encode_elements(elements: &[Element]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_usize(&mut buf, elements.len());
    for element in elements {
        write_element(&mut buf, element);
    }
    buf
}

/// Decodes the output of [`encode_elements`].
pub fn decode_elements(data: &[u8]) -> Result<Vec<Element>, TreeError> {
    let mut reader = Reader::new(data);
    let count = reader.read_count(1)?;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        elements.push(reader.read_element()?);
    }
    reader.finish()?;
    Ok(elements)
}
