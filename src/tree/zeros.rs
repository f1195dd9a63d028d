//! Digests of empty subtrees.
use crate::{Element, HashFunction};

/// Builds the zero cache of a tree with `levels` levels.
///
/// Index 0 is `zero_element`; index `i` is the root of a perfectly empty
/// subtree of height `i`, so the result always holds `levels + 1` values.
pub fn build_zeros<H: HashFunction>(levels: usize, zero_element: Element, hasher: &H) -> Vec<Element> {
    let mut zeros = Vec::with_capacity(levels + 1);
    zeros.push(zero_element);
    for i in 1..=levels {
        let below = &zeros[i - 1];
        let next = hasher.hash(below, below);
        zeros.push(next);
    }
    zeros
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::build_zeros;
    use crate::{Element, Sha256Hasher};

    #[test]
    fn test_zero_cache_length_and_values() {
        let zeros = build_zeros(4, Element::from(0u8), &Sha256Hasher);
        assert_eq!(zeros.len(), 5);
        assert_eq!(zeros[0], Element::from(0u8));
        assert_eq!(
            zeros[1].as_bytes(),
            hex!("f1534392279bddbf9d43dde8701cb5be14b82f76ec6607bf8d6ad557f60f304e")
        );
        assert_eq!(
            zeros[2].as_bytes(),
            hex!("7437365578b682de87174ba8a7f5eaa30ee982b7d8e9e3c6e86d263518ffc493")
        );
        assert_eq!(
            zeros[4].as_bytes(),
            hex!("96405940c97198beddd8ec086d669c69e055f8e7288b962258e4cb61b6619dc2")
        );
    }

    #[test]
    fn test_zero_cache_is_deterministic() {
        let a = build_zeros(10, Element::from(0u8), &Sha256Hasher);
        let b = build_zeros(10, Element::from(0u8), &Sha256Hasher);
        assert_eq!(a, b);
    }
}
