//! Two-to-one hash functions used to combine children into their parent.

use sha2::{Digest, Sha256};

use crate::Element;

/// Combines a left and a right child into their parent value.
///
/// Implementations must be pure and deterministic, and the same function must
/// be used for the whole lifetime of a tree. Any `Fn(&Element, &Element) -> Element`
/// closure or function is a hash function.
pub trait HashFunction {
    fn hash(&self, left: &Element, right: &Element) -> Element;
}

impl<F> HashFunction for F
where
    F: Fn(&Element, &Element) -> Element,
{
    fn hash(&self, left: &Element, right: &Element) -> Element {
        self(left, right)
    }
}

/// SHA-256 over the concatenated hex strings of both children.
///
/// A child whose hex form is a single byte with a leading zero (`"01"`) is
/// written without that zero (`"1"`), so small leaves hash like their decimal
/// string form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

fn hex_operand(element: &Element) -> String {
    let mut s = element.to_hex();
    if s.len() == 2 && s.starts_with('0') {
        s.remove(0);
    }
    s
}

impl HashFunction for Sha256Hasher {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        let mut hasher = Sha256::new();
        hasher.update(hex_operand(left).as_bytes());
        hasher.update(hex_operand(right).as_bytes());
        Element::new(hasher.finalize().to_vec())
    }
}

#[cfg(feature = "poseidon")]
mod poseidon2;

#[cfg(feature = "poseidon")]
pub use poseidon::PoseidonHasher;
#[cfg(feature = "poseidon")]
pub use poseidon2::Poseidon2Hasher;

#[cfg(feature = "poseidon")]
mod poseidon {
    use ark_bn254::Fr;
    use ark_ff::{BigInteger, PrimeField};
    use light_poseidon::{Poseidon, PoseidonHasher as _};

    use super::HashFunction;
    use crate::Element;

    /// Circom-compatible Poseidon over the BN254 scalar field, two inputs.
    ///
    /// Children are read as big-endian integers and reduced modulo the field
    /// order. The parent is the 32-byte big-endian field element.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct PoseidonHasher;

    impl HashFunction for PoseidonHasher {
        fn hash(&self, left: &Element, right: &Element) -> Element {
            let inputs = [
                Fr::from_be_bytes_mod_order(left.as_bytes()),
                Fr::from_be_bytes_mod_order(right.as_bytes()),
            ];
            // only fails on a width mismatch
            let digest = Poseidon::<Fr>::new_circom(2)
                .and_then(|mut poseidon| poseidon.hash(&inputs))
                .unwrap_or_else(|err| unreachable!("poseidon with two inputs: {err}"));
            Element::new(digest.into_bigint().to_bytes_be())
        }
    }

    #[cfg(test)]
    mod test {
        use hex_literal::hex;

        use super::PoseidonHasher;
        use crate::{Element, HashFunction};

        #[test]
        fn test_circom_vector() {
            let parent = PoseidonHasher.hash(&Element::from(1u8), &Element::from(2u8));
            assert_eq!(
                parent.as_bytes(),
                hex!("115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a")
            );
        }
    }
}
