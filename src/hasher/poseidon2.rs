//! Poseidon2 over the BN254 scalar field with a state of three elements.
//!
//! Eight full rounds are split around 56 partial rounds and the S-box is
//! `x^5`. Round constants are drawn from the Grain LFSR seeded with those
//! parameters, the same stream the reference instance uses, and are
//! generated once per process.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField, Zero};

use super::HashFunction;
use crate::Element;

const WIDTH: usize = 3;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 56;
const FIELD_BITS: usize = 254;

struct RoundConstants {
    full: Vec<[Fr; WIDTH]>,
    partial: Vec<Fr>,
}

/// Grain LFSR in self-shrinking mode.
struct Grain {
    bits: [bool; 80],
    head: usize,
}

impl Grain {
    fn new() -> Self {
        let mut bits = [true; 80];
        let mut filled = 0;
        // field type, S-box type, field size, width, full and partial rounds
        for (value, width) in [
            (1, 2),
            (0, 4),
            (FIELD_BITS, 12),
            (WIDTH, 12),
            (FULL_ROUNDS, 10),
            (PARTIAL_ROUNDS, 10),
        ] {
            for bit in (0..width).rev() {
                bits[filled] = (value >> bit) & 1 == 1;
                filled += 1;
            }
        }
        let mut grain = Self { bits, head: 0 };
        for _ in 0..160 {
            grain.step();
        }
        grain
    }

    fn step(&mut self) -> bool {
        let tap = |offset: usize| self.bits[(self.head + offset) % 80];
        let bit = tap(62) ^ tap(51) ^ tap(38) ^ tap(23) ^ tap(13) ^ tap(0);
        self.bits[self.head] = bit;
        self.head = (self.head + 1) % 80;
        bit
    }

    fn next_bit(&mut self) -> bool {
        loop {
            let keep = self.step();
            let bit = self.step();
            if keep {
                return bit;
            }
        }
    }

    /// Next `FIELD_BITS`-bit value below the modulus.
    fn next_field(&mut self) -> Fr {
        loop {
            let bits: Vec<bool> = (0..FIELD_BITS).map(|_| self.next_bit()).collect();
            if let Some(value) = Fr::from_bigint(<Fr as PrimeField>::BigInt::from_bits_be(&bits)) {
                return value;
            }
        }
    }
}

impl RoundConstants {
    fn generate() -> Self {
        let mut grain = Grain::new();
        let draw = |grain: &mut Grain| [grain.next_field(), grain.next_field(), grain.next_field()];
        let mut full: Vec<[Fr; WIDTH]> = (0..FULL_ROUNDS / 2).map(|_| draw(&mut grain)).collect();
        let partial = (0..PARTIAL_ROUNDS).map(|_| grain.next_field()).collect();
        full.extend((0..FULL_ROUNDS / 2).map(|_| draw(&mut grain)));
        Self { full, partial }
    }
}

fn round_constants() -> &'static RoundConstants {
    static CONSTANTS: OnceLock<RoundConstants> = OnceLock::new();
    CONSTANTS.get_or_init(RoundConstants::generate)
}

fn sbox(x: Fr) -> Fr {
    x.square().square() * x
}

/// Circulant matrix `circ(2, 1, 1)`.
fn external_linear_layer(state: &mut [Fr; WIDTH]) {
    let sum: Fr = state.iter().sum();
    for x in state.iter_mut() {
        *x += sum;
    }
}

/// All-ones matrix plus `diag(1, 1, 2)`.
fn internal_linear_layer(state: &mut [Fr; WIDTH]) {
    let sum: Fr = state.iter().sum();
    state[0] += sum;
    state[1] += sum;
    state[2] = state[2].double() + sum;
}

fn full_round(state: &mut [Fr; WIDTH], constants: &[Fr; WIDTH]) {
    for (x, constant) in state.iter_mut().zip(constants) {
        *x = sbox(*x + constant);
    }
    external_linear_layer(state);
}

pub(super) fn permute(mut state: [Fr; WIDTH]) -> [Fr; WIDTH] {
    let constants = round_constants();
    let (first, last) = constants.full.split_at(FULL_ROUNDS / 2);
    external_linear_layer(&mut state);
    for round in first {
        full_round(&mut state, round);
    }
    for constant in &constants.partial {
        state[0] = sbox(state[0] + constant);
        internal_linear_layer(&mut state);
    }
    for round in last {
        full_round(&mut state, round);
    }
    state
}

/// Poseidon2 compression over the BN254 scalar field.
///
/// The children fill the first two state elements, the third starts at zero,
/// and the parent is the first element after one permutation. Children are
/// read as big-endian integers reduced modulo the field order. The parent is
/// the 32-byte big-endian field element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Poseidon2Hasher;

impl HashFunction for Poseidon2Hasher {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        let state = permute([
            Fr::from_be_bytes_mod_order(left.as_bytes()),
            Fr::from_be_bytes_mod_order(right.as_bytes()),
            Fr::zero(),
        ]);
        Element::new(state[0].into_bigint().to_bytes_be())
    }
}

#[cfg(test)]
mod test {
    use ark_bn254::Fr;
    use ark_ff::PrimeField;
    use hex_literal::hex;

    use super::{permute, round_constants, Poseidon2Hasher};
    use crate::{build_zeros, Element, HashFunction};

    fn field(bytes: [u8; 32]) -> Fr {
        Fr::from_be_bytes_mod_order(&bytes)
    }

    #[test]
    fn test_round_constants() {
        let constants = round_constants();
        assert_eq!(constants.full.len(), 8);
        assert_eq!(constants.partial.len(), 56);
        assert_eq!(
            constants.full[0][0],
            field(hex!("1d066a255517b7fd8bddd3a93f7804ef7f8fcde48bb4c37a59a09a1a97052816"))
        );
        assert_eq!(
            constants.partial[0],
            field(hex!("1a1d063e54b1e764b63e1855bff015b8cedd192f47308731499573f23597d4b5"))
        );
        assert_eq!(
            constants.full[7][2],
            field(hex!("0fc1bbceba0590f5abbdffa6d3b35e3297c021a3a409926d0e2d54dc1c84fda6"))
        );
    }

    #[test]
    fn test_permutation_vector() {
        let state = permute([Fr::from(0u64), Fr::from(1u64), Fr::from(2u64)]);
        assert_eq!(
            state,
            [
                field(hex!("0bb61d24daca55eebcb1929a82650f328134334da98ea4f847f760054f4a3033")),
                field(hex!("303b6f7c86d043bfcbcc80214f26a30277a15d3f74ca654992defe7ff8d03570")),
                field(hex!("1ed25194542b12eef8617361c3ba7c52e660b145994427cc86296242cf766ec8")),
            ]
        );
    }

    #[test]
    fn test_compress_vector() {
        let parent = Poseidon2Hasher.hash(&Element::from(1u8), &Element::from(2u8));
        assert_eq!(
            parent.as_bytes(),
            hex!("2afac3bdc3663b71eefeecdf21b147d0ba7dd7a169a7757c05ed6bfb065bffd2")
        );
    }

    #[test]
    fn test_zero_cache() {
        let zeros = build_zeros(3, Element::from(0u8), &Poseidon2Hasher);
        assert_eq!(
            zeros[1].as_bytes(),
            hex!("2ed1da00b14d635bd35b88ab49390d5c13c90da7e9e3a5f1ea69cd87a0aa3e82")
        );
        assert_eq!(
            zeros[2].as_bytes(),
            hex!("04f931b3c37ca226c60a8e555edefe5b5be247c2207f9e6b92d4a4b2d495cf3f")
        );
        assert_eq!(
            zeros[3].as_bytes(),
            hex!("1e14b899468e0d5a12b454bda89d49185d39b39da9baaff3a052d69a73d73b8e")
        );
    }
}
