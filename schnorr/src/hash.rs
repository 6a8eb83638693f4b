//! Hashing bytes into the scalar field, and the Fiat-Shamir transcript.

use curve::{Affine, ScalarField};
use p3_baby_bear::{BabyBear, Poseidon2BabyBear, default_babybear_poseidon2_16};
use p3_field::{PrimeCharacteristicRing, PrimeField32};
use p3_symmetric::{CryptographicHasher, PaddingFreeSponge};

use crate::constants::{
    BYTES_PER_ELEMENT, HASH_BLOCKS, MESSAGE_DOMAIN, POSEIDON2_OUT, POSEIDON2_RATE,
    POSEIDON2_WIDTH,
};

type Sponge = PaddingFreeSponge<
    Poseidon2BabyBear<POSEIDON2_WIDTH>,
    POSEIDON2_WIDTH,
    POSEIDON2_RATE,
    POSEIDON2_OUT,
>;

/// Hashes arbitrary bytes into a scalar.
///
/// The output is deterministic and domain separated from every challenge and
/// nonce the scheme derives internally. Two Poseidon2 digests (~495 bits) are
/// reduced modulo the group order, so the bias from uniform is negligible.
///
/// # Example
///
/// ```
/// use schnorr_tokens::hash_to_field;
///
/// let a = hash_to_field(&[1, 2, 3, 255, 0]);
/// let b = hash_to_field(&[1, 2, 3, 255, 0]);
/// assert_eq!(a, b);
/// ```
pub fn hash_to_field(bytes: &[u8]) -> ScalarField {
    hash_with_domain(MESSAGE_DOMAIN, bytes)
}

/// Hashes `data` under `domain` into a scalar.
///
/// The sponge absorbs, per output block: the block index, then the domain and
/// the data, each length prefixed and packed three bytes per BabyBear element.
/// Length prefixes make the packing injective even though the sponge itself
/// does not pad. The digests read as one base-`p` integer, least significant
/// element first, reduced modulo `q` in field arithmetic since the nonce
/// derivation hashes secrets.
pub(crate) fn hash_with_domain(domain: &[u8], data: &[u8]) -> ScalarField {
    let sponge = Sponge::new(default_babybear_poseidon2_16());

    let mut digits = Vec::with_capacity(HASH_BLOCKS as usize * POSEIDON2_OUT);
    for block in 0..HASH_BLOCKS {
        digits.extend(sponge.hash_iter(sponge_input(block, domain, data)));
    }

    let base = ScalarField::from_canonical_u64(u64::from(BabyBear::ORDER_U32));
    digits.iter().rev().fold(ScalarField::ZERO, |acc, digit| {
        acc * base + ScalarField::from_canonical_u64(u64::from(digit.as_canonical_u32()))
    })
}

/// Elements absorbed for output block `block`.
fn sponge_input(block: u32, domain: &[u8], data: &[u8]) -> Vec<BabyBear> {
    let mut input = Vec::with_capacity(5 + (domain.len() + data.len()) / BYTES_PER_ELEMENT);
    input.push(BabyBear::from_u32(block));
    pack_bytes(&mut input, domain);
    pack_bytes(&mut input, data);
    input
}

/// Appends the length of `bytes` (two 24-bit limbs) followed by the bytes
/// themselves, three per element, little-endian.
fn pack_bytes(out: &mut Vec<BabyBear>, bytes: &[u8]) {
    let len = bytes.len() as u64;
    out.push(BabyBear::from_u32((len & 0xff_ffff) as u32));
    out.push(BabyBear::from_u32(((len >> 24) & 0xff_ffff) as u32));

    for chunk in bytes.chunks(BYTES_PER_ELEMENT) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        out.push(BabyBear::from_u32(u32::from_le_bytes(word)));
    }
}

/// Byte transcript of fixed-width proof elements.
///
/// Every appended item has a fixed encoding width, so plain concatenation is
/// unambiguous; the domain passed to [`Transcript::challenge`] separates the
/// different uses.
#[derive(Clone, Debug, Default)]
pub(crate) struct Transcript {
    bytes: Vec<u8>,
}

impl Transcript {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append_scalar(&mut self, scalar: &ScalarField) -> &mut Self {
        self.bytes.extend_from_slice(&scalar.to_bytes());
        self
    }

    pub(crate) fn append_point(&mut self, point: &Affine) -> &mut Self {
        self.bytes.extend_from_slice(&point.to_bytes());
        self
    }

    pub(crate) fn challenge(&self, domain: &[u8]) -> ScalarField {
        hash_with_domain(domain, &self.bytes)
    }
}
