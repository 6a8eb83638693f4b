use p3_field::extension::BinomialExtensionField;
use p3_field::{BasedVectorSpace, PrimeField32};
use p3_koala_bear::KoalaBear;

use crate::CurveError;

/// KoalaBear degree-8 extension field
pub type BaseField = BinomialExtensionField<KoalaBear, 8>;

/// Size of an encoded base field element: 8 coefficients of 4 bytes each.
pub const BASE_FIELD_SIZE: usize = 32;

/// Build an extension element from its coefficients, lowest degree first.
#[inline]
pub(crate) fn from_coeffs(coeffs: [KoalaBear; 8]) -> BaseField {
    BaseField::from_basis_coefficients_fn(|i| coeffs[i])
}

/// Canonical coefficients, lowest degree first.
pub(crate) fn to_words(value: &BaseField) -> [u32; 8] {
    let coeffs: &[KoalaBear] = value.as_basis_coefficients_slice();
    core::array::from_fn(|i| coeffs[i].as_canonical_u32())
}

/// Inverse of [`to_words`] for canonical words.
pub(crate) fn from_words(words: &[u32; 8]) -> BaseField {
    from_coeffs(core::array::from_fn(|i| KoalaBear::new(words[i])))
}

/// Encode as 8 canonical little-endian `u32` coefficients, lowest degree first.
pub(crate) fn to_bytes(value: &BaseField) -> [u8; BASE_FIELD_SIZE] {
    let mut out = [0u8; BASE_FIELD_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(to_words(value)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Decode the encoding produced by [`to_bytes`], rejecting coefficients `>= p`.
pub(crate) fn from_bytes(bytes: &[u8; BASE_FIELD_SIZE]) -> Result<BaseField, CurveError> {
    let mut coeffs = [KoalaBear::new(0); 8];
    for (coeff, chunk) in coeffs.iter_mut().zip(bytes.chunks_exact(4)) {
        let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if raw >= KoalaBear::ORDER_U32 {
            return Err(CurveError::InvalidEncoding);
        }
        *coeff = KoalaBear::new(raw);
    }
    Ok(from_coeffs(coeffs))
}
