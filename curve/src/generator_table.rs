use std::sync::OnceLock;

use crate::table::PointTable;
use crate::{Affine, ScalarField};

static GENERATOR_TABLE: OnceLock<PointTable<256>> = OnceLock::new();

/// Multiples `i * G` for `i` in `1..=256`, built on first use.
pub(crate) fn generator_table() -> &'static PointTable<256> {
    GENERATOR_TABLE.get_or_init(|| PointTable::new(&Affine::generator()))
}

/// Compute scalar * G with 8-bit windows over the precomputed generator table.
///
/// The scalar may be secret. Every window is recoded to a nonzero digit, so
/// the ladder always does eight doublings, one full table scan and one
/// addition per window.
pub fn mul_generator_affine(scalar: &ScalarField) -> Affine {
    let table = generator_table();
    let digits = scalar.window_digits::<8, 32>();

    let mut result = table.select(digits[31]);
    for &digit in digits[..31].iter().rev() {
        for _ in 0..8 {
            result = result.double();
        }
        result += table.select(digit);
    }

    result
}
