use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::ScalarField;

/// Helper trait for sampling random field elements.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Sample until the result is not the additive identity.
    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }
}
