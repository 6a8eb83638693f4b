//! Public parameters shared by every signer and verifier.

use curve::{Affine, Group, POINT_SIZE, ScalarField};
use serde::{Deserialize, Serialize};

use crate::errors::SchnorrError;

/// Public parameters: the group generator `G`.
///
/// All keys, tokens and signatures of one deployment must use the same
/// parameters. [`Parameters::setup`] is deterministic, so independently
/// created parameters are equal. They are `Clone` but not `Copy`, so the
/// consuming calls in [`api`](crate::api) take them explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Affine", into = "Affine")]
pub struct Parameters {
    generator: Affine,
}

impl Parameters {
    /// Returns the parameters with the curve's fixed generator.
    pub fn setup() -> Self {
        Self {
            generator: Affine::generator(),
        }
    }

    /// Builds parameters around a caller-chosen generator.
    ///
    /// The curve has prime order, so every point except the identity
    /// generates the whole group.
    pub fn from_generator(generator: Affine) -> Result<Self, SchnorrError> {
        if generator.is_infinity() {
            return Err(SchnorrError::InvalidPoint);
        }
        if !generator.is_on_curve() {
            return Err(curve::CurveError::PointNotOnCurve.into());
        }
        Ok(Self { generator })
    }

    pub fn generator(&self) -> Affine {
        self.generator
    }

    fn is_canonical(&self) -> bool {
        self.generator == Affine::generator()
    }

    /// `scalar * G` for a possibly secret scalar, through the precomputed
    /// table when `G` is the fixed generator.
    pub(crate) fn mul_generator(&self, scalar: &ScalarField) -> Affine {
        if self.is_canonical() {
            Affine::mul_generator(scalar)
        } else {
            self.generator.mul_secret(scalar)
        }
    }

    /// `a * G + b * point` for public scalars.
    pub(crate) fn double_mul(&self, a: &ScalarField, b: &ScalarField, point: &Affine) -> Affine {
        if self.is_canonical() {
            Affine::double_scalar_mul_basepoint(a, b, point)
        } else {
            self.generator.scalar_mul_windowed(a) + point.scalar_mul_windowed(b)
        }
    }

    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        self.generator.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8; POINT_SIZE]) -> Result<Self, SchnorrError> {
        Self::from_generator(Affine::from_bytes(bytes)?)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::setup()
    }
}

impl TryFrom<Affine> for Parameters {
    type Error = SchnorrError;

    fn try_from(generator: Affine) -> Result<Self, Self::Error> {
        Self::from_generator(generator)
    }
}

impl From<Parameters> for Affine {
    fn from(params: Parameters) -> Self {
        params.generator
    }
}
