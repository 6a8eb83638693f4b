//! Prime-order elliptic curve group over the KoalaBear degree-8 extension field.
//!
//! This crate provides affine curve points, the scalar field of the group,
//! canonical byte encodings for both, and helpers for random sampling. The
//! curve parameters and the generator are fixed to the values in the `affine`
//! module. All encodings are little-endian and fixed width.
//!
//! Multiplications that take secret scalars ([`mul_generator_affine`],
//! [`Affine::mul_secret`]) use recoded fixed windows and full-table
//! constant-time lookups. [`Group::scalar_mul`], [`Group::scalar_mul_windowed`]
//! and the verification-side [`double_scalar_mul_basepoint_affine`] skip zero
//! windows and are meant for public scalars.

mod affine;
mod basefield;
mod errors;
mod generator_table;
mod group;
mod msm;
mod random;
mod scalarfield;
mod table;

pub use affine::{Affine, POINT_SIZE};
pub use basefield::{BaseField, BASE_FIELD_SIZE};
pub use errors::CurveError;
pub use generator_table::mul_generator_affine;
pub use group::{Group, ScalarBits};
pub use msm::double_scalar_mul_basepoint_affine;
pub use p3_koala_bear::KoalaBear;
pub use random::RandomField;
pub use scalarfield::{ScalarField, SCALAR_SIZE};
