//! Error types for field and group encodings.

use thiserror::Error;

/// Errors raised by scalar and point decoding and by field inversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// The bytes do not hold a canonical encoding: a scalar `>= q`, a base
    /// field coefficient `>= p`, or an input of the wrong length.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Attempted to invert the additive identity.
    #[error("division by zero")]
    DivisionByZero,

    /// The decoded coordinates do not satisfy `y^2 = x^3 + a*x + b`.
    #[error("point is not on the curve")]
    PointNotOnCurve,
}
