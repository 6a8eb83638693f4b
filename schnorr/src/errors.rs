//! Error types for the token signature scheme.

use curve::CurveError;
use thiserror::Error;

/// Errors that can occur while decoding, signing, delegating or checking
/// revocation.
///
/// A signature that simply fails to verify is not an error: verification
/// returns `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SchnorrError {
    /// Malformed scalar or point bytes, division by zero, or a point that is
    /// not on the curve.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// The point at infinity was supplied where a proper group element is
    /// required, e.g. as a verification key or generator.
    #[error("invalid point: the identity is not allowed here")]
    InvalidPoint,

    /// A delegated signing call found no unused token.
    #[error("no unused signing token remains")]
    TokenExhausted,

    /// The signature was produced with a token whose revocation key has been
    /// published, or which this verifier has already accepted once.
    #[error("signature uses a revoked or already accepted token")]
    RevokedToken,
}
