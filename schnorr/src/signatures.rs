//! Signature types, challenge derivation and verification.

use curve::{Affine, Group, POINT_SIZE, SCALAR_SIZE, ScalarField};
use serde::{Deserialize, Serialize};

use crate::constants::{
    MESSAGE_CHALLENGE_DOMAIN, SIG_SIZE, TOKEN_CHALLENGE_DOMAIN, TOKEN_NONCE_DOMAIN,
};
use crate::errors::SchnorrError;
use crate::hash::Transcript;
use crate::message::{Message, Policy, policy_scalar};
use crate::params::Parameters;

/// Core proof of a signature.
///
/// `c0` is the challenge of the token the signature was made with, `(c1, z1)`
/// is the Schnorr proof on the message under the token key `Z0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sigma {
    pub c0: ScalarField,
    pub c1: ScalarField,
    pub z1: ScalarField,
}

/// Binding pair of a signature: the token tag `m0` and the token key
/// `Z0 = z0 * G`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theta {
    pub m0: ScalarField,
    pub z0: Affine,
}

/// A signature produced either directly by the key holder or by a delegate
/// holding a signing token. Both kinds verify the same way.
///
/// # Structure
///
/// With `vk` the issuer key and `m` the message, a valid signature satisfies
///
/// - `c0 = H_tok(m0 || policy || vk || Z0 - c0 * vk)`
/// - `c1 = H_msg(m || Z0 || z1 * G - c1 * Z0)`
///
/// The first equation ties the token key to the issuer, the second ties the
/// message to the token key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub sigma: Sigma,
    pub theta: Theta,
}

impl Signature {
    pub fn sigma_c0(&self) -> ScalarField {
        self.sigma.c0
    }

    pub fn sigma_c1(&self) -> ScalarField {
        self.sigma.c1
    }

    pub fn sigma_z1(&self) -> ScalarField {
        self.sigma.z1
    }

    pub fn theta_m0(&self) -> ScalarField {
        self.theta.m0
    }

    pub fn theta_z0(&self) -> Affine {
        self.theta.z0
    }

    /// Encodes as `c0 || c1 || z1 || m0 || Z0`.
    pub fn to_bytes(&self) -> [u8; SIG_SIZE] {
        let mut out = [0u8; SIG_SIZE];
        let scalars = [self.sigma.c0, self.sigma.c1, self.sigma.z1, self.theta.m0];
        for (chunk, scalar) in out.chunks_exact_mut(SCALAR_SIZE).zip(scalars.iter()) {
            chunk.copy_from_slice(&scalar.to_bytes());
        }
        out[4 * SCALAR_SIZE..].copy_from_slice(&self.theta.z0.to_bytes());
        out
    }

    /// Decodes the encoding produced by [`Signature::to_bytes`].
    ///
    /// Only the encoding is checked here. A decoded signature whose token key
    /// is the identity is well formed but never verifies.
    pub fn from_bytes(bytes: &[u8; SIG_SIZE]) -> Result<Self, SchnorrError> {
        let scalar =
            |i: usize| ScalarField::from_slice(&bytes[i * SCALAR_SIZE..(i + 1) * SCALAR_SIZE]);
        let z0 = Affine::from_slice(&bytes[4 * SCALAR_SIZE..4 * SCALAR_SIZE + POINT_SIZE])?;

        Ok(Self {
            sigma: Sigma {
                c0: scalar(0)?,
                c1: scalar(1)?,
                z1: scalar(2)?,
            },
            theta: Theta { m0: scalar(3)?, z0 },
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchnorrError> {
        let array: &[u8; SIG_SIZE] = bytes
            .try_into()
            .map_err(|_| curve::CurveError::InvalidEncoding)?;
        Self::from_bytes(array)
    }
}

/// Challenge binding a token tag and policy to the issuer key.
pub(crate) fn token_challenge(
    m0: &ScalarField,
    policy: &ScalarField,
    vk: &Affine,
    r0: &Affine,
) -> ScalarField {
    Transcript::new()
        .append_scalar(m0)
        .append_scalar(policy)
        .append_point(vk)
        .append_point(r0)
        .challenge(TOKEN_CHALLENGE_DOMAIN)
}

/// Challenge binding a message to a token key.
pub(crate) fn message_challenge(message: &ScalarField, z0: &Affine, r1: &Affine) -> ScalarField {
    Transcript::new()
        .append_scalar(message)
        .append_point(z0)
        .append_point(r1)
        .challenge(MESSAGE_CHALLENGE_DOMAIN)
}

/// The one nonce a token ever signs with.
pub(crate) fn token_nonce(z0: &ScalarField, c0: &ScalarField, m0: &ScalarField) -> ScalarField {
    Transcript::new()
        .append_scalar(z0)
        .append_scalar(c0)
        .append_scalar(m0)
        .challenge(TOKEN_NONCE_DOMAIN)
}

/// Checks both verification equations. Never fails on well-formed input;
/// every rejection is `false`.
pub(crate) fn verify_signature(
    params: &Parameters,
    vk: &Affine,
    message: &Message,
    policy: Option<&Policy>,
    sig: &Signature,
) -> bool {
    let Sigma { c0, c1, z1 } = sig.sigma;
    let Theta { m0, z0 } = sig.theta;

    if vk.is_infinity() || z0.is_infinity() {
        tracing::debug!("signature rejected: identity key");
        return false;
    }

    let r0 = z0 + vk.scalar_mul_windowed(&-c0);
    if token_challenge(&m0, &policy_scalar(policy), vk, &r0) != c0 {
        tracing::debug!("signature rejected: token binding mismatch");
        return false;
    }

    let r1 = params.double_mul(&z1, &-c1, &z0);
    if message_challenge(message.as_scalar(), &z0, &r1) != c1 {
        tracing::debug!("signature rejected: message proof mismatch");
        return false;
    }

    true
}
