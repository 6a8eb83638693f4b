//! One-time signing tokens and the delegation containers around them.
//!
//! A token is a Schnorr proof `(z0, c0)` by the issuer on a fresh random tag
//! `m0`. Its response `z0` doubles as a signing secret for the token key
//! `Z0 = z0 * G`, which the delegate uses to sign exactly one message. The
//! issuer's secret key never leaves the issuer.

use core::fmt::{self, Debug, Formatter};
use std::collections::VecDeque;

use curve::{Affine, RandomField, SCALAR_SIZE, ScalarField};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::TOKEN_SIZE;
use crate::errors::SchnorrError;
use crate::message::{Message, Policy, policy_scalar};
use crate::params::Parameters;
use crate::revocation::RevocationKey;
use crate::signatures::{Signature, Sigma, Theta, message_challenge, token_challenge, token_nonce};

/// A single-use signing token.
///
/// The token carries a secret (`z0`), so it is wiped on drop and its `Debug`
/// output only shows the public tag. Signing consumes the token.
///
/// # Misuse
///
/// The signing nonce is fixed per token. Signing two different messages with
/// copies of the same token reveals `z0`, after which anyone can sign any
/// message under that token. Revocation of the tag is the remedy.
#[derive(Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SigningToken {
    z0: ScalarField,
    c0: ScalarField,
    m0: ScalarField,
}

impl SigningToken {
    /// Issues a token for the key pair `(sk, vk)`.
    pub(crate) fn issue<R: Rng + CryptoRng + ?Sized>(
        params: &Parameters,
        sk: &ScalarField,
        vk: &Affine,
        policy: Option<&Policy>,
        rng: &mut R,
    ) -> Self {
        let m0 = ScalarField::random(rng);
        let mut r0 = ScalarField::random_nonzero(rng);
        let big_r0 = params.mul_generator(&r0);

        let c0 = token_challenge(&m0, &policy_scalar(policy), vk, &big_r0);
        let z0 = r0 + c0 * *sk;
        r0.zeroize();

        Self { z0, c0, m0 }
    }

    /// Signs `message` with this token.
    ///
    /// No issuer secret is involved: the proof is made with `z0` under the
    /// token key `Z0`, with the nonce the token commits to.
    pub fn sign(self, params: &Parameters, message: &Message) -> Signature {
        let token_key = params.mul_generator(&self.z0);
        let mut r1 = token_nonce(&self.z0, &self.c0, &self.m0);
        let big_r1 = params.mul_generator(&r1);

        let c1 = message_challenge(message.as_scalar(), &token_key, &big_r1);
        let z1 = r1 + c1 * self.z0;
        r1.zeroize();

        Signature {
            sigma: Sigma {
                c0: self.c0,
                c1,
                z1,
            },
            theta: Theta {
                m0: self.m0,
                z0: token_key,
            },
        }
    }

    /// Key under which the issuer can revoke this token.
    pub fn revocation_key(&self) -> RevocationKey {
        RevocationKey::from(self.m0)
    }

    pub fn z0(&self) -> ScalarField {
        self.z0
    }

    pub fn c0(&self) -> ScalarField {
        self.c0
    }

    pub fn m0(&self) -> ScalarField {
        self.m0
    }

    /// Encodes as `z0 || c0 || m0`.
    pub fn to_bytes(&self) -> [u8; TOKEN_SIZE] {
        let mut out = [0u8; TOKEN_SIZE];
        out[..SCALAR_SIZE].copy_from_slice(&self.z0.to_bytes());
        out[SCALAR_SIZE..2 * SCALAR_SIZE].copy_from_slice(&self.c0.to_bytes());
        out[2 * SCALAR_SIZE..].copy_from_slice(&self.m0.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; TOKEN_SIZE]) -> Result<Self, SchnorrError> {
        Ok(Self {
            z0: ScalarField::from_slice(&bytes[..SCALAR_SIZE])?,
            c0: ScalarField::from_slice(&bytes[SCALAR_SIZE..2 * SCALAR_SIZE])?,
            m0: ScalarField::from_slice(&bytes[2 * SCALAR_SIZE..])?,
        })
    }
}

impl ConstantTimeEq for SigningToken {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.z0.ct_eq(&other.z0) & self.c0.ct_eq(&other.c0) & self.m0.ct_eq(&other.m0)
    }
}

impl PartialEq for SigningToken {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for SigningToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningToken")
            .field("m0", &self.m0)
            .finish_non_exhaustive()
    }
}

/// What an issuer hands out: how many tokens, and the policy they carry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationSpec {
    pub number_of_tokens: u64,
    pub policy: Option<Policy>,
}

impl DelegationSpec {
    pub fn new(number_of_tokens: u64) -> Self {
        Self {
            number_of_tokens,
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// The delegate's pool of unused tokens, consumed front to back.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationInfo {
    tokens: VecDeque<SigningToken>,
}

impl DelegationInfo {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Removes the next unused token from the pool.
    pub fn take_token(&mut self) -> Result<SigningToken, SchnorrError> {
        self.tokens.pop_front().ok_or(SchnorrError::TokenExhausted)
    }

    /// Signs `message` with the next unused token.
    pub fn delegated_sign(
        &mut self,
        params: &Parameters,
        message: &Message,
    ) -> Result<Signature, SchnorrError> {
        let token = self.take_token()?;
        tracing::debug!(remaining = self.tokens.len(), "signing with delegated token");
        Ok(token.sign(params, message))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &SigningToken> {
        self.tokens.iter()
    }
}

impl FromIterator<SigningToken> for DelegationInfo {
    fn from_iter<I: IntoIterator<Item = SigningToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Output of a delegation: the tokens for the delegate and, index aligned,
/// the revocation keys the issuer keeps.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationResult {
    pub tokens: DelegationInfo,
    pub revocation_keys: Vec<RevocationKey>,
}

impl DelegationResult {
    pub(crate) fn from_tokens(tokens: Vec<SigningToken>) -> Self {
        let revocation_keys = tokens.iter().map(SigningToken::revocation_key).collect();
        Self {
            tokens: tokens.into_iter().collect(),
            revocation_keys,
        }
    }

    pub fn delegation_info(&self) -> &DelegationInfo {
        &self.tokens
    }

    pub fn revocation_keys(&self) -> &[RevocationKey] {
        &self.revocation_keys
    }

    pub fn into_parts(self) -> (DelegationInfo, Vec<RevocationKey>) {
        (self.tokens, self.revocation_keys)
    }
}
