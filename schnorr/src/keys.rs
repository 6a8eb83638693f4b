//! Secret keys, verification keys and key pairs.

use core::fmt::{self, Debug, Formatter};

use curve::{Affine, RandomField, ScalarField};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{PK_SIZE, SK_SIZE};
use crate::delegation::{DelegationResult, DelegationSpec, SigningToken};
use crate::errors::SchnorrError;
use crate::message::{Message, Policy};
use crate::params::Parameters;
use crate::signatures::{Signature, verify_signature};

/// A long-term secret signing key.
///
/// The key is a uniformly random nonzero scalar. It is wiped from memory on
/// drop, is neither `Copy` nor serde-serializable, and its `Debug` output is
/// redacted.
///
/// # Example
///
/// ```
/// use schnorr_tokens::{Message, Parameters, SecretKey};
///
/// let params = Parameters::setup();
/// let mut rng = rand::rng();
/// let sk = SecretKey::random(&mut rng);
/// let vk = sk.verification_key(&params);
///
/// let message = Message::hash(b"hello");
/// let sig = sk.sign(&params, &message, None, &mut rng);
/// assert!(vk.verify(&params, &message, &sig));
/// ```
#[derive(Clone, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    scalar: ScalarField,
}

/// A public verification key `vk = sk * G`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Affine", into = "Affine")]
pub struct VerificationKey {
    point: Affine,
}

impl SecretKey {
    /// Samples a key from a cryptographically secure generator.
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self {
            scalar: ScalarField::random_nonzero(rng),
        }
    }

    pub fn verification_key(&self, params: &Parameters) -> VerificationKey {
        VerificationKey {
            point: params.mul_generator(&self.scalar),
        }
    }

    /// Signs a message directly.
    ///
    /// Internally this issues a fresh token bound to `policy` and finalizes it
    /// on `message`, so direct and delegated signatures are indistinguishable
    /// to a verifier.
    pub fn sign<R: Rng + CryptoRng + ?Sized>(
        &self,
        params: &Parameters,
        message: &Message,
        policy: Option<&Policy>,
        rng: &mut R,
    ) -> Signature {
        self.issue_token(params, policy, rng).sign(params, message)
    }

    /// Issues one signing token bound to `policy`.
    pub fn issue_token<R: Rng + CryptoRng + ?Sized>(
        &self,
        params: &Parameters,
        policy: Option<&Policy>,
        rng: &mut R,
    ) -> SigningToken {
        let vk = self.verification_key(params);
        SigningToken::issue(params, &self.scalar, &vk.point, policy, rng)
    }

    /// Issues `spec.number_of_tokens` tokens and their revocation keys.
    pub fn delegate<R: Rng + CryptoRng + ?Sized>(
        &self,
        params: &Parameters,
        spec: &DelegationSpec,
        rng: &mut R,
    ) -> DelegationResult {
        let _span = tracing::debug_span!("delegate", tokens = spec.number_of_tokens).entered();

        let vk = self.verification_key(params);
        let tokens = (0..spec.number_of_tokens)
            .map(|_| {
                SigningToken::issue(params, &self.scalar, &vk.point, spec.policy.as_ref(), &mut *rng)
            })
            .collect();

        tracing::debug!(policy = ?spec.policy, "issued delegation tokens");
        DelegationResult::from_tokens(tokens)
    }

    pub fn to_bytes(&self) -> [u8; SK_SIZE] {
        self.scalar.to_bytes()
    }

    /// Decodes a secret key, rejecting out-of-range and zero scalars.
    pub fn from_bytes(bytes: &[u8; SK_SIZE]) -> Result<Self, SchnorrError> {
        let scalar = ScalarField::from_bytes(bytes)?;
        if scalar.is_zero() {
            return Err(curve::CurveError::InvalidEncoding.into());
        }
        Ok(Self { scalar })
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.scalar.ct_eq(&other.scalar)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl VerificationKey {
    pub fn as_point(&self) -> &Affine {
        &self.point
    }

    /// Verifies a signature made without a policy.
    pub fn verify(&self, params: &Parameters, message: &Message, sig: &Signature) -> bool {
        self.verify_with_policy(params, message, None, sig)
    }

    /// Verifies a signature whose token was issued with `policy`.
    ///
    /// Returns `false` for every invalid signature, including those made
    /// under a different policy. Revocation is not consulted here; see
    /// [`RevocationState::verify`](crate::RevocationState::verify).
    pub fn verify_with_policy(
        &self,
        params: &Parameters,
        message: &Message,
        policy: Option<&Policy>,
        sig: &Signature,
    ) -> bool {
        verify_signature(params, &self.point, message, policy, sig)
    }

    pub fn to_bytes(&self) -> [u8; PK_SIZE] {
        self.point.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8; PK_SIZE]) -> Result<Self, SchnorrError> {
        Self::try_from(Affine::from_bytes(bytes)?)
    }
}

impl TryFrom<Affine> for VerificationKey {
    type Error = SchnorrError;

    fn try_from(point: Affine) -> Result<Self, Self::Error> {
        if point.is_infinity() {
            return Err(SchnorrError::InvalidPoint);
        }
        Ok(Self { point })
    }
}

impl From<VerificationKey> for Affine {
    fn from(vk: VerificationKey) -> Self {
        vk.point
    }
}

/// A secret key together with its verification key.
#[derive(Clone, Debug)]
pub struct Keypair {
    secret_key: SecretKey,
    verification_key: VerificationKey,
}

impl Keypair {
    pub fn generate<R: Rng + CryptoRng + ?Sized>(params: &Parameters, rng: &mut R) -> Self {
        Self::from_secret_key(params, SecretKey::random(rng))
    }

    pub fn from_secret_key(params: &Parameters, secret_key: SecretKey) -> Self {
        let verification_key = secret_key.verification_key(params);
        Self {
            secret_key,
            verification_key,
        }
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn verification_key(&self) -> VerificationKey {
        self.verification_key
    }

    pub fn into_parts(self) -> (SecretKey, VerificationKey) {
        (self.secret_key, self.verification_key)
    }
}
