//! Verifier-side revocation of signing tokens.

use std::collections::HashSet;

use curve::{SCALAR_SIZE, ScalarField};
use serde::{Deserialize, Serialize};

use crate::errors::SchnorrError;
use crate::keys::VerificationKey;
use crate::message::{Message, Policy};
use crate::params::Parameters;
use crate::signatures::Signature;

/// Public key of a token's revocation: the token tag `m0`.
///
/// Every signature made with the token carries the same tag as `theta.m0`,
/// so publishing it lets verifiers recognise that token's signatures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevocationKey(ScalarField);

impl RevocationKey {
    pub fn as_scalar(&self) -> &ScalarField {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self, SchnorrError> {
        Ok(Self(ScalarField::from_bytes(bytes)?))
    }
}

impl From<ScalarField> for RevocationKey {
    fn from(tag: ScalarField) -> Self {
        Self(tag)
    }
}

impl From<&Signature> for RevocationKey {
    fn from(sig: &Signature) -> Self {
        Self(sig.theta.m0)
    }
}

/// Token tags a verifier refuses to accept.
///
/// A tag enters the set when its issuer publishes the revocation key, or when
/// the verifier accepts a signature made with it. The second rule makes each
/// token acceptable once per verifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationState {
    tags: HashSet<RevocationKey>,
}

impl RevocationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one revocation key. Returns `false` if it was already present.
    pub fn revoke(&mut self, key: RevocationKey) -> bool {
        self.tags.insert(key)
    }

    pub fn revoke_all<I: IntoIterator<Item = RevocationKey>>(&mut self, keys: I) {
        self.tags.extend(keys);
    }

    pub fn is_revoked(&self, key: &RevocationKey) -> bool {
        self.tags.contains(key)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Verifies `sig` and, on success, marks its token as used.
    ///
    /// Returns `Err(RevokedToken)` without checking the signature when its tag
    /// is already recorded. An invalid signature is `Ok(false)` and leaves the
    /// state unchanged.
    pub fn verify(
        &mut self,
        params: &Parameters,
        vk: &VerificationKey,
        message: &Message,
        policy: Option<&Policy>,
        sig: &Signature,
    ) -> Result<bool, SchnorrError> {
        let key = RevocationKey::from(sig);
        if self.is_revoked(&key) {
            tracing::warn!(tag = %key.0, "rejected signature with revoked token");
            return Err(SchnorrError::RevokedToken);
        }

        let valid = vk.verify_with_policy(params, message, policy, sig);
        if valid {
            self.tags.insert(key);
        }
        Ok(valid)
    }
}
