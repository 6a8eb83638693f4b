//! Messages and the optional policy value bound into tokens.

use curve::{SCALAR_SIZE, ScalarField};
use serde::{Deserialize, Serialize};

use crate::errors::SchnorrError;
use crate::hash::hash_to_field;

/// A message to be signed, represented as a scalar.
///
/// Most callers build messages from bytes with [`Message::hash`]. A message
/// is deliberately not `Copy`: signing calls that take it by value consume it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message(ScalarField);

impl Message {
    /// Hashes application bytes into a message.
    pub fn hash(bytes: &[u8]) -> Self {
        Self(hash_to_field(bytes))
    }

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

impl From<ScalarField> for Message {
    fn from(scalar: ScalarField) -> Self {
        Self(scalar)
    }
}

/// Policy value an issuer binds into every token of a delegation.
///
/// The scheme attaches no meaning to the amount; it only guarantees that a
/// signature verifies under the policy its token was issued with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policy {
    pub amount: u64,
}

impl Policy {
    pub fn new(amount: u64) -> Self {
        Self { amount }
    }
}

/// Scalar committed to by the token challenge. No policy binds to zero.
pub(crate) fn policy_scalar(policy: Option<&Policy>) -> ScalarField {
    policy.map_or(ScalarField::ZERO, |p| ScalarField::from_canonical_u64(p.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_hash_matches_hash_to_field() {
        let bytes = [1u8, 2, 3, 255, 0];
        assert_eq!(Message::hash(&bytes).as_scalar(), &hash_to_field(&bytes));
        assert_ne!(Message::hash(b"a"), Message::hash(b"b"));
    }

    #[test]
    fn test_message_bytes_round_trip() {
        let message = Message::hash(b"transfer 10");
        assert_eq!(Message::from_bytes(&message.to_bytes()), Ok(message));
    }

    #[test]
    fn test_policy_scalar() {
        assert_eq!(policy_scalar(None), ScalarField::ZERO);
        assert_eq!(policy_scalar(Some(&Policy::new(0))), ScalarField::ZERO);
        assert_eq!(
            policy_scalar(Some(&Policy::new(500))),
            ScalarField::from_canonical_u64(500)
        );
    }
}
