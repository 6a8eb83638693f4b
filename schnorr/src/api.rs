//! Free-function interface.
//!
//! Each call takes its inputs by value where the caller is expected to hand
//! them over, so reusing a moved parameter set, key or message is a compile
//! error. Randomness comes from the thread-local generator.

use curve::ScalarField;

use crate::delegation::{DelegationInfo, DelegationResult, DelegationSpec};
use crate::errors::SchnorrError;
use crate::keys::{Keypair, SecretKey, VerificationKey};
use crate::message::{Message, Policy};
use crate::params::Parameters;
use crate::revocation::{RevocationKey, RevocationState};
use crate::signatures::Signature;

pub fn setup() -> Parameters {
    Parameters::setup()
}

pub fn keygen(params: Parameters) -> Keypair {
    Keypair::generate(&params, &mut rand::rng())
}

pub fn get_pk(keypair: Keypair) -> VerificationKey {
    keypair.verification_key()
}

pub fn hash_to_field(bytes: &[u8]) -> ScalarField {
    crate::hash::hash_to_field(bytes)
}

pub fn sign(params: Parameters, sk: SecretKey, message: Message, policy: Option<Policy>) -> Signature {
    sk.sign(&params, &message, policy.as_ref(), &mut rand::rng())
}

/// Issues `number_of_tokens` unrestricted tokens. Zero yields an empty result.
pub fn delegate(params: Parameters, sk: SecretKey, number_of_tokens: u64) -> DelegationResult {
    let spec = DelegationSpec::new(number_of_tokens);
    sk.delegate(&params, &spec, &mut rand::rng())
}

/// Signs with the next unused token of `tokens`, removing it from the pool.
pub fn delegated_sign(
    params: Parameters,
    tokens: &mut DelegationInfo,
    message: Message,
) -> Result<Signature, SchnorrError> {
    tokens.delegated_sign(&params, &message)
}

/// Verifies `sig` on `message` against the policy its token was issued with.
pub fn verify(
    params: &Parameters,
    vk: &VerificationKey,
    message: &Message,
    policy: Option<&Policy>,
    sig: &Signature,
) -> bool {
    vk.verify_with_policy(params, message, policy, sig)
}

/// Records published revocation keys in a verifier's state.
pub fn revoke(state: &mut RevocationState, keys: &[RevocationKey]) {
    state.revoke_all(keys.iter().copied());
}
