//! Delegatable Schnorr signatures with one-time signing tokens.
//!
//! This library implements a two-layer Schnorr construction using:
//! - The KoalaBear elliptic curve (Fp8 curve) from the `curve` crate
//! - Poseidon2-BabyBear for hashing into the scalar field and for all
//!   Fiat-Shamir challenges
//!
//! # Overview
//!
//! A key holder can sign messages directly, or issue a bounded number of
//! signing tokens to a delegate. Each token lets the delegate produce exactly
//! one signature that verifies under the key holder's verification key,
//! without the delegate ever learning the secret key. Every token comes with
//! a revocation key; verifiers that record it refuse signatures made with
//! that token.
//!
//! A signature carries the token challenge `c0`, the message proof
//! `(c1, z1)` and the binding pair `(m0, Z0)`. Direct signatures are made
//! through a fresh internal token, so both kinds look the same.
//!
//! # Example
//!
//! ```
//! use schnorr_tokens::{DelegationSpec, Keypair, Message, Parameters, RevocationState};
//!
//! let params = Parameters::setup();
//! let mut rng = rand::rng();
//! let keypair = Keypair::generate(&params, &mut rng);
//! let vk = keypair.verification_key();
//!
//! // Hand three tokens to a delegate, keep the revocation keys.
//! let delegation = keypair
//!     .secret_key()
//!     .delegate(&params, &DelegationSpec::new(3), &mut rng);
//! let (mut tokens, revocation_keys) = delegation.into_parts();
//!
//! let message = Message::hash(b"pay 10 to bob");
//! let sig = tokens.delegated_sign(&params, &message).unwrap();
//! assert!(vk.verify(&params, &message, &sig));
//!
//! // After revocation, a verifier rejects that token.
//! let mut state = RevocationState::new();
//! state.revoke_all(revocation_keys);
//! assert!(state.verify(&params, &vk, &message, None, &sig).is_err());
//! ```
//!
//! # Security Considerations
//!
//! - Use a cryptographically secure random number generator for keys and
//!   tokens
//! - A token must sign only one message: its nonce is fixed, so two
//!   signatures from copies of one token reveal the token secret `z0` (not
//!   the issuer key); revoke its tag
//! - Secret scalars only go through constant-time field arithmetic and
//!   fixed-window, full-table-scan scalar multiplication

pub mod api;
mod constants;
mod delegation;
mod errors;
mod hash;
mod keys;
mod message;
mod params;
mod revocation;
mod signatures;

#[cfg(test)]
mod tests;

pub use constants::{PK_SIZE, SIG_SIZE, SK_SIZE, TOKEN_SIZE};
pub use curve::{Affine, ScalarField};
pub use delegation::{DelegationInfo, DelegationResult, DelegationSpec, SigningToken};
pub use errors::SchnorrError;
pub use hash::hash_to_field;
pub use keys::{Keypair, SecretKey, VerificationKey};
pub use message::{Message, Policy};
pub use params::Parameters;
pub use revocation::{RevocationKey, RevocationState};
pub use signatures::{Sigma, Signature, Theta};
