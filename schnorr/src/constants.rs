//! Constants used by the token signature scheme.

use curve::{POINT_SIZE, SCALAR_SIZE};

/// Size of a serialized public verification key in bytes.
///
/// A verification key is a point on the KoalaBear curve (Fp8 extension),
/// encoded as two 32-byte coordinates.
pub const PK_SIZE: usize = POINT_SIZE;

/// Size of a serialized secret signing key in bytes.
pub const SK_SIZE: usize = SCALAR_SIZE;

/// Size of a serialized signature in bytes.
///
/// A signature consists of:
/// - the scalars `c0`, `c1`, `z1` and `m0` (32 bytes each)
/// - the point `Z0` (64 bytes)
///
/// Total: 192 bytes
pub const SIG_SIZE: usize = 4 * SCALAR_SIZE + POINT_SIZE;

/// Size of a serialized signing token: the scalars `z0`, `c0`, `m0`.
pub const TOKEN_SIZE: usize = 3 * SCALAR_SIZE;

/// Width parameter for the Poseidon2 permutation.
pub(crate) const POSEIDON2_WIDTH: usize = 16;

/// Rate parameter for the Poseidon2 sponge.
pub(crate) const POSEIDON2_RATE: usize = 8;

/// Output size for the Poseidon2 hash.
pub(crate) const POSEIDON2_OUT: usize = 8;

/// Number of independent sponge outputs combined before reducing into the
/// scalar field. Two blocks give ~495 bits for a 248-bit modulus.
pub(crate) const HASH_BLOCKS: u32 = 2;

/// Bytes packed into one BabyBear element. 24 bits always fit below the modulus.
pub(crate) const BYTES_PER_ELEMENT: usize = 3;

/// Domain for hashing application messages into scalars.
pub(crate) const MESSAGE_DOMAIN: &[u8] = b"schnorr-tokens/v1/message";

/// Domain for the challenge binding a token to the issuer key and policy.
pub(crate) const TOKEN_CHALLENGE_DOMAIN: &[u8] = b"schnorr-tokens/v1/token-challenge";

/// Domain for the challenge binding a message to a token key.
pub(crate) const MESSAGE_CHALLENGE_DOMAIN: &[u8] = b"schnorr-tokens/v1/message-challenge";

/// Domain for the nonce a token commits to for its single signature.
pub(crate) const TOKEN_NONCE_DOMAIN: &[u8] = b"schnorr-tokens/v1/token-nonce";
