//! Scalar field of the curve. q = 0xf06e44682c2aa440f5f26a5ae1748ff85ccc2efc3068faf2154ff8a2e94d81
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order. The
//! external encoding is the canonical (non-Montgomery) value as 32
//! little-endian bytes.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_bigint::BigUint;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::group::ScalarBits;
use crate::CurveError;

/// Size of an encoded scalar in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Scalar field element for the curve, in Montgomery form.
///
/// Arithmetic and equality run in time independent of the values involved.
/// Inversion, encoding checks and `is_zero` may branch on their input.
#[derive(Copy, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 32]", into = "[u8; 32]")]
pub struct ScalarField {
    /// Montgomery form: value * R mod q, where R = 2^256
    limbs: [u64; 4],
}

// q = 0xf06e44682c2aa440f5f26a5ae1748ff85ccc2efc3068faf2154ff8a2e94d81
const MODULUS: [u64; 4] = [
    0xf2154ff8a2e94d81,
    0xf85ccc2efc3068fa,
    0x40f5f26a5ae1748f,
    0x00f06e44682c2aa4,
];

// R = 2^256 mod q
const R: [u64; 4] = [
    0xc95b07d2e81da6f0,
    0x1d670e140c90755e,
    0xfaae6eff70742708,
    0x008ad7515112b17a,
];

// R^2 = 2^512 mod q
const R2: [u64; 4] = [
    0x23eabb3eaf3c12e3,
    0xefbc3b2088f7b0f7,
    0x0943bc9a31f37148,
    0x004497b874228e49,
];

// -q^-1 mod 2^64
const MU: u64 = 0x921d21f874d30d7f;

impl ScalarField {
    /// The additive identity.
    pub const ZERO: Self = ScalarField {
        limbs: [0, 0, 0, 0],
    };

    /// The multiplicative identity, stored as `R mod q`.
    pub const ONE: Self = ScalarField { limbs: R };

    /// Embeds a `u64`.
    #[inline]
    pub fn from_canonical_u64(val: u64) -> Self {
        // val * R^2 * R^-1 = val * R
        let result = ScalarField {
            limbs: [val, 0, 0, 0],
        };
        montgomery_mul(result, ScalarField { limbs: R2 })
    }

    /// Canonical little-endian limbs, out of Montgomery form.
    #[inline]
    pub fn to_canonical_u64_vec(&self) -> [u64; 4] {
        let one = ScalarField {
            limbs: [1, 0, 0, 0],
        };
        montgomery_mul(*self, one).limbs
    }

    /// Build an element from canonical little-endian limbs.
    ///
    /// The limbs must already be reduced below the modulus.
    #[inline]
    fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
        montgomery_mul(ScalarField { limbs }, ScalarField { limbs: R2 })
    }

    /// Canonical 32-byte little-endian encoding.
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        let canonical = self.to_canonical_u64_vec();
        let mut bytes = [0u8; SCALAR_SIZE];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(canonical.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    /// Decode a canonical encoding, rejecting integers `>= q`.
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self, CurveError> {
        let limbs = limbs_from_le_bytes(bytes);
        if is_canonical(limbs) {
            Ok(Self::from_canonical_limbs(limbs))
        } else {
            Err(CurveError::InvalidEncoding)
        }
    }

    /// Decode from a slice, which must be exactly [`SCALAR_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CurveError> {
        let array: &[u8; SCALAR_SIZE] = bytes.try_into().map_err(|_| CurveError::InvalidEncoding)?;
        Self::from_bytes(array)
    }

    /// Reduce an arbitrary little-endian integer modulo `q`.
    ///
    /// With 64 input bytes the statistical distance from uniform is below
    /// `2^-256`, which is what hashing into the field relies on.
    pub fn from_bytes_wide(bytes: &[u8; 2 * SCALAR_SIZE]) -> Self {
        Self::from_biguint(&BigUint::from_bytes_le(bytes))
    }

    /// Reduce an arbitrary integer modulo `q`.
    pub fn from_biguint(value: &BigUint) -> Self {
        let reduced = value % Self::order();
        let mut bytes = [0u8; SCALAR_SIZE];
        let digits = reduced.to_bytes_le();
        bytes[..digits.len()].copy_from_slice(&digits);
        Self::from_canonical_limbs(limbs_from_le_bytes(&bytes))
    }

    /// The field modulus `q`, which is also the order of the curve group.
    pub fn order() -> BigUint {
        let mut bytes = [0u8; SCALAR_SIZE];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(MODULUS.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        BigUint::from_bytes_le(&bytes)
    }

    /// Recodes the scalar into `N` digits of `W` bits, each in `1..=2^W`,
    /// whose value `sum(d_i * 2^(W * i))` is `k + 3q`.
    ///
    /// No digit is zero, so a fixed-window ladder over these digits performs
    /// one table lookup and one addition per window whatever the scalar is.
    /// The top digit is 2 or 3, which keeps the first ladder addition away
    /// from the doubling case. Valid for `(W, N)` of `(8, 32)` and `(4, 63)`.
    pub(crate) fn window_digits<const W: u32, const N: usize>(&self) -> [u32; N] {
        debug_assert!(64 % W == 0 && W as usize * N <= 256);

        let offset = recoding_offset(W, N);
        let k = self.to_canonical_u64_vec();
        let (r0, carry) = k[0].overflowing_add(offset[0]);
        let (r1, carry) = carrying_add(k[1], offset[1], carry);
        let (r2, carry) = carrying_add(k[2], offset[2], carry);
        let (r3, _) = carrying_add(k[3], offset[3], carry);
        let shifted = [r0, r1, r2, r3];

        let mask = (1u64 << W) - 1;
        core::array::from_fn(|i| {
            let bit = W as usize * i;
            ((shifted[bit / 64] >> (bit % 64)) & mask) as u32 + 1
        })
    }
}

#[inline]
fn limbs_from_le_bytes(bytes: &[u8; SCALAR_SIZE]) -> [u64; 4] {
    core::array::from_fn(|i| {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(&bytes[8 * i..8 * i + 8]);
        u64::from_le_bytes(limb)
    })
}

/// `flag ? a : b` over limbs, without branching. `flag` is 0 or 1.
#[inline]
const fn select_limbs(flag: u64, a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let mask = 0u64.wrapping_sub(flag);
    [
        (a[0] & mask) | (b[0] & !mask),
        (a[1] & mask) | (b[1] & !mask),
        (a[2] & mask) | (b[2] & !mask),
        (a[3] & mask) | (b[3] & !mask),
    ]
}

/// `a + b mod q` for reduced inputs.
#[inline]
const fn add_mod(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let (r0, carry) = a[0].overflowing_add(b[0]);
    let (r1, carry) = carrying_add(a[1], b[1], carry);
    let (r2, carry) = carrying_add(a[2], b[2], carry);
    let (r3, carry) = carrying_add(a[3], b[3], carry);

    let (s0, borrow) = r0.overflowing_sub(MODULUS[0]);
    let (s1, borrow) = borrowing_sub(r1, MODULUS[1], borrow);
    let (s2, borrow) = borrowing_sub(r2, MODULUS[2], borrow);
    let (s3, borrow) = borrowing_sub(r3, MODULUS[3], borrow);

    select_limbs((carry | !borrow) as u64, [s0, s1, s2, s3], [r0, r1, r2, r3])
}

/// `a - b mod q` for reduced inputs.
#[inline]
const fn sub_mod(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let (r0, borrow) = a[0].overflowing_sub(b[0]);
    let (r1, borrow) = borrowing_sub(a[1], b[1], borrow);
    let (r2, borrow) = borrowing_sub(a[2], b[2], borrow);
    let (r3, borrow) = borrowing_sub(a[3], b[3], borrow);

    // q is added back only on underflow
    let q = select_limbs(borrow as u64, MODULUS, [0; 4]);
    let (r0, carry) = r0.overflowing_add(q[0]);
    let (r1, carry) = carrying_add(r1, q[1], carry);
    let (r2, carry) = carrying_add(r2, q[2], carry);
    let (r3, _) = carrying_add(r3, q[3], carry);
    [r0, r1, r2, r3]
}

/// `-a mod q`; zero maps to zero.
#[inline]
const fn neg_mod(a: [u64; 4]) -> [u64; 4] {
    sub_mod([0; 4], a)
}

#[inline]
const fn is_canonical(limbs: [u64; 4]) -> bool {
    let (_, borrow) = limbs[0].overflowing_sub(MODULUS[0]);
    let (_, borrow) = borrowing_sub(limbs[1], MODULUS[1], borrow);
    let (_, borrow) = borrowing_sub(limbs[2], MODULUS[2], borrow);
    let (_, borrow) = borrowing_sub(limbs[3], MODULUS[3], borrow);
    borrow
}

#[inline]
const fn carrying_add(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (sum, overflow1) = a.overflowing_add(b);
    let (sum, overflow2) = sum.overflowing_add(carry as u64);
    (sum, overflow1 | overflow2)
}

#[inline]
const fn borrowing_sub(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (diff, overflow1) = a.overflowing_sub(b);
    let (diff, overflow2) = diff.overflowing_sub(borrow as u64);
    (diff, overflow1 | overflow2)
}

/// `3q - sum(2^(width * i))` over `i < count`.
///
/// Adding this to a reduced scalar `k` and reading `width`-bit digits plus one
/// gives `count` digits in `1..=2^width` whose value is `k + 3q`.
const fn recoding_offset(width: u32, count: usize) -> [u64; 4] {
    let mut ones = [0u64; 4];
    let mut i = 0;
    while i < count {
        let bit = width as usize * i;
        ones[bit / 64] |= 1u64 << (bit % 64);
        i += 1;
    }

    let (d0, carry) = MODULUS[0].overflowing_add(MODULUS[0]);
    let (d1, carry) = carrying_add(MODULUS[1], MODULUS[1], carry);
    let (d2, carry) = carrying_add(MODULUS[2], MODULUS[2], carry);
    let (d3, _) = carrying_add(MODULUS[3], MODULUS[3], carry);
    let (d0, carry) = d0.overflowing_add(MODULUS[0]);
    let (d1, carry) = carrying_add(d1, MODULUS[1], carry);
    let (d2, carry) = carrying_add(d2, MODULUS[2], carry);
    let (d3, _) = carrying_add(d3, MODULUS[3], carry);

    let (r0, borrow) = d0.overflowing_sub(ones[0]);
    let (r1, borrow) = borrowing_sub(d1, ones[1], borrow);
    let (r2, borrow) = borrowing_sub(d2, ones[2], borrow);
    let (r3, _) = borrowing_sub(d3, ones[3], borrow);
    [r0, r1, r2, r3]
}

/// `a * b * R^-1 mod q`.
#[inline]
fn montgomery_mul(a: ScalarField, b: ScalarField) -> ScalarField {
    let mut t = [0u64; 8];

    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let product = (a.limbs[i] as u128) * (b.limbs[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }
        t[i + 4] = carry as u64;
    }

    // reduce
    for i in 0..4 {
        let k = t[i].wrapping_mul(MU);
        let mut carry = 0u128;

        for j in 0..4 {
            let product = (k as u128) * (MODULUS[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }

        for j in 4..8 - i {
            let sum = (t[i + j] as u128) + carry;
            t[i + j] = sum as u64;
            carry = sum >> 64;
        }
    }

    // High half is below 2q; subtract q once unless that underflows.
    let result = [t[4], t[5], t[6], t[7]];
    let (s0, borrow) = result[0].overflowing_sub(MODULUS[0]);
    let (s1, borrow) = borrowing_sub(result[1], MODULUS[1], borrow);
    let (s2, borrow) = borrowing_sub(result[2], MODULUS[2], borrow);
    let (s3, borrow) = borrowing_sub(result[3], MODULUS[3], borrow);

    ScalarField {
        limbs: select_limbs(borrow as u64, result, [s0, s1, s2, s3]),
    }
}

impl Distribution<ScalarField> for StandardUniform {
    /// Rejection sampling over 248-bit integers; accepts with probability ~0.94.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScalarField {
        loop {
            let mut bytes: [u8; SCALAR_SIZE] = rng.random();
            bytes[31] = 0;

            let limbs = limbs_from_le_bytes(&bytes);
            if is_canonical(limbs) {
                return ScalarField::from_canonical_limbs(limbs);
            }
        }
    }
}

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_u64_vec()
    }
}

impl TryFrom<[u8; SCALAR_SIZE]> for ScalarField {
    type Error = CurveError;

    fn try_from(bytes: [u8; SCALAR_SIZE]) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<ScalarField> for [u8; SCALAR_SIZE] {
    fn from(scalar: ScalarField) -> Self {
        scalar.to_bytes()
    }
}

impl From<u64> for ScalarField {
    fn from(val: u64) -> Self {
        Self::from_canonical_u64(val)
    }
}

impl Zeroize for ScalarField {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

impl ConstantTimeEq for ScalarField {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}

impl ConditionallySelectable for ScalarField {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ScalarField {
            limbs: core::array::from_fn(|i| {
                u64::conditional_select(&a.limbs[i], &b.limbs[i], choice)
            }),
        }
    }
}

impl PartialEq for ScalarField {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Add for ScalarField {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        ScalarField {
            limbs: add_mod(self.limbs, rhs.limbs),
        }
    }
}

impl AddAssign for ScalarField {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ScalarField {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        ScalarField {
            limbs: sub_mod(self.limbs, rhs.limbs),
        }
    }
}

impl SubAssign for ScalarField {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for ScalarField {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        ScalarField {
            limbs: neg_mod(self.limbs),
        }
    }
}

impl Mul for ScalarField {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        montgomery_mul(self, rhs)
    }
}

impl MulAssign for ScalarField {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for ScalarField {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for ScalarField {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl Display for ScalarField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let canonical = self.to_canonical_u64_vec();
        write!(
            f,
            "0x{:016x}{:016x}{:016x}{:016x}",
            canonical[3], canonical[2], canonical[1], canonical[0]
        )
    }
}

impl Debug for ScalarField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarField({})", self)
    }
}

impl Hash for ScalarField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs.hash(state);
    }
}

impl ScalarField {
    /// Multiplicative inverse `a^(q-2)`, failing on zero.
    pub fn invert(&self) -> Result<Self, CurveError> {
        if self.is_zero() {
            return Err(CurveError::DivisionByZero);
        }
        let exp = sub_mod(MODULUS, [2, 0, 0, 0]);
        Ok(self.pow(exp))
    }

    /// Square-and-multiply. The exponent is public; the base may be secret.
    fn pow(&self, exp: [u64; 4]) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        for &limb in exp.iter() {
            let mut remaining = limb;
            for _ in 0..64 {
                if remaining & 1 == 1 {
                    result *= base;
                }
                base = base * base;
                remaining >>= 1;
            }
        }

        result
    }

    /// Whether this is the zero element.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs == [0, 0, 0, 0]
    }
}
