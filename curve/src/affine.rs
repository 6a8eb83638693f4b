// E(GF((2130706433)^8)) : y^2 = x^3 + 3u*x + 42639
// E generator point (from SSWU on 'ZKM2'): (1195559694*u^7 + 1368232771*u^6 + 438909494*u^5 + 1825476283*u^4 + 1299273209*u^3 + 2115217807*u^2 + 1763905369*u + 1813646457 : 2077084094*u^7 + 434578416*u^6 + 125328769*u^5 + 1286889583*u^4 + 655051022*u^3 + 1365273355*u^2 + 840779000*u + 376996212 : 1)
// Curve prime order: 424804331891979973455971894938199991855800421968298112348210302325367590273 (248 bits)
// Curve prime order (hex): 0xf06e44682c2aa440f5f26a5ae1748ff85ccc2efc3068faf2154ff8a2e94d81
// Curve cofactor: 1
// Curve security (Pollard-Rho): 123.78

use crate::basefield::{self, from_coeffs, BaseField, BASE_FIELD_SIZE};
use crate::table::PointTable;
use crate::{double_scalar_mul_basepoint_affine, mul_generator_affine, CurveError, Group, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use p3_field::{Field, PrimeCharacteristicRing};
use p3_koala_bear::KoalaBear;
use serde::{Deserialize, Serialize};

/// Size of an encoded point: `x || y`, each a [`BASE_FIELD_SIZE`] encoding.
pub const POINT_SIZE: usize = 2 * BASE_FIELD_SIZE;

/// Affine point on the curve, or the point at infinity.
///
/// Serialized through its canonical byte encoding, so deserialization
/// performs the same on-curve check as [`Affine::from_bytes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedPoint", into = "EncodedPoint")]
pub struct Affine {
    pub x: BaseField,
    pub y: BaseField,
    /// Set for the identity, whose coordinates are ignored.
    pub is_infinity: bool,
}

/// Wire form of a point for serde.
#[derive(Serialize, Deserialize)]
struct EncodedPoint {
    x: [u8; BASE_FIELD_SIZE],
    y: [u8; BASE_FIELD_SIZE],
}

impl Affine {
    /// Coefficient `a = 3u`, with `u` the extension generator.
    #[inline]
    fn curve_a() -> BaseField {
        let zero = KoalaBear::ZERO;
        let three = KoalaBear::new(3);
        from_coeffs([zero, three, zero, zero, zero, zero, zero, zero])
    }

    /// Coefficient `b = 42639`.
    #[inline]
    fn curve_b() -> BaseField {
        let zero = KoalaBear::ZERO;
        let b = KoalaBear::new(42639);
        from_coeffs([b, zero, zero, zero, zero, zero, zero, zero])
    }

    /// The point at infinity, the group identity.
    pub const INFINITY: Self = Affine {
        x: BaseField::ZERO,
        y: BaseField::ZERO,
        is_infinity: true,
    };

    /// Create a new affine point without checking the curve equation.
    pub fn new(x: BaseField, y: BaseField) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    /// Whether this is the identity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Whether `y^2 = x^3 + a*x + b` holds.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }

        let y2 = self.y * self.y;
        let x2 = self.x * self.x;
        let x3 = x2 * self.x;
        let ax = Self::curve_a() * self.x;
        let rhs = x3 + ax + Self::curve_b();

        y2 == rhs
    }

    /// Generator point from SSWU on 'ZKM2'.
    pub fn generator() -> Self {
        let x = from_coeffs([
            KoalaBear::new(1813646457),
            KoalaBear::new(1763905369),
            KoalaBear::new(2115217807),
            KoalaBear::new(1299273209),
            KoalaBear::new(1825476283),
            KoalaBear::new(438909494),
            KoalaBear::new(1368232771),
            KoalaBear::new(1195559694),
        ]);

        let y = from_coeffs([
            KoalaBear::new(376996212),
            KoalaBear::new(840779000),
            KoalaBear::new(1365273355),
            KoalaBear::new(655051022),
            KoalaBear::new(1286889583),
            KoalaBear::new(125328769),
            KoalaBear::new(434578416),
            KoalaBear::new(2077084094),
        ]);

        Affine::new(x, y)
    }

    /// `2P`.
    pub fn double(&self) -> Self {
        if self.is_infinity {
            return *self;
        }

        if self.y.is_zero() {
            return Self::INFINITY;
        }

        // λ = (3x^2 + a) / (2y)
        let x2 = self.x * self.x;
        let three_x2 = x2 + x2 + x2;
        let numerator = three_x2 + Self::curve_a();
        let denominator = self.y + self.y;
        let lambda = numerator / denominator;

        // x_r = λ^2 - 2x
        let lambda2 = lambda * lambda;
        let x_r = lambda2 - self.x - self.x;

        // y_r = λ(x - x_r) - y
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }

    /// `-P`.
    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Affine::new(self.x, -self.y)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator_affine(scalar)
    }

    /// `scalar * self` for a secret scalar.
    ///
    /// Same ladder as [`mul_generator_affine`] with 4-bit windows over a
    /// 16-entry table built for this point.
    pub fn mul_secret(&self, scalar: &ScalarField) -> Self {
        if self.is_infinity {
            return Self::INFINITY;
        }

        let table = PointTable::<16>::new(self);
        let digits = scalar.window_digits::<4, 63>();

        let mut result = table.select(digits[62]);
        for &digit in digits[..62].iter().rev() {
            for _ in 0..4 {
                result = result.double();
            }
            result += table.select(digit);
        }

        result
    }

    /// Compute a * G + b * P, where G is the fixed generator.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        double_scalar_mul_basepoint_affine(a, b, point)
    }

    /// Encoding of the x-coordinate; all zero for the identity.
    pub fn x_bytes(&self) -> [u8; BASE_FIELD_SIZE] {
        basefield::to_bytes(&self.x)
    }

    /// Encoding of the y-coordinate; all zero for the identity.
    pub fn y_bytes(&self) -> [u8; BASE_FIELD_SIZE] {
        basefield::to_bytes(&self.y)
    }

    /// Canonical encoding `x || y`. The identity encodes as all zero bytes,
    /// which is unambiguous because `(0, 0)` is not on the curve.
    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        let mut out = [0u8; POINT_SIZE];
        if !self.is_infinity {
            out[..BASE_FIELD_SIZE].copy_from_slice(&self.x_bytes());
            out[BASE_FIELD_SIZE..].copy_from_slice(&self.y_bytes());
        }
        out
    }

    /// Decode a point from its two coordinate encodings.
    pub fn from_coordinates(
        x: &[u8; BASE_FIELD_SIZE],
        y: &[u8; BASE_FIELD_SIZE],
    ) -> Result<Self, CurveError> {
        if x.iter().chain(y.iter()).all(|&b| b == 0) {
            return Ok(Self::INFINITY);
        }

        let point = Affine::new(basefield::from_bytes(x)?, basefield::from_bytes(y)?);
        if !point.is_on_curve() {
            return Err(CurveError::PointNotOnCurve);
        }
        Ok(point)
    }

    /// Decode the encoding produced by [`Affine::to_bytes`].
    pub fn from_bytes(bytes: &[u8; POINT_SIZE]) -> Result<Self, CurveError> {
        let mut x = [0u8; BASE_FIELD_SIZE];
        let mut y = [0u8; BASE_FIELD_SIZE];
        x.copy_from_slice(&bytes[..BASE_FIELD_SIZE]);
        y.copy_from_slice(&bytes[BASE_FIELD_SIZE..]);
        Self::from_coordinates(&x, &y)
    }

    /// Decode from a slice, which must be exactly [`POINT_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CurveError> {
        let array: &[u8; POINT_SIZE] = bytes.try_into().map_err(|_| CurveError::InvalidEncoding)?;
        Self::from_bytes(array)
    }
}

impl TryFrom<EncodedPoint> for Affine {
    type Error = CurveError;

    fn try_from(encoded: EncodedPoint) -> Result<Self, Self::Error> {
        Affine::from_coordinates(&encoded.x, &encoded.y)
    }
}

impl From<Affine> for EncodedPoint {
    fn from(point: Affine) -> Self {
        if point.is_infinity {
            return EncodedPoint {
                x: [0u8; BASE_FIELD_SIZE],
                y: [0u8; BASE_FIELD_SIZE],
            };
        }
        EncodedPoint {
            x: point.x_bytes(),
            y: point.y_bytes(),
        }
    }
}

impl Group for Affine {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity
    }

    #[inline]
    fn generator() -> Self {
        Affine::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Affine::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

impl Add for Affine {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity {
            return other;
        }
        if other.is_infinity {
            return self;
        }

        // P + P doubles, P + (-P) is the identity
        if self.x == other.x {
            if self.y == other.y {
                return self.double();
            }
            return Self::INFINITY;
        }

        // λ = (y2 - y1) / (x2 - x1)
        let numerator = other.y - self.y;
        let denominator = other.x - self.x;
        let lambda = numerator / denominator;

        // x_r = λ^2 - x1 - x2
        let lambda2 = lambda * lambda;
        let x_r = lambda2 - self.x - other.x;

        // y_r = λ(x1 - x_r) - y1
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }
}

impl AddAssign for Affine {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Affine {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Affine {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Affine {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

/// Windowed multiplication for public scalars; see [`Affine::mul_secret`].
impl Mul<ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, scalar)
    }
}

impl Mul<Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: Affine) -> Affine {
        <Affine as Group>::scalar_mul_windowed(&point, &self)
    }
}
