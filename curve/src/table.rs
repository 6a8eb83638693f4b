//! Precomputed multiples of a point, with a lookup whose memory access
//! pattern does not depend on the index.

use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::basefield::{from_words, to_words};
use crate::Affine;

/// The multiples `P, 2P, ..., N * P` of a point `P` other than the identity.
///
/// Every multiple below the group order is a regular point, so entries are
/// stored as coordinate words without an infinity flag.
pub(crate) struct PointTable<const N: usize> {
    points: [Affine; N],
    words: [[u32; 16]; N],
}

impl<const N: usize> PointTable<N> {
    pub(crate) fn new(point: &Affine) -> Self {
        debug_assert!(!point.is_infinity());

        let mut points = [*point; N];
        for i in 1..N {
            points[i] = points[i - 1] + *point;
        }

        let words = core::array::from_fn(|i| {
            let mut entry = [0u32; 16];
            entry[..8].copy_from_slice(&to_words(&points[i].x));
            entry[8..].copy_from_slice(&to_words(&points[i].y));
            entry
        });

        Self { points, words }
    }

    /// `multiple * P` for a public `multiple` in `1..=N`.
    #[inline]
    pub(crate) fn get(&self, multiple: usize) -> Affine {
        self.points[multiple - 1]
    }

    /// `multiple * P` for a secret `multiple` in `1..=N`.
    ///
    /// Reads every entry and keeps the matching one with a masked copy.
    pub(crate) fn select(&self, multiple: u32) -> Affine {
        let mut selected = [0u32; 16];
        for (i, entry) in self.words.iter().enumerate() {
            let hit = (i as u32 + 1).ct_eq(&multiple);
            for (word, candidate) in selected.iter_mut().zip(entry.iter()) {
                word.conditional_assign(candidate, hit);
            }
        }

        let mut x = [0u32; 8];
        let mut y = [0u32; 8];
        x.copy_from_slice(&selected[..8]);
        y.copy_from_slice(&selected[8..]);
        Affine::new(from_words(&x), from_words(&y))
    }
}
