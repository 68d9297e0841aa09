//! Integer lattice-translation vectors, the keys of the hopping table.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A translation by integer multiples of the three lattice vectors.
///
/// `G` and `-G` are partners, the zero vector is its own partner. The derived
/// ordering is lexicographic, which is also the order in which hopping tables
/// are iterated and printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LatticeVector(pub [isize; 3]);

impl LatticeVector {
    pub const ZERO: LatticeVector = LatticeVector([0, 0, 0]);

    pub fn new(g: [isize; 3]) -> Self {
        LatticeVector(g)
    }

    #[inline(always)]
    pub fn components(&self) -> [isize; 3] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0]
    }

    /// `true` if the first non-zero coordinate is positive.
    ///
    /// Of every pair `{G, -G}` with `G != 0` exactly one member is canonical,
    /// and only that one is stored in a reduced hopping table.
    pub fn is_canonical(&self) -> bool {
        match self.0.iter().find(|&&x| x != 0) {
            Some(&x) => x > 0,
            None => false,
        }
    }

    /// Dot product with a fractional reciprocal-space point.
    #[inline(always)]
    pub fn dot(&self, k: &[f64; 3]) -> f64 {
        self.0
            .iter()
            .zip(k.iter())
            .map(|(&g, &k)| g as f64 * k)
            .sum()
    }

    pub fn to_f64(&self) -> [f64; 3] {
        [self.0[0] as f64, self.0[1] as f64, self.0[2] as f64]
    }
}

impl From<[isize; 3]> for LatticeVector {
    fn from(g: [isize; 3]) -> Self {
        LatticeVector(g)
    }
}

impl From<(isize, isize, isize)> for LatticeVector {
    fn from(g: (isize, isize, isize)) -> Self {
        LatticeVector([g.0, g.1, g.2])
    }
}

impl From<LatticeVector> for [isize; 3] {
    fn from(g: LatticeVector) -> Self {
        g.0
    }
}

impl Neg for LatticeVector {
    type Output = LatticeVector;
    fn neg(self) -> LatticeVector {
        LatticeVector([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl Add for LatticeVector {
    type Output = LatticeVector;
    fn add(self, rhs: LatticeVector) -> LatticeVector {
        LatticeVector([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1], self.0[2] + rhs.0[2]])
    }
}

impl Sub for LatticeVector {
    type Output = LatticeVector;
    fn sub(self, rhs: LatticeVector) -> LatticeVector {
        self + (-rhs)
    }
}

impl fmt::Display for LatticeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}
