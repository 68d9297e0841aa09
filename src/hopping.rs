//! The hopping table: one sparse matrix per lattice vector.
//!
//! A *reduced* table stores, for every pair $\\{\bm G,-\bm G\\}$, only the
//! canonical member (first non-zero coordinate positive), and at $\bm G=0$
//! half of the on-site block, so that
//! $$H(\bm k)=\sum_{\bm G} h(\bm G) e^{2\pi i\bm G\cdot\bm k}+\text{h.c.}$$
//! A *full* table stores both members of every pair.
use crate::error::{Result, TbError};
use crate::lattice::LatticeVector;
use crate::sparse::HoppingMatrix;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

#[derive(Debug, Clone)]
pub struct HoppingTable {
    size: usize,
    terms: BTreeMap<LatticeVector, HoppingMatrix>,
}

impl HoppingTable {
    /// An empty table for `size` orbitals.
    pub fn new(size: usize) -> Self {
        HoppingTable {
            size,
            terms: BTreeMap::new(),
        }
    }

    /// Wraps raw terms, checking that every matrix is `size × size`.
    pub fn from_terms(size: usize, terms: BTreeMap<LatticeVector, HoppingMatrix>) -> Result<Self> {
        for (g, h_mat) in terms.iter() {
            if h_mat.shape() != (size, size) {
                return Err(TbError::HoppingShape {
                    g: *g,
                    expected: (size, size),
                    found: h_mat.shape(),
                });
            }
        }
        Ok(HoppingTable { size, terms })
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored lattice vectors.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, g: &LatticeVector) -> Option<&HoppingMatrix> {
        self.terms.get(g)
    }

    /// Terms in lexicographic order of the lattice vector.
    pub fn iter(&self) -> impl Iterator<Item = (&LatticeVector, &HoppingMatrix)> + '_ {
        self.terms.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LatticeVector> + '_ {
        self.terms.keys()
    }

    /// The matrix stored at `g`, created as a `size × size` zero matrix if absent.
    pub fn entry_or_zeros(&mut self, g: LatticeVector) -> &mut HoppingMatrix {
        let size = self.size;
        self.terms
            .entry(g)
            .or_insert_with(|| HoppingMatrix::zeros((size, size)))
    }

    /// `h(g)[i, j] += t`.
    pub fn accumulate(&mut self, g: LatticeVector, i: usize, j: usize, t: Complex64) {
        self.entry_or_zeros(g).add_at(i, j, t);
    }

    /// `h(g) += h_mat`, inserting when absent.
    pub fn accumulate_matrix(&mut self, g: LatticeVector, h_mat: &HoppingMatrix) -> Result<()> {
        if h_mat.shape() != (self.size, self.size) {
            return Err(TbError::HoppingShape {
                g,
                expected: (self.size, self.size),
                found: h_mat.shape(),
            });
        }
        match self.terms.entry(g) {
            Entry::Vacant(slot) => {
                slot.insert(h_mat.clone());
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += h_mat;
            }
        }
        Ok(())
    }

    /// Moves every amplitude at $(\bm G,i,j)$ to
    /// $\bm G+\bm o_j-\bm o_i$, where $\bm o$ are the integer cell offsets of
    /// the orbitals. Collisions are summed.
    pub fn remap_offsets(&self, offsets: &[LatticeVector]) -> HoppingTable {
        debug_assert_eq!(offsets.len(), self.size);
        let mut new_hoppings = HoppingTable::new(self.size);
        for (g, hop_mat) in self.terms.iter() {
            for (i0, i1, t) in hop_mat.iter_nonzero() {
                let g_new = *g + offsets[i1] - offsets[i0];
                new_hoppings.accumulate(g_new, i0, i1, t);
            }
        }
        new_hoppings
    }

    /// Checks $h(\bm G)=h(-\bm G)^\dagger$ for every stored $\bm G$ of a full table.
    ///
    /// A partner that is not stored counts as a zero matrix.
    pub fn check_hermitian(&self, cc_tolerance: f64) -> Result<()> {
        for (g, hop) in self.terms.iter() {
            let deviation = match self.terms.get(&(-*g)) {
                Some(partner) => hop.distance(&partner.adjoint()),
                None => hop.norm(),
            };
            if !(deviation <= cc_tolerance) {
                return Err(TbError::NonHermitian {
                    g: *g,
                    deviation,
                    tolerance: cc_tolerance,
                });
            }
        }
        Ok(())
    }

    /// Full representation (with cc) to the reduced one: the zero term is
    /// halved, canonical terms are kept, their partners dropped.
    pub fn reduce(self) -> HoppingTable {
        let mut res = HoppingTable::new(self.size);
        for (g, hop) in self.terms.into_iter() {
            if g.is_zero() {
                res.terms.insert(g, &hop * 0.5);
            } else if g.is_canonical() {
                res.terms.insert(g, hop);
            }
        }
        res
    }

    /// Folds every non-canonical term into its partner as $h(\bm G)^\dagger$.
    /// The zero term is kept as it is.
    pub fn fold_positive(self) -> HoppingTable {
        let mut new_hoppings = HoppingTable::new(self.size);
        for (g, hop) in self.terms.into_iter() {
            if g.is_zero() || g.is_canonical() {
                *new_hoppings.entry_or_zeros(g) += &hop;
            } else {
                *new_hoppings.entry_or_zeros(-g) += &hop.adjoint();
            }
        }
        new_hoppings
    }

    /// Reduced table back to the full representation with cc.
    pub fn expand(&self) -> HoppingTable {
        let mut full = HoppingTable::new(self.size);
        for (g, hop) in self.terms.iter() {
            if g.is_zero() {
                full.terms.insert(*g, hop + &hop.adjoint());
            } else {
                *full.entry_or_zeros(*g) += hop;
                *full.entry_or_zeros(-*g) += &hop.adjoint();
            }
        }
        full
    }

    /// Applies `f` to every matrix, keeping the lattice vectors.
    pub fn map_matrices<F>(&self, mut f: F) -> HoppingTable
    where
        F: FnMut(&LatticeVector, &HoppingMatrix) -> HoppingMatrix,
    {
        HoppingTable {
            size: self.size,
            terms: self.terms.iter().map(|(g, hop)| (*g, f(g, hop))).collect(),
        }
    }
}

/// Missing lattice vectors and all-zero matrices are the same thing.
impl PartialEq for HoppingTable {
    fn eq(&self, other: &HoppingTable) -> bool {
        if self.size != other.size {
            return false;
        }
        let same = |a: &HoppingTable, b: &HoppingTable| {
            a.terms.iter().all(|(g, hop)| match b.terms.get(g) {
                Some(other_hop) => hop == other_hop,
                None => hop.is_zero(),
            })
        };
        same(self, other) && same(other, self)
    }
}

impl IntoIterator for HoppingTable {
    type Item = (LatticeVector, HoppingMatrix);
    type IntoIter = std::collections::btree_map::IntoIter<LatticeVector, HoppingMatrix>;
    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a HoppingTable {
    type Item = (&'a LatticeVector, &'a HoppingMatrix);
    type IntoIter = std::collections::btree_map::Iter<'a, LatticeVector, HoppingMatrix>;
    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
