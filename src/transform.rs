//! Lattice transformations that keep the physics: a change of unit cell and
//! the time-reversal doubling of the orbital basis.
use crate::error::{Result, TbError};
use crate::hopping::HoppingTable;
use crate::lattice::LatticeVector;
use crate::math::det3;
use crate::Model;
use ndarray::prelude::*;
use nalgebra::{Matrix3, Vector3};
use ndarray::Data;

impl Model {
    /// Re-expresses the model in a new unit cell of the same volume and
    /// chirality.
    ///
    /// The columns of `m` are the new lattice vectors in terms of the old ones,
    /// so `det(m)` must be exactly 1. Positions and lattice vectors are
    /// obtained by solving $M\bm x=\bm p$ and $M\bm x=\bm G$; positions that
    /// leave the home cell are mapped back by [`Model::new`].
    pub fn change_uc<S: Data<Elem = isize>>(&self, m: &ArrayBase<S, Ix2>) -> Result<Model> {
        if m.dim() != (3, 3) {
            return Err(TbError::DimensionMismatch {
                context: "unit-cell transformation must be 3x3, number of entries".to_string(),
                expected: 9,
                found: m.len(),
            });
        }
        let det = det3(m);
        if det != 1 {
            return Err(TbError::InvalidDeterminant(det));
        }
        let m_f = m.mapv(|x| x as f64);
        let lu = Matrix3::from_fn(|i, j| m_f[[i, j]]).lu();
        let solve = |b: [f64; 3]| {
            lu.solve(&Vector3::new(b[0], b[1], b[2]))
                .map(|x| [x[0], x[1], x[2]])
                .ok_or(TbError::InvalidDeterminant(det))
        };

        let new_uc = self.uc.as_ref().map(|uc| uc.dot(&m_f));

        let mut new_pos = Array2::<f64>::zeros((self.size, 3));
        for (i, p) in self.pos.outer_iter().enumerate() {
            let x = solve([p[0], p[1], p[2]])?;
            new_pos.row_mut(i).assign(&arr1(&x));
        }

        let mut new_hoppings = HoppingTable::new(self.size);
        for (g, hop) in self.hoppings.iter() {
            let x = solve(g.to_f64())?;
            let new_g = LatticeVector::new([x[0].round() as isize, x[1].round() as isize, x[2].round() as isize]);
            new_hoppings.accumulate_matrix(new_g, hop)?;
        }
        Model::rebuild(new_hoppings, new_pos, self.occ, new_uc)
    }

    /// Adds the time-reversal image of every orbital.
    ///
    /// The result has twice the orbitals, positions `[pos; pos]` and twice
    /// the occupation. Each stored block becomes
    /// $\mathrm{diag}(h(\bm G), h(\bm G)^*)$ with the element-wise conjugate,
    /// keeping $\bm G$ fixed.
    pub fn trs(&self) -> Result<Model> {
        let n = self.size;
        let new_occ = self.occ.map(|occ| 2 * occ);
        let new_pos = Array2::from_shape_fn((2 * n, 3), |(i, j)| self.pos[[i % n, j]]);
        let mut new_hoppings = HoppingTable::new(2 * n);
        for (g, hop) in self.hoppings.iter() {
            let block = new_hoppings.entry_or_zeros(*g);
            for (i, j, t) in hop.iter_nonzero() {
                block.add_at(i, j, t);
                block.add_at(n + i, n + j, t.conj());
            }
        }
        Model::rebuild(new_hoppings, new_pos, new_occ, self.uc.clone())
    }
}
