//! Basic functions of a tight-binding model: construction, the Bloch
//! Hamiltonian and its eigenvalues.
use crate::config::ModelConfig;
use crate::eigen::{EigenSolver, EigenVal, NalgebraSolver};
use crate::error::{Result, TbError};
use crate::hopping::HoppingTable;
use crate::lattice::LatticeVector;
use crate::sparse::HoppingMatrix;
use crate::Model;
use log::debug;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::f64::consts::PI;

impl Model {
    /// Builds a model from hopping matrices keyed by lattice vector.
    ///
    /// The hoppings are converted to sparse matrices, the orbital positions
    /// are mapped into the home unit cell (re-keying the hoppings of the
    /// orbitals that moved), and the table is brought to the reduced form:
    ///
    /// - with `config.contains_cc` the input must hold both $h(\bm G)$ and
    ///   $h(-\bm G)=h(\bm G)^\dagger$ (checked within `config.cc_tolerance`),
    ///   the on-site block is halved and the non-canonical half dropped;
    /// - without it every non-canonical term is folded onto its partner as
    ///   $h(\bm G)^\dagger$ and the $\bm G=0$ block is stored as given.
    ///
    /// ```
    /// use ndarray::array;
    /// use tbmodels::{Model, ModelConfig};
    ///
    /// let model = Model::new(
    ///     vec![
    ///         ([0isize, 0, 0], array![[1.0, 0.0], [0.0, -1.0]]),
    ///         ([1, 0, 0], array![[0.0, 0.5], [0.0, 0.0]]),
    ///         ([-1, 0, 0], array![[0.0, 0.0], [0.5, 0.0]]),
    ///     ],
    ///     ModelConfig { occ: Some(1), ..Default::default() },
    /// )
    /// .unwrap();
    /// assert_eq!(model.size(), 2);
    /// assert_eq!(model.hoppings().len(), 2);
    /// ```
    pub fn new<I, K, M>(hoppings: I, config: ModelConfig) -> Result<Model>
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<LatticeVector>,
        M: Into<HoppingMatrix>,
    {
        let ModelConfig {
            size,
            occ,
            pos,
            uc,
            contains_cc,
            cc_tolerance,
        } = config;

        // ---- HOPPING TERMS ----
        let mut raw: BTreeMap<LatticeVector, HoppingMatrix> = BTreeMap::new();
        for (g, h_mat) in hoppings {
            let h_mat: HoppingMatrix = h_mat.into();
            match raw.entry(g.into()) {
                Entry::Vacant(slot) => {
                    slot.insert(h_mat);
                }
                Entry::Occupied(mut slot) => slot.get_mut().try_add_assign(&h_mat)?,
            }
        }

        // ---- SIZE ----
        let size = match size {
            Some(size) => size,
            None => raw.values().next().map(|h| h.nrows()).ok_or(TbError::UnknownSize)?,
        };
        if size == 0 {
            return Err(TbError::EmptyModel);
        }
        let hoppings = HoppingTable::from_terms(size, raw)?;

        // ---- POSITIONS ----
        let (pos, hoppings) = match pos {
            None => (Array2::<f64>::zeros((size, 3)), hoppings),
            Some(pos) => {
                if pos.nrows() != size {
                    return Err(TbError::DimensionMismatch {
                        context: "number of positions".to_string(),
                        expected: size,
                        found: pos.nrows(),
                    });
                }
                if pos.ncols() != 3 {
                    return Err(TbError::DimensionMismatch {
                        context: "coordinates per position".to_string(),
                        expected: 3,
                        found: pos.ncols(),
                    });
                }
                map_to_uc(pos, hoppings)
            }
        };

        // ---- REDUCED REPRESENTATION ----
        let hoppings = if contains_cc {
            hoppings.check_hermitian(cc_tolerance)?;
            hoppings.reduce()
        } else {
            hoppings.fold_positive()
        };

        // ---- UNIT CELL ----
        if let Some(uc) = uc.as_ref() {
            if uc.dim() != (3, 3) {
                return Err(TbError::DimensionMismatch {
                    context: "unit cell must be 3x3, number of entries".to_string(),
                    expected: 9,
                    found: uc.len(),
                });
            }
        }

        Ok(Model {
            size,
            occ,
            pos,
            uc,
            hoppings,
        })
    }

    /// Re-enters [`Model::new`] with a table assembled by a derived-model
    /// operation; the table is folded, never assumed canonical.
    pub(crate) fn rebuild(
        hoppings: HoppingTable,
        pos: Array2<f64>,
        occ: Option<usize>,
        uc: Option<Array2<f64>>,
    ) -> Result<Model> {
        let size = hoppings.size();
        Model::new(hoppings, ModelConfig::derived(size, occ, pos, uc))
    }

    #[allow(non_snake_case)]
    pub fn hamilton<S: Data<Elem = f64>>(&self, k: &ArrayBase<S, Ix1>) -> Result<Array2<Complex64>> {
        //! Bloch Hamiltonian at the fractional reciprocal point `k`,
        //!
        //! $$H(\bm k)=\sum_{\bm G} h(\bm G)e^{2\pi i\bm G\cdot\bm k}+\text{h.c.},$$
        //!
        //! the sum running over the stored (canonical) $\bm G$ only. Adding the
        //! Hermitian conjugate once restores the suppressed $-\bm G$ terms and
        //! the halved on-site block.
        if k.len() != 3 {
            return Err(TbError::DimensionMismatch {
                context: "k-point coordinates".to_string(),
                expected: 3,
                found: k.len(),
            });
        }
        let k = [k[0], k[1], k[2]];
        let mut H = Array2::<Complex64>::zeros((self.size, self.size));
        for (G, hop) in self.hoppings.iter() {
            let phase = Complex64::new(0.0, 2.0 * PI * G.dot(&k)).exp();
            for (i, j, t) in hop.iter_nonzero() {
                H[[i, j]] += t * phase;
            }
        }
        let H_dag = H.t().mapv(|x| x.conj());
        Ok(H + H_dag)
    }

    /// Eigenvalues of [`Model::hamilton`] in ascending order, tagged with the
    /// occupation number.
    pub fn eigenval<S: Data<Elem = f64>>(&self, k: &ArrayBase<S, Ix1>) -> Result<EigenVal> {
        self.eigenval_with(&NalgebraSolver, k)
    }

    pub fn eigenval_with<E, S>(&self, solver: &E, k: &ArrayBase<S, Ix1>) -> Result<EigenVal>
    where
        E: EigenSolver + ?Sized,
        S: Data<Elem = f64>,
    {
        let hamk = self.hamilton(k)?;
        let eval = solver.eigvalsh(&hamk)?;
        Ok(EigenVal::new(eval, self.occ))
    }
}

/// Maps the positions into the home unit cell.
///
/// An orbital at $\bm p$ with $\lfloor\bm p\rfloor=\bm o\neq 0$ moves to
/// $\bm p-\bm o$, and every hopping touching it is re-keyed so that the
/// physical bond is unchanged. When every orbital already sits in the home
/// cell nothing is touched.
fn map_to_uc(pos: Array2<f64>, hoppings: HoppingTable) -> (Array2<f64>, HoppingTable) {
    let uc_offsets: Vec<LatticeVector> = pos
        .outer_iter()
        .map(|p| LatticeVector::new([p[0].floor() as isize, p[1].floor() as isize, p[2].floor() as isize]))
        .collect();
    // ---- common case: already mapped into the UC ----
    if uc_offsets.iter().all(|o| o.is_zero()) {
        return (pos, hoppings);
    }

    // ---- uncommon case: handle mapping ----
    let moved = uc_offsets.iter().filter(|o| !o.is_zero()).count();
    debug!("{} orbital position(s) outside the home unit cell, re-keying hoppings", moved);
    let new_pos = pos.mapv(|x| x - x.floor());
    let new_hoppings = hoppings.remap_offsets(&uc_offsets);
    (new_pos, new_hoppings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_hermitian(h: &Array2<Complex64>) {
        for ((i, j), v) in h.indexed_iter() {
            assert!((v - h[[j, i]].conj()).norm() < 1e-12, "H[{},{}] = {} is not hermitian", i, j, v);
        }
    }

    fn haldane_like() -> Model {
        let t1 = c(1.0, 0.0);
        let t2 = c(0.0, 0.15);
        let hop = |v: Vec<(usize, usize, Complex64)>| HoppingMatrix::from_triplets((2, 2), v).unwrap();
        Model::new(
            vec![
                (LatticeVector::new([0, 0, 0]), hop(vec![(0, 0, c(0.35, 0.0)), (1, 1, c(-0.35, 0.0)), (0, 1, t1)])),
                (LatticeVector::new([-1, 0, 0]), hop(vec![(0, 1, t1)])),
                (LatticeVector::new([0, -1, 0]), hop(vec![(0, 1, t1)])),
                (LatticeVector::new([1, 0, 0]), hop(vec![(0, 0, t2), (1, 1, -t2)])),
                (LatticeVector::new([-1, 1, 0]), hop(vec![(0, 0, t2), (1, 1, -t2)])),
                (LatticeVector::new([0, -1, 0]), hop(vec![(0, 0, t2), (1, 1, -t2)])),
            ],
            ModelConfig {
                occ: Some(1),
                pos: Some(array![[1.0 / 3.0, 1.0 / 3.0, 0.0], [2.0 / 3.0, 2.0 / 3.0, 0.0]]),
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn chain_dispersion() {
        let chain = Model::new(
            vec![(LatticeVector::new([1, 0, 0]), array![[1.0]])],
            ModelConfig {
                size: Some(1),
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap();
        for n in 0..20 {
            let k = n as f64 / 20.0;
            let ham = chain.hamilton(&array![k, 0.0, 0.0]).unwrap();
            assert_abs_diff_eq!(ham[[0, 0]].re, 2.0 * (2.0 * PI * k).cos(), epsilon = 1e-12);
            assert_abs_diff_eq!(ham[[0, 0]].im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn onsite_only_is_k_independent() {
        let model = Model::new(
            vec![(LatticeVector::ZERO, array![[0.5, 0.0], [0.0, -0.5]])],
            ModelConfig {
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap();
        for k in [array![0.0, 0.0, 0.0], array![0.3, -0.1, 0.7], array![0.5, 0.5, 0.5]] {
            let ham = model.hamilton(&k).unwrap();
            assert_eq!(ham, array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]);
        }
    }

    #[test]
    fn full_onsite_block_is_halved() {
        let model = Model::new(vec![(LatticeVector::ZERO, array![[1.0, 0.0], [0.0, -1.0]])], ModelConfig::default()).unwrap();
        let h0 = model.hoppings().get(&LatticeVector::ZERO).unwrap();
        assert_eq!(h0.get(0, 0), c(0.5, 0.0));
        assert_eq!(h0.get(1, 1), c(-0.5, 0.0));
        let ham = model.hamilton(&array![0.1, 0.2, 0.3]).unwrap();
        assert_abs_diff_eq!(ham[[0, 0]].re, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(ham[[1, 1]].re, -1.0, epsilon = 1e-14);
    }

    #[test]
    fn hamiltonian_is_hermitian() {
        let model = haldane_like();
        for k in [array![0.0, 0.0, 0.0], array![1.0 / 3.0, 2.0 / 3.0, 0.0], array![0.13, 0.71, 0.4]] {
            assert_hermitian(&model.hamilton(&k).unwrap());
        }
    }

    #[test]
    fn expanded_table_round_trip() {
        let model = haldane_like();
        // built from a full table, so the on-site block is hermitian
        let full_model = Model::new(model.hoppings().expand(), ModelConfig::default()).unwrap();
        let again = Model::new(full_model.hoppings().expand(), ModelConfig::default()).unwrap();
        assert_eq!(again.hoppings(), full_model.hoppings());
        for k in [array![0.2, 0.4, 0.0], array![0.5, 0.0, 0.9]] {
            let a = model.hamilton(&k).unwrap();
            let b = again.hamilton(&k).unwrap();
            assert!((&a - &b).iter().all(|x| x.norm() < 1e-12));
        }
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = Model::new(
            vec![
                (LatticeVector::ZERO, array![[1.0, 0.0], [0.0, 1.0]]),
                (LatticeVector::new([1, 0, 0]), array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
            ],
            ModelConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, TbError::HoppingShape { .. }));
    }

    #[test]
    fn non_hermitian_input_is_rejected() {
        let err = Model::new(
            vec![
                (LatticeVector::new([1, 0, 0]), array![[0.0, 1.0], [0.0, 0.0]]),
                (LatticeVector::new([-1, 0, 0]), array![[0.0, 1.0], [0.0, 0.0]]),
            ],
            ModelConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_physical_consistency());
    }

    #[test]
    fn missing_size() {
        let empty: Vec<(LatticeVector, HoppingMatrix)> = Vec::new();
        assert!(matches!(Model::new(empty.clone(), ModelConfig::default()), Err(TbError::UnknownSize)));
        let model = Model::new(
            empty,
            ModelConfig {
                size: Some(3),
                occ: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(model.size(), 3);
        assert_eq!(model.pos(), &Array2::<f64>::zeros((3, 3)));
        let ham = model.hamilton(&array![0.1, 0.2, 0.3]).unwrap();
        assert!(ham.iter().all(|x| x.norm() == 0.0));
    }

    #[test]
    fn wrong_number_of_positions() {
        let err = Model::new(
            vec![(LatticeVector::ZERO, array![[1.0, 0.0], [0.0, 1.0]])],
            ModelConfig {
                pos: Some(array![[0.0, 0.0, 0.0]]),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn positions_are_mapped_into_home_cell() {
        // orbital 1 given one cell to the right: its bonds are re-keyed
        let model = Model::new(
            vec![(LatticeVector::new([0, 0, 0]), array![[0.0, 1.0], [0.0, 0.0]])],
            ModelConfig {
                pos: Some(array![[0.0, 0.0, 0.0], [1.5, 0.0, -0.25]]),
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_abs_diff_eq!(model.pos(), &array![[0.0, 0.0, 0.0], [0.5, 0.0, 0.75]], epsilon = 1e-14);
        let h = model.hoppings().get(&LatticeVector::new([1, 0, -1])).unwrap();
        assert_eq!(h.get(0, 1), c(1.0, 0.0));
        assert!(model.hoppings().get(&LatticeVector::ZERO).is_none());
    }

    #[test]
    fn full_table_is_remapped_before_the_hermiticity_check() {
        let model = Model::new(
            vec![
                (LatticeVector::ZERO, array![[0.0, 1.0], [1.0, 0.0]]),
                (LatticeVector::new([1, 0, 0]), array![[0.0, 0.5], [0.0, 0.0]]),
                (LatticeVector::new([-1, 0, 0]), array![[0.0, 0.0], [0.5, 0.0]]),
            ],
            ModelConfig {
                occ: Some(1),
                pos: Some(array![[0.0, 0.0, 0.0], [1.25, 0.0, 0.0]]),
                ..Default::default()
            },
        )
        .unwrap();
        assert_abs_diff_eq!(model.pos().row(1), array![0.25, 0.0, 0.0], epsilon = 1e-14);
        assert_eq!(model.hoppings().get(&LatticeVector::new([1, 0, 0])).unwrap().get(0, 1), c(1.0, 0.0));
        assert_eq!(model.hoppings().get(&LatticeVector::new([2, 0, 0])).unwrap().get(0, 1), c(0.5, 0.0));
        assert!(model.hoppings().keys().all(|g| g.is_canonical() || g.is_zero()));
        // |H01(k)| = |1 + 0.5 e^{2πi k}|, independent of the re-keying
        for kx in [0.0, 0.2, 0.5] {
            let eval = model.eigenval(&array![kx, 0.0, 0.0]).unwrap();
            let amp = (c(1.0, 0.0) + 0.5 * Complex64::new(0.0, 2.0 * PI * kx).exp()).norm();
            assert_abs_diff_eq!(eval.values(), &array![-amp, amp], epsilon = 1e-12);
        }
    }

    #[test]
    fn positions_in_home_cell_take_fast_path() {
        let model = haldane_like();
        assert!(model.hoppings().get(&LatticeVector::ZERO).is_some());
        assert_abs_diff_eq!(model.pos()[[1, 0]], 2.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn bad_unit_cell_shape() {
        let err = Model::new(
            vec![(LatticeVector::ZERO, array![[1.0]])],
            ModelConfig {
                uc: Some(Array2::eye(2)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn eigenvalues_are_sorted_and_tagged() {
        let model = haldane_like();
        let k = array![0.1, 0.25, 0.0];
        let eval = model.eigenval(&k).unwrap();
        assert_eq!(eval.occ(), Some(1));
        assert_eq!(eval.len(), 2);
        assert!(eval.values()[0] <= eval.values()[1]);
        // trace is preserved
        let ham = model.hamilton(&k).unwrap();
        let trace: f64 = ham.diag().iter().map(|x| x.re).sum();
        assert_abs_diff_eq!(eval.values().sum(), trace, epsilon = 1e-10);
    }

    #[test]
    fn k_must_have_three_components() {
        let model = haldane_like();
        assert!(model.hamilton(&array![0.0, 0.0]).unwrap_err().is_configuration());
    }
}
