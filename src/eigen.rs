//! Eigenvalues of the Bloch Hamiltonian.
//!
//! The diagonalization itself is delegated to an [`EigenSolver`]. The default
//! [`NalgebraSolver`] is pure Rust; with the `lapack` feature
//! `crate::ndarray_lapack::LapackSolver` calls LAPACK through ndarray-linalg.
use crate::error::{Result, TbError};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::prelude::*;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Dense Hermitian eigenvalue problem.
pub trait EigenSolver {
    /// Eigenvalues of the Hermitian matrix `ham`, in ascending order.
    fn eigvalsh(&self, ham: &Array2<Complex64>) -> Result<Array1<f64>>;
}

/// Hermitian eigensolver from nalgebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraSolver;

impl NalgebraSolver {
    const MAX_ITER: usize = 100_000;
}

impl EigenSolver for NalgebraSolver {
    fn eigvalsh(&self, ham: &Array2<Complex64>) -> Result<Array1<f64>> {
        let (n, m) = ham.dim();
        if n != m {
            return Err(TbError::DimensionMismatch {
                context: "columns of a Hamiltonian matrix".to_string(),
                expected: n,
                found: m,
            });
        }
        let matrix = DMatrix::<Complex64>::from_fn(n, n, |i, j| ham[[i, j]]);
        let eig = SymmetricEigen::try_new(matrix, f64::EPSILON, Self::MAX_ITER)
            .ok_or_else(|| TbError::EigenSolver(format!("no convergence for a {}x{} matrix", n, n)))?;
        let mut eval: Vec<f64> = eig.eigenvalues.iter().copied().collect();
        eval.sort_by(|a, b| a.total_cmp(b));
        Ok(Array1::from_vec(eval))
    }
}

/// Eigenvalues at one k-point together with the number of occupied states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenVal {
    values: Array1<f64>,
    occ: Option<usize>,
}

impl EigenVal {
    pub fn new(values: Array1<f64>, occ: Option<usize>) -> Self {
        EigenVal { values, occ }
    }

    #[inline(always)]
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    #[inline(always)]
    pub fn occ(&self) -> Option<usize> {
        self.occ
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The lowest `occ` eigenvalues, if the occupation is known and fits.
    pub fn occupied(&self) -> Option<ArrayView1<'_, f64>> {
        match self.occ {
            Some(occ) if occ <= self.len() => Some(self.values.slice(s![..occ])),
            _ => None,
        }
    }

    /// Lowest unoccupied minus highest occupied eigenvalue.
    pub fn gap(&self) -> Option<f64> {
        match self.occ {
            Some(occ) if occ > 0 && occ < self.len() => Some(self.values[occ] - self.values[occ - 1]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn pauli_y_spectrum() {
        let ham = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let eval = NalgebraSolver.eigvalsh(&ham).unwrap();
        assert_abs_diff_eq!(eval, array![-1.0, 1.0], epsilon = 1e-12);
    }

    #[test]
    fn diagonal_is_sorted() {
        let ham = Array2::from_diag(&array![c(3.0, 0.0), c(-2.0, 0.0), c(0.5, 0.0)]);
        let eval = NalgebraSolver.eigvalsh(&ham).unwrap();
        assert_abs_diff_eq!(eval, array![-2.0, 0.5, 3.0], epsilon = 1e-12);
    }

    #[test]
    fn complex_hermitian_three_band() {
        // eigenvalues of [[2, i, 0], [-i, 2, 0], [0, 0, 5]] are 1, 3, 5
        let ham = array![
            [c(2.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)],
            [c(0.0, -1.0), c(2.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(5.0, 0.0)]
        ];
        let eval = NalgebraSolver.eigvalsh(&ham).unwrap();
        assert_abs_diff_eq!(eval, array![1.0, 3.0, 5.0], epsilon = 1e-10);
    }

    #[test]
    fn non_square_is_rejected() {
        let ham = Array2::<Complex64>::zeros((2, 3));
        assert!(NalgebraSolver.eigvalsh(&ham).unwrap_err().is_configuration());
    }

    #[test]
    fn occupation() {
        let eval = EigenVal::new(array![-1.0, 0.5, 2.0], Some(1));
        assert_eq!(eval.occupied().unwrap(), array![-1.0]);
        assert_abs_diff_eq!(eval.gap().unwrap(), 1.5);
        assert_eq!(EigenVal::new(array![0.0], None).gap(), None);
        assert_eq!(EigenVal::new(array![0.0], Some(1)).gap(), None);
    }
}
