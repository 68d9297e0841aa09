//! LAPACK eigensolver (`zheevd` through ndarray-linalg), enabled by the
//! `lapack` feature together with one of the backend features.
use crate::eigen::EigenSolver;
use crate::error::Result;
use ndarray::{Array1, Array2};
use ndarray_linalg::{EigValsh, UPLO};
use num_complex::Complex64;

#[derive(Debug, Clone, Copy)]
pub struct LapackSolver {
    /// Triangle of the Hamiltonian handed to LAPACK.
    pub uplo: UPLO,
}

impl Default for LapackSolver {
    fn default() -> Self {
        LapackSolver { uplo: UPLO::Lower }
    }
}

impl EigenSolver for LapackSolver {
    fn eigvalsh(&self, ham: &Array2<Complex64>) -> Result<Array1<f64>> {
        Ok(ham.eigvalsh(self.uplo)?)
    }
}
