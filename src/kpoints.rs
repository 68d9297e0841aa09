//! Regular k-meshes and band energies on lists of k-points.
use crate::error::{Result, TbError};
use crate::Model;
use ndarray::prelude::*;
use ndarray::{Data, Zip};

/// A regular `n0 × n1 × n2` mesh of fractional k-points in $[0,1)^3$,
/// one point per row, the last axis running fastest.
pub fn gen_kmesh(k_mesh: &[usize; 3]) -> Array2<f64> {
    let nk: usize = k_mesh.iter().product();
    let mut kvec = Array2::<f64>::zeros((nk, 3));
    let mut row = 0;
    for i in 0..k_mesh[0] {
        for j in 0..k_mesh[1] {
            for k in 0..k_mesh[2] {
                kvec[[row, 0]] = i as f64 / k_mesh[0] as f64;
                kvec[[row, 1]] = j as f64 / k_mesh[1] as f64;
                kvec[[row, 2]] = k as f64 / k_mesh[2] as f64;
                row += 1;
            }
        }
    }
    kvec
}

impl Model {
    /// Eigenvalues at every row of `kvec`, one row of bands per k-point.
    pub fn solve_band_all<S: Data<Elem = f64>>(&self, kvec: &ArrayBase<S, Ix2>) -> Result<Array2<f64>> {
        if kvec.ncols() != 3 {
            return Err(TbError::DimensionMismatch {
                context: "k-point coordinates".to_string(),
                expected: 3,
                found: kvec.ncols(),
            });
        }
        let nk = kvec.nrows();
        let mut band = Array2::<f64>::zeros((nk, self.size));
        let mut status = Ok(());
        Zip::from(kvec.outer_iter())
            .and(band.outer_iter_mut())
            .for_each(|k, mut bands| {
                if status.is_err() {
                    return;
                }
                match self.eigenval(&k) {
                    Ok(eval) => bands.assign(eval.values()),
                    Err(err) => status = Err(err),
                }
            });
        status?;
        Ok(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::lattice::LatticeVector;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn mesh_order_and_spacing() {
        let kvec = gen_kmesh(&[2, 3, 1]);
        assert_eq!(kvec.dim(), (6, 3));
        assert_abs_diff_eq!(kvec.row(0), array![0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(kvec.row(1), array![0.0, 1.0 / 3.0, 0.0]);
        assert_abs_diff_eq!(kvec.row(5), array![0.5, 2.0 / 3.0, 0.0]);
    }

    #[test]
    fn chain_bands_on_a_mesh() {
        let chain = Model::new(
            vec![(LatticeVector::new([1, 0, 0]), array![[1.0]])],
            ModelConfig {
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap();
        let kvec = gen_kmesh(&[8, 1, 1]);
        let band = chain.solve_band_all(&kvec).unwrap();
        assert_eq!(band.dim(), (8, 1));
        for (k, e) in kvec.column(0).iter().zip(band.column(0).iter()) {
            assert_abs_diff_eq!(*e, 2.0 * (2.0 * PI * k).cos(), epsilon = 1e-12);
        }
        assert!(chain.solve_band_all(&Array2::<f64>::zeros((2, 2))).unwrap_err().is_configuration());
    }
}
