//! Supercells: tiling the unit cell `nx × ny × nz` times.
//!
//! Sub-cells are numbered x-major, see [`pos_to_idx`], and orbital `o` of
//! sub-cell `c` becomes orbital `pos_to_idx(c) * size + o` of the supercell.
use crate::error::{Result, TbError};
use crate::hopping::HoppingTable;
use crate::lattice::LatticeVector;
use crate::Model;
use log::warn;
use ndarray::prelude::*;
use num_complex::Complex64;

/// `[bottom, top]` per axis: whether a sub-cell touches that face of the supercell.
pub type FaceFlags = [[bool; 2]; 3];

/// How the occupation number of a supercell is derived from the original one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccupationScaling {
    /// `occ · nx · ny · nz`, the number of tiled unit cells.
    #[default]
    Product,
    /// `occ · (nx + ny + nz)`.
    DimensionSum,
}

/// Options of [`Model::supercell`].
#[derive(Clone, Copy)]
pub struct SupercellOptions<'a> {
    /// Hoppings crossing the supercell boundary along a non-periodic
    /// direction are cut.
    pub periodic: [bool; 3],
    /// On-site energies added to every sub-cell as a function of the faces it
    /// touches. Must return one value per original orbital.
    pub passivation: Option<&'a dyn Fn(FaceFlags) -> Vec<f64>>,
    pub occ_scaling: OccupationScaling,
}

impl Default for SupercellOptions<'_> {
    fn default() -> Self {
        SupercellOptions {
            periodic: [true; 3],
            passivation: None,
            occ_scaling: OccupationScaling::Product,
        }
    }
}

fn check_cell(cell: [usize; 3], dim: [usize; 3]) -> Result<()> {
    if cell.iter().zip(dim.iter()).any(|(c, d)| c >= d) {
        return Err(TbError::CellOutOfBounds { cell, dim });
    }
    Ok(())
}

/// Linear index of sub-cell `cell` in a supercell of dimension `dim`,
/// `(cell[0] * dim[1] + cell[1]) * dim[2] + cell[2]`.
pub fn pos_to_idx(cell: [usize; 3], dim: [usize; 3]) -> Result<usize> {
    check_cell(cell, dim)?;
    Ok((cell[0] * dim[1] + cell[1]) * dim[2] + cell[2])
}

/// Which faces of the supercell the sub-cell `cell` touches.
pub fn edge_detect_pos(cell: [usize; 3], dim: [usize; 3]) -> Result<FaceFlags> {
    check_cell(cell, dim)?;
    let mut edges = [[false; 2]; 3];
    for i in 0..3 {
        edges[i] = [cell[i] == 0, cell[i] == dim[i] - 1];
    }
    Ok(edges)
}

impl Model {
    /// Builds the model of an `nx × ny × nz` supercell.
    ///
    /// Every hopping of every sub-cell is re-attached to its destination
    /// sub-cell; the part of the destination outside the supercell becomes
    /// the new lattice vector. Along a non-periodic direction such hoppings
    /// are dropped instead.
    ///
    /// ```
    /// use ndarray::array;
    /// use tbmodels::{Model, ModelConfig, SupercellOptions};
    ///
    /// let chain = Model::new(
    ///     vec![([1isize, 0, 0], array![[1.0]])],
    ///     ModelConfig { occ: Some(1), contains_cc: false, ..Default::default() },
    /// )
    /// .unwrap();
    /// let ring = chain.supercell([4, 1, 1], &SupercellOptions::default()).unwrap();
    /// assert_eq!(ring.size(), 4);
    /// assert_eq!(ring.occ(), Some(4));
    /// ```
    pub fn supercell(&self, dim: [usize; 3], options: &SupercellOptions) -> Result<Model> {
        if dim.contains(&0) {
            return Err(TbError::InvalidSupercellSize(dim));
        }
        let [nx, ny, nz] = dim;
        let n_cells = nx * ny * nz;
        let new_size = self.size * n_cells;

        let new_occ = match options.occ_scaling {
            OccupationScaling::Product => self.occ.map(|occ| occ * n_cells),
            OccupationScaling::DimensionSum => {
                warn!(
                    "supercell occupation scaled by nx + ny + nz = {}, which differs from the number of tiled cells {}",
                    nx + ny + nz,
                    n_cells
                );
                self.occ.map(|occ| occ * (nx + ny + nz))
            }
        };
        let dim_f = arr1(&[nx as f64, ny as f64, nz as f64]);
        let new_uc = self.uc.as_ref().map(|uc| uc * &dim_f);

        let mut cells: Vec<[usize; 3]> = Vec::with_capacity(n_cells);
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    cells.push([i, j, k]);
                }
            }
        }

        let mut new_pos = Array2::<f64>::zeros((new_size, 3));
        for (idx, cell) in cells.iter().enumerate() {
            for (o, p) in self.pos.outer_iter().enumerate() {
                let mut row = new_pos.row_mut(idx * self.size + o);
                for a in 0..3 {
                    row[a] = (cell[a] as f64 + p[a]) / dim_f[a];
                }
            }
        }

        let mut new_hoppings = HoppingTable::new(new_size);
        for (idx0, cell0) in cells.iter().enumerate() {
            for (g, hop) in self.hoppings.iter() {
                let g = g.components();
                let mut new_g = [0isize; 3];
                let mut cell1 = [0usize; 3];
                let mut cut = false;
                for a in 0..3 {
                    let d = dim[a] as isize;
                    let target = cell0[a] as isize + g[a];
                    if !options.periodic[a] && (target < 0 || target >= d) {
                        cut = true;
                        break;
                    }
                    new_g[a] = target.div_euclid(d);
                    cell1[a] = target.rem_euclid(d) as usize;
                }
                if cut {
                    continue;
                }
                let idx1 = pos_to_idx(cell1, dim)?;
                let block = new_hoppings.entry_or_zeros(LatticeVector::new(new_g));
                for (i0, i1, t) in hop.iter_nonzero() {
                    block.add_at(idx0 * self.size + i0, idx1 * self.size + i1, t);
                }
            }
        }

        if let Some(passivation) = options.passivation {
            for (idx, cell) in cells.iter().enumerate() {
                let onsite = passivation(edge_detect_pos(*cell, dim)?);
                if onsite.len() != self.size {
                    return Err(TbError::DimensionMismatch {
                        context: "passivation on-site energies".to_string(),
                        expected: self.size,
                        found: onsite.len(),
                    });
                }
                let block = new_hoppings.entry_or_zeros(LatticeVector::ZERO);
                for (o, e) in onsite.iter().enumerate() {
                    let i = idx * self.size + o;
                    block.add_at(i, i, Complex64::new(0.5 * e, 0.0));
                }
            }
        }

        Model::rebuild(new_hoppings, new_pos, new_occ, new_uc)
    }
}
