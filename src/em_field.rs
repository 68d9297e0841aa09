//! Coupling of a model to external electromagnetic potentials.
//!
//! A scalar potential $\Phi$ shifts the on-site energies,
//! $\epsilon_\alpha\to\epsilon_\alpha+p_s\Phi(\bm r_\alpha)$, and a vector
//! potential dresses every hopping with a Peierls phase
//! $$t\to t\exp\left[-i\,p_v\,(\bm G+\bm r_1-\bm r_0)\cdot(\bm A(\bm r_1)-\bm A(\bm r_0))\right],$$
//! with $\bm r=\mathrm{uc}\cdot\bm p$ the Cartesian orbital positions.
use crate::error::{Result, TbError};
use crate::lattice::LatticeVector;
use crate::phy_const::PEIERLS_PREFACTOR;
use crate::Model;
use log::debug;
use ndarray::prelude::*;
use num_complex::Complex64;
use std::str::FromStr;

/// Coordinates handed to a potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// Fractional coordinates of the orbital in the home unit cell.
    #[default]
    Relative,
    /// Cartesian coordinates, `uc · pos`.
    Absolute,
}

impl PositionMode {
    /// Parses `"relative"` or `"absolute"`, naming `argument` in the error.
    pub fn parse_for(argument: &'static str, value: &str) -> Result<Self> {
        match value {
            "relative" => Ok(PositionMode::Relative),
            "absolute" => Ok(PositionMode::Absolute),
            _ => Err(TbError::UnrecognizedMode {
                argument,
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for PositionMode {
    type Err = TbError;
    fn from_str(s: &str) -> Result<Self> {
        PositionMode::parse_for("position mode", s)
    }
}

/// Potentials and units of [`Model::em_field`].
#[derive(Clone, Copy)]
pub struct EmField<'a> {
    /// $\Phi(\bm r)$, in energy per electron.
    pub scalar_pot: Option<&'a dyn Fn(&[f64; 3]) -> f64>,
    /// $\bm A(\bm r)$.
    pub vec_pot: Option<&'a dyn Fn(&[f64; 3]) -> [f64; 3]>,
    pub prefactor_scalar: f64,
    /// Defaults to [`PEIERLS_PREFACTOR`]: $\bm A$ in T·Å and the unit cell in Å.
    pub prefactor_vec: f64,
    pub mode_scalar: PositionMode,
    pub mode_vec: PositionMode,
}

impl Default for EmField<'_> {
    fn default() -> Self {
        EmField {
            scalar_pot: None,
            vec_pot: None,
            prefactor_scalar: 1.0,
            prefactor_vec: PEIERLS_PREFACTOR,
            mode_scalar: PositionMode::Relative,
            mode_vec: PositionMode::Relative,
        }
    }
}

impl Model {
    fn potential_arguments(&self, mode: PositionMode, what: &'static str) -> Result<Vec<[f64; 3]>> {
        let rows = |pos: &Array2<f64>| -> Vec<[f64; 3]> { pos.outer_iter().map(|p| [p[0], p[1], p[2]]).collect() };
        match mode {
            PositionMode::Relative => Ok(rows(&self.pos)),
            PositionMode::Absolute => {
                let uc = self.uc.as_ref().ok_or(TbError::MissingUnitCell(what))?;
                Ok(rows(&self.pos.dot(&uc.t())))
            }
        }
    }

    /// Returns the model in the presence of the potentials in `field`.
    ///
    /// Half of $p_s\Phi$ is added to the stored on-site block (the block is
    /// created if the model has none). The vector potential needs the unit
    /// cell for the Cartesian positions $\bm r_0$ and $\bm r_1$ of the bond.
    pub fn em_field(&self, field: &EmField) -> Result<Model> {
        let mut new_hoppings = self.hoppings.clone();

        if let Some(scalar_pot) = field.scalar_pot {
            debug!("adding scalar potential in {:?} coordinates", field.mode_scalar);
            let args = self.potential_arguments(field.mode_scalar, "absolute scalar potential")?;
            let onsite = new_hoppings.entry_or_zeros(LatticeVector::ZERO);
            for (i, r) in args.iter().enumerate() {
                let shift = 0.5 * field.prefactor_scalar * scalar_pot(r);
                onsite.add_at(i, i, Complex64::new(shift, 0.0));
            }
        }

        if let Some(vec_pot) = field.vec_pot {
            debug!("adding Peierls phases of vector potential in {:?} coordinates", field.mode_vec);
            let uc = self.uc.as_ref().ok_or(TbError::MissingUnitCell("vector potential"))?;
            let a_vals: Vec<[f64; 3]> = self
                .potential_arguments(field.mode_vec, "vector potential")?
                .iter()
                .map(|r| vec_pot(r))
                .collect();
            // one Cartesian position per row
            let cart = self.pos.dot(&uc.t());
            new_hoppings = new_hoppings.map_matrices(|g, hop| {
                let g = arr1(&g.to_f64());
                hop.map_values(|i0, i1, t| {
                    let d = &g + &cart.row(i1) - &cart.row(i0);
                    let (a0, a1) = (a_vals[i0], a_vals[i1]);
                    let flux: f64 = (0..3).map(|a| d[a] * (a1[a] - a0[a])).sum();
                    t * Complex64::new(0.0, -field.prefactor_vec * flux).exp()
                })
            });
        }

        Model::rebuild(new_hoppings, self.pos.clone(), self.occ, self.uc.clone())
    }
}
