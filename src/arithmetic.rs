//! Term-by-term arithmetic of models that live on the same lattice.
//!
//! Sums require equal occupation, size, unit cell and positions. All results
//! are re-assembled through [`Model::new`] with `contains_cc = false`.
use crate::error::{Result, TbError};
use crate::Model;
use ndarray::prelude::*;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Largest coordinate difference for two unit cells or positions to match.
const MATCH_TOLERANCE: f64 = 1e-6;

fn arrays_match(a: &Array2<f64>, b: &Array2<f64>) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= MATCH_TOLERANCE)
}

#[allow(clippy::should_implement_trait)]
impl Model {
    fn check_compatible(&self, other: &Model) -> Result<()> {
        if self.occ != other.occ {
            return Err(TbError::OperandMismatch {
                what: "occupation numbers",
                left: format!("{:?}", self.occ),
                right: format!("{:?}", other.occ),
            });
        }
        if self.size != other.size {
            return Err(TbError::OperandMismatch {
                what: "the number of states",
                left: self.size.to_string(),
                right: other.size.to_string(),
            });
        }
        let uc_match = match (self.uc.as_ref(), other.uc.as_ref()) {
            (None, None) => true,
            (Some(a), Some(b)) => arrays_match(a, b),
            _ => false,
        };
        if !uc_match {
            return Err(TbError::OperandMismatch {
                what: "unit cells",
                left: format!("{:?}", self.uc),
                right: format!("{:?}", other.uc),
            });
        }
        if !arrays_match(&self.pos, &other.pos) {
            return Err(TbError::OperandMismatch {
                what: "positions",
                left: format!("{}", self.pos),
                right: format!("{}", other.pos),
            });
        }
        Ok(())
    }

    /// Sum of the hoppings of two compatible models.
    pub fn add(&self, other: &Model) -> Result<Model> {
        self.check_compatible(other)?;
        let mut new_hoppings = self.hoppings.clone();
        for (g, hop) in other.hoppings.iter() {
            new_hoppings.accumulate_matrix(*g, hop)?;
        }
        Model::rebuild(new_hoppings, self.pos.clone(), self.occ, self.uc.clone())
    }

    pub fn sub(&self, other: &Model) -> Result<Model> {
        self.add(&other.neg()?)
    }

    pub fn neg(&self) -> Result<Model> {
        self.scale(-1.0)
    }

    /// Multiplies on-site energies and hopping strengths by `x`.
    pub fn scale(&self, x: f64) -> Result<Model> {
        let new_hoppings = self.hoppings.map_matrices(|_, hop| hop * x);
        Model::rebuild(new_hoppings, self.pos.clone(), self.occ, self.uc.clone())
    }

    pub fn div(&self, x: f64) -> Result<Model> {
        if x == 0.0 {
            return Err(TbError::DivisionByZero);
        }
        self.scale(1.0 / x)
    }
}

impl Add<&Model> for &Model {
    type Output = Result<Model>;
    fn add(self, other: &Model) -> Result<Model> {
        Model::add(self, other)
    }
}

impl Sub<&Model> for &Model {
    type Output = Result<Model>;
    fn sub(self, other: &Model) -> Result<Model> {
        Model::sub(self, other)
    }
}

impl Neg for &Model {
    type Output = Result<Model>;
    fn neg(self) -> Result<Model> {
        Model::neg(self)
    }
}

impl Mul<f64> for &Model {
    type Output = Result<Model>;
    fn mul(self, x: f64) -> Result<Model> {
        self.scale(x)
    }
}

impl Mul<&Model> for f64 {
    type Output = Result<Model>;
    fn mul(self, model: &Model) -> Result<Model> {
        model.scale(self)
    }
}

impl Div<f64> for &Model {
    type Output = Result<Model>;
    fn div(self, x: f64) -> Result<Model> {
        Model::div(self, x)
    }
}
