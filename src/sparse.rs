//! A small complex sparse matrix used to store one hopping block.
//!
//! Only what the hopping bookkeeping needs is provided: accumulation of single
//! entries, scalar multiplication, addition, transpose, conjugate, shape and
//! iteration over the non-zero entries in row-major order. Exact zeros are
//! never stored, so two matrices compare equal when their non-zero entries do.
use crate::error::{Result, TbError};
use crate::generics::HopValue;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex64;
use num_traits::identities::Zero;
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul};

#[derive(Debug, Clone, PartialEq)]
pub struct HoppingMatrix {
    nrows: usize,
    ncols: usize,
    entries: BTreeMap<(usize, usize), Complex64>,
}

impl HoppingMatrix {
    /// An all-zero matrix of the given shape.
    pub fn zeros(shape: (usize, usize)) -> Self {
        HoppingMatrix {
            nrows: shape.0,
            ncols: shape.1,
            entries: BTreeMap::new(),
        }
    }

    pub fn from_dense<T, S>(dense: &ArrayBase<S, Ix2>) -> Self
    where
        T: HopValue,
        S: Data<Elem = T>,
    {
        let mut matrix = HoppingMatrix::zeros(dense.dim());
        for ((i, j), value) in dense.indexed_iter() {
            if !value.is_zero() {
                matrix.entries.insert((i, j), value.to_complex());
            }
        }
        matrix
    }

    /// Builds a matrix from `(row, col, value)` triplets, summing duplicates.
    pub fn from_triplets<I>(shape: (usize, usize), triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, Complex64)>,
    {
        let mut matrix = HoppingMatrix::zeros(shape);
        for (i, j, value) in triplets {
            matrix.check_index(i, j)?;
            matrix.add_at(i, j, value);
        }
        Ok(matrix)
    }

    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Complex64 {
        self.entries.get(&(i, j)).copied().unwrap_or_else(Complex64::zero)
    }

    /// `self[i, j] += value`. The caller guarantees the index is in range.
    pub fn add_at(&mut self, i: usize, j: usize, value: Complex64) {
        debug_assert!(i < self.nrows && j < self.ncols);
        if value.is_zero() {
            return;
        }
        let slot = self.entries.entry((i, j)).or_insert_with(Complex64::zero);
        *slot += value;
        if slot.is_zero() {
            self.entries.remove(&(i, j));
        }
    }

    /// `self[i, j] = value`. The caller guarantees the index is in range.
    pub fn set(&mut self, i: usize, j: usize, value: Complex64) {
        debug_assert!(i < self.nrows && j < self.ncols);
        if value.is_zero() {
            self.entries.remove(&(i, j));
        } else {
            self.entries.insert((i, j), value);
        }
    }

    /// Non-zero entries `(row, col, value)` in row-major order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        self.entries.iter().map(|(&(i, j), &v)| (i, j, v))
    }

    /// Applies `f` to every stored value; results that are exactly zero are dropped.
    pub fn map_values<F>(&self, mut f: F) -> HoppingMatrix
    where
        F: FnMut(usize, usize, Complex64) -> Complex64,
    {
        let entries = self
            .entries
            .iter()
            .map(|(&(i, j), &v)| ((i, j), f(i, j, v)))
            .filter(|(_, v)| !v.is_zero())
            .collect();
        HoppingMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            entries,
        }
    }

    pub fn scale(&self, x: Complex64) -> HoppingMatrix {
        self.map_values(|_, _, v| v * x)
    }

    pub fn transpose(&self) -> HoppingMatrix {
        HoppingMatrix {
            nrows: self.ncols,
            ncols: self.nrows,
            entries: self.entries.iter().map(|(&(i, j), &v)| ((j, i), v)).collect(),
        }
    }

    /// Element-wise complex conjugate.
    pub fn conj(&self) -> HoppingMatrix {
        self.map_values(|_, _, v| v.conj())
    }

    /// Hermitian conjugate, `transpose().conj()`.
    pub fn adjoint(&self) -> HoppingMatrix {
        HoppingMatrix {
            nrows: self.ncols,
            ncols: self.nrows,
            entries: self
                .entries
                .iter()
                .map(|(&(i, j), &v)| ((j, i), v.conj()))
                .collect(),
        }
    }

    /// Checked addition, fails on a shape mismatch.
    pub fn try_add(&self, other: &HoppingMatrix) -> Result<HoppingMatrix> {
        let mut sum = self.clone();
        sum.try_add_assign(other)?;
        Ok(sum)
    }

    pub fn try_add_assign(&mut self, other: &HoppingMatrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(TbError::DimensionMismatch {
                context: format!("adding hopping matrices of shapes {:?} and {:?}", self.shape(), other.shape()),
                expected: self.nrows * self.ncols,
                found: other.nrows * other.ncols,
            });
        }
        for (i, j, v) in other.iter_nonzero() {
            self.add_at(i, j, v);
        }
        Ok(())
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.entries.values().map(|v| v.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Frobenius norm of `self - other`, treating missing entries as zero.
    pub fn distance(&self, other: &HoppingMatrix) -> f64 {
        let mut sum = 0.0;
        for (key, v) in self.entries.iter() {
            let w = other.entries.get(key).copied().unwrap_or_else(Complex64::zero);
            sum += (v - w).norm_sqr();
        }
        for (key, w) in other.entries.iter() {
            if !self.entries.contains_key(key) {
                sum += w.norm_sqr();
            }
        }
        sum.sqrt()
    }

    pub fn to_dense(&self) -> Array2<Complex64> {
        let mut dense = Array2::<Complex64>::zeros((self.nrows, self.ncols));
        for (i, j, v) in self.iter_nonzero() {
            dense[[i, j]] = v;
        }
        dense
    }

    fn check_index(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.nrows {
            return Err(TbError::DimensionMismatch {
                context: "row index of a hopping matrix entry".to_string(),
                expected: self.nrows,
                found: i,
            });
        }
        if j >= self.ncols {
            return Err(TbError::DimensionMismatch {
                context: "column index of a hopping matrix entry".to_string(),
                expected: self.ncols,
                found: j,
            });
        }
        Ok(())
    }
}

impl From<Array2<Complex64>> for HoppingMatrix {
    fn from(dense: Array2<Complex64>) -> Self {
        HoppingMatrix::from_dense(&dense)
    }
}

impl From<Array2<f64>> for HoppingMatrix {
    fn from(dense: Array2<f64>) -> Self {
        HoppingMatrix::from_dense(&dense)
    }
}

impl From<&Array2<Complex64>> for HoppingMatrix {
    fn from(dense: &Array2<Complex64>) -> Self {
        HoppingMatrix::from_dense(dense)
    }
}

impl AddAssign<&HoppingMatrix> for HoppingMatrix {
    /// Shapes must agree; use [`HoppingMatrix::try_add_assign`] when they may not.
    fn add_assign(&mut self, other: &HoppingMatrix) {
        debug_assert_eq!(self.shape(), other.shape());
        for (i, j, v) in other.iter_nonzero() {
            self.add_at(i, j, v);
        }
    }
}

impl Add<&HoppingMatrix> for &HoppingMatrix {
    type Output = HoppingMatrix;
    fn add(self, other: &HoppingMatrix) -> HoppingMatrix {
        let mut sum = self.clone();
        sum += other;
        sum
    }
}

impl Mul<f64> for &HoppingMatrix {
    type Output = HoppingMatrix;
    fn mul(self, x: f64) -> HoppingMatrix {
        self.scale(Complex64::new(x, 0.0))
    }
}

impl Mul<Complex64> for &HoppingMatrix {
    type Output = HoppingMatrix;
    fn mul(self, x: Complex64) -> HoppingMatrix {
        self.scale(x)
    }
}
