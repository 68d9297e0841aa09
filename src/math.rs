//! Integer 3×3 helpers for lattice transformations.
use ndarray::{ArrayBase, Data, Ix2};

/// Exact determinant of an integer 3×3 matrix.
pub fn det3<S>(m: &ArrayBase<S, Ix2>) -> i64
where
    S: Data<Elem = isize>,
{
    let a = |i: usize, j: usize| m[[i, j]] as i64;
    a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1)) - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
        + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0))
}
