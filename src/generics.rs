//! Generic support for hopping amplitudes given as real or complex numbers.
use num_complex::Complex64;
use num_traits::identities::Zero;

/// Scalar types accepted as raw hopping amplitudes.
///
/// Lets dense real matrices and dense complex matrices go through the same
/// constructors of [`crate::HoppingMatrix`].
pub trait HopValue: Copy + Clone + Zero {
    fn to_complex(&self) -> Complex64;
}

impl HopValue for f64 {
    fn to_complex(&self) -> Complex64 {
        Complex64::new(*self, 0.0)
    }
}

impl HopValue for Complex64 {
    fn to_complex(&self) -> Complex64 {
        *self
    }
}
