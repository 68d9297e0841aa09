//! Physical constants in SI units.
/// Elementary charge in C.
pub const ELEMENT_CHARGE: f64 = 1.602176487e-19;
/// Reduced Planck constant in J·s.
pub const HBAR: f64 = 1.054571628e-34;

/// $e/2\hbar$ in $1/(\mathrm{T}\cdot\text{\AA}^2)$, the default prefactor of the
/// Peierls phase for a vector potential in $\mathrm{T}\cdot\text{\AA}$ and
/// lattice vectors in $\text{\AA}$.
///
/// Equal to `ELEMENT_CHARGE / HBAR * 1e-20 / 2.0` to the printed digits,
/// with [`ELEMENT_CHARGE`] and [`HBAR`] above.
pub const PEIERLS_PREFACTOR: f64 = 7.596337572e-6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peierls_prefactor_is_e_over_2hbar() {
        let from_constants = ELEMENT_CHARGE / HBAR * 1e-20 / 2.0;
        assert!(((PEIERLS_PREFACTOR - from_constants) / from_constants).abs() < 1e-6);
    }
}
