//! Construction options of a [`crate::Model`].
use ndarray::Array2;

/// Default tolerance of the Hermiticity check done when the input hoppings
/// contain the complex-conjugate terms.
pub const DEFAULT_CC_TOLERANCE: f64 = 1e-12;

/// Everything [`crate::Model::new`] needs besides the hoppings.
///
/// ```
/// use ndarray::array;
/// use tbmodels::ModelConfig;
///
/// let config = ModelConfig {
///     occ: Some(1),
///     pos: Some(array![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0]]),
///     ..Default::default()
/// };
/// assert!(config.contains_cc);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Number of orbitals. Defaults to the size of the hopping matrices.
    pub size: Option<usize>,
    /// Number of occupied states.
    pub occ: Option<usize>,
    /// Fractional orbital positions, one row of three coordinates per
    /// orbital. Positions outside the home cell are mapped back into it.
    /// Defaults to the origin for every orbital.
    pub pos: Option<Array2<f64>>,
    /// Lattice vectors as the columns of a 3×3 matrix.
    pub uc: Option<Array2<f64>>,
    /// Whether the hoppings contain both members of every $\\{\bm G,-\bm G\\}$
    /// pair (the full on-site block at $\bm G=0$), or only the reduced
    /// representation without the complex-conjugate terms (and half the
    /// on-site block).
    pub contains_cc: bool,
    /// Tolerance of the consistency check of the complex-conjugate terms.
    pub cc_tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            size: None,
            occ: None,
            pos: None,
            uc: None,
            contains_cc: true,
            cc_tolerance: DEFAULT_CC_TOLERANCE,
        }
    }
}

impl ModelConfig {
    /// Options used when re-assembling a model from an already reduced table.
    pub(crate) fn derived(size: usize, occ: Option<usize>, pos: Array2<f64>, uc: Option<Array2<f64>>) -> Self {
        ModelConfig {
            size: Some(size),
            occ,
            pos: Some(pos),
            uc,
            contains_cc: false,
            cc_tolerance: DEFAULT_CC_TOLERANCE,
        }
    }
}
