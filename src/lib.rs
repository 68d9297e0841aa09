//! Periodic tight-binding models.
//!
//! A [`Model`] is a crystal of `size` orbitals connected by complex hopping
//! amplitudes $\bra{i\bm 0}\hat H\ket{j\bm G}$ indexed by lattice vectors
//! $\bm G$. Only half of the Hermitian data is stored (see [`HoppingTable`]),
//! and the Bloch Hamiltonian is assembled as
//! $$H(\bm k)=\sum_{\bm G} h(\bm G)e^{2\pi i\bm G\cdot\bm k}+\text{h.c.}$$
//!
//! Models are immutable. Arithmetic, [`Model::supercell`],
//! [`Model::change_uc`], [`Model::trs`] and [`Model::em_field`] all return new
//! models.
//!
//! ```
//! use ndarray::array;
//! use tbmodels::{Model, ModelConfig};
//!
//! // a single-orbital chain with nearest-neighbour hopping t = 1
//! let chain = Model::new(
//!     vec![([1isize, 0, 0], array![[1.0]])],
//!     ModelConfig { contains_cc: false, ..Default::default() },
//! )
//! .unwrap();
//! let ham = chain.hamilton(&array![0.0, 0.0, 0.0]).unwrap();
//! assert!((ham[[0, 0]].re - 2.0).abs() < 1e-12);
//! ```
use ndarray::Array2;

pub mod arithmetic;
pub mod basis;
pub mod config;
pub mod eigen;
pub mod em_field;
pub mod error;
pub mod generics;
pub mod hopping;
pub mod kpoints;
pub mod lattice;
pub mod math;
pub mod model_struct;
#[cfg(feature = "lapack")]
pub mod ndarray_lapack;
pub mod output;
pub mod phy_const;
pub mod sparse;
pub mod supercell;
pub mod transform;

pub use crate::config::{DEFAULT_CC_TOLERANCE, ModelConfig};
pub use crate::eigen::{EigenSolver, EigenVal, NalgebraSolver};
pub use crate::em_field::{EmField, PositionMode};
pub use crate::error::{ErrorKind, Result, TbError};
pub use crate::generics::HopValue;
pub use crate::hopping::HoppingTable;
pub use crate::kpoints::gen_kmesh;
pub use crate::lattice::LatticeVector;
pub use crate::model_struct::{HoppingData, ModelData};
#[cfg(feature = "lapack")]
pub use crate::ndarray_lapack::LapackSolver;
pub use crate::phy_const::PEIERLS_PREFACTOR;
pub use crate::sparse::HoppingMatrix;
pub use crate::supercell::{FaceFlags, OccupationScaling, SupercellOptions, edge_detect_pos, pos_to_idx};

/// A periodic tight-binding model in reduced hopping representation.
///
/// Build it with [`Model::new`]; read it with the accessors in
/// `model_struct.rs`. Every operation that "changes" a model returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// The number of orbitals in the model.
    pub(crate) size: usize,
    /// The number of occupied states, if known.
    pub(crate) occ: Option<usize>,
    /// Orbital positions in fractional coordinates of the home unit cell,
    /// a size$\times$3 array with every entry in $[0,1)$.
    pub(crate) pos: Array2<f64>,
    /// The lattice vectors as columns of a 3$\times$3 matrix, if known.
    pub(crate) uc: Option<Array2<f64>>,
    /// The reduced hoppings $\bra{i\bm 0}\hat H\ket{j\bm G}$, canonical $\bm G$ only.
    pub(crate) hoppings: HoppingTable,
}
