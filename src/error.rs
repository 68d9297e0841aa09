//! src/error.rs
//! Error types for the whole crate.
//!
//! Every fallible operation returns [`Result`]. The variants are grouped into
//! three kinds, see [`ErrorKind`]: malformed arguments from the caller,
//! input data that does not describe a Hermitian Hamiltonian, and failures of
//! the numerical back end.

use crate::lattice::LatticeVector;
use thiserror::Error;

/// Coarse classification of a [`TbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or contradictory arguments. Never worth retrying.
    Configuration,
    /// The supplied hoppings claim to be Hermitian but are not.
    PhysicalConsistency,
    /// The eigensolver failed.
    Numerical,
}

/// The primary error type for all fallible operations in this library.
#[derive(Error, Debug)]
pub enum TbError {
    // --- Construction ---
    #[error("Empty hoppings supplied and no size given: cannot determine the number of orbitals.")]
    UnknownSize,

    #[error("A model must contain at least one orbital.")]
    EmptyModel,

    #[error("Hopping matrix at G={g} has shape {found:?}, should be {expected:?}.")]
    HoppingShape {
        g: LatticeVector,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Dimension mismatch for '{context}': expected {expected}, got {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    // --- Physics ---
    #[error(
        "The provided hoppings do not correspond to a hermitian Hamiltonian: \
         hoppings[-G] = hoppings[G].H is violated at G={g} (deviation {deviation:e}, tolerance {tolerance:e})."
    )]
    NonHermitian {
        g: LatticeVector,
        deviation: f64,
        tolerance: f64,
    },

    // --- Derived models ---
    #[error("Error when combining models: {what} don't match.\nModel 1: {left}\nModel 2: {right}")]
    OperandMismatch {
        what: &'static str,
        left: String,
        right: String,
    },

    #[error("Invalid supercell dimension {0:?}: every entry must be >= 1.")]
    InvalidSupercellSize([usize; 3]),

    #[error("Unit cell {cell:?} is out of bounds for a supercell of dimension {dim:?}.")]
    CellOutOfBounds { cell: [usize; 3], dim: [usize; 3] },

    #[error("The determinant of the unit-cell transformation is {0}, but should be 1.")]
    InvalidDeterminant(i64),

    #[error("Cannot divide a model by zero.")]
    DivisionByZero,

    #[error("Unrecognized value '{value}' for {argument}. Must be either \"absolute\" or \"relative\".")]
    UnrecognizedMode { argument: &'static str, value: String },

    #[error("Unit cell is not specified, but '{0}' requires it.")]
    MissingUnitCell(&'static str),

    // --- Numerical back end ---
    #[error("Eigensolver failed: {0}")]
    EigenSolver(String),

    #[cfg(feature = "lapack")]
    #[error("Linear algebra operation failed")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
}

impl TbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TbError::NonHermitian { .. } => ErrorKind::PhysicalConsistency,
            TbError::EigenSolver(_) => ErrorKind::Numerical,
            #[cfg(feature = "lapack")]
            TbError::Linalg(_) => ErrorKind::Numerical,
            _ => ErrorKind::Configuration,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_physical_consistency(&self) -> bool {
        self.kind() == ErrorKind::PhysicalConsistency
    }
}

/// A specialized `Result` type for this library's operations.
pub type Result<T> = std::result::Result<T, TbError>;
