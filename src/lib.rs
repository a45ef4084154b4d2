//! Tensor-product polynomial surrogate models.
//!
//! A [`Polynomial`] is a linear combination of the monomials
//! `x_0^j_0 * ... * x_{n-1}^j_{n-1}` with `0 <= j_k <= degrees[k]`.
//! It can be evaluated, differentiated exactly, and saved to / loaded from disk.
//!
//! ```rust
//! use polysurrogate::{LinearFunction, Polynomial};
//!
//! // f(x, y) = 1 + 2y + 3x + 4xy
//! let poly = Polynomial::with_coefficients([1, 1], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(poly.eval(&[2.0, 5.0]).unwrap(), 57.0);
//! assert_eq!(poly.eval_jacobian(&[2.0, 5.0]).unwrap(), vec![23.0, 10.0]);
//! assert_eq!(poly.description(), "polynomial of degree 1");
//! ```

mod basis;
mod degrees;
mod gridex;
mod linear;
mod monomial;
mod persist;
mod polynomial;

#[cfg(test)]
mod test_utils;

pub use basis::*;
pub use degrees::*;
pub use gridex::{Gridex, flat_index, gridex_incl};
pub use linear::LinearFunction;
pub use monomial::Monomial;
pub use persist::{FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use polynomial::Polynomial;

use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PolyError {
    #[snafu(display(
        "Invalid variable: {} (polynomial has {} variables)",
        var,
        num_variables
    ))]
    InvalidVariable { var: usize, num_variables: usize },

    #[snafu(display(
        "Point has {} coordinates but polynomial has {} variables",
        actual,
        expected
    ))]
    DimensionMismatch { expected: usize, actual: usize },

    #[snafu(display(
        "Degrees {:?} require {} coefficients, got {}",
        degrees,
        expected,
        actual
    ))]
    CoefficientCountMismatch {
        degrees: Vec<u32>,
        expected: usize,
        actual: usize,
    },

    #[snafu(display("Degrees {:?} have too many basis functions to allocate", degrees))]
    TooManyBasisFunctions { degrees: Vec<u32> },

    #[snafu(display(
        "Basis has {} functions but {} were expected (bug in library or corrupt model)",
        actual,
        expected
    ))]
    BasisSizeMismatch { expected: usize, actual: usize },

    #[snafu(display("I/O error on {}: {}", path.display(), source))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to encode polynomial: {}", source))]
    Encode { source: postcard::Error },

    #[snafu(display("Failed to decode polynomial: {}", source))]
    Decode { source: postcard::Error },

    #[snafu(display("Not a polynomial model file"))]
    NotAModel,

    #[snafu(display("Unsupported format version {} (supported: {})", found, supported))]
    UnsupportedVersion { found: u8, supported: u8 },

    #[snafu(display("Model data truncated: expected {} bytes, got {}", expected, actual))]
    Truncated { expected: usize, actual: usize },

    #[snafu(display("Model data has {} unexpected trailing bytes", count))]
    TrailingBytes { count: usize },

    #[snafu(display(
        "Checksum mismatch: expected {:#010x}, got {:#010x}",
        expected,
        actual
    ))]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Coarse classification of [`PolyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an argument outside the polynomial's domain.
    InvalidArgument,
    /// A computed basis disagrees with the coefficient layout.
    InvariantViolation,
    /// Saving or loading failed.
    Persistence,
}

impl PolyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolyError::InvalidVariable { .. }
            | PolyError::DimensionMismatch { .. }
            | PolyError::CoefficientCountMismatch { .. }
            | PolyError::TooManyBasisFunctions { .. } => ErrorKind::InvalidArgument,
            PolyError::BasisSizeMismatch { .. } => ErrorKind::InvariantViolation,
            PolyError::Io { .. }
            | PolyError::Encode { .. }
            | PolyError::Decode { .. }
            | PolyError::NotAModel
            | PolyError::UnsupportedVersion { .. }
            | PolyError::Truncated { .. }
            | PolyError::TrailingBytes { .. }
            | PolyError::ChecksumMismatch { .. } => ErrorKind::Persistence,
        }
    }
}
