//! Tensor-product monomial basis and its partial derivatives.
//!
//! The basis vector for degrees `[d_0, ..., d_{n-1}]` at a point `x` is the
//! Kronecker product of the per-variable power vectors
//! `[1, x_i, x_i^2, ..., x_i^d_i]`, taken in variable order. The last variable
//! varies fastest, e.g. for degrees `[1, 1]` the basis is `[1, y, x, xy]`.
//! Coefficient vectors use the same ordering.

use smallvec::SmallVec;

use crate::{DegreeSpec, PolyError};

// Most power vectors are short, keep them on the stack.
type PowerVec = SmallVec<[f64; 8]>;

/// Powers `[1, x, x^2, ..., x^degree]`. The first entry is 1 even for x = 0.
pub fn power_vector(x: f64, degree: u32) -> PowerVec {
    let mut powers = PowerVec::with_capacity((degree as usize).saturating_add(1));
    let mut power = 1.0;
    powers.push(power);
    for _ in 0..degree {
        power *= x;
        powers.push(power);
    }
    powers
}

/// Derivatives of [`power_vector`] with respect to x:
/// `[0, 1, 2x, 3x^2, ..., degree * x^(degree-1)]`.
pub fn differentiated_power_vector(x: f64, degree: u32) -> PowerVec {
    let mut powers = PowerVec::with_capacity((degree as usize).saturating_add(1));
    powers.push(0.0);
    // x^(j-1), built up alongside j
    let mut power = 1.0;
    for j in 1..=degree {
        powers.push(f64::from(j) * power);
        power *= x;
    }
    powers
}

/// Kronecker product of two vectors. Entries of `rhs` vary fastest.
pub fn kronecker_product(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    let mut result = Vec::with_capacity(lhs.len() * rhs.len());
    for &a in lhs {
        for &b in rhs {
            result.push(a * b);
        }
    }
    result
}

/// Evaluate every basis function of `degrees` at `x`.
pub fn eval_basis_functions(degrees: &DegreeSpec, x: &[f64]) -> Result<Vec<f64>, PolyError> {
    check_point(degrees, x)?;
    let expected = checked_basis_size(degrees)?;
    let basis = tensor_basis(degrees, x, None);
    check_basis_size(expected, basis.len())?;
    Ok(basis)
}

/// Partial derivative of every basis function with respect to variable `var`.
pub fn eval_differentiated_monomials(
    degrees: &DegreeSpec,
    x: &[f64],
    var: usize,
) -> Result<Vec<f64>, PolyError> {
    if var >= degrees.num_variables() {
        return Err(PolyError::InvalidVariable {
            var,
            num_variables: degrees.num_variables(),
        });
    }
    check_point(degrees, x)?;
    let expected = checked_basis_size(degrees)?;
    let basis = tensor_basis(degrees, x, Some(var));
    check_basis_size(expected, basis.len())?;
    Ok(basis)
}

/// Jacobian of the basis vector: column `v` holds the partial derivatives of
/// all basis functions with respect to variable `v`.
pub fn eval_basis_functions_jacobian(
    degrees: &DegreeSpec,
    x: &[f64],
) -> Result<BasisJacobian, PolyError> {
    check_point(degrees, x)?;
    let num_rows = checked_basis_size(degrees)?;

    let mut jacobian = BasisJacobian::zeros(num_rows, degrees.num_variables());
    for var in 0..degrees.num_variables() {
        let column = eval_differentiated_monomials(degrees, x, var)?;
        jacobian.set_column(var, &column);
    }
    Ok(jacobian)
}

/// Builds the Kronecker product of all power vectors, differentiating the
/// power vector of `differentiate` if given.
fn tensor_basis(degrees: &DegreeSpec, x: &[f64], differentiate: Option<usize>) -> Vec<f64> {
    let mut basis = vec![1.0];
    for (var, (deg, &xi)) in degrees.iter().zip(x).enumerate() {
        let powers = if differentiate == Some(var) {
            differentiated_power_vector(xi, deg)
        } else {
            power_vector(xi, deg)
        };
        basis = kronecker_product(&basis, &powers);
    }
    log::trace!("basis of {:?} has {} functions", degrees.as_slice(), basis.len());
    basis
}

fn check_point(degrees: &DegreeSpec, x: &[f64]) -> Result<(), PolyError> {
    if x.len() != degrees.num_variables() {
        return Err(PolyError::DimensionMismatch {
            expected: degrees.num_variables(),
            actual: x.len(),
        });
    }
    Ok(())
}

/// Number of basis functions, if a basis of that size can be allocated at all.
fn checked_basis_size(degrees: &DegreeSpec) -> Result<usize, PolyError> {
    degrees
        .checked_num_basis_functions()
        .ok_or_else(|| PolyError::TooManyBasisFunctions {
            degrees: degrees.as_slice().to_vec(),
        })
}

fn check_basis_size(expected: usize, actual: usize) -> Result<(), PolyError> {
    if expected != actual {
        return Err(PolyError::BasisSizeMismatch { expected, actual });
    }
    Ok(())
}

/// Dense `num_basis_functions x num_variables` matrix of basis partial derivatives.
///
/// Stored row-major: the derivatives of one basis function are contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisJacobian {
    values: Vec<f64>,
    num_rows: usize,
    num_cols: usize,
}

impl BasisJacobian {
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            values: vec![0.0; num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.num_rows && col < self.num_cols);
        self.values[row * self.num_cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.num_cols;
        &self.values[start..start + self.num_cols]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(col < self.num_cols);
        self.values
            .iter()
            .skip(col)
            .step_by(self.num_cols)
            .copied()
    }

    /// Computes `coeffs^T * J`, the gradient of `coeffs . basis(x)`.
    ///
    /// # Panics
    /// Panics if `coeffs.len() != self.num_rows()`.
    pub fn transpose_mul(&self, coeffs: &[f64]) -> Vec<f64> {
        assert_eq!(coeffs.len(), self.num_rows, "Coefficient count mismatch");
        let mut result = vec![0.0; self.num_cols];
        for (row, &c) in coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            for (r, &d) in result.iter_mut().zip(self.row(row)) {
                *r += c * d;
            }
        }
        result
    }

    pub(crate) fn set_column(&mut self, col: usize, values: &[f64]) {
        debug_assert_eq!(values.len(), self.num_rows);
        for (row, &v) in values.iter().enumerate() {
            self.values[row * self.num_cols + col] = v;
        }
    }
}
