use crate::{BasisJacobian, PolyError};

/// A function that is linear in its coefficients: `f(x) = c . basis(x)`.
///
/// Implementors supply the basis and its Jacobian; evaluation and the
/// gradient follow from the coefficients.
pub trait LinearFunction {
    fn num_variables(&self) -> usize;

    fn coefficients(&self) -> &[f64];

    /// Replace the coefficients. The length must match the current basis.
    fn set_coefficients(&mut self, coefficients: Vec<f64>) -> Result<(), PolyError>;

    fn eval_basis_functions(&self, x: &[f64]) -> Result<Vec<f64>, PolyError>;

    fn eval_basis_functions_jacobian(&self, x: &[f64]) -> Result<BasisJacobian, PolyError>;

    fn num_coefficients(&self) -> usize {
        self.coefficients().len()
    }

    fn eval(&self, x: &[f64]) -> Result<f64, PolyError> {
        let basis = self.eval_basis_functions(x)?;
        let coefficients = self.coefficients();
        if basis.len() != coefficients.len() {
            return Err(PolyError::BasisSizeMismatch {
                expected: coefficients.len(),
                actual: basis.len(),
            });
        }
        Ok(coefficients.iter().zip(&basis).map(|(c, b)| c * b).sum())
    }

    /// Gradient of `f` at `x`, one entry per variable.
    fn eval_jacobian(&self, x: &[f64]) -> Result<Vec<f64>, PolyError> {
        let jacobian = self.eval_basis_functions_jacobian(x)?;
        let coefficients = self.coefficients();
        if jacobian.num_rows() != coefficients.len() {
            return Err(PolyError::BasisSizeMismatch {
                expected: coefficients.len(),
                actual: jacobian.num_rows(),
            });
        }
        Ok(jacobian.transpose_mul(coefficients))
    }
}
