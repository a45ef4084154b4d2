use std::{fmt, path::Path};

use crate::{
    BasisJacobian, DegreeSpec, LinearFunction, Monomial, PolyError, basis, flat_index,
    persist::{self, PolynomialPayload},
};

/// Multivariate polynomial over a tensor-product monomial basis.
///
/// Coefficient `k` weights the `k`-th basis function, in the Kronecker
/// ordering described in [`crate::eval_basis_functions`]. The number of
/// coefficients always equals `degrees.num_basis_functions()`.
///
/// Queries take `&self` and never mutate, so a polynomial can be shared
/// across threads. [`Polynomial::load`] and [`LinearFunction::set_coefficients`]
/// need `&mut self` and therefore exclusive access.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    degrees: DegreeSpec,
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// A zero polynomial with every coefficient set to 0.
    pub fn new(degrees: impl Into<DegreeSpec>) -> Result<Self, PolyError> {
        let degrees = degrees.into();
        let num_coeffs = num_coefficients_for(&degrees)?;
        Ok(Self {
            degrees,
            coefficients: vec![0.0; num_coeffs],
        })
    }

    /// A zero polynomial of the same `degree` in each of `num_variables` variables.
    pub fn uniform(num_variables: usize, degree: u32) -> Result<Self, PolyError> {
        Self::new(DegreeSpec::uniform(num_variables, degree))
    }

    /// # Errors
    /// Fails with [`PolyError::CoefficientCountMismatch`] if the number of
    /// coefficients is not the number of basis functions of `degrees`.
    pub fn with_coefficients(
        degrees: impl Into<DegreeSpec>,
        coefficients: Vec<f64>,
    ) -> Result<Self, PolyError> {
        let degrees = degrees.into();
        check_coefficient_count(&degrees, coefficients.len())?;
        Ok(Self {
            degrees,
            coefficients,
        })
    }

    /// Load a polynomial previously written with [`Polynomial::save`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolyError> {
        let bytes = persist::read_file(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode a polynomial from the bytes produced by [`Polynomial::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PolyError> {
        let PolynomialPayload {
            degrees,
            coefficients,
        } = persist::decode(bytes)?;
        Self::with_coefficients(degrees, coefficients).inspect_err(|e| {
            log::debug!("Rejected decoded polynomial: {e}");
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PolyError> {
        persist::encode(&PolynomialPayload {
            degrees: self.degrees.as_slice().to_vec(),
            coefficients: self.coefficients.clone(),
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PolyError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        persist::write_file(path, &bytes)?;
        log::debug!("Saved {} to {}", self.description(), path.display());
        Ok(())
    }

    /// Replace this polynomial with the one stored at `path`.
    ///
    /// The file is fully decoded and validated before anything is replaced,
    /// so `self` is unchanged if loading fails.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PolyError> {
        let path = path.as_ref();
        *self = Self::from_file(path)?;
        log::debug!("Loaded {} from {}", self.description(), path.display());
        Ok(())
    }

    pub fn degrees(&self) -> &DegreeSpec {
        &self.degrees
    }

    /// Partial derivatives of every basis function with respect to `var`.
    pub fn eval_differentiated_monomials(
        &self,
        x: &[f64],
        var: usize,
    ) -> Result<Vec<f64>, PolyError> {
        let monomials = basis::eval_differentiated_monomials(&self.degrees, x, var)?;
        self.check_basis_len(monomials.len())?;
        Ok(monomials)
    }

    /// Coefficient of the basis function with the given exponents, or `None`
    /// if the exponents are not part of this basis.
    pub fn coefficient(&self, exponents: &[u32]) -> Option<f64> {
        let index = flat_index(exponents, self.degrees.as_slice())?;
        self.coefficients.get(index).copied()
    }

    /// The coefficients paired with the exponents of their basis functions,
    /// in coefficient order.
    pub fn terms(&self) -> impl Iterator<Item = Monomial> + '_ {
        self.degrees
            .exponents()
            .zip(&self.coefficients)
            .map(|(exp, &coeff)| Monomial { coeff, exp })
    }

    /// Human readable summary of the degrees, e.g. "polynomial of degree 3"
    /// or "polynomials of degrees (1, 2, 0)".
    pub fn description(&self) -> String {
        match self.degrees.uniform_degree() {
            Some(degree) => format!("polynomial of degree {degree}"),
            None => {
                let degrees = self
                    .degrees
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("polynomials of degrees ({degrees})")
            }
        }
    }

    fn check_basis_len(&self, actual: usize) -> Result<(), PolyError> {
        if actual != self.coefficients.len() {
            return Err(PolyError::BasisSizeMismatch {
                expected: self.coefficients.len(),
                actual,
            });
        }
        Ok(())
    }
}

impl LinearFunction for Polynomial {
    fn num_variables(&self) -> usize {
        self.degrees.num_variables()
    }

    fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn set_coefficients(&mut self, coefficients: Vec<f64>) -> Result<(), PolyError> {
        check_coefficient_count(&self.degrees, coefficients.len())?;
        self.coefficients = coefficients;
        Ok(())
    }

    fn eval_basis_functions(&self, x: &[f64]) -> Result<Vec<f64>, PolyError> {
        let monomials = basis::eval_basis_functions(&self.degrees, x)?;
        self.check_basis_len(monomials.len())?;
        Ok(monomials)
    }

    fn eval_basis_functions_jacobian(&self, x: &[f64]) -> Result<BasisJacobian, PolyError> {
        let jacobian = basis::eval_basis_functions_jacobian(&self.degrees, x)?;
        self.check_basis_len(jacobian.num_rows())?;
        Ok(jacobian)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

fn num_coefficients_for(degrees: &DegreeSpec) -> Result<usize, PolyError> {
    degrees
        .checked_num_basis_functions()
        .ok_or_else(|| PolyError::TooManyBasisFunctions {
            degrees: degrees.as_slice().to_vec(),
        })
}

fn check_coefficient_count(degrees: &DegreeSpec, actual: usize) -> Result<(), PolyError> {
    let expected = num_coefficients_for(degrees)?;
    if expected != actual {
        log::debug!(
            "Coefficient count {} does not match degrees {:?}",
            actual,
            degrees.as_slice()
        );
        return Err(PolyError::CoefficientCountMismatch {
            degrees: degrees.as_slice().to_vec(),
            expected,
            actual,
        });
    }
    Ok(())
}
