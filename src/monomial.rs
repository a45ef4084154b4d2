use fmtastic::{Subscript, Superscript};

use crate::gridex::Gridex;

/// A single weighted term of a polynomial.
#[derive(Clone, PartialEq)]
pub struct Monomial {
    /// Coefficient of the monomial
    ///
    /// For example, in 3.5 * x^2 * y^1 * z^0, the coefficient is 3.5
    pub(crate) coeff: f64,

    /// Exponents for each variable
    ///
    /// For example, if variables are ordered (x, y, z), and the monomial is 3 * x^2 * y^1 * z^0,
    /// then exp would be [2, 1, 0]
    pub(crate) exp: Gridex<u32>,
}

impl core::fmt::Debug for Monomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.exp.iter().any(|&e| e != 0) {
            if self.coeff != 1.0 {
                write!(f, "{} * ", self.coeff)?;
            }
        } else {
            write!(f, "{}", self.coeff)?;
            return Ok(());
        }

        let mut first = true;
        for (i, &e) in self.exp.iter().enumerate() {
            if e == 0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if e == 1 {
                write!(f, "x{}", Subscript(i))?;
            } else {
                write!(f, "x{}{}", Subscript(i), Superscript(e))?;
            }
        }
        Ok(())
    }
}

impl Monomial {
    pub fn new(coeff: f64, exp: impl IntoIterator<Item = u32>) -> Self {
        Self {
            coeff,
            exp: exp.into_iter().collect(),
        }
    }

    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    pub fn exponents(&self) -> &[u32] {
        &self.exp
    }

    /// Evaluate at `vars`. Missing trailing variables are treated as absent.
    pub fn eval(&self, vars: &[f64]) -> f64 {
        let mut result = self.coeff;
        for (&e, &x) in self.exp.iter().zip(vars) {
            result *= x.powi(e as i32);
        }
        result
    }

    /// Partial derivative with respect to variable `var`.
    ///
    /// Differentiating a variable with exponent 0 gives the zero monomial,
    /// which keeps its exponents so it still lines up with its basis function.
    pub fn derivative(&self, var: usize) -> Self {
        let mut exp = self.exp.clone();
        match exp.get_mut(var) {
            Some(e) if *e > 0 => {
                let coeff = self.coeff * f64::from(*e);
                *e -= 1;
                Self { coeff, exp }
            }
            _ => Self { coeff: 0.0, exp },
        }
    }
}
