use smallvec::SmallVec;

use crate::gridex::{Gridex, gridex_incl};

/// Per-variable maximum exponent of a tensor-product polynomial basis.
///
/// For degrees `[d_0, ..., d_{n-1}]` the basis holds every monomial
/// `x_0^j_0 * ... * x_{n-1}^j_{n-1}` with `0 <= j_k <= d_k`, so there are
/// `(d_0 + 1) * ... * (d_{n-1} + 1)` basis functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DegreeSpec {
    degrees: SmallVec<[u32; 4]>,
}

impl DegreeSpec {
    pub fn new(degrees: impl IntoIterator<Item = u32>) -> Self {
        Self {
            degrees: degrees.into_iter().collect(),
        }
    }

    /// The same `degree` for each of `num_variables` variables.
    pub fn uniform(num_variables: usize, degree: u32) -> Self {
        Self {
            degrees: smallvec::smallvec![degree; num_variables],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.degrees.len()
    }

    pub fn get(&self, var: usize) -> Option<u32> {
        self.degrees.get(var).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.degrees
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.degrees.iter().copied()
    }

    /// Returns the shared degree if every variable has the same degree.
    ///
    /// A spec without variables is treated as uniform degree 0.
    pub fn uniform_degree(&self) -> Option<u32> {
        let first = self.degrees.first().copied().unwrap_or(0);
        self.degrees.iter().all(|&d| d == first).then_some(first)
    }

    /// Number of tensor-product basis functions, see [`compute_num_basis_functions`].
    pub fn num_basis_functions(&self) -> u64 {
        compute_num_basis_functions(&self.degrees)
    }

    /// Number of basis functions, or `None` if it does not fit in a `usize`.
    pub fn checked_num_basis_functions(&self) -> Option<usize> {
        self.degrees.iter().try_fold(1usize, |acc, &d| {
            let width = usize::try_from(d).ok()?.checked_add(1)?;
            acc.checked_mul(width)
        })
    }

    /// Exponent multi-index of every basis function, in coefficient order.
    pub fn exponents(&self) -> impl Iterator<Item = Gridex<u32>> + '_ {
        gridex_incl(&self.degrees)
    }
}

impl From<Vec<u32>> for DegreeSpec {
    fn from(degrees: Vec<u32>) -> Self {
        Self::new(degrees)
    }
}

impl<const N: usize> From<[u32; N]> for DegreeSpec {
    fn from(degrees: [u32; N]) -> Self {
        Self::new(degrees)
    }
}

impl From<&[u32]> for DegreeSpec {
    fn from(degrees: &[u32]) -> Self {
        Self::new(degrees.iter().copied())
    }
}

impl FromIterator<u32> for DegreeSpec {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Product of `(degree + 1)` over all variables. Returns 1 when there are no variables.
///
/// Uses wrapping `u64` arithmetic: specs whose true count exceeds `u64::MAX`
/// yield the count modulo 2^64. Use [`DegreeSpec::checked_num_basis_functions`]
/// before allocating anything of that size.
pub fn compute_num_basis_functions(degrees: &[u32]) -> u64 {
    let mut num_monomials = 1u64;
    for &deg in degrees {
        num_monomials = num_monomials.wrapping_mul(u64::from(deg) + 1);
    }
    num_monomials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_basis_functions_product() {
        assert_eq!(compute_num_basis_functions(&[2]), 3);
        assert_eq!(compute_num_basis_functions(&[1, 1]), 4);
        assert_eq!(compute_num_basis_functions(&[3, 0, 2]), 12);
        assert_eq!(DegreeSpec::uniform(3, 2).num_basis_functions(), 27);
    }

    #[test]
    fn num_basis_functions_no_variables() {
        assert_eq!(compute_num_basis_functions(&[]), 1);
        assert_eq!(DegreeSpec::default().checked_num_basis_functions(), Some(1));
    }

    #[test]
    fn num_basis_functions_wraps_deterministically() {
        // (2^32)^2 = 2^64 wraps to zero.
        let degrees = [u32::MAX, u32::MAX];
        assert_eq!(compute_num_basis_functions(&degrees), 0);
        assert_eq!(compute_num_basis_functions(&[u32::MAX, 0]), 1u64 << 32);
        assert_eq!(DegreeSpec::from(degrees).checked_num_basis_functions(), None);
    }

    #[test]
    fn uniform_degree_detection() {
        assert_eq!(DegreeSpec::uniform(4, 3).uniform_degree(), Some(3));
        assert_eq!(DegreeSpec::from([1, 2]).uniform_degree(), None);
        assert_eq!(DegreeSpec::default().uniform_degree(), Some(0));
    }

    #[test]
    fn exponents_match_basis_count() {
        let spec = DegreeSpec::from([2, 0, 1]);
        let exps = spec.exponents().collect::<Vec<_>>();
        assert_eq!(exps.len() as u64, spec.num_basis_functions());
        assert_eq!(exps[1].as_slice(), &[0, 0, 1]);
        assert_eq!(exps.last().map(|e| e.to_vec()), Some(vec![2, 0, 1]));
    }
}
