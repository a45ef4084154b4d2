use num_traits::{Num, NumAssignOps};
use smallvec::SmallVec;

/// A multi-index into a tensor-product grid, one entry per variable.
pub type Gridex<T> = SmallVec<[T; 4]>;

/// Iterates over all multi-indices [i_0, i_1, ..., i_{n-1}] such that
///     0 <= i_k <= max_index[k] for each variable k.
///
/// Ordering is lexicographic with the last variable varying fastest, which is
/// the same ordering as the Kronecker product of the per-variable vectors.
/// An empty `max_index` yields exactly one (empty) multi-index.
pub fn gridex_incl<T: Num + NumAssignOps + Copy + PartialOrd>(
    max_index: &[T],
) -> impl Iterator<Item = Gridex<T>> + '_ {
    let mut indices: Gridex<T> = max_index.iter().map(|_| T::zero()).collect();
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        let current = indices.clone();

        // Increment indices, carrying into the previous variable on overflow.
        done = true;
        for i in (0..max_index.len()).rev() {
            if indices[i] < max_index[i] {
                indices[i] += T::one();
                done = false;
                break;
            }
            indices[i] = T::zero();
        }

        Some(current)
    })
}

/// Flat position of `gridex` in the Kronecker ordering of a grid whose
/// per-variable maximum indices are `max_index`.
///
/// Returns `None` if the lengths differ, an index exceeds its maximum, or the
/// position does not fit in a `usize`.
pub fn flat_index(gridex: &[u32], max_index: &[u32]) -> Option<usize> {
    if gridex.len() != max_index.len() {
        return None;
    }
    gridex
        .iter()
        .zip(max_index)
        .try_fold(0usize, |index, (&i, &max)| {
            if i > max {
                return None;
            }
            let width = usize::try_from(max).ok()?.checked_add(1)?;
            index.checked_mul(width)?.checked_add(usize::try_from(i).ok()?)
        })
}
