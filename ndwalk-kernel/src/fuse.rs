//! Dimension fusion over traversal-ordered levels.
//!
//! Levels are listed innermost first. Level `k` can be merged into the level
//! below it when, for every view, stepping once along `k` lands exactly where
//! running off the end of `k - 1` would: `strides[k] == dims[k-1] * strides[k-1]`.
//! The merged loop then produces the same offsets in the same sequence.

use crate::plan::SVec;

/// Remove size-1 levels. They contribute one iteration and no movement.
pub(crate) fn squeeze_levels<const M: usize>(dims: &mut SVec<usize>, strides: &mut SVec<[isize; M]>) {
    let mut w = 0;
    for r in 0..dims.len() {
        if dims[r] != 1 {
            dims[w] = dims[r];
            strides[w] = strides[r];
            w += 1;
        }
    }
    dims.truncate(w);
    strides.truncate(w);
}

/// Merge adjacent levels that are contiguous for all views.
pub(crate) fn fuse_levels<const M: usize>(dims: &mut SVec<usize>, strides: &mut SVec<[isize; M]>) {
    if dims.len() <= 1 {
        return;
    }
    let mut last = 0;
    for k in 1..dims.len() {
        let n_prev = dims[last] as isize;
        let contiguous = (0..M).all(|v| strides[k][v] == n_prev * strides[last][v]);
        if contiguous {
            dims[last] *= dims[k];
        } else {
            last += 1;
            dims[last] = dims[k];
            strides[last] = strides[k];
        }
    }
    dims.truncate(last + 1);
    strides.truncate(last + 1);
}
