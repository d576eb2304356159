//! Offset-increment planner.
//!
//! A [`Plan`] lists the loop levels of a walk innermost first, together with
//! each view's stride at that level and the per-level *increments*: the
//! amount added to a view's running offset when the loop at that level
//! advances. After the innermost loop has run `dims[0]` times the offset has
//! moved by `dims[0] * strides[0]`, so the increment for level 1 subtracts
//! that back out:
//!
//! ```text
//! inc[0] = strides[0]
//! inc[k] = strides[k] - dims[k-1] * strides[k-1]
//! ```
//!
//! Walkers only ever add increments, never multiply.

use ndwalk_view::{Layout, Order};
use smallvec::SmallVec;

use crate::fuse::{fuse_levels, squeeze_levels};

/// Inline vector sized for the specialized ranks.
pub(crate) type SVec<T> = SmallVec<[T; 8]>;

/// Loop levels and per-view offsets for walking `M` views of one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<const M: usize> {
    dims: SVec<usize>,
    strides: SVec<[isize; M]>,
    incs: SVec<[isize; M]>,
    offsets: [isize; M],
}

impl<const M: usize> Plan<M> {
    /// Plan a walk over `layouts`, which must share one shape.
    ///
    /// Levels follow the order of `layouts[0]`. With `fuse`, size-1 levels are
    /// dropped and contiguous levels merged.
    ///
    /// # Panics
    /// If `M == 0` or the layouts disagree in rank.
    pub fn new(layouts: [&Layout; M], fuse: bool) -> Self {
        let primary = layouts[0];
        let rank = primary.rank();
        let mut dims: SVec<usize> = SmallVec::with_capacity(rank);
        let mut strides: SVec<[isize; M]> = SmallVec::with_capacity(rank);
        for k in 0..rank {
            let d = primary.order().dim_at(rank, k);
            dims.push(primary.shape()[d]);
            strides.push(std::array::from_fn(|v| layouts[v].strides()[d]));
        }
        let offsets = std::array::from_fn(|v| layouts[v].offset() as isize);
        if fuse && !dims.iter().any(|&n| n == 0) {
            squeeze_levels(&mut dims, &mut strides);
            fuse_levels(&mut dims, &mut strides);
        }
        Self::from_levels(dims, strides, offsets)
    }

    /// Build a plan from levels that are already traversal-ordered.
    pub(crate) fn from_levels(
        dims: SVec<usize>,
        strides: SVec<[isize; M]>,
        offsets: [isize; M],
    ) -> Self {
        debug_assert_eq!(dims.len(), strides.len());
        let mut incs: SVec<[isize; M]> = SmallVec::with_capacity(dims.len());
        for k in 0..dims.len() {
            if k == 0 {
                incs.push(strides[0]);
            } else {
                let n = dims[k - 1] as isize;
                incs.push(std::array::from_fn(|v| strides[k][v] - n * strides[k - 1][v]));
            }
        }
        Self {
            dims,
            strides,
            incs,
            offsets,
        }
    }

    /// Number of loop levels.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of visits.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&n| n == 0)
    }

    /// Loop extents, innermost first.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Per-level strides, innermost first; `strides()[k][v]` belongs to view `v`.
    #[inline]
    pub fn strides(&self) -> &[[isize; M]] {
        &self.strides
    }

    /// Per-level increments, innermost first.
    #[inline]
    pub fn increments(&self) -> &[[isize; M]] {
        &self.incs
    }

    /// Starting offset of each view.
    #[inline]
    pub fn offsets(&self) -> [isize; M] {
        self.offsets
    }

    /// Drop an outermost level of extent 1.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn without_outer(&self) -> Self {
        let top = self.rank() - 1;
        debug_assert_eq!(self.dims[top], 1);
        Self::from_levels(
            self.dims[..top].iter().copied().collect(),
            self.strides[..top].iter().copied().collect(),
            self.offsets,
        )
    }

    /// Split the outermost level into `[0, at)` and `[at, n)`.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn split_outer(&self, at: usize) -> (Self, Self) {
        let top = self.rank() - 1;
        let n = self.dims[top];
        debug_assert!(at > 0 && at < n);
        let mut left_dims = self.dims.clone();
        left_dims[top] = at;
        let mut right_dims = self.dims.clone();
        right_dims[top] = n - at;
        let right_offsets =
            std::array::from_fn(|v| self.offsets[v] + at as isize * self.strides[top][v]);
        (
            Self::from_levels(left_dims, self.strides.clone(), self.offsets),
            Self::from_levels(right_dims, self.strides.clone(), right_offsets),
        )
    }
}

/// Increments for a single view walked in `order`, innermost level first.
pub fn increments(shape: &[usize], strides: &[isize], order: Order) -> Vec<isize> {
    let rank = shape.len();
    let mut out = Vec::with_capacity(rank);
    for k in 0..rank {
        let d = order.dim_at(rank, k);
        if k == 0 {
            out.push(strides[d]);
        } else {
            let p = order.dim_at(rank, k - 1);
            out.push(strides[d] - shape[p] as isize * strides[p]);
        }
    }
    out
}
