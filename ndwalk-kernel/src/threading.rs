//! Rayon-based parallel execution.
//!
//! Work is split by halving the outermost loop level with `rayon::join`
//! until each piece is at most [`MINTHREADLENGTH`] elements or no threads
//! remain; each leaf runs the sequential walker over its sub-plan.

use ndwalk_view::Layout;

use crate::config::MINTHREADLENGTH;
use crate::plan::Plan;
use crate::Result;

/// Raw destination pointer shared across leaves.
///
/// Leaves write disjoint slots, so sharing the pointer is sound as long as
/// the layout never maps two positions to one slot (see [`may_overlap`]).
pub(crate) struct SendPtr<T> {
    ptr: *mut T,
    len: usize,
}

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T: Send> Send for SendPtr<T> {}
unsafe impl<T: Send> Sync for SendPtr<T> {}

impl<T: Copy> SendPtr<T> {
    pub(crate) fn new(slice: &mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
        }
    }

    /// Write `value` at `index`.
    ///
    /// # Safety
    /// The buffer must outlive the call and no other thread may access
    /// `index` concurrently.
    #[inline(always)]
    pub(crate) unsafe fn write(self, index: usize, value: T) {
        assert!(index < self.len, "index {} out of bounds for {}", index, self.len);
        self.ptr.add(index).write(value);
    }
}

/// True if two different positions of `layout` can address the same slot.
///
/// Conservative: sorting extents by stride magnitude, every stride must step
/// past everything the smaller strides can reach.
pub(crate) fn may_overlap(layout: &Layout) -> bool {
    let mut levels: Vec<(usize, usize)> = layout
        .shape()
        .iter()
        .zip(layout.strides().iter())
        .filter(|&(&n, _)| n > 1)
        .map(|(&n, &s)| (s.unsigned_abs(), n))
        .collect();
    levels.sort_unstable();
    let mut reach = 0usize;
    for (s, n) in levels {
        if s <= reach || s == 0 {
            return true;
        }
        reach = match s.checked_mul(n - 1).and_then(|r| r.checked_add(reach)) {
            Some(r) => r,
            None => return true,
        };
    }
    false
}

/// Run `f` over `plan`, split across the rayon pool.
pub(crate) fn par_walk<const M: usize, F>(plan: &Plan<M>, f: &F) -> Result<()>
where
    F: Fn(&Plan<M>) -> Result<()> + Sync,
{
    split_threaded(plan, rayon::current_num_threads(), f)
}

fn split_threaded<const M: usize, F>(plan: &Plan<M>, nthreads: usize, f: &F) -> Result<()>
where
    F: Fn(&Plan<M>) -> Result<()> + Sync,
{
    let rank = plan.rank();
    if nthreads <= 1 || rank == 0 || plan.len() <= MINTHREADLENGTH {
        return f(plan);
    }
    let n = plan.dims()[rank - 1];
    if n < 2 {
        return split_threaded(&plan.without_outer(), nthreads, f);
    }

    let (left, right) = plan.split_outer(n / 2);
    let nt_left = nthreads / 2;
    let nt_right = nthreads - nt_left;
    let (r1, r2) = rayon::join(
        || split_threaded(&left, nt_left, f),
        || split_threaded(&right, nt_right, f),
    );
    r1?;
    r2
}
