//! Rank-specialized walkers.
//!
//! Every walker visits the Cartesian product of a [`Plan`]'s levels exactly
//! once, outermost level slowest, and calls `f(index, offsets)` at each
//! position. `index` counts visits from 0; `offsets` holds one running buffer
//! offset per view, advanced only by the plan's increments.
//!
//! - [`Scalar`]: rank 0, a single visit
//! - [`Ranked<N>`]: fixed rank `N`, loop bounds known at compile time
//! - [`Generic`]: any rank, index stack on the heap past 8 levels

use crate::plan::{Plan, SVec};

/// A strategy for walking a plan.
pub trait Walker {
    /// Walk `plan`, stopping at the first error returned by `f`.
    fn walk<const M: usize, E, F>(plan: &Plan<M>, f: F) -> Result<(), E>
    where
        F: FnMut(usize, &[isize; M]) -> Result<(), E>;
}

#[inline(always)]
fn bump<const M: usize>(offsets: &mut [isize; M], inc: &[isize; M]) {
    for (o, &d) in offsets.iter_mut().zip(inc.iter()) {
        *o += d;
    }
}

// ============================================================================
// Scalar
// ============================================================================

/// Rank-0 walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Walker for Scalar {
    #[inline]
    fn walk<const M: usize, E, F>(plan: &Plan<M>, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, &[isize; M]) -> Result<(), E>,
    {
        debug_assert_eq!(plan.rank(), 0);
        f(0, &plan.offsets())
    }
}

// ============================================================================
// Ranked<N>
// ============================================================================

/// Walker for plans of exactly `N` levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranked<const N: usize>;

impl<const N: usize> Walker for Ranked<N> {
    #[inline]
    fn walk<const M: usize, E, F>(plan: &Plan<M>, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, &[isize; M]) -> Result<(), E>,
    {
        assert_eq!(plan.rank(), N, "Ranked<{}> walker given a rank-{} plan", N, plan.rank());
        if N == 0 {
            return Scalar::walk(plan, f);
        }
        if plan.is_empty() {
            return Ok(());
        }
        let dims: [usize; N] = std::array::from_fn(|k| plan.dims()[k]);
        let incs: [[isize; M]; N] = std::array::from_fn(|k| plan.increments()[k]);
        let mut offsets = plan.offsets();
        let mut idx = [0usize; N];
        let mut count = 0usize;
        loop {
            for _ in 0..dims[0] {
                f(count, &offsets)?;
                count += 1;
                bump(&mut offsets, &incs[0]);
            }
            let mut k = 1;
            loop {
                if k == N {
                    return Ok(());
                }
                bump(&mut offsets, &incs[k]);
                idx[k] += 1;
                if idx[k] < dims[k] {
                    break;
                }
                idx[k] = 0;
                k += 1;
            }
        }
    }
}

// ============================================================================
// Generic
// ============================================================================

/// Walker for plans of any rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Walker for Generic {
    fn walk<const M: usize, E, F>(plan: &Plan<M>, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, &[isize; M]) -> Result<(), E>,
    {
        let rank = plan.rank();
        if rank == 0 {
            return Scalar::walk(plan, f);
        }
        if plan.is_empty() {
            return Ok(());
        }
        let dims = plan.dims();
        let incs = plan.increments();
        let inner = dims[0];
        let mut offsets = plan.offsets();
        let mut stack: SVec<usize> = SVec::from_elem(0, rank);
        let mut count = 0usize;
        'outer: loop {
            for _ in 0..inner {
                f(count, &offsets)?;
                count += 1;
                bump(&mut offsets, &incs[0]);
            }
            for k in 1..rank {
                bump(&mut offsets, &incs[k]);
                stack[k] += 1;
                if stack[k] < dims[k] {
                    continue 'outer;
                }
                stack[k] = 0;
            }
            return Ok(());
        }
    }
}
