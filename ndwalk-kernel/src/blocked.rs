//! Tiled traversal.
//!
//! Levels are reordered by stride importance and cut into tiles of at most
//! `block` elements per level. Tiles are visited innermost level first, and
//! each tile is walked with the same increment scheme as the plain walkers.
//!
//! The callback index is the position in the plan's *declared* order, so it
//! identifies the element regardless of the tiling. The sequence of visits
//! differs from the declared order.

use crate::order::blocked_order;
use crate::plan::{Plan, SVec};
use crate::walker::{Scalar, Walker};

/// Walk `plan` in tiles of `block` elements per level. `dest` names the view
/// whose strides weigh most when choosing the loop order.
pub(crate) fn walk_blocked<const M: usize, E, F>(
    plan: &Plan<M>,
    block: usize,
    dest: Option<usize>,
    mut f: F,
) -> Result<(), E>
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

    // Declared-order weight of one step along each level.
    let mut weights: SVec<isize> = SVec::with_capacity(rank);
    let mut acc = 1isize;
    for &n in plan.dims() {
        weights.push(acc);
        acc *= n as isize;
    }

    let perm = blocked_order(plan.dims(), plan.strides(), dest);
    let dims: SVec<usize> = perm.iter().map(|&k| plan.dims()[k]).collect();
    let strides: SVec<[isize; M]> = perm.iter().map(|&k| plan.strides()[k]).collect();
    let weights: SVec<isize> = perm.iter().map(|&k| weights[k]).collect();
    let block = block.max(1);
    let start = plan.offsets();

    let mut origin: SVec<usize> = SVec::from_elem(0, rank);
    loop {
        let ext: SVec<usize> = (0..rank).map(|k| block.min(dims[k] - origin[k])).collect();
        let mut offsets = start;
        let mut index = 0isize;
        for k in 0..rank {
            let o = origin[k] as isize;
            for (off, &s) in offsets.iter_mut().zip(strides[k].iter()) {
                *off += o * s;
            }
            index += o * weights[k];
        }
        walk_tile(&ext, &strides, &weights, offsets, index, &mut f)?;

        let mut k = 0;
        loop {
            if k == rank {
                return Ok(());
            }
            origin[k] += block;
            if origin[k] < dims[k] {
                break;
            }
            origin[k] = 0;
            k += 1;
        }
    }
}

/// Walk one tile, carrying the declared index as an extra offset lane.
fn walk_tile<const M: usize, E, F>(
    ext: &[usize],
    strides: &[[isize; M]],
    weights: &[isize],
    offsets: [isize; M],
    index: isize,
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(usize, &[isize; M]) -> Result<(), E>,
{
    let rank = ext.len();
    let tile = Plan::from_levels(
        ext.iter().copied().collect(),
        strides.iter().copied().collect(),
        offsets,
    );
    let incs = tile.increments();
    let mut index_incs: SVec<isize> = SVec::with_capacity(rank);
    for k in 0..rank {
        if k == 0 {
            index_incs.push(weights[0]);
        } else {
            index_incs.push(weights[k] - ext[k - 1] as isize * weights[k - 1]);
        }
    }

    let mut offsets = offsets;
    let mut index = index;
    let mut stack: SVec<usize> = SVec::from_elem(0, rank);
    'outer: loop {
        for _ in 0..ext[0] {
            f(index as usize, &offsets)?;
            index += index_incs[0];
            for (o, &d) in offsets.iter_mut().zip(incs[0].iter()) {
                *o += d;
            }
        }
        for k in 1..rank {
            index += index_incs[k];
            for (o, &d) in offsets.iter_mut().zip(incs[k].iter()) {
                *o += d;
            }
            stack[k] += 1;
            if stack[k] < ext[k] {
                continue 'outer;
            }
            stack[k] = 0;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::Generic;
    use ndwalk_view::{Layout, Order};
    use std::collections::BTreeMap;
    use std::convert::Infallible;

    fn visits<const M: usize>(plan: &Plan<M>, block: usize) -> Vec<(usize, [isize; M])> {
        let mut out = Vec::new();
        walk_blocked(plan, block, None, |i, o| {
            out.push((i, *o));
            Ok::<(), Infallible>(())
        })
        .unwrap();
        out
    }

    #[test]
    fn test_blocked_visits_same_pairs_as_generic() {
        let a = Layout::new(&[5, 7, 3], &[1, 5, 35], 0, Order::RowMajor).unwrap();
        let b = Layout::row_major(&[5, 7, 3]);
        let plan = Plan::new([&a, &b], true);

        let mut expected = BTreeMap::new();
        Generic::walk(&plan, |i, o| {
            expected.insert(i, *o);
            Ok::<(), Infallible>(())
        })
        .unwrap();

        let got = visits(&plan, 2);
        assert_eq!(got.len(), 105);
        let got: BTreeMap<usize, [isize; 2]> = got.into_iter().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_blocked_tiles_change_sequence() {
        let a = Layout::row_major(&[4, 4]);
        let b = Layout::col_major(&[4, 4]);
        let plan = Plan::new([&a, &b], true);
        let seq: Vec<usize> = visits(&plan, 2).into_iter().map(|v| v.0).collect();
        // First tile covers rows 0..2 and columns 0..2.
        let mut first: Vec<usize> = seq[..4].to_vec();
        first.sort_unstable();
        assert_eq!(first, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_blocked_rank_zero_and_empty() {
        let s = Layout::new(&[], &[], 2, Order::RowMajor).unwrap();
        assert_eq!(visits(&Plan::new([&s], true), 4), vec![(0, [2])]);
        let e = Layout::row_major(&[3, 0]);
        assert!(visits(&Plan::new([&e], true), 4).is_empty());
    }

    #[test]
    fn test_blocked_block_larger_than_dims() {
        let a = Layout::new(&[3], &[2], 1, Order::RowMajor).unwrap();
        let plan = Plan::new([&a], true);
        assert_eq!(visits(&plan, 64), vec![(0, [1]), (1, [3]), (2, [5])]);
    }
}
