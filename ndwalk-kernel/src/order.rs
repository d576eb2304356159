//! Loop ordering by stride importance, for the blocked walker.
//!
//! Each level gets one bit field per view; a view contributes a larger value
//! to levels where its stride is small. The destination counts twice. Levels
//! are then sorted by total importance, most important innermost.

/// Rank of each stride's magnitude among the non-zero strides (1 = smallest).
/// Zero strides rank 1.
pub(crate) fn index_order(strides: &[isize]) -> Vec<usize> {
    strides
        .iter()
        .map(|&si| {
            let si = si.unsigned_abs();
            if si == 0 {
                return 1;
            }
            1 + strides
                .iter()
                .filter(|&&s| s != 0 && s.unsigned_abs() < si)
                .count()
        })
        .collect()
}

/// Importance score per level. `views` lists per-view strides over the
/// levels; `views[0]` is weighted twice.
pub(crate) fn compute_importance(dims: &[usize], views: &[Vec<isize>]) -> Vec<u64> {
    let n = dims.len();
    let m = views.len();
    if n == 0 || m == 0 {
        return vec![0; n];
    }
    // Bits needed to sum m + 1 contributions without carrying into the next field.
    let g = (64 - (m as u64 + 1).leading_zeros()) as u64;

    let mut importance = vec![0u64; n];
    for (k, strides) in views.iter().enumerate() {
        let weight = if k == 0 { 2 } else { 1 };
        for (i, ord) in index_order(strides).into_iter().enumerate() {
            let shift = g * (n - ord) as u64;
            importance[i] += weight * (1u64 << shift.min(63));
        }
    }
    for (imp, &d) in importance.iter_mut().zip(dims.iter()) {
        if d <= 1 {
            *imp = 0;
        }
    }
    importance
}

/// Permutation of levels sorting importance descending. Ties keep their
/// original relative order.
pub(crate) fn sort_by_importance(importance: &[u64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..importance.len()).collect();
    indices.sort_by(|&a, &b| importance[b].cmp(&importance[a]));
    indices
}

/// Innermost-first level permutation for a blocked walk.
pub(crate) fn blocked_order<const M: usize>(
    dims: &[usize],
    strides: &[[isize; M]],
    dest: Option<usize>,
) -> Vec<usize> {
    let mut views: Vec<Vec<isize>> = (0..M)
        .map(|v| strides.iter().map(|s| s[v]).collect())
        .collect();
    if let Some(d) = dest {
        if d < M && d != 0 {
            let dest_strides = views.remove(d);
            views.insert(0, dest_strides);
        }
    }
    sort_by_importance(&compute_importance(dims, &views))
}
