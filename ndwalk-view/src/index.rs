//! Conversions between view linear indices, subscripts and buffer indices.
//!
//! A *view* linear index counts elements in the layout's order: for a
//! row-major layout the last subscript varies fastest, for column-major the
//! first. A *buffer* index is the logical element index
//! `offset + sum(sub[k] * strides[k])`.

use crate::layout::Layout;
use crate::{Result, WalkError};

/// How an out-of-range index is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexMode {
    /// Fail with [`WalkError::IndexOutOfBounds`].
    #[default]
    Throw,
    /// Wrap modulo the length; negative indices count from the end.
    Wrap,
    /// Clamp into `[0, len - 1]`.
    Clamp,
}

impl IndexMode {
    /// Map `index` into `0..len` according to the mode.
    pub fn resolve(self, index: isize, len: usize) -> Result<usize> {
        let out_of_bounds = WalkError::IndexOutOfBounds { index, len };
        if len == 0 {
            return Err(out_of_bounds);
        }
        let n = isize::try_from(len).map_err(|_| WalkError::OffsetOverflow)?;
        match self {
            IndexMode::Throw if index < 0 || index >= n => Err(out_of_bounds),
            IndexMode::Throw => Ok(index as usize),
            IndexMode::Wrap => Ok(index.rem_euclid(n) as usize),
            IndexMode::Clamp => Ok(index.clamp(0, n - 1) as usize),
        }
    }
}

/// Convert a view linear index into subscripts.
pub fn ind2sub(layout: &Layout, index: isize, mode: IndexMode) -> Result<Vec<usize>> {
    let mut rem = mode.resolve(index, layout.len())?;
    let rank = layout.rank();
    let shape = layout.shape();
    let mut subs = vec![0usize; rank];
    for k in 0..rank {
        let d = layout.order().dim_at(rank, k);
        subs[d] = rem % shape[d];
        rem /= shape[d];
    }
    Ok(subs)
}

/// Convert subscripts into a buffer index. `mode` applies per dimension.
pub fn sub2bind(layout: &Layout, subs: &[isize], mode: IndexMode) -> Result<isize> {
    if subs.len() != layout.rank() {
        return Err(WalkError::RankMismatch(subs.len(), layout.rank()));
    }
    let mut idx = isize::try_from(layout.offset()).map_err(|_| WalkError::OffsetOverflow)?;
    for ((&i, &n), &s) in subs
        .iter()
        .zip(layout.shape().iter())
        .zip(layout.strides().iter())
    {
        let i = mode.resolve(i, n)? as isize;
        idx = i
            .checked_mul(s)
            .and_then(|step| idx.checked_add(step))
            .ok_or(WalkError::OffsetOverflow)?;
    }
    Ok(idx)
}

/// Convert a view linear index into a buffer index.
pub fn vind2bind(layout: &Layout, index: isize, mode: IndexMode) -> Result<isize> {
    let subs: Vec<isize> = ind2sub(layout, index, mode)?
        .into_iter()
        .map(|i| i as isize)
        .collect();
    sub2bind(layout, &subs, IndexMode::Throw)
}

/// Convert a buffer index into a view linear index.
///
/// `mode` applies to the range of buffer indices the layout reaches. An
/// in-range index that no element maps to is rejected in every mode. Layouts
/// where two subscripts share a buffer index (zero or overlapping strides)
/// resolve to the first of them in view order.
///
/// When every stride steps past all the smaller ones can reach, the index is
/// decomposed directly. Other layouts are searched element by element.
pub fn bind2vind(layout: &Layout, index: isize, mode: IndexMode) -> Result<usize> {
    if layout.is_empty() {
        return Err(WalkError::IndexOutOfBounds { index, len: 0 });
    }
    let (min, max) = layout.min_max_index()?;
    let span = (max - min) as usize + 1;
    let rel = mode.resolve(index - min, span).map_err(|err| match err {
        WalkError::IndexOutOfBounds { len, .. } => WalkError::IndexOutOfBounds { index, len },
        other => other,
    })?;

    let unreachable = WalkError::IndexOutOfBounds {
        index,
        len: layout.len(),
    };
    let found = match nested_levels(layout) {
        Some(dims) => decompose(layout, &dims, rel),
        None => search(layout, min + rel as isize)?,
    };
    found.ok_or(unreachable)
}

/// Non-broadcast dimensions sorted by stride magnitude, if each stride
/// exceeds the reach of all smaller ones.
fn nested_levels(layout: &Layout) -> Option<Vec<usize>> {
    let shape = layout.shape();
    let strides = layout.strides();
    let mut dims: Vec<usize> = (0..layout.rank())
        .filter(|&d| strides[d] != 0 && shape[d] > 1)
        .collect();
    dims.sort_by_key(|&d| strides[d].unsigned_abs());
    let mut reach = 0usize;
    for &d in &dims {
        let a = strides[d].unsigned_abs();
        if a <= reach {
            return None;
        }
        reach = a.checked_mul(shape[d] - 1)?.checked_add(reach)?;
    }
    Some(dims)
}

/// Peel `rel` (relative to the lowest reachable index) into subscripts,
/// largest stride first.
fn decompose(layout: &Layout, dims: &[usize], rel: usize) -> Option<usize> {
    let shape = layout.shape();
    let strides = layout.strides();
    let mut rem = rel;
    let mut subs = vec![0usize; layout.rank()];
    for &d in dims.iter().rev() {
        let a = strides[d].unsigned_abs();
        let q = rem / a;
        if q >= shape[d] {
            return None;
        }
        rem -= q * a;
        subs[d] = if strides[d] > 0 { q } else { shape[d] - 1 - q };
    }
    if rem != 0 {
        return None;
    }
    Some(view_index(layout, &subs))
}

fn search(layout: &Layout, target: isize) -> Result<Option<usize>> {
    for v in 0..layout.len() {
        if vind2bind(layout, v as isize, IndexMode::Throw)? == target {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

fn view_index(layout: &Layout, subs: &[usize]) -> usize {
    let rank = layout.rank();
    let shape = layout.shape();
    let mut vind = 0usize;
    let mut mult = 1usize;
    for k in 0..rank {
        let d = layout.order().dim_at(rank, k);
        vind += subs[d] * mult;
        mult *= shape[d];
    }
    vind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Order;

    #[test]
    fn test_resolve_modes() {
        assert_eq!(IndexMode::Throw.resolve(2, 3).unwrap(), 2);
        assert!(IndexMode::Throw.resolve(3, 3).is_err());
        assert!(IndexMode::Throw.resolve(-1, 3).is_err());
        assert_eq!(IndexMode::Wrap.resolve(-1, 3).unwrap(), 2);
        assert_eq!(IndexMode::Wrap.resolve(7, 3).unwrap(), 1);
        assert_eq!(IndexMode::Clamp.resolve(-5, 3).unwrap(), 0);
        assert_eq!(IndexMode::Clamp.resolve(9, 3).unwrap(), 2);
        assert!(IndexMode::Wrap.resolve(0, 0).is_err());
    }

    #[test]
    fn test_ind2sub_row_major() {
        let l = Layout::row_major(&[2, 2, 2]);
        assert_eq!(ind2sub(&l, 0, IndexMode::Throw).unwrap(), vec![0, 0, 0]);
        assert_eq!(ind2sub(&l, 1, IndexMode::Throw).unwrap(), vec![0, 0, 1]);
        assert_eq!(ind2sub(&l, 6, IndexMode::Throw).unwrap(), vec![1, 1, 0]);
    }

    #[test]
    fn test_ind2sub_col_major() {
        let l = Layout::col_major(&[2, 2, 2]);
        assert_eq!(ind2sub(&l, 1, IndexMode::Throw).unwrap(), vec![1, 0, 0]);
        assert_eq!(ind2sub(&l, 6, IndexMode::Throw).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_ind2sub_modes() {
        let l = Layout::row_major(&[2, 3]);
        assert!(matches!(
            ind2sub(&l, 6, IndexMode::Throw),
            Err(WalkError::IndexOutOfBounds { index: 6, len: 6 })
        ));
        assert_eq!(ind2sub(&l, -1, IndexMode::Wrap).unwrap(), vec![1, 2]);
        assert_eq!(ind2sub(&l, 100, IndexMode::Clamp).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_ind2sub_rank_zero() {
        let l = Layout::row_major(&[]);
        assert!(ind2sub(&l, 0, IndexMode::Throw).unwrap().is_empty());
    }

    #[test]
    fn test_sub2bind() {
        let l = Layout::new(&[2, 3], &[3, 1], 1, Order::RowMajor).unwrap();
        assert_eq!(sub2bind(&l, &[1, 2], IndexMode::Throw).unwrap(), 6);
        assert_eq!(sub2bind(&l, &[-1, -1], IndexMode::Wrap).unwrap(), 6);
        assert_eq!(sub2bind(&l, &[5, 0], IndexMode::Clamp).unwrap(), 4);
        assert!(sub2bind(&l, &[2, 0], IndexMode::Throw).is_err());
        assert!(matches!(
            sub2bind(&l, &[0], IndexMode::Throw),
            Err(WalkError::RankMismatch(1, 2))
        ));
    }

    #[test]
    fn test_vind2bind_negative_strides() {
        let l = Layout::new(&[2, 2], &[-2, 1], 2, Order::RowMajor).unwrap();
        let got: Vec<isize> = (0..4)
            .map(|i| vind2bind(&l, i, IndexMode::Throw).unwrap())
            .collect();
        assert_eq!(got, vec![2, 3, 0, 1]);
        assert_eq!(vind2bind(&l, -1, IndexMode::Wrap).unwrap(), 1);
    }

    #[test]
    fn test_bind2vind_inverts_vind2bind() {
        let layouts = [
            Layout::row_major(&[3, 4]),
            Layout::col_major(&[3, 4]),
            Layout::new(&[3, 4], &[-4, 1], 8, Order::RowMajor).unwrap(),
            Layout::new(&[3, 4], &[1, -3], 9, Order::ColMajor).unwrap(),
            Layout::new(&[2, 3], &[6, 2], 1, Order::RowMajor).unwrap(),
            Layout::new(&[2, 3], &[3, 2], 0, Order::RowMajor).unwrap(),
            Layout::new(&[3, 2], &[-2, 3], 4, Order::ColMajor).unwrap(),
        ];
        for l in &layouts {
            for v in 0..l.len() {
                let b = vind2bind(l, v as isize, IndexMode::Throw).unwrap();
                assert_eq!(bind2vind(l, b, IndexMode::Throw).unwrap(), v, "{l:?}");
            }
        }
    }

    #[test]
    fn test_bind2vind_rejects_gaps() {
        // Strides [6, 2] from offset 1 only reach odd buffer indices.
        let l = Layout::new(&[2, 3], &[6, 2], 1, Order::RowMajor).unwrap();
        assert!(bind2vind(&l, 2, IndexMode::Throw).is_err());
        assert!(bind2vind(&l, 0, IndexMode::Throw).is_err());
        assert_eq!(bind2vind(&l, 0, IndexMode::Clamp).unwrap(), 0);
        assert_eq!(bind2vind(&l, 12, IndexMode::Clamp).unwrap(), 5);
    }

    #[test]
    fn test_bind2vind_interleaved_strides() {
        // Strides [3, 2] reach 0, 2, 4, 3, 5, 7: distinct but not nested.
        let l = Layout::new(&[2, 3], &[3, 2], 0, Order::RowMajor).unwrap();
        assert_eq!(bind2vind(&l, 4, IndexMode::Throw).unwrap(), 2);
        assert_eq!(bind2vind(&l, 7, IndexMode::Throw).unwrap(), 5);
        assert_eq!(bind2vind(&l, 3, IndexMode::Throw).unwrap(), 3);
        assert!(bind2vind(&l, 1, IndexMode::Throw).is_err());
        assert!(bind2vind(&l, 6, IndexMode::Throw).is_err());
        assert_eq!(bind2vind(&l, -1, IndexMode::Wrap).unwrap(), 5);
    }

    #[test]
    fn test_bind2vind_overlap_picks_first() {
        let l = Layout::new(&[2, 3], &[1, 1], 0, Order::RowMajor).unwrap();
        assert_eq!(bind2vind(&l, 1, IndexMode::Throw).unwrap(), 1);
        assert_eq!(bind2vind(&l, 3, IndexMode::Throw).unwrap(), 5);
    }
}
