//! Layout descriptor: shape, strides, offset and memory order.

use std::sync::Arc;

use crate::{Result, WalkError};

// ============================================================================
// Order
// ============================================================================

/// Memory order of a layout.
///
/// Decides which dimension a walk treats as innermost: the last one for
/// [`Order::RowMajor`], the first one for [`Order::ColMajor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    RowMajor,
    ColMajor,
}

impl Order {
    /// Infer an order from stride magnitudes.
    ///
    /// Non-increasing magnitudes give row-major, non-decreasing give
    /// column-major. Layouts that are both (rank <= 1, equal strides) and
    /// layouts that are neither report row-major.
    pub fn from_strides(strides: &[isize]) -> Order {
        let mags = || strides.iter().map(|s| s.unsigned_abs());
        let non_increasing = mags().zip(mags().skip(1)).all(|(a, b)| a >= b);
        if non_increasing {
            return Order::RowMajor;
        }
        let non_decreasing = mags().zip(mags().skip(1)).all(|(a, b)| a <= b);
        if non_decreasing {
            Order::ColMajor
        } else {
            Order::RowMajor
        }
    }

    /// Dimension visited at traversal level `k`, counting from the innermost
    /// loop (`k = 0`) outwards.
    #[inline]
    pub fn dim_at(self, rank: usize, k: usize) -> usize {
        debug_assert!(k < rank);
        match self {
            Order::RowMajor => rank - 1 - k,
            Order::ColMajor => k,
        }
    }
}

// ============================================================================
// Stride helpers
// ============================================================================

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut acc = 1isize;
    for &n in shape {
        strides.push(acc);
        acc *= n.max(1) as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = 1isize;
    for (s, &n) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = acc;
        acc *= n.max(1) as isize;
    }
    strides
}

// ============================================================================
// Layout
// ============================================================================

/// Shape, strides (in logical elements), starting offset and order of an
/// array.
///
/// A rank-0 layout (empty `shape`) describes a single element at `offset`.
/// Any zero-length dimension makes the layout empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    shape: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: usize,
    order: Order,
}

impl Layout {
    /// Create a layout. Fails only if `shape` and `strides` differ in length.
    pub fn new(shape: &[usize], strides: &[isize], offset: usize, order: Order) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(WalkError::StrideLengthMismatch);
        }
        Ok(Self {
            shape: Arc::from(shape),
            strides: Arc::from(strides),
            offset,
            order,
        })
    }

    /// Dense row-major layout starting at offset 0.
    pub fn row_major(shape: &[usize]) -> Self {
        Self {
            shape: Arc::from(shape),
            strides: Arc::from(row_major_strides(shape)),
            offset: 0,
            order: Order::RowMajor,
        }
    }

    /// Dense column-major layout starting at offset 0.
    pub fn col_major(shape: &[usize]) -> Self {
        Self {
            shape: Arc::from(shape),
            strides: Arc::from(col_major_strides(shape)),
            offset: 0,
            order: Order::ColMajor,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements; 1 for rank 0.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&n| n == 0)
    }

    /// Logical buffer index of the element at `subs`.
    ///
    /// # Panics
    /// If `subs` has the wrong length or a subscript is out of range.
    pub fn index_of(&self, subs: &[usize]) -> isize {
        assert_eq!(subs.len(), self.rank(), "wrong number of subscripts");
        let mut idx = self.offset as isize;
        for (k, (&i, (&n, &s))) in subs
            .iter()
            .zip(self.shape.iter().zip(self.strides.iter()))
            .enumerate()
        {
            assert!(i < n, "subscript {} out of bounds for dim {} of size {}", i, k, n);
            idx += i as isize * s;
        }
        idx
    }

    /// Smallest and largest logical buffer index the layout reaches.
    ///
    /// For an empty layout both bounds equal the offset.
    pub fn min_max_index(&self) -> Result<(isize, isize)> {
        let base = isize::try_from(self.offset).map_err(|_| WalkError::OffsetOverflow)?;
        let mut min = base;
        let mut max = base;
        if self.is_empty() {
            return Ok((min, max));
        }
        for (&n, &s) in self.shape.iter().zip(self.strides.iter()) {
            if n > 1 {
                let end = s
                    .checked_mul(n as isize - 1)
                    .ok_or(WalkError::OffsetOverflow)?;
                if end >= 0 {
                    max = max.checked_add(end).ok_or(WalkError::OffsetOverflow)?;
                } else {
                    min = min.checked_add(end).ok_or(WalkError::OffsetOverflow)?;
                }
            }
        }
        Ok((min, max))
    }

    /// Check that every reachable index lies in `[0, len)`.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let (min, max) = self.min_max_index()?;
        if min < 0 || max as usize >= len {
            return Err(WalkError::OutOfBounds { min, max, len });
        }
        Ok(())
    }

    /// `1` if all strides are non-negative, `-1` if all are non-positive,
    /// `0` for mixed signs.
    pub fn iteration_order(&self) -> i8 {
        let pos = self.strides.iter().all(|&s| s >= 0);
        let neg = self.strides.iter().all(|&s| s <= 0);
        match (pos, neg) {
            (true, _) => 1,
            (false, true) => -1,
            (false, false) => 0,
        }
    }

    /// True when the layout covers a single gap-free buffer segment and
    /// every stride has the same sign.
    pub fn is_contiguous(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        if self.iteration_order() == 0 {
            return false;
        }
        match self.min_max_index() {
            Ok((min, max)) => (max - min) as usize + 1 == self.len(),
            Err(_) => false,
        }
    }

    /// Reorder dimensions: dimension `k` of the result is `perm[k]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<Layout> {
        let rank = self.rank();
        if perm.len() != rank {
            return Err(WalkError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(WalkError::InvalidAxis { axis: p, rank });
            }
            seen[p] = true;
        }
        let shape: Vec<usize> = perm.iter().map(|&p| self.shape[p]).collect();
        let strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(Layout {
            shape: Arc::from(shape),
            strides: Arc::from(strides),
            offset: self.offset,
            order: self.order,
        })
    }

    /// Same elements, different traversal order.
    pub fn with_order(&self, order: Order) -> Layout {
        Layout {
            order,
            ..self.clone()
        }
    }

    /// Flip `axis`: subscript `i` of the result addresses `n - 1 - i` of `self`.
    pub fn reversed(&self, axis: usize) -> Result<Layout> {
        let rank = self.rank();
        if axis >= rank {
            return Err(WalkError::InvalidAxis { axis, rank });
        }
        let n = self.shape[axis];
        let s = self.strides[axis];
        let mut offset = self.offset;
        if n > 1 {
            let end = s
                .checked_mul(n as isize - 1)
                .ok_or(WalkError::OffsetOverflow)?;
            let moved = (offset as isize)
                .checked_add(end)
                .ok_or(WalkError::OffsetOverflow)?;
            offset = usize::try_from(moved).map_err(|_| WalkError::OffsetOverflow)?;
        }
        let mut strides = self.strides.to_vec();
        strides[axis] = -s;
        Ok(Layout {
            shape: self.shape.clone(),
            strides: Arc::from(strides),
            offset,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_col_major_strides() {
        assert_eq!(col_major_strides(&[2, 3, 4]), vec![1, 2, 6]);
    }

    #[test]
    fn test_strides_with_zero_dim() {
        // Zero-length dims must not zero out the other strides.
        assert_eq!(row_major_strides(&[3, 0, 2]), vec![2, 2, 1]);
    }

    #[test]
    fn test_order_from_strides() {
        assert_eq!(Order::from_strides(&[12, 4, 1]), Order::RowMajor);
        assert_eq!(Order::from_strides(&[1, 2, 6]), Order::ColMajor);
        assert_eq!(Order::from_strides(&[-4, 2, -1]), Order::RowMajor);
        assert_eq!(Order::from_strides(&[1, -3]), Order::ColMajor);
        assert_eq!(Order::from_strides(&[2, 8, 1]), Order::RowMajor);
        assert_eq!(Order::from_strides(&[5]), Order::RowMajor);
    }

    #[test]
    fn test_dim_at() {
        assert_eq!(Order::RowMajor.dim_at(3, 0), 2);
        assert_eq!(Order::RowMajor.dim_at(3, 2), 0);
        assert_eq!(Order::ColMajor.dim_at(3, 0), 0);
        assert_eq!(Order::ColMajor.dim_at(3, 2), 2);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Layout::new(&[2, 3], &[1], 0, Order::RowMajor).unwrap_err();
        assert!(matches!(err, WalkError::StrideLengthMismatch));
    }

    #[test]
    fn test_len_and_rank_zero() {
        let l = Layout::row_major(&[]);
        assert_eq!(l.rank(), 0);
        assert_eq!(l.len(), 1);
        assert!(!l.is_empty());
        assert!(Layout::row_major(&[3, 0]).is_empty());
    }

    #[test]
    fn test_min_max_index() {
        let l = Layout::new(&[2, 3], &[-3, 1], 3, Order::RowMajor).unwrap();
        assert_eq!(l.min_max_index().unwrap(), (0, 5));
    }

    #[test]
    fn test_validate() {
        let l = Layout::new(&[3], &[2], 0, Order::RowMajor).unwrap();
        assert!(l.validate(5).is_ok());
        let err = l.validate(4).unwrap_err();
        assert!(matches!(
            err,
            WalkError::OutOfBounds {
                min: 0,
                max: 4,
                len: 4
            }
        ));
    }

    #[test]
    fn test_validate_negative_reach() {
        let l = Layout::new(&[3], &[-1], 1, Order::RowMajor).unwrap();
        assert!(matches!(
            l.validate(10),
            Err(WalkError::OutOfBounds { min: -1, .. })
        ));
    }

    #[test]
    fn test_validate_empty_always_ok() {
        let l = Layout::new(&[0, 4], &[100, 100], 1000, Order::RowMajor).unwrap();
        assert!(l.validate(0).is_ok());
    }

    #[test]
    fn test_validate_overflow() {
        let l = Layout::new(&[3], &[isize::MAX], 0, Order::RowMajor).unwrap();
        assert!(matches!(l.validate(10), Err(WalkError::OffsetOverflow)));
    }

    #[test]
    fn test_iteration_order() {
        let mk = |s: &[isize]| Layout::new(&vec![2; s.len()], s, 10, Order::RowMajor).unwrap();
        assert_eq!(mk(&[2, 1]).iteration_order(), 1);
        assert_eq!(mk(&[-2, -1]).iteration_order(), -1);
        assert_eq!(mk(&[-2, 1]).iteration_order(), 0);
        assert_eq!(mk(&[0, 1]).iteration_order(), 1);
    }

    #[test]
    fn test_is_contiguous() {
        assert!(Layout::row_major(&[2, 3]).is_contiguous());
        assert!(Layout::col_major(&[2, 3]).is_contiguous());
        assert!(Layout::new(&[2, 3], &[-3, -1], 5, Order::RowMajor)
            .unwrap()
            .is_contiguous());
        assert!(!Layout::new(&[2, 3], &[-3, 1], 3, Order::RowMajor)
            .unwrap()
            .is_contiguous());
        assert!(!Layout::new(&[3], &[2], 0, Order::RowMajor)
            .unwrap()
            .is_contiguous());
        assert!(!Layout::new(&[3], &[0], 0, Order::RowMajor)
            .unwrap()
            .is_contiguous());
    }

    #[test]
    fn test_index_of() {
        let l = Layout::new(&[2, 3], &[3, 1], 2, Order::RowMajor).unwrap();
        assert_eq!(l.index_of(&[1, 2]), 7);
    }

    #[test]
    #[should_panic]
    fn test_index_of_out_of_range() {
        Layout::row_major(&[2, 3]).index_of(&[2, 0]);
    }

    #[test]
    fn test_permute() {
        let l = Layout::row_major(&[2, 3, 4]).permute(&[2, 0, 1]).unwrap();
        assert_eq!(l.shape(), &[4, 2, 3]);
        assert_eq!(l.strides(), &[1, 12, 4]);
    }

    #[test]
    fn test_permute_errors() {
        let l = Layout::row_major(&[2, 3]);
        assert!(matches!(
            l.permute(&[0]),
            Err(WalkError::RankMismatch(1, 2))
        ));
        assert!(matches!(
            l.permute(&[1, 1]),
            Err(WalkError::InvalidAxis { axis: 1, rank: 2 })
        ));
        assert!(matches!(
            l.permute(&[0, 2]),
            Err(WalkError::InvalidAxis { axis: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_reversed() {
        let l = Layout::row_major(&[2, 3]).reversed(1).unwrap();
        assert_eq!(l.strides(), &[3, -1]);
        assert_eq!(l.offset(), 2);
        assert_eq!(l.index_of(&[0, 0]), 2);
        assert_eq!(l.index_of(&[1, 2]), 3);
        assert!(l.validate(6).is_ok());
    }

    #[test]
    fn test_reversed_invalid_axis() {
        assert!(matches!(
            Layout::row_major(&[2]).reversed(1),
            Err(WalkError::InvalidAxis { axis: 1, rank: 1 })
        ));
    }

    #[test]
    fn test_with_order_keeps_strides() {
        let l = Layout::row_major(&[2, 3]).with_order(Order::ColMajor);
        assert_eq!(l.order(), Order::ColMajor);
        assert_eq!(l.strides(), &[3, 1]);
    }
}
