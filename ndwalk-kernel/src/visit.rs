//! Per-visit context handed to metadata-aware callbacks.

use ndwalk_view::{ind2sub, IndexMode, Layout};

use crate::Result;

/// Where a walk currently is.
///
/// `offsets[v]` is the logical buffer index of the current element in view
/// `v`, in the order the operation documents its views. The first view is
/// the one whose order drives the traversal.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a, const M: usize> {
    index: usize,
    offsets: [isize; M],
    layouts: [&'a Layout; M],
}

impl<'a, const M: usize> Visit<'a, M> {
    #[inline(always)]
    pub(crate) fn new(index: usize, offsets: [isize; M], layouts: [&'a Layout; M]) -> Self {
        Self {
            index,
            offsets,
            layouts,
        }
    }

    /// Linear index of the element in the first view's order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn offsets(&self) -> &[isize; M] {
        &self.offsets
    }

    /// Buffer index of the current element in view `view`.
    #[inline]
    pub fn offset(&self, view: usize) -> isize {
        self.offsets[view]
    }

    #[inline]
    pub fn layout(&self, view: usize) -> &'a Layout {
        self.layouts[view]
    }

    #[inline]
    pub fn layouts(&self) -> &[&'a Layout; M] {
        &self.layouts
    }

    /// Subscripts of the current element. All views share them.
    pub fn subscripts(&self) -> Result<Vec<usize>> {
        ind2sub(self.layouts[0], self.index as isize, IndexMode::Throw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndwalk_view::Order;

    #[test]
    fn test_subscripts_follow_first_view_order() {
        let a = Layout::col_major(&[2, 3]);
        let b = Layout::row_major(&[2, 3]);
        let v = Visit::new(3, [3, 4], [&a, &b]);
        assert_eq!(v.subscripts().unwrap(), vec![1, 1]);
        assert_eq!(v.offset(1), 4);
        assert_eq!(v.layout(1).order(), Order::RowMajor);
    }
}
