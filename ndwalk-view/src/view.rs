//! Borrowed and owned strided views.
//!
//! - [`ArrayView`]: read-only layout over a borrowed buffer, read through an accessor
//! - [`ArrayViewMut`]: the same over a mutable buffer
//! - [`NdArray`]: owned buffer plus layout

use ndwalk_traits::{Accessor, AccessorMut, Direct};

use crate::layout::{col_major_strides, row_major_strides, Layout, Order};
use crate::Result;

// ============================================================================
// ArrayView
// ============================================================================

/// Read-only strided view over a borrowed buffer.
///
/// `S` is the buffer slot type and `A` the accessor that turns a logical index
/// into an element. Construction checks every reachable index against
/// [`Accessor::logical_len`].
pub struct ArrayView<'a, S, A = Direct> {
    data: &'a [S],
    layout: Layout,
    accessor: A,
}

/// View read as a mask: a truthy element suppresses the write at its position.
pub type MaskView<'a, S, A = Direct> = ArrayView<'a, S, A>;

impl<S, A: Clone> Clone for ArrayView<'_, S, A> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            layout: self.layout.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

impl<S, A> std::fmt::Debug for ArrayView<'_, S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayView")
            .field("shape", &self.layout.shape())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("order", &self.layout.order())
            .finish()
    }
}

impl<'a, S: Copy> ArrayView<'a, S, Direct> {
    /// Create a view that reads buffer slots directly.
    pub fn new(
        data: &'a [S],
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Result<Self> {
        Self::with_accessor(data, Layout::new(shape, strides, offset, order)?, Direct)
    }
}

impl<'a, S, A: Accessor<S>> ArrayView<'a, S, A> {
    /// Create a view with an explicit accessor.
    pub fn with_accessor(data: &'a [S], layout: Layout, accessor: A) -> Result<Self> {
        layout.validate(accessor.logical_len(data))?;
        Ok(Self {
            data,
            layout,
            accessor,
        })
    }

    /// Create a view without bounds validation.
    ///
    /// A layout that reaches outside the buffer makes walks panic on the
    /// first bad index.
    pub fn new_unchecked(data: &'a [S], layout: Layout, accessor: A) -> Self {
        Self {
            data,
            layout,
            accessor,
        }
    }

    /// Read the element at logical buffer index `index`.
    #[inline(always)]
    pub fn read(&self, index: isize) -> A::Elem {
        self.accessor.get(self.data, index as usize)
    }

    /// Read the element at `subs`.
    pub fn get(&self, subs: &[usize]) -> A::Elem {
        self.read(self.layout.index_of(subs))
    }
}

impl<'a, S, A> ArrayView<'a, S, A> {
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.layout.order()
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &'a [S] {
        self.data
    }

    #[inline]
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Permute dimensions.
    pub fn permute(&self, perm: &[usize]) -> Result<ArrayView<'a, S, A>>
    where
        A: Clone,
    {
        Ok(ArrayView {
            data: self.data,
            layout: self.layout.permute(perm)?,
            accessor: self.accessor.clone(),
        })
    }

    /// Same elements, walked in `order`.
    pub fn with_order(&self, order: Order) -> ArrayView<'a, S, A>
    where
        A: Clone,
    {
        ArrayView {
            data: self.data,
            layout: self.layout.with_order(order),
            accessor: self.accessor.clone(),
        }
    }

    /// Flip `axis` through a negative stride.
    pub fn reversed(&self, axis: usize) -> Result<ArrayView<'a, S, A>>
    where
        A: Clone,
    {
        Ok(ArrayView {
            data: self.data,
            layout: self.layout.reversed(axis)?,
            accessor: self.accessor.clone(),
        })
    }
}

// ============================================================================
// ArrayViewMut
// ============================================================================

/// Mutable strided view over a borrowed buffer.
pub struct ArrayViewMut<'a, S, A = Direct> {
    data: &'a mut [S],
    layout: Layout,
    accessor: A,
}

impl<S, A> std::fmt::Debug for ArrayViewMut<'_, S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayViewMut")
            .field("shape", &self.layout.shape())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("order", &self.layout.order())
            .finish()
    }
}

impl<'a, S: Copy> ArrayViewMut<'a, S, Direct> {
    /// Create a mutable view that writes buffer slots directly.
    pub fn new(
        data: &'a mut [S],
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Result<Self> {
        Self::with_accessor(data, Layout::new(shape, strides, offset, order)?, Direct)
    }
}

impl<'a, S, A: AccessorMut<S>> ArrayViewMut<'a, S, A> {
    /// Create a mutable view with an explicit accessor.
    pub fn with_accessor(data: &'a mut [S], layout: Layout, accessor: A) -> Result<Self> {
        layout.validate(accessor.logical_len(data))?;
        Ok(Self {
            data,
            layout,
            accessor,
        })
    }

    /// Create a mutable view without bounds validation.
    ///
    /// A layout that reaches outside the buffer makes walks panic on the
    /// first bad index.
    pub fn new_unchecked(data: &'a mut [S], layout: Layout, accessor: A) -> Self {
        Self {
            data,
            layout,
            accessor,
        }
    }

    /// Read the element at logical buffer index `index`.
    #[inline(always)]
    pub fn read(&self, index: isize) -> A::Elem {
        self.accessor.get(&*self.data, index as usize)
    }

    /// Write the element at logical buffer index `index`.
    #[inline(always)]
    pub fn write(&mut self, index: isize, value: A::Elem) {
        self.accessor.set(&mut *self.data, index as usize, value)
    }

    /// Read the element at `subs`.
    pub fn get(&self, subs: &[usize]) -> A::Elem {
        self.read(self.layout.index_of(subs))
    }

    /// Write the element at `subs`.
    pub fn set(&mut self, subs: &[usize], value: A::Elem) {
        let idx = self.layout.index_of(subs);
        self.write(idx, value)
    }
}

impl<'a, S, A> ArrayViewMut<'a, S, A> {
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.layout.order()
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[S] {
        &*self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [S] {
        &mut *self.data
    }

    #[inline]
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Permute dimensions, consuming the mutable view.
    pub fn permute(self, perm: &[usize]) -> Result<ArrayViewMut<'a, S, A>> {
        Ok(ArrayViewMut {
            layout: self.layout.permute(perm)?,
            data: self.data,
            accessor: self.accessor,
        })
    }

    /// Same elements, walked in `order`.
    pub fn with_order(self, order: Order) -> ArrayViewMut<'a, S, A> {
        ArrayViewMut {
            layout: self.layout.with_order(order),
            data: self.data,
            accessor: self.accessor,
        }
    }

    /// Flip `axis` through a negative stride, consuming the mutable view.
    pub fn reversed(self, axis: usize) -> Result<ArrayViewMut<'a, S, A>> {
        Ok(ArrayViewMut {
            layout: self.layout.reversed(axis)?,
            data: self.data,
            accessor: self.accessor,
        })
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> ArrayView<'_, S, A>
    where
        A: Clone,
    {
        ArrayView {
            data: &*self.data,
            layout: self.layout.clone(),
            accessor: self.accessor.clone(),
        }
    }

    /// Reborrow mutably for a shorter lifetime.
    pub fn reborrow(&mut self) -> ArrayViewMut<'_, S, A>
    where
        A: Clone,
    {
        ArrayViewMut {
            data: &mut *self.data,
            layout: self.layout.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

// ============================================================================
// NdArray
// ============================================================================

/// Owned strided array with one slot per element.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray<S> {
    data: Vec<S>,
    layout: Layout,
}

impl<S: Clone + Default> NdArray<S> {
    /// Row-major array filled with `S::default()`.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::row_major(shape)
    }

    /// Row-major array filled with `S::default()`.
    pub fn row_major(shape: &[usize]) -> Self {
        let total: usize = shape.iter().product();
        Self {
            data: vec![S::default(); total],
            layout: Layout::row_major(shape),
        }
    }

    /// Column-major array filled with `S::default()`.
    pub fn col_major(shape: &[usize]) -> Self {
        let total: usize = shape.iter().product();
        Self {
            data: vec![S::default(); total],
            layout: Layout::col_major(shape),
        }
    }
}

impl<S> NdArray<S> {
    /// Row-major array; `f` is called with subscripts in row-major order.
    pub fn from_fn_row_major(shape: &[usize], mut f: impl FnMut(&[usize]) -> S) -> Self {
        let total: usize = shape.iter().product();
        let rank = shape.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in (0..rank).rev() {
                idx[d] += 1;
                if idx[d] < shape[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            layout: Layout::row_major(shape),
        }
    }

    /// Column-major array; `f` is called with subscripts in column-major order.
    pub fn from_fn_col_major(shape: &[usize], mut f: impl FnMut(&[usize]) -> S) -> Self {
        let total: usize = shape.iter().product();
        let rank = shape.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in 0..rank {
                idx[d] += 1;
                if idx[d] < shape[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            layout: Layout::col_major(shape),
        }
    }

    /// Create from a buffer and an arbitrary layout.
    pub fn from_parts(
        data: Vec<S>,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Result<Self> {
        let layout = Layout::new(shape, strides, offset, order)?;
        layout.validate(data.len())?;
        Ok(Self { data, layout })
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[S] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [S] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<S> {
        self.data
    }

    /// View the array through a different accessor, e.g. [`ndwalk_traits::Interleaved`].
    pub fn view_with<A: Accessor<S>>(&self, accessor: A) -> Result<ArrayView<'_, S, A>> {
        ArrayView::with_accessor(&self.data, self.layout.clone(), accessor)
    }

    /// Mutable view through a different accessor.
    pub fn view_mut_with<A: AccessorMut<S>>(
        &mut self,
        accessor: A,
    ) -> Result<ArrayViewMut<'_, S, A>> {
        ArrayViewMut::with_accessor(&mut self.data, self.layout.clone(), accessor)
    }
}

impl<S: Copy> NdArray<S> {
    /// Read-only view; the layout was validated at construction.
    pub fn view(&self) -> ArrayView<'_, S> {
        ArrayView::new_unchecked(&self.data, self.layout.clone(), Direct)
    }

    /// Mutable view; the layout was validated at construction.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, S> {
        ArrayViewMut::new_unchecked(&mut self.data, self.layout.clone(), Direct)
    }

    pub fn get(&self, subs: &[usize]) -> S {
        self.data[self.layout.index_of(subs) as usize]
    }

    pub fn set(&mut self, subs: &[usize], value: S) {
        let idx = self.layout.index_of(subs) as usize;
        self.data[idx] = value;
    }
}
