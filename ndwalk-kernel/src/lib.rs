//! Element-wise iteration over N-dimensional strided arrays.
//!
//! A walk visits every position of one or more same-shaped views exactly
//! once and hands the callback one buffer offset per view. Views may be
//! row-major or column-major, carry negative strides or an offset, and read
//! composite elements through an [`Accessor`].
//!
//! # Core Types
//!
//! - [`ArrayView`] / [`ArrayViewMut`] / [`NdArray`]: views and owned arrays
//! - [`Plan`]: the per-level extents and offset increments of a walk
//! - [`Walker`] with [`Scalar`], [`Ranked`] and [`Generic`]: the loop nests
//! - [`Visit`]: position metadata handed to `*_by` callbacks
//! - [`WalkConfig`]: fusion and blocking switches
//!
//! # Operations
//!
//! - [`map_into`], [`zip_map2_into`] through [`zip_map5_into`]
//! - [`map_by_into`], [`zip_map2_by_into`] through [`zip_map4_by_into`] and
//!   their `try_` variants
//! - [`mask_map_into`], [`mask_zip_map2_into`] through [`mask_zip_map4_into`],
//!   [`mask_map_by_into`]
//! - [`fill_into`], [`fill_by_into`], [`update_into`], [`for_each`]
//! - [`walk_layouts`], [`walk_layouts_with`], [`for_each_offsets`]: raw offsets
//!
//! # Example
//!
//! ```rust
//! use ndwalk_kernel::{map_into, ArrayView, NdArray, Order};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let src = ArrayView::new(&data, &[3], &[2], 0, Order::RowMajor).unwrap();
//! let mut dest = NdArray::<f64>::zeros(&[3]);
//! map_into(&mut dest.view_mut(), &src, |x| x * 2.0).unwrap();
//! assert_eq!(dest.data(), &[2.0, 6.0, 10.0]);
//! ```
//!
//! # Traversal
//!
//! The first view's order drives the walk (the destination's, for operations
//! with no source). Adjacent loop levels that are contiguous in every view
//! are fused, and extent-1 levels dropped, before the walker is picked by
//! rank. Setting [`WalkConfig::blocked`] tiles the walk for cache locality;
//! the visit index a callback sees stays the declared-order position.

mod blocked;
mod config;
mod dispatch;
mod fuse;
mod map_by;
mod map_view;
mod mask;
mod nullary;
mod order;
mod plan;
#[cfg(feature = "parallel")]
mod threading;
mod visit;
mod walker;

pub use ndwalk_view::{
    bind2vind, col_major_strides, ind2sub, row_major_strides, sub2bind, vind2bind, ArrayView,
    ArrayViewMut, IndexMode, Layout, MaskView, NdArray, Order, Result, WalkError,
};
pub use ndwalk_traits::{
    Accessor, AccessorMut, Direct, FnAccessor, Interleaved, PodComplex, Store, Truthy,
};

// ============================================================================
// Walk machinery
// ============================================================================
pub use config::{
    WalkConfig, BLOCK_SIZE_IN_BYTES, BLOCK_SIZE_IN_ELEMENTS, MAX_SPECIALIZED_RANK,
    MINTHREADLENGTH,
};
pub use dispatch::{walk_layouts, walk_layouts_with};
pub use plan::{increments, Plan};
pub use visit::Visit;
pub use walker::{Generic, Ranked, Scalar, Walker};

// ============================================================================
// Operations
// ============================================================================
pub use map_by::{
    for_each, for_each_offsets, map_by_into, try_map_by_into, try_zip_map2_by_into,
    try_zip_map3_by_into, try_zip_map4_by_into, update_into, zip_map2_by_into, zip_map3_by_into,
    zip_map4_by_into,
};
pub use map_view::{map_into, zip_map2_into, zip_map3_into, zip_map4_into, zip_map5_into};
#[cfg(feature = "parallel")]
pub use map_view::{par_map_into, par_zip_map2_into};
pub use mask::{
    mask_map_by_into, mask_map_into, mask_zip_map2_into, mask_zip_map3_into, mask_zip_map4_into,
};
pub use nullary::{fill_by_into, fill_into};
