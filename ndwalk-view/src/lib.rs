//! Layout descriptors and borrowed views for strided element-wise walks.
//!
//! - [`Layout`]: shape, strides, offset and memory order of one array
//! - [`ArrayView`] / [`ArrayViewMut`]: a layout bound to a buffer and an accessor
//! - [`NdArray`]: owned buffer plus layout
//! - [`ind2sub`], [`sub2bind`], [`vind2bind`], [`bind2vind`]: index conversions
//!
//! Views are validated when they are built. Code that walks a view relies on
//! that and does not re-check offsets per element.

pub mod index;
pub mod layout;
pub mod view;

pub use index::{bind2vind, ind2sub, sub2bind, vind2bind, IndexMode};
pub use layout::{col_major_strides, row_major_strides, Layout, Order};
pub use view::{ArrayView, ArrayViewMut, MaskView, NdArray};

pub use ndwalk_traits::{Accessor, AccessorMut, Direct, Interleaved, PodComplex, Store, Truthy};

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while building views or walking them.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes do not match.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// `shape` and `strides` have different lengths.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// A reachable logical index falls outside the buffer.
    #[error("layout reaches indices {min}..={max} but the buffer holds {len} elements")]
    OutOfBounds { min: isize, max: isize, len: usize },

    /// Index arithmetic overflowed `isize`.
    #[error("offset overflow while computing index")]
    OffsetOverflow,

    /// Axis argument outside `0..rank`, or repeated in a permutation.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Index conversion rejected an index in [`IndexMode::Throw`] mode.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    /// The element callback failed; the walk stopped at that element.
    #[error("callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for ndwalk operations.
pub type Result<T> = std::result::Result<T, WalkError>;
