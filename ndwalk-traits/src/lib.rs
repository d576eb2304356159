//! Shared traits for the ndwalk crates.
//!
//! This crate holds the pieces of the iteration engine that external code
//! implements or names directly, so they can be implemented for foreign
//! storage types without orphan rule violations:
//!
//! - [`Accessor`] / [`AccessorMut`]: the get/set shim used in place of direct
//!   buffer indexing (composite elements such as interleaved complex numbers)
//! - [`Store`]: the value-or-skip result of an element callback
//! - [`Truthy`]: the predicate a mask element must satisfy to suppress a write

pub mod accessor;
pub mod pod_complex;
pub mod store;
pub mod truthy;

pub use accessor::{Accessor, AccessorMut, Direct, FnAccessor, Interleaved, NoSet, PodComplex};
pub use pod_complex::{
    as_pod_complex32, as_pod_complex32_mut, as_pod_complex64, as_pod_complex64_mut,
    PodComplexF32, PodComplexF64,
};
pub use store::Store;
pub use truthy::Truthy;
