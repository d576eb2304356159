//! Element accessors: how a logical element index maps onto buffer storage.
//!
//! Most buffers store one element per slot and are read with plain indexing
//! ([`Direct`]). Composite element types break that correspondence: a
//! `Complex<f32>` array kept as a flat `[f32]` buffer stores each logical
//! element in two consecutive slots. An accessor hides the difference, so the
//! walkers only ever deal in *logical* indices.
//!
//! Accessors are zero-sized or hold plain closures, and are resolved at the
//! type level. The walkers are monomorphized per accessor, so the common
//! [`Direct`] case compiles down to ordinary slice indexing.

use std::marker::PhantomData;

use num_complex::Complex;

use crate::pod_complex::{PodComplexF32, PodComplexF64};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Read half of the accessor shim.
///
/// `S` is the buffer slot type, [`Accessor::Elem`] the logical element type.
pub trait Accessor<S> {
    /// Logical element type produced by [`Accessor::get`].
    type Elem: Copy;

    /// Read the logical element at `index`.
    fn get(&self, buf: &[S], index: usize) -> Self::Elem;

    /// Number of logical elements addressable in `buf`.
    fn logical_len(&self, buf: &[S]) -> usize;
}

/// Write half of the accessor shim.
pub trait AccessorMut<S>: Accessor<S> {
    /// Write the logical element at `index`.
    fn set(&self, buf: &mut [S], index: usize, value: Self::Elem);
}

// ---------------------------------------------------------------------------
// Direct
// ---------------------------------------------------------------------------

/// Direct indexing: one slot per element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Direct;

impl<S: Copy> Accessor<S> for Direct {
    type Elem = S;

    #[inline(always)]
    fn get(&self, buf: &[S], index: usize) -> S {
        buf[index]
    }

    #[inline(always)]
    fn logical_len(&self, buf: &[S]) -> usize {
        buf.len()
    }
}

impl<S: Copy> AccessorMut<S> for Direct {
    #[inline(always)]
    fn set(&self, buf: &mut [S], index: usize, value: S) {
        buf[index] = value;
    }
}

// ---------------------------------------------------------------------------
// Interleaved complex
// ---------------------------------------------------------------------------

/// Complex numbers stored as `[re0, im0, re1, im1, ...]`.
///
/// Logical element `i` lives in slots `2i` and `2i + 1`. A trailing unpaired
/// slot is not addressable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interleaved;

impl<T: Copy> Accessor<T> for Interleaved {
    type Elem = Complex<T>;

    #[inline(always)]
    fn get(&self, buf: &[T], index: usize) -> Complex<T> {
        let k = 2 * index;
        Complex::new(buf[k], buf[k + 1])
    }

    #[inline(always)]
    fn logical_len(&self, buf: &[T]) -> usize {
        buf.len() / 2
    }
}

impl<T: Copy> AccessorMut<T> for Interleaved {
    #[inline(always)]
    fn set(&self, buf: &mut [T], index: usize, value: Complex<T>) {
        let k = 2 * index;
        buf[k] = value.re;
        buf[k + 1] = value.im;
    }
}

// ---------------------------------------------------------------------------
// POD complex
// ---------------------------------------------------------------------------

/// Complex numbers stored as `repr(C)` POD pairs.
///
/// Use together with [`crate::as_pod_complex32`] / [`crate::as_pod_complex64`]
/// to walk a raw float buffer as complex elements without copying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PodComplex;

macro_rules! impl_pod_complex_accessor {
    ($pod:ty, $t:ty) => {
        impl Accessor<$pod> for PodComplex {
            type Elem = Complex<$t>;

            #[inline(always)]
            fn get(&self, buf: &[$pod], index: usize) -> Complex<$t> {
                buf[index].into()
            }

            #[inline(always)]
            fn logical_len(&self, buf: &[$pod]) -> usize {
                buf.len()
            }
        }

        impl AccessorMut<$pod> for PodComplex {
            #[inline(always)]
            fn set(&self, buf: &mut [$pod], index: usize, value: Complex<$t>) {
                buf[index] = value.into();
            }
        }
    };
}

impl_pod_complex_accessor!(PodComplexF32, f32);
impl_pod_complex_accessor!(PodComplexF64, f64);

// ---------------------------------------------------------------------------
// Closure accessors
// ---------------------------------------------------------------------------

/// Marker for a read-only [`FnAccessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSet;

/// Accessor built from a getter and an optional setter closure.
///
/// The closures receive the whole buffer and the logical index. By default
/// every slot is one element; use [`FnAccessor::with_slots`] when each
/// element occupies several slots.
pub struct FnAccessor<S, T, G, St = NoSet> {
    get: G,
    set: St,
    slots: usize,
    _marker: PhantomData<fn(&[S]) -> T>,
}

impl<S, T, G, St> std::fmt::Debug for FnAccessor<S, T, G, St> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAccessor")
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl<S, T, G: Clone, St: Clone> Clone for FnAccessor<S, T, G, St> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            slots: self.slots,
            _marker: PhantomData,
        }
    }
}

impl<S, T, G> FnAccessor<S, T, G, NoSet>
where
    G: Fn(&[S], usize) -> T,
{
    /// Read-only accessor.
    pub fn getter(get: G) -> Self {
        Self {
            get,
            set: NoSet,
            slots: 1,
            _marker: PhantomData,
        }
    }
}

impl<S, T, G, St> FnAccessor<S, T, G, St>
where
    G: Fn(&[S], usize) -> T,
    St: Fn(&mut [S], usize, T),
{
    /// Read/write accessor.
    pub fn new(get: G, set: St) -> Self {
        Self {
            get,
            set,
            slots: 1,
            _marker: PhantomData,
        }
    }
}

impl<S, T, G, St> FnAccessor<S, T, G, St> {
    /// Declare how many buffer slots one logical element occupies.
    ///
    /// Only affects [`Accessor::logical_len`], which bounds validation uses.
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots.max(1);
        self
    }
}

impl<S, T: Copy, G, St> Accessor<S> for FnAccessor<S, T, G, St>
where
    G: Fn(&[S], usize) -> T,
{
    type Elem = T;

    #[inline(always)]
    fn get(&self, buf: &[S], index: usize) -> T {
        (self.get)(buf, index)
    }

    #[inline(always)]
    fn logical_len(&self, buf: &[S]) -> usize {
        buf.len() / self.slots
    }
}

impl<S, T: Copy, G, St> AccessorMut<S> for FnAccessor<S, T, G, St>
where
    G: Fn(&[S], usize) -> T,
    St: Fn(&mut [S], usize, T),
{
    #[inline(always)]
    fn set(&self, buf: &mut [S], index: usize, value: T) {
        (self.set)(buf, index, value)
    }
}
