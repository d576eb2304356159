//! POD complex storage.
//!
//! [`PodComplexF32`] / [`PodComplexF64`] are `repr(C)` `[re, im]` pairs that
//! `bytemuck` can reinterpret from a flat float buffer. Together with the
//! [`crate::PodComplex`] accessor this lets interleaved storage be walked as
//! complex elements with no copy and no unsafe code.

use bytemuck::{Pod, Zeroable};
use num_complex::Complex;

macro_rules! pod_complex {
    ($name:ident, $t:ty, $cast:ident, $cast_mut:ident) => {
        /// One complex slot of an interleaved buffer, laid out as `re` then `im`.
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Zeroable, Pod)]
        pub struct $name {
            pub re: $t,
            pub im: $t,
        }

        impl From<Complex<$t>> for $name {
            #[inline(always)]
            fn from(z: Complex<$t>) -> Self {
                Self { re: z.re, im: z.im }
            }
        }

        impl From<$name> for Complex<$t> {
            #[inline(always)]
            fn from(slot: $name) -> Self {
                Complex::new(slot.re, slot.im)
            }
        }

        #[doc = concat!("View a `[", stringify!($t), "]` buffer as [`", stringify!($name), "`] slots.")]
        ///
        /// `None` if the buffer holds an odd number of floats.
        pub fn $cast(buf: &[$t]) -> Option<&[$name]> {
            bytemuck::try_cast_slice(buf).ok()
        }

        #[doc = concat!("Mutable [`", stringify!($cast), "`].")]
        pub fn $cast_mut(buf: &mut [$t]) -> Option<&mut [$name]> {
            bytemuck::try_cast_slice_mut(buf).ok()
        }
    };
}

pod_complex!(PodComplexF32, f32, as_pod_complex32, as_pod_complex32_mut);
pod_complex!(PodComplexF64, f64, as_pod_complex64, as_pod_complex64_mut);
