//! Truthiness of mask elements.

use num_complex::Complex;
use num_traits::{Float, Zero};

/// A mask element; `true` means "suppress the write here".
pub trait Truthy: Copy {
    fn is_truthy(self) -> bool;
}

impl Truthy for bool {
    #[inline(always)]
    fn is_truthy(self) -> bool {
        self
    }
}

macro_rules! impl_truthy_int {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            #[inline(always)]
            fn is_truthy(self) -> bool {
                !self.is_zero()
            }
        })*
    };
}

impl_truthy_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// NaN is falsy, as is signed zero.
macro_rules! impl_truthy_float {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            #[inline(always)]
            fn is_truthy(self) -> bool {
                !self.is_zero() && !Float::is_nan(self)
            }
        })*
    };
}

impl_truthy_float!(f32, f64);

impl<T: Truthy> Truthy for Complex<T> {
    #[inline(always)]
    fn is_truthy(self) -> bool {
        self.re.is_truthy() || self.im.is_truthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert!(1u8.is_truthy());
        assert!((-3i32).is_truthy());
        assert!(!0usize.is_truthy());
    }

    #[test]
    fn test_floats() {
        assert!(0.5f64.is_truthy());
        assert!(!0.0f64.is_truthy());
        assert!(!(-0.0f32).is_truthy());
        assert!(!f64::NAN.is_truthy());
        assert!(f64::INFINITY.is_truthy());
    }

    #[test]
    fn test_complex() {
        assert!(Complex::new(0.0f64, 1.0).is_truthy());
        assert!(!Complex::new(0.0f32, 0.0).is_truthy());
    }
}
