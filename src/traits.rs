//! This module provides the numeric traits shared by all channel element types.

use core::fmt;

use bytemuck::Pod;
use num_traits::{Bounded, Num, NumCast};

use crate::color::SampleFormat;
use crate::math::round;

/// Primitive trait from old stdlib
pub trait Primitive: Copy + NumCast + Num + PartialOrd<Self> + Clone + Bounded {}

impl Primitive for usize {}
impl Primitive for u8 {}
impl Primitive for u16 {}
impl Primitive for u32 {}
impl Primitive for u64 {}
impl Primitive for isize {}
impl Primitive for i8 {}
impl Primitive for i16 {}
impl Primitive for i32 {}
impl Primitive for i64 {}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// The element type of a single channel.
///
/// Conversions from wider types saturate at the bounds of `Self`. Conversions from floating point
/// values round half away from zero before saturating.
pub trait Sample: Primitive + Pod + Default + fmt::Debug + Send + Sync + 'static {
    const SAMPLE_FORMAT: SampleFormat;
    const IS_INTEGRAL: bool;
    const IS_SIGNED: bool;
    const IS_FLOATING_POINT: bool = !Self::IS_INTEGRAL;
    const NR_BYTES: usize = core::mem::size_of::<Self>();

    fn as_f64(self) -> f64;

    fn from_f64_rounded(v: f64) -> Self;

    /// Integral value of `self`. Floating point samples are rounded.
    fn as_i64(self) -> i64;

    fn from_i64_saturating(v: i64) -> Self;
}

macro_rules! impl_integer_sample {
    ($($t:ty => $format:ident),*) => {$(
        impl Sample for $t {
            const SAMPLE_FORMAT: SampleFormat = SampleFormat::$format;
            const IS_INTEGRAL: bool = true;
            const IS_SIGNED: bool = <$t>::MIN != 0;

            #[inline(always)]
            fn as_f64(self) -> f64 {
                <f64 as From<$t>>::from(self)
            }

            #[inline(always)]
            fn from_f64_rounded(v: f64) -> Self {
                // float to int casts saturate
                round(v) as $t
            }

            #[inline(always)]
            fn as_i64(self) -> i64 {
                <i64 as From<$t>>::from(self)
            }

            #[inline(always)]
            fn from_i64_saturating(v: i64) -> Self {
                v.clamp(<i64 as From<$t>>::from(<$t>::MIN), <i64 as From<$t>>::from(<$t>::MAX)) as $t
            }
        }
    )*};
}

impl_integer_sample!(
    u8 => UnsignedInteger,
    u16 => UnsignedInteger,
    u32 => UnsignedInteger,
    i8 => SignedInteger,
    i16 => SignedInteger,
    i32 => SignedInteger
);

macro_rules! impl_float_sample {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            const SAMPLE_FORMAT: SampleFormat = SampleFormat::FloatingPoint;
            const IS_INTEGRAL: bool = false;
            const IS_SIGNED: bool = true;

            #[inline(always)]
            fn as_f64(self) -> f64 {
                <f64 as From<$t>>::from(self)
            }

            #[inline(always)]
            fn from_f64_rounded(v: f64) -> Self {
                v as $t
            }

            #[inline(always)]
            fn as_i64(self) -> i64 {
                self.round() as i64
            }

            #[inline(always)]
            fn from_i64_saturating(v: i64) -> Self {
                v as $t
            }
        }
    )*};
}

impl_float_sample!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversions_round_and_saturate() {
        assert_eq!(u8::from_f64_rounded(2.5), 3);
        assert_eq!(u8::from_f64_rounded(2.49), 2);
        assert_eq!(u8::from_f64_rounded(300.0), 255);
        assert_eq!(u8::from_f64_rounded(-4.0), 0);
        assert_eq!(i16::from_f64_rounded(-2.5), -3);
        assert_eq!(i8::from_i64_saturating(-1000), i8::MIN);
        assert_eq!(u16::from_i64_saturating(70_000), u16::MAX);
        assert_eq!(u32::from_i64_saturating(-1), 0);
    }

    #[test]
    fn float_conversions_are_exact() {
        assert_eq!(f32::from_f64_rounded(2.5), 2.5);
        assert_eq!(f64::from_i64_saturating(-7), -7.0);
        assert_eq!(f32::as_i64(1.5), 2);
    }

    #[test]
    fn sample_traits() {
        assert!(u8::IS_INTEGRAL && !u8::IS_SIGNED);
        assert!(i32::IS_INTEGRAL && i32::IS_SIGNED);
        assert!(f32::IS_FLOATING_POINT && f32::IS_SIGNED);
        assert_eq!(u16::NR_BYTES, 2);
        assert_eq!(f64::SAMPLE_FORMAT, SampleFormat::FloatingPoint);
        assert_eq!(i8::SAMPLE_FORMAT, SampleFormat::SignedInteger);
    }
}
