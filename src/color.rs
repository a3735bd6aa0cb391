//! Pixel value types and the pixel/sample format descriptors.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use bytemuck::{Pod, Zeroable};

use crate::traits::Sample;

/// Semantic interpretation of the channels of a pixel.
#[derive(Copy, PartialEq, Eq, Debug, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PixelFormat {
    /// Luminance
    Y,
    /// Single channel of unspecified meaning
    X,
    /// Luminance with alpha
    Ya,
    Xx,
    Rgb,
    Bgr,
    YCbCr,
    CieLab,
    IccLab,
    Xxx,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    Cmyk,
    Ycck,
    Xxxx,
    /// A format that is not further specified.
    Unknown,
    /// Marks a descriptor that does not describe a valid image.
    Invalid,
}

impl PixelFormat {
    /// Number of channels implied by the format, or 0 for `Unknown` and `Invalid`.
    pub fn channel_count(self) -> u16 {
        match self {
            PixelFormat::Y | PixelFormat::X => 1,
            PixelFormat::Ya | PixelFormat::Xx => 2,
            PixelFormat::Rgb
            | PixelFormat::Bgr
            | PixelFormat::YCbCr
            | PixelFormat::CieLab
            | PixelFormat::IccLab
            | PixelFormat::Xxx => 3,
            PixelFormat::Rgba
            | PixelFormat::Bgra
            | PixelFormat::Argb
            | PixelFormat::Abgr
            | PixelFormat::Cmyk
            | PixelFormat::Ycck
            | PixelFormat::Xxxx => 4,
            PixelFormat::Unknown | PixelFormat::Invalid => 0,
        }
    }

    /// Whether one of the channels is an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Ya
                | PixelFormat::Rgba
                | PixelFormat::Bgra
                | PixelFormat::Argb
                | PixelFormat::Abgr
        )
    }
}

/// Numeric interpretation of a single channel.
#[derive(Copy, PartialEq, Eq, Debug, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SampleFormat {
    UnsignedInteger,
    SignedInteger,
    FloatingPoint,
    Unknown,
}

/// A compile time pixel format marker.
pub trait FormatTag:
    Copy + Clone + Default + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    const PIXEL_FORMAT: PixelFormat;
}

/// Zero-sized markers attaching a [`PixelFormat`] to a pixel type.
pub mod formats {
    use super::{FormatTag, PixelFormat};

    macro_rules! define_format_tags {
        ($($(#[$attr:meta])* $name:ident => $format:ident,)*) => {$(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl FormatTag for $name {
                const PIXEL_FORMAT: PixelFormat = PixelFormat::$format;
            }
        )*};
    }

    define_format_tags! {
        /// No particular channel semantics.
        Unformatted => Unknown,
        Y => Y,
        X => X,
        Ya => Ya,
        Xx => Xx,
        Rgb => Rgb,
        Bgr => Bgr,
        YCbCr => YCbCr,
        CieLab => CieLab,
        IccLab => IccLab,
        Xxx => Xxx,
        Rgba => Rgba,
        Bgra => Bgra,
        Argb => Argb,
        Abgr => Abgr,
        Cmyk => Cmyk,
        Ycck => Ycck,
        Xxxx => Xxxx,
    }
}

use self::formats::Unformatted;

/// A pixel made of `N` channels of type `T` with format `F`.
///
/// The format is carried in the type only; the memory representation is exactly `[T; N]`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel<T, const N: usize, F = Unformatted> {
    channels: [T; N],
    _format: PhantomData<F>,
}

// SAFETY: `Pixel` is `repr(transparent)` over `[T; N]` and `T: Pod`, so it has no padding and every
// bit pattern is valid. `PhantomData<F>` is zero-sized.
unsafe impl<T: Sample, const N: usize, F: FormatTag> Zeroable for Pixel<T, N, F> {}
unsafe impl<T: Sample, const N: usize, F: FormatTag> Pod for Pixel<T, N, F> {}

impl<T: Copy, const N: usize, F> Pixel<T, N, F> {
    #[inline(always)]
    pub const fn new(channels: [T; N]) -> Self {
        Pixel {
            channels,
            _format: PhantomData,
        }
    }

    /// A pixel with all channels set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::new([value; N])
    }

    #[inline(always)]
    pub fn channels(&self) -> &[T; N] {
        &self.channels
    }

    #[inline(always)]
    pub fn channels_mut(&mut self) -> &mut [T; N] {
        &mut self.channels
    }

    #[inline(always)]
    pub fn into_channels(self) -> [T; N] {
        self.channels
    }

    /// Applies `f` to every channel.
    #[inline]
    pub fn map<U: Copy>(self, f: impl FnMut(T) -> U) -> Pixel<U, N, F> {
        Pixel::new(self.channels.map(f))
    }

    /// Combines the channels of two pixels.
    #[inline]
    pub fn map2<U: Copy, V: Copy>(self, other: Pixel<U, N, F>, mut f: impl FnMut(T, U) -> V) -> Pixel<V, N, F> {
        let mut index = 0;
        Pixel::new([(); N].map(|_| {
            let v = f(self.channels[index], other.channels[index]);
            index += 1;
            v
        }))
    }

    /// Same channel values with a different format tag.
    #[inline(always)]
    pub fn with_format<G>(self) -> Pixel<T, N, G> {
        Pixel::new(self.channels)
    }
}

impl<T: Sample, const N: usize, F> Pixel<T, N, F> {
    /// Converts every channel to another element type, rounding and saturating.
    #[inline]
    pub fn cast<U: Sample>(self) -> Pixel<U, N, F> {
        self.map(|c| U::from_f64_rounded(c.as_f64()))
    }
}

impl<T: Sample, const N: usize, F> Default for Pixel<T, N, F> {
    fn default() -> Self {
        Self::new([T::default(); N])
    }
}

impl<T: fmt::Debug, const N: usize, F> fmt::Debug for Pixel<T, N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.channels.iter()).finish()
    }
}

impl<T: Copy, const N: usize, F> From<[T; N]> for Pixel<T, N, F> {
    fn from(channels: [T; N]) -> Self {
        Self::new(channels)
    }
}

impl<T, const N: usize, F> Index<usize> for Pixel<T, N, F> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.channels[index]
    }
}

impl<T, const N: usize, F> IndexMut<usize> for Pixel<T, N, F> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.channels[index]
    }
}

/// A generalized pixel.
///
/// [`Pixel`] is the only implementor; the trait gives algorithms a name for the element type,
/// channel count and format of whatever pixel an image stores.
pub trait PixelType: Copy + Clone + PartialEq + fmt::Debug + Default + Pod + Send + Sync {
    /// The underlying subpixel type.
    type Subpixel: Sample;

    /// The compile time format marker.
    type Format: FormatTag;

    /// The number of channels of this pixel type.
    const CHANNEL_COUNT: usize;

    /// Size of one pixel in bytes.
    const NR_BYTES: usize = Self::CHANNEL_COUNT * core::mem::size_of::<Self::Subpixel>();

    const PIXEL_FORMAT: PixelFormat = <Self::Format as FormatTag>::PIXEL_FORMAT;

    const SAMPLE_FORMAT: SampleFormat = <Self::Subpixel as Sample>::SAMPLE_FORMAT;

    const IS_INTEGRAL: bool = <Self::Subpixel as Sample>::IS_INTEGRAL;

    const IS_SIGNED: bool = <Self::Subpixel as Sample>::IS_SIGNED;

    const IS_FLOATING_POINT: bool = <Self::Subpixel as Sample>::IS_FLOATING_POINT;

    /// Returns the components as a slice.
    fn channel_slice(&self) -> &[Self::Subpixel];

    /// Returns the components as a mutable slice
    fn channel_slice_mut(&mut self) -> &mut [Self::Subpixel];

    /// The pixel with every channel zero.
    fn zero() -> Self {
        Zeroable::zeroed()
    }
}

impl<T: Sample, const N: usize, F: FormatTag> PixelType for Pixel<T, N, F> {
    type Subpixel = T;
    type Format = F;
    const CHANNEL_COUNT: usize = N;

    #[inline(always)]
    fn channel_slice(&self) -> &[T] {
        &self.channels
    }

    #[inline(always)]
    fn channel_slice_mut(&mut self) -> &mut [T] {
        &mut self.channels
    }
}

pub type PixelY8 = Pixel<u8, 1, formats::Y>;
pub type PixelYa8 = Pixel<u8, 2, formats::Ya>;
pub type PixelRgb8 = Pixel<u8, 3, formats::Rgb>;
pub type PixelBgr8 = Pixel<u8, 3, formats::Bgr>;
pub type PixelRgba8 = Pixel<u8, 4, formats::Rgba>;
pub type PixelBgra8 = Pixel<u8, 4, formats::Bgra>;
pub type PixelY16 = Pixel<u16, 1, formats::Y>;
pub type PixelRgb16 = Pixel<u16, 3, formats::Rgb>;
pub type PixelRgba16 = Pixel<u16, 4, formats::Rgba>;
pub type PixelYf32 = Pixel<f32, 1, formats::Y>;
pub type PixelRgbf32 = Pixel<f32, 3, formats::Rgb>;
pub type PixelRgbaf32 = Pixel<f32, 4, formats::Rgba>;
pub type PixelYf64 = Pixel<f64, 1, formats::Y>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_traits() {
        assert_eq!(PixelRgb8::CHANNEL_COUNT, 3);
        assert_eq!(PixelRgb8::NR_BYTES, 3);
        assert_eq!(PixelRgba16::NR_BYTES, 8);
        assert_eq!(PixelYf32::PIXEL_FORMAT, PixelFormat::Y);
        assert_eq!(PixelYf32::SAMPLE_FORMAT, SampleFormat::FloatingPoint);
        assert!(PixelYf32::IS_FLOATING_POINT);
        assert_eq!(<Pixel<i16, 2>>::PIXEL_FORMAT, PixelFormat::Unknown);
        assert!(<Pixel<i16, 2>>::IS_SIGNED);
        assert_eq!(core::mem::size_of::<PixelRgbf32>(), 12);
    }

    #[test]
    fn channel_access_and_maps() {
        let mut p = PixelRgb8::new([1, 2, 3]);
        p[1] = 20;
        assert_eq!(p.channels(), &[1, 20, 3]);
        let doubled = p.map(|c| u16::from(c) * 2);
        assert_eq!(doubled.into_channels(), [2, 40, 6]);
        let summed = p.map2(PixelRgb8::splat(1), |a, b| a + b);
        assert_eq!(summed, PixelRgb8::new([2, 21, 4]));
        assert_eq!(PixelRgb8::zero(), PixelRgb8::default());
    }

    #[test]
    fn cast_rounds_and_saturates() {
        let p = Pixel::<f32, 3>::new([-1.0, 127.5, 300.0]);
        assert_eq!(p.cast::<u8>().into_channels(), [0, 128, 255]);
    }

    #[test]
    fn format_channel_counts() {
        assert_eq!(PixelFormat::Y.channel_count(), 1);
        assert_eq!(PixelFormat::Ya.channel_count(), 2);
        assert_eq!(PixelFormat::YCbCr.channel_count(), 3);
        assert_eq!(PixelFormat::Cmyk.channel_count(), 4);
        assert_eq!(PixelFormat::Invalid.channel_count(), 0);
        assert!(PixelFormat::Argb.has_alpha());
        assert!(!PixelFormat::Ycck.has_alpha());
    }
}
