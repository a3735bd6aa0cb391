//! Policies for pixel coordinates outside the image.

use core::marker::PhantomData;

use crate::color::PixelType;
use crate::images::ImageAccess;
use crate::math::PixelIndex;

/// Runtime selector for a border policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderAccessMode {
    /// The coordinate must be inside the image.
    Unchecked,
    /// Pixels outside the image are zero.
    ZeroPadding,
    /// Coordinates are clamped to the nearest edge pixel.
    Replicated,
}

/// A policy answering "which pixel is at `(x, y)`" for any coordinate.
///
/// The policies are zero-sized, so algorithms select one at compile time and pay for border
/// handling only where they ask for it.
pub trait BorderAccessor: Copy + Default + Send + Sync + 'static {
    const MODE: BorderAccessMode;

    fn access<I>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel
    where
        I: ImageAccess + ?Sized;
}

/// Reads the pixel without any border handling.
///
/// Out of range coordinates panic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unchecked;

/// Out of range coordinates read as the zero pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroPadding;

/// Out of range coordinates are clamped to the image, independently per axis.
///
/// The image must not be empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Replicated;

impl BorderAccessor for Unchecked {
    const MODE: BorderAccessMode = BorderAccessMode::Unchecked;

    #[inline(always)]
    fn access<I>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel
    where
        I: ImageAccess + ?Sized,
    {
        img.pixel(x, y)
    }
}

impl BorderAccessor for ZeroPadding {
    const MODE: BorderAccessMode = BorderAccessMode::ZeroPadding;

    #[inline(always)]
    fn access<I>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel
    where
        I: ImageAccess + ?Sized,
    {
        if img.in_bounds(x, y) {
            img.pixel(x, y)
        } else {
            I::Pixel::zero()
        }
    }
}

impl BorderAccessor for Replicated {
    const MODE: BorderAccessMode = BorderAccessMode::Replicated;

    #[inline(always)]
    fn access<I>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel
    where
        I: ImageAccess + ?Sized,
    {
        let x = x.get().clamp(0, img.width().get() - 1);
        let y = y.get().clamp(0, img.height().get() - 1);
        img.pixel(PixelIndex::new(x), PixelIndex::new(y))
    }
}

/// Entry point naming the border policy in the type.
///
/// ```
/// use imgkit::access::{ImageBorderAccessor, Replicated, ZeroPadding};
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelY8};
///
/// let img = Image::from_pixel(px(2), px(2), PixelY8::new([7]));
/// assert_eq!(ImageBorderAccessor::<Replicated>::access(&img, idx(-5), idx(1))[0], 7);
/// assert_eq!(ImageBorderAccessor::<ZeroPadding>::access(&img, idx(2), idx(0))[0], 0);
/// ```
pub struct ImageBorderAccessor<B: BorderAccessor>(PhantomData<B>);

impl<B: BorderAccessor> ImageBorderAccessor<B> {
    #[inline(always)]
    pub fn access<I>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel
    where
        I: ImageAccess + ?Sized,
    {
        B::access(img, x, y)
    }
}

/// Reads through the policy selected at runtime.
pub fn access_with_mode<I>(
    img: &I,
    x: PixelIndex,
    y: PixelIndex,
    mode: BorderAccessMode,
) -> I::Pixel
where
    I: ImageAccess + ?Sized,
{
    match mode {
        BorderAccessMode::Unchecked => Unchecked::access(img, x, y),
        BorderAccessMode::ZeroPadding => ZeroPadding::access(img, x, y),
        BorderAccessMode::Replicated => Replicated::access(img, x, y),
    }
}
