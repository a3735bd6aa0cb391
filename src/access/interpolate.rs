//! Pixel values at fractional coordinates.

use core::marker::PhantomData;

use crate::access::border::{BorderAccessMode, BorderAccessor, Replicated, Unchecked, ZeroPadding};
use crate::color::{FormatTag, Pixel};
use crate::images::ImageAccess;
use crate::math::{round_half_down, PixelIndex};
use crate::traits::Sample;

/// Runtime selector for an interpolation method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageInterpolationMode {
    NearestNeighbor,
    Bilinear,
}

/// An interpolation method.
///
/// The `INDEX_TO_*` constants give how many pixels around the integer part of a coordinate the
/// method reads. Callers use them to decide where unchecked border access is safe.
pub trait InterpolationMode: Copy + Default + Send + Sync + 'static {
    const MODE: ImageInterpolationMode;
    const INDEX_TO_LEFT: i32;
    const INDEX_TO_RIGHT: i32;
    const INDEX_TO_UP: i32;
    const INDEX_TO_DOWN: i32;

    /// Interpolated value at `(x, y)`, per channel in `f64`.
    fn interpolate<B, I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<f64, N, F>
    where
        B: BorderAccessor,
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag;

    /// Interpolated value at `(x, y)`, narrowed to the element type of the image.
    #[inline]
    fn sample<B, I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<T, N, F>
    where
        B: BorderAccessor,
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        Self::interpolate::<B, I, T, F, N>(img, x, y).cast()
    }
}

/// Reads the pixel closest to the coordinate. Ties go to the smaller index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NearestNeighbor;

/// Weighted mean of the four pixels surrounding the coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bilinear;

#[inline(always)]
fn nearest_index(v: f64) -> PixelIndex {
    PixelIndex::new(round_half_down(v) as i32)
}

impl InterpolationMode for NearestNeighbor {
    const MODE: ImageInterpolationMode = ImageInterpolationMode::NearestNeighbor;
    const INDEX_TO_LEFT: i32 = 0;
    const INDEX_TO_RIGHT: i32 = 0;
    const INDEX_TO_UP: i32 = 0;
    const INDEX_TO_DOWN: i32 = 0;

    #[inline]
    fn interpolate<B, I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<f64, N, F>
    where
        B: BorderAccessor,
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        Self::sample::<B, I, T, F, N>(img, x, y).map(Sample::as_f64)
    }

    #[inline]
    fn sample<B, I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<T, N, F>
    where
        B: BorderAccessor,
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        B::access(img, nearest_index(x), nearest_index(y))
    }
}

impl InterpolationMode for Bilinear {
    const MODE: ImageInterpolationMode = ImageInterpolationMode::Bilinear;
    const INDEX_TO_LEFT: i32 = 0;
    const INDEX_TO_RIGHT: i32 = 1;
    const INDEX_TO_UP: i32 = 0;
    const INDEX_TO_DOWN: i32 = 1;

    #[inline]
    fn interpolate<B, I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<f64, N, F>
    where
        B: BorderAccessor,
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        let (xf, yf) = (x.floor(), y.floor());
        let (dx, dy) = (x - xf, y - yf);
        let (x0, y0) = (PixelIndex::new(xf as i32), PixelIndex::new(yf as i32));
        let (x1, y1) = (x0 + PixelIndex::new(1), y0 + PixelIndex::new(1));

        let a = B::access(img, x0, y0).map(Sample::as_f64);
        let b = B::access(img, x1, y0).map(Sample::as_f64);
        let c = B::access(img, x0, y1).map(Sample::as_f64);
        let d = B::access(img, x1, y1).map(Sample::as_f64);

        let mut out = a;
        for ch in 0..N {
            let (a, b, c, d) = (a[ch], b[ch], c[ch], d[ch]);
            out[ch] = a + (b - a) * dx + (c - a) * dy + (a - b - c + d) * dx * dy;
        }
        out
    }
}

/// Entry point naming interpolation method and border policy in the type.
///
/// ```
/// use imgkit::access::{Bilinear, ImageInterpolator, Replicated};
/// use imgkit::math::px;
/// use imgkit::{Image, PixelY8};
///
/// let img = Image::from_fn(px(2), px(1), |x, _| PixelY8::new([x.get() as u8 * 100]));
/// let v = ImageInterpolator::<Bilinear, Replicated>::interpolate(&img, 0.25, 0.0);
/// assert!((v[0] - 25.0).abs() < 1e-9);
/// ```
pub struct ImageInterpolator<M: InterpolationMode, B: BorderAccessor = Unchecked>(PhantomData<(M, B)>);

impl<M: InterpolationMode, B: BorderAccessor> ImageInterpolator<M, B> {
    #[inline(always)]
    pub fn interpolate<I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<f64, N, F>
    where
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        M::interpolate::<B, I, T, F, N>(img, x, y)
    }

    #[inline(always)]
    pub fn sample<I, T, F, const N: usize>(img: &I, x: f64, y: f64) -> Pixel<T, N, F>
    where
        I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
        T: Sample,
        F: FormatTag,
    {
        M::sample::<B, I, T, F, N>(img, x, y)
    }
}

fn interpolate_with_border<M, I, T, F, const N: usize>(
    img: &I,
    x: f64,
    y: f64,
    border: BorderAccessMode,
) -> Pixel<f64, N, F>
where
    M: InterpolationMode,
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    match border {
        BorderAccessMode::Unchecked => M::interpolate::<Unchecked, I, T, F, N>(img, x, y),
        BorderAccessMode::ZeroPadding => M::interpolate::<ZeroPadding, I, T, F, N>(img, x, y),
        BorderAccessMode::Replicated => M::interpolate::<Replicated, I, T, F, N>(img, x, y),
    }
}

/// Interpolates with method and border policy selected at runtime.
pub fn interpolate_with_mode<I, T, F, const N: usize>(
    img: &I,
    x: f64,
    y: f64,
    mode: ImageInterpolationMode,
    border: BorderAccessMode,
) -> Pixel<f64, N, F>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    match mode {
        ImageInterpolationMode::NearestNeighbor => {
            interpolate_with_border::<NearestNeighbor, I, T, F, N>(img, x, y, border)
        }
        ImageInterpolationMode::Bilinear => {
            interpolate_with_border::<Bilinear, I, T, F, N>(img, x, y, border)
        }
    }
}
