//! Separable 1-D convolution along rows or columns.
//!
//! Output pixel `x` is `Σ kernel[k] * src(x + k - offset)` with `offset = (kernel.len() - 1) / 2`.
//! Only output pixels whose taps leave the image go through the border policy; all others read
//! the source rows directly.

use log::trace;
use num_traits::Float;

use crate::access::BorderAccessor;
use crate::color::{FormatTag, Pixel};
use crate::error::ImageResult;
use crate::images::{dynamic_map, Constant, DynImage, DynImageView, Image, ImageAccess};
use crate::imageops::allocate;
use crate::kernel::{FixedPointKernel, Kernel};
use crate::math::PixelIndex;
use crate::traits::Sample;

/// Coefficients prepared for the inner loop, with their accumulator.
trait Taps {
    type Acc: Copy;
    const ZERO: Self::Acc;

    fn len(&self) -> usize;

    fn mac<T: Sample>(&self, acc: Self::Acc, k: usize, v: T) -> Self::Acc;

    fn finish<T: Sample>(acc: Self::Acc) -> T;

    #[inline(always)]
    fn offset(&self) -> usize {
        self.len().saturating_sub(1) / 2
    }

    /// Number of taps right of the center.
    #[inline(always)]
    fn right(&self) -> usize {
        self.len().saturating_sub(1 + self.offset())
    }
}

struct FloatTaps(Vec<f64>);

impl FloatTaps {
    fn new<V: Float, C: AsRef<[V]>>(kernel: &Kernel<V, C>) -> Self {
        FloatTaps(kernel.iter().map(|c| c.to_f64().unwrap_or(0.0)).collect())
    }
}

impl Taps for FloatTaps {
    type Acc = f64;
    const ZERO: f64 = 0.0;

    #[inline(always)]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn mac<T: Sample>(&self, acc: f64, k: usize, v: T) -> f64 {
        acc + self.0[k] * v.as_f64()
    }

    #[inline(always)]
    fn finish<T: Sample>(acc: f64) -> T {
        T::from_f64_rounded(acc)
    }
}

struct FixedTaps<const SHIFT: u32>(Vec<i64>);

impl<const SHIFT: u32> Taps for FixedTaps<SHIFT> {
    // products of 32-bit coefficients and 64-bit samples, summed over any kernel length
    type Acc = i128;
    const ZERO: i128 = 0;

    #[inline(always)]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn mac<T: Sample>(&self, acc: i128, k: usize, v: T) -> i128 {
        acc + i128::from(self.0[k]) * i128::from(v.as_i64())
    }

    #[inline(always)]
    fn finish<T: Sample>(acc: i128) -> T {
        // arithmetic shift, ties round up
        let scaled = (acc + ((1i128 << SHIFT) >> 1)) >> SHIFT;
        T::from_i64_saturating(scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

/// Splits `0..extent` into `0..a` and `b..extent`, which need border handling, and `a..b`.
#[inline]
fn segments<K: Taps>(taps: &K, extent: usize) -> (usize, usize) {
    let a = taps.offset().min(extent);
    let b = extent.saturating_sub(taps.right()).max(a);
    (a, b)
}

#[inline(always)]
fn shifted(pos: usize, k: usize, offset: usize) -> PixelIndex {
    PixelIndex::new((pos + k) as i32 - offset as i32)
}

#[inline(always)]
fn convolve_pixel<K, T, F, const N: usize>(
    taps: &K,
    mut tap: impl FnMut(usize) -> Pixel<T, N, F>,
) -> Pixel<T, N, F>
where
    K: Taps,
    T: Sample,
{
    let mut acc = [K::ZERO; N];
    for k in 0..taps.len() {
        let p = tap(k);
        for (a, &v) in acc.iter_mut().zip(p.channels()) {
            *a = taps.mac(*a, k, v);
        }
    }
    Pixel::new(acc.map(K::finish::<T>))
}

fn convolve_x<I, T, F, K, B, const N: usize>(src: &I, taps: &K, dst: &mut Image<Pixel<T, N, F>>)
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    K: Taps,
    B: BorderAccessor,
{
    if !allocate(dst, src.width(), src.height()) {
        return;
    }
    let width = src.width().get().max(0) as usize;
    let offset = taps.offset();
    let (a, b) = segments(taps, width);
    trace!("convolution along x: {}x{} pixels, {} taps, interior {a}..{b}", src.width(), src.height(), taps.len());

    for y in src.height().indices() {
        let row = src.row(y);
        let out = dst.row_mut(y);
        for x in (0..a).chain(b..width) {
            out[x] = convolve_pixel(taps, |k| B::access(src, shifted(x, k, offset), y));
        }
        for x in a..b {
            out[x] = convolve_pixel(taps, |k| row[x + k - offset]);
        }
    }
}

fn convolve_y<I, T, F, K, B, const N: usize>(src: &I, taps: &K, dst: &mut Image<Pixel<T, N, F>>)
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    K: Taps,
    B: BorderAccessor,
{
    if !allocate(dst, src.width(), src.height()) {
        return;
    }
    let height = src.height().get().max(0) as usize;
    let offset = taps.offset();
    let (a, b) = segments(taps, height);
    trace!("convolution along y: {}x{} pixels, {} taps, interior {a}..{b}", src.width(), src.height(), taps.len());

    let mut rows: Vec<&[Pixel<T, N, F>]> = Vec::with_capacity(taps.len());
    for y in 0..height {
        let out = dst.row_mut(PixelIndex::new(y as i32));
        if (a..b).contains(&y) {
            rows.clear();
            rows.extend((0..taps.len()).map(|k| src.row(shifted(y, k, offset))));
            for (x, p) in out.iter_mut().enumerate() {
                *p = convolve_pixel(taps, |k| rows[k][x]);
            }
        } else {
            for (x, p) in out.iter_mut().enumerate() {
                let x = PixelIndex::new(x as i32);
                *p = convolve_pixel(taps, |k| B::access(src, x, shifted(y, k, offset)));
            }
        }
    }
}

/// Convolves every row of `src` with `kernel`, writing into `dst`.
///
/// `dst` is resized to the extent of `src`, reusing its storage when possible. Sums are
/// accumulated in `f64` and rounded to the element type. The `border` policy supplies taps
/// outside the image.
pub fn convolution_x_into<I, T, F, V, C, B, const N: usize>(
    src: &I,
    kernel: &Kernel<V, C>,
    _border: B,
    dst: &mut Image<Pixel<T, N, F>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    convolve_x::<I, T, F, FloatTaps, B, N>(src, &FloatTaps::new(kernel), dst);
}

/// Convolves every row of `src` with `kernel`.
///
/// ```
/// use imgkit::access::Replicated;
/// use imgkit::imageops::convolution_x;
/// use imgkit::kernel::Kernel;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelY8};
///
/// let values = [30, 10, 80].map(|v| PixelY8::new([v]));
/// let img = Image::from_pixels(px(3), px(1), &values).unwrap();
/// let out = convolution_x(&img, &Kernel::new([0.3, 0.5, 0.2]), Replicated);
/// assert_eq!(out.get_pixel(idx(0), idx(0))[0], 26);
/// ```
pub fn convolution_x<I, T, F, V, C, B, const N: usize>(
    src: &I,
    kernel: &Kernel<V, C>,
    border: B,
) -> Image<Pixel<T, N, F>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    let mut dst = Image::empty();
    convolution_x_into(src, kernel, border, &mut dst);
    dst
}

/// Convolves every column of `src` with `kernel`, writing into `dst`.
///
/// See [`convolution_x_into`].
pub fn convolution_y_into<I, T, F, V, C, B, const N: usize>(
    src: &I,
    kernel: &Kernel<V, C>,
    _border: B,
    dst: &mut Image<Pixel<T, N, F>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    convolve_y::<I, T, F, FloatTaps, B, N>(src, &FloatTaps::new(kernel), dst);
}

/// Convolves every column of `src` with `kernel`.
pub fn convolution_y<I, T, F, V, C, B, const N: usize>(
    src: &I,
    kernel: &Kernel<V, C>,
    border: B,
) -> Image<Pixel<T, N, F>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    let mut dst = Image::empty();
    convolution_y_into(src, kernel, border, &mut dst);
    dst
}

/// Convolves every row of `src` with a fixed-point kernel, writing into `dst`.
///
/// Sums are accumulated in `i128` and scaled back with `(sum + 2^(SHIFT-1)) >> SHIFT`, then
/// saturated to the element type.
pub fn convolution_x_fixed_into<I, T, F, O, B, const N: usize, const SHIFT: u32>(
    src: &I,
    kernel: &FixedPointKernel<O, SHIFT>,
    _border: B,
    dst: &mut Image<Pixel<T, N, F>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    O: Sample,
    B: BorderAccessor,
{
    let taps = FixedTaps::<SHIFT>(kernel.widened());
    convolve_x::<I, T, F, FixedTaps<SHIFT>, B, N>(src, &taps, dst);
}

/// Convolves every row of `src` with a fixed-point kernel.
pub fn convolution_x_fixed<I, T, F, O, B, const N: usize, const SHIFT: u32>(
    src: &I,
    kernel: &FixedPointKernel<O, SHIFT>,
    border: B,
) -> Image<Pixel<T, N, F>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    O: Sample,
    B: BorderAccessor,
{
    let mut dst = Image::empty();
    convolution_x_fixed_into(src, kernel, border, &mut dst);
    dst
}

/// Convolves every column of `src` with a fixed-point kernel, writing into `dst`.
pub fn convolution_y_fixed_into<I, T, F, O, B, const N: usize, const SHIFT: u32>(
    src: &I,
    kernel: &FixedPointKernel<O, SHIFT>,
    _border: B,
    dst: &mut Image<Pixel<T, N, F>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    O: Sample,
    B: BorderAccessor,
{
    let taps = FixedTaps::<SHIFT>(kernel.widened());
    convolve_y::<I, T, F, FixedTaps<SHIFT>, B, N>(src, &taps, dst);
}

/// Convolves every column of `src` with a fixed-point kernel.
pub fn convolution_y_fixed<I, T, F, O, B, const N: usize, const SHIFT: u32>(
    src: &I,
    kernel: &FixedPointKernel<O, SHIFT>,
    border: B,
) -> Image<Pixel<T, N, F>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    O: Sample,
    B: BorderAccessor,
{
    let mut dst = Image::empty();
    convolution_y_fixed_into(src, kernel, border, &mut dst);
    dst
}

/// Convolves every row of a runtime-typed image.
///
/// The result has the extent and semantics of `src`. Fails for layouts without a matching pixel
/// type.
pub fn dyn_convolution_x<V, C, B>(
    src: &DynImageView<'_, Constant>,
    kernel: &Kernel<V, C>,
    border: B,
) -> ImageResult<DynImage>
where
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    let semantics = src.semantics();
    dynamic_map!(src, typed => Ok(convolution_x(&typed, kernel, border).into_dyn_image_with(semantics)))
}

/// Convolves every column of a runtime-typed image.
pub fn dyn_convolution_y<V, C, B>(
    src: &DynImageView<'_, Constant>,
    kernel: &Kernel<V, C>,
    border: B,
) -> ImageResult<DynImage>
where
    V: Float,
    C: AsRef<[V]>,
    B: BorderAccessor,
{
    let semantics = src.semantics();
    dynamic_map!(src, typed => Ok(convolution_y(&typed, kernel, border).into_dyn_image_with(semantics)))
}
