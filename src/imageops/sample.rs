//! Resampling an image to a new extent.
//!
//! Destination pixel `(x, y)` samples the source at `(x * src_w / dst_w, y * src_h / dst_h)`.
//! This is point sampling: shrinking by large factors skips source pixels and aliases.

use log::trace;

use crate::access::{
    Bilinear, ImageInterpolationMode, InterpolationMode, NearestNeighbor, Replicated, Unchecked,
};
use crate::color::{FormatTag, Pixel};
use crate::error::ImageResult;
use crate::images::{dynamic_map, Constant, DynImage, DynImageView, Image, ImageAccess};
use crate::imageops::{allocate, clone_into};
use crate::math::{PixelIndex, PixelLength};
use crate::traits::Sample;

/// Destination indices `begin..end` along one axis whose taps stay inside the source.
fn interior_range(src_extent: i32, dst_extent: i32, factor: f64, left: i32, right: i32) -> (i32, i32) {
    let limit = f64::from(src_extent - 1 - right);
    if limit < f64::from(left) {
        return (0, 0);
    }
    let mut end = ((limit / factor).floor() as i64 + 1).clamp(0, i64::from(dst_extent)) as i32;
    while end > 0 && f64::from(end - 1) * factor > limit {
        end -= 1;
    }
    let mut begin = ((f64::from(left) / factor).ceil() as i64).clamp(0, i64::from(end)) as i32;
    while begin < end && f64::from(begin) * factor < f64::from(left) {
        begin += 1;
    }
    (begin, end)
}

/// Resamples `src` to `width` x `height` into `dst`.
///
/// Pixels whose interpolation taps stay inside the source are read unchecked, the remaining ones
/// through [`Replicated`] border access. Resampling to the same extent copies the image.
pub fn resample_into<M, I, T, F, const N: usize>(
    src: &I,
    width: PixelLength,
    height: PixelLength,
    _mode: M,
    dst: &mut Image<Pixel<T, N, F>>,
) where
    M: InterpolationMode,
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    let (src_w, src_h) = (src.width().get(), src.height().get());
    let (dst_w, dst_h) = (width.get().max(0), height.get().max(0));
    if (src_w, src_h) == (dst_w, dst_h) {
        clone_into(src, dst);
        return;
    }
    if !allocate(dst, PixelLength::new(dst_w), PixelLength::new(dst_h)) {
        return;
    }
    if src.is_empty() {
        // nothing to sample from
        dst.rows_mut().for_each(|row| row.fill(Pixel::default()));
        return;
    }

    let factor_x = f64::from(src_w) / f64::from(dst_w.max(1));
    let factor_y = f64::from(src_h) / f64::from(dst_h.max(1));
    let (x0, x1) = interior_range(src_w, dst_w, factor_x, M::INDEX_TO_LEFT, M::INDEX_TO_RIGHT);
    let (y0, y1) = interior_range(src_h, dst_h, factor_y, M::INDEX_TO_UP, M::INDEX_TO_DOWN);
    trace!("resample {src_w}x{src_h} to {dst_w}x{dst_h}, interior x {x0}..{x1}, y {y0}..{y1}");

    for y in 0..dst_h {
        let sy = f64::from(y) * factor_y;
        let out = dst.row_mut(PixelIndex::new(y));
        let interior_row = (y0..y1).contains(&y);
        for (x, p) in (0..dst_w).zip(out.iter_mut()) {
            let sx = f64::from(x) * factor_x;
            *p = if interior_row && (x0..x1).contains(&x) {
                M::sample::<Unchecked, I, T, F, N>(src, sx, sy)
            } else {
                M::sample::<Replicated, I, T, F, N>(src, sx, sy)
            };
        }
    }
}

/// Resamples `src` to `width` x `height`.
///
/// ```
/// use imgkit::access::NearestNeighbor;
/// use imgkit::imageops::resample;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelY8};
///
/// let img = Image::from_fn(px(2), px(2), |x, y| PixelY8::new([(x.get() + 2 * y.get()) as u8]));
/// let big = resample(&img, px(4), px(4), NearestNeighbor);
/// assert_eq!(big.get_pixel(idx(3), idx(1))[0], 1);
/// ```
pub fn resample<M, I, T, F, const N: usize>(
    src: &I,
    width: PixelLength,
    height: PixelLength,
    mode: M,
) -> Image<Pixel<T, N, F>>
where
    M: InterpolationMode,
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    let mut dst = Image::empty();
    resample_into(src, width, height, mode, &mut dst);
    dst
}

/// Resamples with the interpolation method selected at runtime.
pub fn resample_with_mode<I, T, F, const N: usize>(
    src: &I,
    width: PixelLength,
    height: PixelLength,
    mode: ImageInterpolationMode,
) -> Image<Pixel<T, N, F>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    match mode {
        ImageInterpolationMode::NearestNeighbor => resample(src, width, height, NearestNeighbor),
        ImageInterpolationMode::Bilinear => resample(src, width, height, Bilinear),
    }
}

/// Resamples a runtime-typed image. The result keeps the semantics of `src`.
pub fn dyn_resample(
    src: &DynImageView<'_, Constant>,
    width: PixelLength,
    height: PixelLength,
    mode: ImageInterpolationMode,
) -> ImageResult<DynImage> {
    let semantics = src.semantics();
    dynamic_map!(src, typed => {
        Ok(resample_with_mode(&typed, width, height, mode).into_dyn_image_with(semantics))
    })
}
