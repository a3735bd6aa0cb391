//! Conversions between pixel formats of the same element type.
//!
//! Every convertible format is described by a [`ColorLayout`]: how its channels split into a
//! [`Color`] and an optional alpha value, and how they are assembled again. Gray to color
//! conversions replicate the luminance, color to gray conversions weight red, green and blue by
//! `0.299`, `0.587` and `0.114`.
//!
//! Whether a conversion needs an alpha value is decided by the types: [`convert_pixel`] and
//! [`convert_image`] only accept format pairs for which the destination alpha, if any, comes
//! from the source. Use the `_with_alpha` variants otherwise.

use log::trace;

use crate::color::{formats, FormatTag, Pixel};
use crate::images::{Image, ImageAccess};
use crate::imageops::allocate;
use crate::traits::Sample;

/// Weights of red, green and blue in the luminance of a color.
const RGB_TO_Y: [f64; 3] = [0.299, 0.587, 0.114];

/// The color of a pixel, independent of channel order and alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color<T> {
    Gray(T),
    /// Red, green and blue.
    Rgb([T; 3]),
}

impl<T: Sample> Color<T> {
    /// The luminance. Integral samples are rounded.
    #[inline]
    pub fn luma(self) -> T {
        match self {
            Color::Gray(y) => y,
            Color::Rgb(rgb) => {
                let y: f64 = rgb.iter().zip(RGB_TO_Y).map(|(c, w)| c.as_f64() * w).sum();
                T::from_f64_rounded(y)
            }
        }
    }

    /// Red, green and blue. Gray values are replicated.
    #[inline]
    pub fn rgb(self) -> [T; 3] {
        match self {
            Color::Gray(y) => [y; 3],
            Color::Rgb(rgb) => rgb,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Whether a format carries an alpha channel, as a type.
pub trait AlphaKind: sealed::Sealed {}

/// Formats without an alpha channel.
#[derive(Clone, Copy, Debug)]
pub enum Opaque {}

/// Formats with an alpha channel.
#[derive(Clone, Copy, Debug)]
pub enum WithAlpha {}

impl sealed::Sealed for Opaque {}
impl sealed::Sealed for WithAlpha {}
impl AlphaKind for Opaque {}
impl AlphaKind for WithAlpha {}

/// Implemented when a destination of this alpha kind can be filled from a source of kind `S`
/// without an extra alpha value.
pub trait AlphaFrom<S: AlphaKind>: AlphaKind {}

impl<S: AlphaKind> AlphaFrom<S> for Opaque {}
impl AlphaFrom<WithAlpha> for WithAlpha {}

/// Channel arrangement of a format with `N` channels.
pub trait ColorLayout<const N: usize>: FormatTag {
    type Alpha: AlphaKind;

    /// Splits the channels into color and alpha.
    fn split<T: Copy>(channels: [T; N]) -> (Color<T>, Option<T>);

    /// Assembles channels from color and alpha. `alpha` is ignored by opaque formats.
    fn join<T: Sample>(color: Color<T>, alpha: T) -> [T; N];
}

impl ColorLayout<1> for formats::Y {
    type Alpha = Opaque;

    #[inline(always)]
    fn split<T: Copy>([y]: [T; 1]) -> (Color<T>, Option<T>) {
        (Color::Gray(y), None)
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, _alpha: T) -> [T; 1] {
        [color.luma()]
    }
}

impl ColorLayout<2> for formats::Ya {
    type Alpha = WithAlpha;

    #[inline(always)]
    fn split<T: Copy>([y, a]: [T; 2]) -> (Color<T>, Option<T>) {
        (Color::Gray(y), Some(a))
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, alpha: T) -> [T; 2] {
        [color.luma(), alpha]
    }
}

impl ColorLayout<3> for formats::Rgb {
    type Alpha = Opaque;

    #[inline(always)]
    fn split<T: Copy>(rgb: [T; 3]) -> (Color<T>, Option<T>) {
        (Color::Rgb(rgb), None)
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, _alpha: T) -> [T; 3] {
        color.rgb()
    }
}

impl ColorLayout<3> for formats::Bgr {
    type Alpha = Opaque;

    #[inline(always)]
    fn split<T: Copy>([b, g, r]: [T; 3]) -> (Color<T>, Option<T>) {
        (Color::Rgb([r, g, b]), None)
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, _alpha: T) -> [T; 3] {
        let [r, g, b] = color.rgb();
        [b, g, r]
    }
}

impl ColorLayout<4> for formats::Rgba {
    type Alpha = WithAlpha;

    #[inline(always)]
    fn split<T: Copy>([r, g, b, a]: [T; 4]) -> (Color<T>, Option<T>) {
        (Color::Rgb([r, g, b]), Some(a))
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, a: T) -> [T; 4] {
        let [r, g, b] = color.rgb();
        [r, g, b, a]
    }
}

impl ColorLayout<4> for formats::Bgra {
    type Alpha = WithAlpha;

    #[inline(always)]
    fn split<T: Copy>([b, g, r, a]: [T; 4]) -> (Color<T>, Option<T>) {
        (Color::Rgb([r, g, b]), Some(a))
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, a: T) -> [T; 4] {
        let [r, g, b] = color.rgb();
        [b, g, r, a]
    }
}

impl ColorLayout<4> for formats::Argb {
    type Alpha = WithAlpha;

    #[inline(always)]
    fn split<T: Copy>([a, r, g, b]: [T; 4]) -> (Color<T>, Option<T>) {
        (Color::Rgb([r, g, b]), Some(a))
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, a: T) -> [T; 4] {
        let [r, g, b] = color.rgb();
        [a, r, g, b]
    }
}

impl ColorLayout<4> for formats::Abgr {
    type Alpha = WithAlpha;

    #[inline(always)]
    fn split<T: Copy>([a, b, g, r]: [T; 4]) -> (Color<T>, Option<T>) {
        (Color::Rgb([r, g, b]), Some(a))
    }

    #[inline(always)]
    fn join<T: Sample>(color: Color<T>, a: T) -> [T; 4] {
        let [r, g, b] = color.rgb();
        [a, b, g, r]
    }
}

/// Converts a pixel to another format. Alpha is carried over when both formats have it.
///
/// ```
/// use imgkit::imageops::convert_pixel;
/// use imgkit::{PixelBgra8, PixelRgb8, PixelRgba8, PixelY8};
///
/// let y: PixelY8 = convert_pixel(PixelRgb8::new([100, 100, 100]));
/// assert_eq!(y[0], 100);
/// let bgra: PixelBgra8 = convert_pixel(PixelRgba8::new([1, 2, 3, 4]));
/// assert_eq!(bgra.into_channels(), [3, 2, 1, 4]);
/// ```
#[inline]
pub fn convert_pixel<T, F, G, const N: usize, const M: usize>(px: Pixel<T, N, F>) -> Pixel<T, M, G>
where
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
    G::Alpha: AlphaFrom<F::Alpha>,
{
    let (color, alpha) = F::split(px.into_channels());
    // a missing source alpha is only possible for opaque destinations, which ignore it
    Pixel::new(G::join(color, alpha.unwrap_or_default()))
}

/// Converts a pixel to another format, using `alpha` where the source has no alpha channel.
#[inline]
pub fn convert_pixel_with_alpha<T, F, G, const N: usize, const M: usize>(
    px: Pixel<T, N, F>,
    alpha: T,
) -> Pixel<T, M, G>
where
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
{
    let (color, src_alpha) = F::split(px.into_channels());
    Pixel::new(G::join(color, src_alpha.unwrap_or(alpha)))
}

fn convert_rows<I, T, F, G, C, const N: usize, const M: usize>(
    src: &I,
    dst: &mut Image<Pixel<T, M, G>>,
    convert: C,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
    G: FormatTag,
    C: Fn(Pixel<T, N, F>) -> Pixel<T, M, G>,
{
    if !allocate(dst, src.width(), src.height()) {
        return;
    }
    trace!(
        "convert {}x{} pixels from {:?} to {:?}",
        src.width(),
        src.height(),
        F::PIXEL_FORMAT,
        G::PIXEL_FORMAT
    );
    for y in src.height().indices() {
        for (q, &p) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *q = convert(p);
        }
    }
}

/// Converts every pixel of `src` into `dst`, which is resized to the extent of `src`.
pub fn convert_image_into<I, T, F, G, const N: usize, const M: usize>(
    src: &I,
    dst: &mut Image<Pixel<T, M, G>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
    G::Alpha: AlphaFrom<F::Alpha>,
{
    convert_rows(src, dst, convert_pixel::<T, F, G, N, M>);
}

/// Converts `src` to another pixel format.
///
/// ```
/// use imgkit::imageops::convert_image;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelRgb8, PixelY8};
///
/// let rgb = Image::from_pixel(px(3), px(2), PixelRgb8::new([255, 0, 0]));
/// let gray: Image<PixelY8> = convert_image(&rgb);
/// assert_eq!(gray.get_pixel(idx(2), idx(1))[0], 76);
/// ```
pub fn convert_image<I, T, F, G, const N: usize, const M: usize>(src: &I) -> Image<Pixel<T, M, G>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
    G::Alpha: AlphaFrom<F::Alpha>,
{
    let mut dst = Image::empty();
    convert_image_into(src, &mut dst);
    dst
}

/// Converts every pixel of `src` into `dst`, using `alpha` where `src` has no alpha channel.
pub fn convert_image_with_alpha_into<I, T, F, G, const N: usize, const M: usize>(
    src: &I,
    alpha: T,
    dst: &mut Image<Pixel<T, M, G>>,
) where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
{
    convert_rows(src, dst, |p| convert_pixel_with_alpha(p, alpha));
}

/// Converts `src` to another pixel format, using `alpha` where `src` has no alpha channel.
pub fn convert_image_with_alpha<I, T, F, G, const N: usize, const M: usize>(
    src: &I,
    alpha: T,
) -> Image<Pixel<T, M, G>>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: ColorLayout<N>,
    G: ColorLayout<M>,
{
    let mut dst = Image::empty();
    convert_image_with_alpha_into(src, alpha, &mut dst);
    dst
}
