use crate::color::PixelType;
use crate::images::{Image, ImageAccess, ImageAccessMut};
use crate::imageops::{allocate, clone_region};
use crate::math::{BoundingBox, PixelIndex, PixelLength};

/// Sets every pixel of `image` to `pixel`.
pub fn fill<I: ImageAccessMut + ?Sized>(image: &mut I, pixel: I::Pixel) {
    for y in image.height().indices() {
        image.row_mut(y).fill(pixel);
    }
}

/// Overwrites every pixel of `image` with `f(x, y)`.
pub fn generate_into<I, F>(image: &mut I, mut f: F)
where
    I: ImageAccessMut + ?Sized,
    F: FnMut(PixelIndex, PixelIndex) -> I::Pixel,
{
    let width = image.width();
    for y in image.height().indices() {
        for (x, p) in width.indices().zip(image.row_mut(y)) {
            *p = f(x, y);
        }
    }
}

/// A new `width` x `height` image with pixel `f(x, y)` at `(x, y)`.
pub fn generate<P, F>(width: PixelLength, height: PixelLength, f: F) -> Image<P>
where
    P: PixelType,
    F: FnMut(PixelIndex, PixelIndex) -> P,
{
    let mut image = Image::empty();
    if allocate(&mut image, width, height) {
        generate_into(&mut image, f);
    }
    image
}

/// Applies `f` to every pixel of `src`, producing an image of the results.
///
/// The pixel type of the output may differ from the input.
///
/// ```
/// use imgkit::imageops::transform_pixels;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelRgb8, PixelY8};
///
/// let rgb = Image::from_pixel(px(2), px(2), PixelRgb8::new([30, 60, 90]));
/// let gray: Image<PixelY8> = transform_pixels(&rgb, |p| PixelY8::new([p[1]]));
/// assert_eq!(gray.get_pixel(idx(1), idx(1))[0], 60);
/// ```
pub fn transform_pixels<I, Q, F>(src: &I, mut f: F) -> Image<Q>
where
    I: ImageAccess + ?Sized,
    Q: PixelType,
    F: FnMut(I::Pixel) -> Q,
{
    let mut dst = Image::empty();
    if !allocate(&mut dst, src.width(), src.height()) {
        return dst;
    }
    for y in src.height().indices() {
        for (q, &p) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *q = f(p);
        }
    }
    dst
}

/// Applies `f` to every pixel of `image` in place.
pub fn transform_pixels_in_place<I, F>(image: &mut I, mut f: F)
where
    I: ImageAccessMut + ?Sized,
    F: FnMut(I::Pixel) -> I::Pixel,
{
    for y in image.height().indices() {
        for p in image.row_mut(y) {
            *p = f(*p);
        }
    }
}

/// Replaces `image` with a copy of its region `bbox`.
///
/// Unlike [`Image::crop`], which keeps the stride of the original image, this allocates new
/// storage sized for the region.
///
/// # Panics
///
/// Panics if `bbox` does not lie within `image`.
pub fn crop<P: PixelType>(image: &mut Image<P>, bbox: &BoundingBox) {
    *image = clone_region(&*image, bbox);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PixelRgb8, PixelY16, PixelY8};
    use crate::math::{idx, px};

    #[test]
    fn fill_view() {
        let mut img = Image::<PixelY8>::new(px(4), px(4));
        let bbox = BoundingBox::new(idx(1), idx(1), px(2), px(2));
        fill(&mut img.sub_view_mut(&bbox), PixelY8::new([9]));
        let sum: u32 = img.rows().flatten().map(|p| u32::from(p[0])).sum();
        assert_eq!(sum, 4 * 9);
        assert_eq!(img.get_pixel(idx(2), idx(2))[0], 9);
        assert_eq!(img.get_pixel(idx(3), idx(2))[0], 0);
    }

    #[test]
    fn generated_pixels() {
        let img = generate(px(3), px(2), |x, y| PixelY16::new([(x.get() * 100 + y.get()) as u16]));
        assert_eq!(img.get_pixel(idx(2), idx(1))[0], 201);
        assert_eq!(img, Image::from_fn(px(3), px(2), |x, y| PixelY16::new([(x.get() * 100 + y.get()) as u16])));
    }

    #[test]
    fn in_place_transform() {
        let mut img = Image::from_pixel(px(2), px(3), PixelRgb8::new([1, 2, 3]));
        transform_pixels_in_place(&mut img, |p| p.map(|c| c * 10));
        assert_eq!(img, Image::from_pixel(px(2), px(3), PixelRgb8::new([10, 20, 30])));
    }

    #[test]
    fn crop_repacks() {
        let mut img = Image::from_fn(px(6), px(5), |x, y| PixelY8::new([(y.get() * 6 + x.get()) as u8]));
        let bbox = BoundingBox::new(idx(2), idx(1), px(3), px(3));
        let expected = crate::imageops::clone(&img.sub_view(&bbox));
        crop(&mut img, &bbox);
        assert_eq!(img, expected);
        assert_eq!(img.get_pixel(idx(0), idx(0))[0], 8);
        assert_eq!(img.stride_bytes().get(), 16);
    }
}
