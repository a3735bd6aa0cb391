//! Deep copies of images and image regions.

use crate::color::PixelType;
use crate::error::{ImageError, ImageResult, ParameterErrorKind};
use crate::images::{Image, ImageAccess, ImageAccessMut};
use crate::imageops::allocate;
use crate::math::{BoundingBox, PixelIndex};

/// Copies `src` into `dst`, resizing `dst` to the extent of `src`.
///
/// Only the pixels of every row are copied, never the padding between rows.
pub fn clone_into<I, P>(src: &I, dst: &mut Image<P>)
where
    I: ImageAccess<Pixel = P> + ?Sized,
    P: PixelType,
{
    if !allocate(dst, src.width(), src.height()) {
        return;
    }
    for y in src.height().indices() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
}

/// Copies `src` into a new image with default row alignment.
pub fn clone<I>(src: &I) -> Image<I::Pixel>
where
    I: ImageAccess + ?Sized,
{
    let mut dst = Image::empty();
    clone_into(src, &mut dst);
    dst
}

/// Copies the region `bbox` of `src` into a new image.
///
/// # Panics
///
/// Panics if `bbox` does not lie within `src`.
pub fn clone_region<I>(src: &I, bbox: &BoundingBox) -> Image<I::Pixel>
where
    I: ImageAccess + ?Sized,
{
    assert!(
        bbox.fits_within(src.width(), src.height()),
        "region {bbox:?} exceeds the {}x{} image",
        src.width(),
        src.height()
    );
    let x0 = bbox.x0().to_usize();
    let x1 = bbox.x1().to_usize();
    let mut dst = Image::empty();
    if !allocate(&mut dst, bbox.width(), bbox.height()) {
        return dst;
    }
    for (dst_y, src_y) in bbox.height().indices().zip(bbox.y0().get()..) {
        let src_row = src.row(PixelIndex::new(src_y));
        dst.row_mut(dst_y).copy_from_slice(&src_row[x0..x1]);
    }
    dst
}

/// Copies the pixels of `src` into `dst`, which must have the same extent.
pub fn copy_rows_from<D, S>(dst: &mut D, src: &S) -> ImageResult<()>
where
    D: ImageAccessMut + ?Sized,
    S: ImageAccess<Pixel = D::Pixel> + ?Sized,
{
    if dst.dimensions() != src.dimensions() {
        return Err(ImageError::parameter(ParameterErrorKind::DimensionMismatch));
    }
    for y in src.height().indices() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelRgb8;
    use crate::images::{Constant, ImageView, TypedLayout};
    use crate::math::{idx, px, Stride};

    fn gradient() -> Image<PixelRgb8> {
        Image::from_fn(px(5), px(4), |x, y| {
            PixelRgb8::new([x.get() as u8, y.get() as u8, (x.get() * y.get()) as u8])
        })
    }

    #[test]
    fn clone_of_padded_view_is_packed() {
        let img = gradient();
        assert!(!img.is_packed());
        let copy = clone(&img);
        assert_eq!(copy, img);

        // a caller buffer with 7 bytes of padding per row
        let mut bytes = vec![0xee_u8; 22 * 4];
        for y in 0..4 {
            let row: &[u8] = bytemuck::cast_slice(img.row(idx(y)));
            bytes[y as usize * 22..][..15].copy_from_slice(row);
        }
        let view = ImageView::<PixelRgb8, Constant>::from_bytes(
            &bytes[..],
            TypedLayout::with_stride(px(5), px(4), Stride::new(22)),
        );
        let copy = clone(&view);
        assert_eq!(copy, img);
        assert!(copy.as_bytes().iter().all(|&b| b != 0xee));
    }

    #[test]
    fn region() {
        let img = gradient();
        let bbox = BoundingBox::new(idx(1), idx(2), px(3), px(2));
        let region = clone_region(&img, &bbox);
        assert_eq!(region.dimensions(), (px(3), px(2)));
        assert_eq!(region.get_pixel(idx(0), idx(0)), img.get_pixel(idx(1), idx(2)));
        assert_eq!(region.get_pixel(idx(2), idx(1)), img.get_pixel(idx(3), idx(3)));
        assert_eq!(region, clone(&img.sub_view(&bbox)));
    }

    #[test]
    #[should_panic]
    fn region_outside() {
        let _ = clone_region(&gradient(), &BoundingBox::new(idx(3), idx(0), px(3), px(1)));
    }

    #[test]
    fn copy_rows() {
        let img = gradient();
        let mut dst = Image::new(px(5), px(4));
        copy_rows_from(&mut dst, &img).unwrap();
        assert_eq!(dst, img);

        let mut small = Image::<PixelRgb8>::new(px(4), px(4));
        assert!(matches!(
            copy_rows_from(&mut small, &img),
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::DimensionMismatch
            })
        ));
    }
}
