//! Image Processing Functions
use crate::color::PixelType;
use crate::images::{Image, TypedLayout, DEFAULT_ROW_ALIGNMENT};
use crate::math::PixelLength;

/// Affine transformations
pub use self::affine::{
    flip, flip_both, flip_horizontal, flip_horizontal_in_place, flip_into, flip_vertical,
    flip_vertical_in_place, rotate, rotate180, rotate270, rotate90, rotate_into, transpose,
    transpose_into, FlipDirection, Rotation,
};

/// Channel operations
pub use self::channels::{inject_channels, stack_images};

/// Copies
pub use self::clone::{clone, clone_into, clone_region, copy_rows_from};

/// Pixel format conversions
pub use self::convert::{
    convert_image, convert_image_into, convert_image_with_alpha, convert_image_with_alpha_into,
    convert_pixel, convert_pixel_with_alpha, AlphaFrom, AlphaKind, Color, ColorLayout, Opaque,
    WithAlpha,
};

/// Separable convolution
pub use self::filter_1d::{
    convolution_x, convolution_x_fixed, convolution_x_fixed_into, convolution_x_into,
    convolution_y, convolution_y_fixed, convolution_y_fixed_into, convolution_y_into,
    dyn_convolution_x, dyn_convolution_y,
};

/// Pixel-wise generation and transformation
pub use self::generate::{
    crop, fill, generate, generate_into, transform_pixels, transform_pixels_in_place,
};

/// Image sampling
pub use self::sample::{dyn_resample, resample, resample_into, resample_with_mode};

mod affine;
mod channels;
mod clone;
mod convert;
pub mod expr;
mod filter_1d;
mod generate;
mod sample;

/// Sizes `dst` to `width` x `height` with the default row alignment.
///
/// Returns `false` if the storage could not be allocated, in which case `dst` is left empty and
/// nothing should be written to it.
pub(crate) fn allocate<P: PixelType>(dst: &mut Image<P>, width: PixelLength, height: PixelLength) -> bool {
    let (width, height) = (width.get().max(0), height.get().max(0));
    dst.reallocate(
        TypedLayout::new(PixelLength::new(width), PixelLength::new(height)),
        DEFAULT_ROW_ALIGNMENT,
        false,
    );
    width == 0 || height == 0 || dst.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelY8;
    use crate::images::ImageAccess;
    use crate::math::{idx, px};

    #[test]
    fn allocate_reuses_larger_storage() {
        let mut img = Image::<PixelY8>::new(px(32), px(32));
        assert!(allocate(&mut img, px(4), px(4)));
        assert_eq!(img.dimensions(), (px(4), px(4)));
        assert_eq!(img.as_bytes().len(), 64);
        img.put_pixel(idx(3), idx(3), PixelY8::new([1]));
    }

    #[test]
    fn allocate_empty_extent() {
        let mut img = Image::<PixelY8>::new(px(2), px(2));
        assert!(allocate(&mut img, px(0), px(5)));
        assert!(img.is_empty());
    }
}
