//! Copying channels between images of different channel counts.

use crate::color::{FormatTag, Pixel};
use crate::error::{ImageError, ImageResult, ParameterErrorKind};
use crate::images::{Image, ImageAccess, ImageAccessMut};
use crate::imageops::allocate;
use crate::traits::Sample;

/// Copies the `N` channels of every pixel of `src` into channels
/// `dst_start_channel..dst_start_channel + N` of the matching pixel of `dst`.
///
/// The other channels of `dst` are left untouched.
///
/// # Errors
///
/// Fails with [`ParameterErrorKind::DimensionMismatch`] if the images differ in extent.
///
/// # Panics
///
/// Panics if the channel range does not fit in the `M` channels of `dst`.
///
/// ```
/// use imgkit::imageops::inject_channels;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelRgb8, PixelY8};
///
/// let green = Image::from_pixel(px(2), px(2), PixelY8::new([200]));
/// let mut rgb = Image::from_pixel(px(2), px(2), PixelRgb8::new([1, 2, 3]));
/// inject_channels(&green, &mut rgb, 1).unwrap();
/// assert_eq!(rgb.get_pixel(idx(1), idx(0)).into_channels(), [1, 200, 3]);
/// ```
pub fn inject_channels<S, D, T, F, G, const N: usize, const M: usize>(
    src: &S,
    dst: &mut D,
    dst_start_channel: usize,
) -> ImageResult<()>
where
    S: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    D: ImageAccessMut<Pixel = Pixel<T, M, G>> + ?Sized,
    T: Sample,
    F: FormatTag,
    G: FormatTag,
{
    assert!(
        dst_start_channel + N <= M,
        "channels {dst_start_channel}..{} do not fit in a pixel of {M} channels",
        dst_start_channel + N
    );
    if dst.dimensions() != src.dimensions() {
        return Err(ImageError::parameter(ParameterErrorKind::DimensionMismatch));
    }
    let channels = dst_start_channel..dst_start_channel + N;
    for y in src.height().indices() {
        for (d, s) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            d.channels_mut()[channels.clone()].copy_from_slice(s.channels());
        }
    }
    Ok(())
}

/// Stacks the channels of `first` and `second` into a new image of `M = N1 + N2` channels.
///
/// The channels of `first` come first. Stacking more images works by nesting calls.
///
/// # Errors
///
/// Fails with [`ParameterErrorKind::DimensionMismatch`] if the images differ in extent.
///
/// # Panics
///
/// Panics if `M` is not the sum of the channel counts.
///
/// ```
/// use imgkit::imageops::stack_images;
/// use imgkit::math::{idx, px};
/// use imgkit::{Image, PixelRgb8, PixelRgba8, PixelY8};
///
/// let rgb = Image::from_pixel(px(3), px(1), PixelRgb8::new([10, 20, 30]));
/// let alpha = Image::from_pixel(px(3), px(1), PixelY8::new([255]));
/// let rgba: Image<PixelRgba8> = stack_images(&rgb, &alpha).unwrap();
/// assert_eq!(rgba.get_pixel(idx(2), idx(0)).into_channels(), [10, 20, 30, 255]);
/// ```
pub fn stack_images<A, B, T, FA, FB, G, const N1: usize, const N2: usize, const M: usize>(
    first: &A,
    second: &B,
) -> ImageResult<Image<Pixel<T, M, G>>>
where
    A: ImageAccess<Pixel = Pixel<T, N1, FA>> + ?Sized,
    B: ImageAccess<Pixel = Pixel<T, N2, FB>> + ?Sized,
    T: Sample,
    FA: FormatTag,
    FB: FormatTag,
    G: FormatTag,
{
    assert!(
        N1 + N2 == M,
        "stacking {N1} and {N2} channels does not give {M} channels"
    );
    if first.dimensions() != second.dimensions() {
        return Err(ImageError::parameter(ParameterErrorKind::DimensionMismatch));
    }
    let mut dst = Image::empty();
    if !allocate(&mut dst, first.width(), first.height()) {
        return Ok(dst);
    }
    inject_channels(first, &mut dst, 0)?;
    inject_channels(second, &mut dst, N1)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{formats, PixelRgb8, PixelRgba8, PixelY8, PixelYa8};
    use crate::math::{idx, px, BoundingBox};

    fn ramp(offset: u8) -> Image<PixelY8> {
        Image::from_fn(px(4), px(3), |x, y| PixelY8::new([offset + (x.get() + 4 * y.get()) as u8]))
    }

    #[test]
    fn inject_keeps_other_channels() {
        let mut rgb = Image::from_pixel(px(4), px(3), PixelRgb8::new([1, 2, 3]));
        inject_channels(&ramp(100), &mut rgb, 2).unwrap();
        assert_eq!(rgb.get_pixel(idx(0), idx(0)).into_channels(), [1, 2, 100]);
        assert_eq!(rgb.get_pixel(idx(3), idx(2)).into_channels(), [1, 2, 111]);
    }

    #[test]
    fn inject_into_sub_view() {
        let mut rgb = Image::from_pixel(px(6), px(5), PixelRgb8::new([0, 0, 0]));
        let bbox = BoundingBox::new(idx(1), idx(2), px(4), px(3));
        inject_channels(&ramp(1), &mut rgb.sub_view_mut(&bbox), 0).unwrap();
        assert_eq!(rgb.get_pixel(idx(1), idx(2))[0], 1);
        assert_eq!(rgb.get_pixel(idx(4), idx(4))[0], 12);
        assert_eq!(rgb.get_pixel(idx(0), idx(2))[0], 0);
    }

    #[test]
    fn inject_size_mismatch() {
        let mut rgb = Image::<PixelRgb8>::new(px(3), px(3));
        assert!(matches!(
            inject_channels(&ramp(0), &mut rgb, 0),
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::DimensionMismatch
            })
        ));
    }

    #[test]
    #[should_panic(expected = "do not fit")]
    fn inject_past_last_channel() {
        let mut ya = Image::<PixelYa8>::new(px(4), px(3));
        let _ = inject_channels(&Image::<PixelRgb8>::new(px(4), px(3)), &mut ya, 0);
    }

    #[test]
    fn stack_two_and_three() {
        let ya: Image<PixelYa8> = stack_images(&ramp(0), &ramp(50)).unwrap();
        assert_eq!(ya.get_pixel(idx(2), idx(1)).into_channels(), [6, 56]);

        let rgb = Image::from_fn(px(4), px(3), |x, y| PixelRgb8::new([x.get() as u8, y.get() as u8, 7]));
        let rgba: Image<PixelRgba8> = stack_images(&rgb, &ramp(200)).unwrap();
        assert_eq!(rgba.get_pixel(idx(3), idx(2)).into_channels(), [3, 2, 7, 211]);

        let nested: Image<Pixel<u8, 3, formats::Xxx>> =
            stack_images(&stack_images::<_, _, _, _, _, formats::Xx, 1, 1, 2>(&ramp(0), &ramp(1)).unwrap(), &ramp(2))
                .unwrap();
        assert_eq!(nested.get_pixel(idx(1), idx(0)).into_channels(), [1, 2, 3]);
    }

    #[test]
    fn stack_size_mismatch() {
        let small = Image::<PixelY8>::new(px(4), px(2));
        let result: ImageResult<Image<PixelYa8>> = stack_images(&ramp(0), &small);
        assert!(result.is_err());
    }

    #[test]
    #[should_panic(expected = "does not give 4 channels")]
    fn stack_wrong_channel_count() {
        let _: ImageResult<Image<PixelRgba8>> = stack_images(&ramp(0), &ramp(0));
    }
}
