//! Images whose channel count, channel width and semantics are only known at runtime.
//!
//! Algorithms are written once against statically-typed images. A [`DynImage`] or
//! [`DynImageView`] is viewed as a typed image either through the checked conversions
//! [`DynImage::view_typed`] and [`DynImageView::into_typed`], or through `dynamic_map!`, which selects
//! the typed pixel matching the runtime layout.

use core::fmt;

use log::{debug, warn};

use super::buffer::Image;
use super::data_ptr::{Constant, DataPtr, Modifiability, Mutable};
use super::layout::{Geometry, ImageSemantics, TypedLayout, UntypedLayout};
use super::memory::MemoryBlock;
use super::sub_image::ImageView;
use crate::color::{PixelFormat, PixelType, SampleFormat};
use crate::error::{ImageError, ImageResult, ParameterErrorKind, UnsupportedErrorKind};
use crate::math::{
    normalize_alignment, BoundingBox, ByteCount, ImageRowAlignment, PixelIndex, PixelLength,
    Stride,
};

/// Checks that pixels of type `P` can represent an image with the given layout and semantics.
///
/// Unknown sample or pixel formats on either side match anything.
pub(crate) fn check_pixel_compatibility<P: PixelType>(
    layout: &UntypedLayout,
    semantics: &ImageSemantics,
) -> ImageResult<()> {
    let expected_channels = P::CHANNEL_COUNT as u16;
    if layout.nr_channels != expected_channels {
        return Err(ImageError::parameter(
            ParameterErrorKind::ChannelCountMismatch {
                expected: expected_channels,
                actual: layout.nr_channels,
            },
        ));
    }
    let expected_bytes = core::mem::size_of::<P::Subpixel>() as u16;
    if layout.nr_bytes_per_channel != expected_bytes {
        return Err(ImageError::parameter(
            ParameterErrorKind::BytesPerChannelMismatch {
                expected: expected_bytes,
                actual: layout.nr_bytes_per_channel,
            },
        ));
    }
    if semantics.sample_format != SampleFormat::Unknown && semantics.sample_format != P::SAMPLE_FORMAT
    {
        return Err(ImageError::parameter(
            ParameterErrorKind::SampleFormatMismatch {
                expected: P::SAMPLE_FORMAT,
                actual: semantics.sample_format,
            },
        ));
    }
    if P::PIXEL_FORMAT != PixelFormat::Unknown
        && semantics.pixel_format != PixelFormat::Unknown
        && semantics.pixel_format != P::PIXEL_FORMAT
    {
        return Err(ImageError::parameter(
            ParameterErrorKind::PixelFormatMismatch {
                expected: P::PIXEL_FORMAT,
                actual: semantics.pixel_format,
            },
        ));
    }
    Ok(())
}

fn check_alignment<P: PixelType>(address: usize, stride: Stride) -> ImageResult<()> {
    let required = core::mem::align_of::<P>();
    if address % required != 0 || stride.to_usize() % required != 0 {
        return Err(ImageError::parameter(ParameterErrorKind::Misaligned {
            required,
        }));
    }
    Ok(())
}

fn unsupported_layout(layout: &UntypedLayout, semantics: &ImageSemantics) -> ImageError {
    ImageError::unsupported(UnsupportedErrorKind::PixelLayout {
        sample_format: semantics.sample_format,
        nr_channels: layout.nr_channels,
        nr_bytes_per_channel: layout.nr_bytes_per_channel,
    })
}

/// A runtime-typed image owning its aligned storage.
pub struct DynImage {
    data: MemoryBlock,
    layout: UntypedLayout,
    semantics: ImageSemantics,
}

impl DynImage {
    /// Allocates a zero-initialized image.
    ///
    /// If the allocation fails the image is empty and [`DynImage::is_valid`] returns `false`.
    pub fn new(
        layout: UntypedLayout,
        semantics: ImageSemantics,
        alignment: ImageRowAlignment,
    ) -> Self {
        let mut image = DynImage {
            semantics,
            ..DynImage::empty()
        };
        image.reallocate(layout, alignment, false);
        image
    }

    /// An image without pixels.
    pub fn empty() -> Self {
        DynImage {
            data: MemoryBlock::empty(),
            layout: UntypedLayout::default(),
            semantics: ImageSemantics::default(),
        }
    }

    pub(crate) fn from_parts(
        data: MemoryBlock,
        layout: UntypedLayout,
        semantics: ImageSemantics,
    ) -> Self {
        debug_assert!(data.len() >= layout.total_bytes().to_usize());
        DynImage {
            data,
            layout,
            semantics,
        }
    }

    /// Resizes the image to `layout`, keeping the current storage when possible.
    ///
    /// Follows the same rules as [`Image::reallocate`]. Returns whether new storage was allocated.
    pub fn reallocate(
        &mut self,
        layout: UntypedLayout,
        alignment: ImageRowAlignment,
        shrink_to_fit: bool,
    ) -> bool {
        let layout = layout.resolve(alignment);
        let required = layout.total_bytes().to_usize();
        let alignment = (normalize_alignment(alignment.get()).max(1) as usize)
            .max(usize::from(layout.nr_bytes_per_channel).next_power_of_two());
        let capacity = self.data.len();

        let fits = required == capacity || (!shrink_to_fit && required < capacity);
        if self.data.is_valid() && fits && self.data.alignment() >= alignment {
            debug!(
                "reusing {capacity} bytes for a {}x{} image",
                layout.width, layout.height
            );
            self.layout = layout;
            return false;
        }

        self.data = MemoryBlock::allocate(required, alignment);
        if self.data.is_valid() {
            self.layout = layout;
        } else {
            warn!(
                "leaving image empty, could not allocate {}x{} pixels",
                layout.width, layout.height
            );
            self.layout = UntypedLayout::default();
        }
        true
    }

    pub fn is_valid(&self) -> bool {
        self.data.is_valid()
    }

    pub fn layout(&self) -> UntypedLayout {
        self.layout
    }

    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    pub fn set_semantics(&mut self, semantics: ImageSemantics) {
        self.semantics = semantics;
    }

    pub fn width(&self) -> PixelLength {
        self.layout.width
    }

    pub fn height(&self) -> PixelLength {
        self.layout.height
    }

    pub fn nr_channels(&self) -> u16 {
        self.layout.nr_channels
    }

    pub fn nr_bytes_per_channel(&self) -> u16 {
        self.layout.nr_bytes_per_channel
    }

    pub fn nr_bytes_per_pixel(&self) -> usize {
        self.layout.nr_bytes_per_pixel()
    }

    pub fn stride_bytes(&self) -> Stride {
        self.layout.stride_bytes()
    }

    pub fn row_bytes(&self) -> ByteCount {
        self.layout.row_bytes()
    }

    pub fn total_bytes(&self) -> ByteCount {
        self.layout.total_bytes()
    }

    pub fn is_packed(&self) -> bool {
        self.layout.is_packed()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.width.get() == 0 || self.layout.height.get() == 0
    }

    pub fn row_alignment(&self) -> ImageRowAlignment {
        ImageRowAlignment::new(self.data.alignment() as i64)
    }

    fn geometry(&self) -> Geometry {
        self.layout.geometry()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_bytes()[..self.total_bytes().to_usize()]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let total = self.total_bytes().to_usize();
        &mut self.data.as_bytes_mut()[..total]
    }

    /// The bytes of row `y`, without padding.
    pub fn byte_row(&self, y: PixelIndex) -> &[u8] {
        let range = self.geometry().row_range(y.to_usize());
        &self.data.as_bytes()[range]
    }

    pub fn byte_row_mut(&mut self, y: PixelIndex) -> &mut [u8] {
        let range = self.geometry().row_range(y.to_usize());
        &mut self.data.as_bytes_mut()[range]
    }

    /// The bytes of the pixel at `(x, y)`.
    pub fn pixel_bytes(&self, x: PixelIndex, y: PixelIndex) -> &[u8] {
        let bpp = self.nr_bytes_per_pixel();
        let start = x.to_usize() * bpp;
        &self.byte_row(y)[start..start + bpp]
    }

    pub fn view(&self) -> DynImageView<'_, Constant> {
        DynImageView::from_parts(DataPtr::<Constant>::new(self.as_bytes()), self.layout, self.semantics)
    }

    pub fn view_mut(&mut self) -> DynImageView<'_, Mutable> {
        let (layout, semantics) = (self.layout, self.semantics);
        DynImageView::from_parts(DataPtr::<Mutable>::new(self.as_bytes_mut()), layout, semantics)
    }

    /// A read-only view of `bbox` that keeps the stride and the semantics of this image.
    pub fn sub_view(&self, bbox: &BoundingBox) -> DynImageView<'_, Constant> {
        self.view().into_sub_view(bbox)
    }

    pub fn sub_view_mut(&mut self, bbox: &BoundingBox) -> DynImageView<'_, Mutable> {
        self.view_mut().into_sub_view(bbox)
    }

    /// Views the pixels as `P`.
    ///
    /// Fails if the channel count, channel width, sample format or pixel format of the image do
    /// not match `P`.
    pub fn view_typed<P: PixelType>(&self) -> ImageResult<ImageView<'_, P, Constant>> {
        self.view().into_typed()
    }

    pub fn view_typed_mut<P: PixelType>(&mut self) -> ImageResult<ImageView<'_, P, Mutable>> {
        self.view_mut().into_typed()
    }

    /// Copies the pixels into a statically-typed image.
    pub fn to_image<P: PixelType>(&self) -> ImageResult<Image<P>> {
        Ok(self.view_typed::<P>()?.to_image())
    }

    /// Converts into a statically-typed image, reusing the storage.
    pub fn into_image<P: PixelType>(self) -> ImageResult<Image<P>> {
        if let Err(err) = check_pixel_compatibility::<P>(&self.layout, &self.semantics) {
            debug!("cannot convert dynamic image: {err}");
            return Err(err);
        }
        check_alignment::<P>(self.view().address(), self.stride_bytes())?;
        Ok(Image::from_parts(self.data, self.layout.to_typed()))
    }

    pub(crate) fn unsupported_layout(&self) -> ImageError {
        unsupported_layout(&self.layout, &self.semantics)
    }
}

/// Copies row by row into storage of the same alignment. Padding is not copied.
impl Clone for DynImage {
    fn clone(&self) -> Self {
        self.view().to_dyn_image()
    }
}

impl Default for DynImage {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for DynImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynImage")
            .field("layout", &self.layout)
            .field("semantics", &self.semantics)
            .field("valid", &self.data.is_valid())
            .finish()
    }
}

/// A non-owning runtime-typed view.
pub struct DynImageView<'a, M: Modifiability> {
    data: DataPtr<'a, M>,
    layout: UntypedLayout,
    semantics: ImageSemantics,
}

impl<'a, M: Modifiability> DynImageView<'a, M> {
    /// Wraps borrowed bytes laid out as described by `layout`.
    ///
    /// # Panics
    ///
    /// Panics if the stride is smaller than a row or if `bytes` is too short for the layout.
    pub fn from_bytes(bytes: M::Bytes<'a>, layout: UntypedLayout, semantics: ImageSemantics) -> Self {
        let data = DataPtr::new(bytes);
        let layout = UntypedLayout {
            stride_bytes: layout.stride_bytes(),
            ..layout
        };
        let geometry = layout.geometry();
        assert!(
            geometry.stride >= geometry.row_bytes(),
            "stride of {} bytes is smaller than a row of {} bytes",
            geometry.stride,
            geometry.row_bytes()
        );
        assert!(
            data.len() >= geometry.min_len(),
            "buffer of {} bytes is too short for a {}x{} view",
            data.len(),
            layout.width,
            layout.height
        );
        Self::from_parts(data, layout, semantics)
    }

    pub(crate) fn from_parts(
        data: DataPtr<'a, M>,
        layout: UntypedLayout,
        semantics: ImageSemantics,
    ) -> Self {
        debug_assert!(data.len() >= layout.geometry().min_len());
        DynImageView {
            data,
            layout,
            semantics,
        }
    }

    pub fn layout(&self) -> UntypedLayout {
        self.layout
    }

    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    pub fn width(&self) -> PixelLength {
        self.layout.width
    }

    pub fn height(&self) -> PixelLength {
        self.layout.height
    }

    pub fn nr_channels(&self) -> u16 {
        self.layout.nr_channels
    }

    pub fn nr_bytes_per_channel(&self) -> u16 {
        self.layout.nr_bytes_per_channel
    }

    pub fn nr_bytes_per_pixel(&self) -> usize {
        self.layout.nr_bytes_per_pixel()
    }

    pub fn stride_bytes(&self) -> Stride {
        self.layout.stride_bytes()
    }

    pub fn row_bytes(&self) -> ByteCount {
        self.layout.row_bytes()
    }

    pub fn is_packed(&self) -> bool {
        self.layout.is_packed()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.width.get() == 0 || self.layout.height.get() == 0
    }

    pub fn address(&self) -> usize {
        self.data.address()
    }

    fn geometry(&self) -> Geometry {
        self.layout.geometry()
    }

    pub fn byte_row(&self, y: PixelIndex) -> &[u8] {
        let range = self.geometry().row_range(y.to_usize());
        &self.data.as_bytes()[range]
    }

    pub fn pixel_bytes(&self, x: PixelIndex, y: PixelIndex) -> &[u8] {
        let bpp = self.nr_bytes_per_pixel();
        let start = x.to_usize() * bpp;
        &self.byte_row(y)[start..start + bpp]
    }

    pub fn view(&self) -> DynImageView<'_, Constant> {
        DynImageView::from_parts(self.data.as_const(), self.layout, self.semantics)
    }

    /// Restricts the view to `bbox`, keeping the stride and the semantics.
    pub fn into_sub_view(self, bbox: &BoundingBox) -> Self {
        let (range, _) = self.geometry().sub_region(bbox);
        let layout = UntypedLayout {
            width: bbox.width(),
            height: bbox.height(),
            ..self.layout
        };
        DynImageView::from_parts(self.data.narrow(range), layout, self.semantics)
    }

    /// Reinterprets the view as a view of `P` pixels.
    ///
    /// Fails if the layout or semantics do not match `P`, or if the data is not aligned for the
    /// element type of `P`.
    pub fn into_typed<P: PixelType>(self) -> ImageResult<ImageView<'a, P, M>> {
        if let Err(err) = check_pixel_compatibility::<P>(&self.layout, &self.semantics) {
            debug!("cannot view dynamic image as typed: {err}");
            return Err(err);
        }
        check_alignment::<P>(self.address(), self.stride_bytes())?;
        let layout = TypedLayout::with_stride(self.layout.width, self.layout.height, self.stride_bytes());
        Ok(ImageView::from_parts(self.data, layout))
    }

    /// A typed read-only view of the same pixels. See [`DynImageView::into_typed`].
    pub fn view_typed<P: PixelType>(&self) -> ImageResult<ImageView<'_, P, Constant>> {
        self.view().into_typed()
    }

    /// Copies the pixels into a new owning image with the same semantics.
    pub fn to_dyn_image(&self) -> DynImage {
        let layout = UntypedLayout {
            stride_bytes: Stride::new(0),
            ..self.layout
        };
        let alignment = crate::math::guess_row_alignment(self.address(), self.stride_bytes());
        let mut image = DynImage::new(layout, self.semantics, alignment);
        for y in self.height().indices() {
            image.byte_row_mut(y).copy_from_slice(self.byte_row(y));
        }
        image
    }

    pub(crate) fn unsupported_layout(&self) -> ImageError {
        unsupported_layout(&self.layout, &self.semantics)
    }
}

impl<'a> DynImageView<'a, Constant> {
    pub fn sub_view(&self, bbox: &BoundingBox) -> Self {
        (*self).into_sub_view(bbox)
    }
}

impl<'a> DynImageView<'a, Mutable> {
    pub fn byte_row_mut(&mut self, y: PixelIndex) -> &mut [u8] {
        let range = self.geometry().row_range(y.to_usize());
        &mut self.data.as_bytes_mut()[range]
    }

    pub fn reborrow(&mut self) -> DynImageView<'_, Mutable> {
        DynImageView::from_parts(self.data.reborrow(), self.layout, self.semantics)
    }

    pub fn into_const(self) -> DynImageView<'a, Constant> {
        DynImageView::from_parts(self.data.into_const(), self.layout, self.semantics)
    }
}

impl Clone for DynImageView<'_, Constant> {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for DynImageView<'_, Constant> {}

impl<M: Modifiability> fmt::Debug for DynImageView<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynImageView")
            .field("layout", &self.layout)
            .field("semantics", &self.semantics)
            .field("address", &self.address())
            .finish()
    }
}

#[doc(hidden)]
macro_rules! dynamic_map_channels(
    ($view: ident, $sample: ty, $image: ident => $action: expr) => (
        match $view.nr_channels() {
            1 => {
                let $image = $view.view_typed::<$crate::color::Pixel<$sample, 1>>()?;
                $action
            }
            2 => {
                let $image = $view.view_typed::<$crate::color::Pixel<$sample, 2>>()?;
                $action
            }
            3 => {
                let $image = $view.view_typed::<$crate::color::Pixel<$sample, 3>>()?;
                $action
            }
            4 => {
                let $image = $view.view_typed::<$crate::color::Pixel<$sample, 4>>()?;
                $action
            }
            _ => Err($view.unsupported_layout()),
        }
    );
);

/// Evaluates `$action` with `$image` bound to a typed view of a [`DynImage`] or [`DynImageView`].
///
/// The pixel type is chosen from the sample format, channel width and channel count. Unknown
/// sample formats are read as unsigned integers. The enclosing function must return an
/// `ImageResult`; layouts without a matching pixel type yield an `Unsupported` error.
macro_rules! dynamic_map(
    ($dynimage: expr, $image: ident => $action: expr) => ({
        use $crate::color::SampleFormat;
        let view = &$dynimage;
        match (view.semantics().sample_format, view.nr_bytes_per_channel()) {
            (SampleFormat::UnsignedInteger | SampleFormat::Unknown, 1) => {
                $crate::images::dynamic_map_channels!(view, u8, $image => $action)
            }
            (SampleFormat::UnsignedInteger | SampleFormat::Unknown, 2) => {
                $crate::images::dynamic_map_channels!(view, u16, $image => $action)
            }
            (SampleFormat::UnsignedInteger | SampleFormat::Unknown, 4) => {
                $crate::images::dynamic_map_channels!(view, u32, $image => $action)
            }
            (SampleFormat::SignedInteger, 1) => $crate::images::dynamic_map_channels!(view, i8, $image => $action),
            (SampleFormat::SignedInteger, 2) => $crate::images::dynamic_map_channels!(view, i16, $image => $action),
            (SampleFormat::SignedInteger, 4) => $crate::images::dynamic_map_channels!(view, i32, $image => $action),
            (SampleFormat::FloatingPoint, 4) => $crate::images::dynamic_map_channels!(view, f32, $image => $action),
            (SampleFormat::FloatingPoint, 8) => $crate::images::dynamic_map_channels!(view, f64, $image => $action),
            _ => Err(view.unsupported_layout()),
        }
    });
);

pub(crate) use {dynamic_map, dynamic_map_channels};

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::{Pixel, PixelRgb8, PixelY16, PixelYf32};
    use crate::images::DEFAULT_ROW_ALIGNMENT;
    use crate::math::{idx, px};

    fn rgb_image() -> DynImage {
        let mut image = DynImage::new(
            UntypedLayout::new(px(4), px(3), 3, 1),
            ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger),
            DEFAULT_ROW_ALIGNMENT,
        );
        for y in image.height().indices() {
            for (i, b) in image.byte_row_mut(y).iter_mut().enumerate() {
                *b = (i as i32 + 100 * y.get()) as u8;
            }
        }
        image
    }

    #[test]
    fn layout_and_rows() {
        let image = rgb_image();
        assert!(image.is_valid());
        assert_eq!(image.nr_bytes_per_pixel(), 3);
        assert_eq!(image.row_bytes().get(), 12);
        assert_eq!(image.stride_bytes().get(), 16);
        assert_eq!(image.byte_row(idx(1)).len(), 12);
        assert_eq!(image.pixel_bytes(idx(1), idx(2)), &[203, 204, 205]);
        for y in image.height().indices() {
            assert_eq!(image.byte_row(y).as_ptr() as usize % 16, 0);
        }
    }

    #[test]
    fn typed_view_of_matching_pixel() {
        let image = rgb_image();
        let view = image.view_typed::<PixelRgb8>().unwrap();
        assert_eq!(view.get_pixel(idx(1), idx(2)), PixelRgb8::new([203, 204, 205]));
        // untagged pixels match any pixel format
        assert!(image.view_typed::<Pixel<u8, 3>>().is_ok());
    }

    #[test]
    fn mismatched_conversions_are_errors() {
        let image = rgb_image();
        match image.view_typed::<Pixel<u8, 4>>() {
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::ChannelCountMismatch { expected: 4, actual: 3 },
            }) => {}
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            image.view_typed::<Pixel<u16, 3>>(),
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::BytesPerChannelMismatch { .. }
            })
        ));
        assert!(matches!(
            image.view_typed::<Pixel<i8, 3>>(),
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::SampleFormatMismatch { .. }
            })
        ));
        assert!(matches!(
            image.view_typed::<crate::color::PixelBgr8>(),
            Err(ImageError::Parameter {
                kind: ParameterErrorKind::PixelFormatMismatch { .. }
            })
        ));
        assert!(image.into_image::<PixelY16>().is_err());
    }

    #[test]
    fn into_image_keeps_pixels() {
        let image = rgb_image();
        let typed = image.into_image::<PixelRgb8>().unwrap();
        assert_eq!(typed.get_pixel(idx(0), idx(1)), PixelRgb8::new([100, 101, 102]));
        assert_eq!(typed.stride_bytes().get(), 16);

        let back = typed.into_dyn_image();
        assert_eq!(back.semantics().pixel_format, PixelFormat::Rgb);
        assert_eq!(back.pixel_bytes(idx(0), idx(1)), &[100, 101, 102]);
    }

    #[test]
    fn typed_to_dynamic_sets_semantics() {
        let image = Image::<PixelYf32>::from_pixel(px(3), px(2), PixelYf32::new([0.5]));
        let dynamic = image.to_dyn_image();
        assert_eq!(dynamic.nr_channels(), 1);
        assert_eq!(dynamic.nr_bytes_per_channel(), 4);
        assert_eq!(
            dynamic.semantics(),
            ImageSemantics::new(PixelFormat::Y, SampleFormat::FloatingPoint)
        );
        assert_eq!(dynamic.pixel_bytes(idx(2), idx(1)), &0.5f32.to_ne_bytes());

        let view = image.view().as_dyn();
        assert_eq!(view.stride_bytes(), image.stride_bytes());
        assert_eq!(view.to_dyn_image().to_image::<PixelYf32>().unwrap(), image);
    }

    #[test]
    fn sub_views_propagate_semantics() {
        let image = rgb_image();
        let bbox = BoundingBox::new(idx(1), idx(1), px(2), px(2));
        let sub = image.sub_view(&bbox);
        assert_eq!(sub.semantics(), image.semantics());
        assert_eq!(sub.stride_bytes(), image.stride_bytes());
        assert!(!sub.is_packed());
        assert_eq!(sub.pixel_bytes(idx(0), idx(0)), &[103, 104, 105]);

        let copy = sub.to_dyn_image();
        assert_eq!(copy.width(), px(2));
        assert_eq!(copy.semantics(), image.semantics());
        assert_eq!(copy.byte_row(idx(1)), &[203, 204, 205, 206, 207, 208]);
    }

    #[test]
    fn clone_copies_rows() {
        let image = rgb_image();
        let copy = image.clone();
        for y in image.height().indices() {
            assert_eq!(copy.byte_row(y), image.byte_row(y));
        }
        assert_eq!(copy.semantics(), image.semantics());
    }

    #[test]
    fn reallocate_reuses_storage() {
        let mut image = rgb_image();
        let layout = UntypedLayout::new(px(2), px(3), 3, 1);
        assert!(!image.reallocate(layout, DEFAULT_ROW_ALIGNMENT, false));
        assert_eq!(image.width(), px(2));
        assert!(image.reallocate(UntypedLayout::new(px(64), px(64), 3, 1), DEFAULT_ROW_ALIGNMENT, false));
    }

    #[test]
    fn mutable_dynamic_view_writes_through() {
        let mut image = rgb_image();
        {
            let mut view = image.view_mut();
            view.byte_row_mut(idx(0))[0] = 42;
            let mut typed = view.into_typed::<PixelRgb8>().unwrap();
            typed.put_pixel(idx(3), idx(2), PixelRgb8::new([1, 2, 3]));
        }
        assert_eq!(image.pixel_bytes(idx(0), idx(0))[0], 42);
        assert_eq!(image.pixel_bytes(idx(3), idx(2)), &[1, 2, 3]);
    }

    fn channel_count(image: &DynImage) -> ImageResult<usize> {
        dynamic_map!(image, typed => {
            Ok(typed.width().get() as usize * core::mem::size_of_val(&typed.get_pixel(idx(0), idx(0))))
        })
    }

    #[test]
    fn dynamic_map_dispatches_on_layout() {
        assert_eq!(channel_count(&rgb_image()).unwrap(), 4 * 3);
        let float = DynImage::new(
            UntypedLayout::new(px(2), px(1), 2, 8),
            ImageSemantics::new(PixelFormat::Xx, SampleFormat::FloatingPoint),
            DEFAULT_ROW_ALIGNMENT,
        );
        assert_eq!(channel_count(&float).unwrap(), 2 * 16);
        let odd = DynImage::new(
            UntypedLayout::new(px(2), px(1), 5, 1),
            ImageSemantics::default(),
            DEFAULT_ROW_ALIGNMENT,
        );
        assert!(matches!(channel_count(&odd), Err(ImageError::Unsupported { .. })));
    }
}
