//! Contains the owning, statically-typed image container.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use log::{debug, warn};

use super::data_ptr::{Constant, DataPtr, Mutable};
use super::dynimage::DynImage;
use super::generic_image::{ImageAccess, ImageAccessMut};
use super::layout::{Geometry, ImageSemantics, TypedLayout, UntypedLayout, DEFAULT_ROW_ALIGNMENT};
use super::memory::MemoryBlock;
use super::sub_image::ImageView;
use crate::color::PixelType;
use crate::error::{ImageError, ImageResult, LimitErrorKind, ParameterErrorKind};
use crate::limits::Limits;
use crate::math::{
    normalize_alignment, BoundingBox, ByteCount, ImageRowAlignment, PixelIndex, PixelLength,
    Stride,
};

/// An image of `P` pixels owning its aligned storage.
///
/// Rows are `stride_bytes()` apart and every row starts at an address that is a multiple of the
/// row alignment the image was allocated with.
///
/// ```
/// use imgkit::{Image, PixelRgb8};
/// use imgkit::math::{idx, px};
///
/// let mut img = Image::<PixelRgb8>::new(px(5), px(3));
/// img[(idx(1), idx(2))] = PixelRgb8::new([255, 0, 0]);
/// assert_eq!(img.row(idx(2))[1].channels(), &[255, 0, 0]);
/// assert_eq!(img.stride_bytes().get(), 16);
/// ```
pub struct Image<P: PixelType> {
    data: MemoryBlock,
    layout: TypedLayout,
    _pixel: PhantomData<P>,
}

impl<P: PixelType> Image<P> {
    /// Creates a zero-initialized image with the default row alignment.
    pub fn new(width: PixelLength, height: PixelLength) -> Self {
        Self::with_alignment(width, height, DEFAULT_ROW_ALIGNMENT)
    }

    /// Creates a zero-initialized image whose rows are aligned to `alignment` bytes.
    pub fn with_alignment(
        width: PixelLength,
        height: PixelLength,
        alignment: ImageRowAlignment,
    ) -> Self {
        Self::with_layout(TypedLayout::new(width, height), alignment)
    }

    /// Creates a zero-initialized image with the given layout.
    ///
    /// If the allocation fails the image is empty and [`Image::is_valid`] returns `false`.
    pub fn with_layout(layout: TypedLayout, alignment: ImageRowAlignment) -> Self {
        let mut image = Image::empty();
        image.reallocate(layout, alignment, false);
        image
    }

    /// Like [`Image::new`] but fails when `limits` forbid the dimensions or the allocation.
    pub fn with_limits(
        width: PixelLength,
        height: PixelLength,
        limits: &mut Limits,
    ) -> ImageResult<Self> {
        limits.check_dimensions(width, height)?;
        let layout = TypedLayout::new(width, height).resolve::<P>(DEFAULT_ROW_ALIGNMENT);
        limits.reserve_bytes(layout.total_bytes::<P>())?;
        let image = Self::with_layout(layout, DEFAULT_ROW_ALIGNMENT);
        if image.is_valid() {
            Ok(image)
        } else {
            Err(ImageError::limits(LimitErrorKind::InsufficientMemory))
        }
    }

    /// An image without pixels.
    pub fn empty() -> Self {
        Image {
            data: MemoryBlock::empty(),
            layout: TypedLayout::default(),
            _pixel: PhantomData,
        }
    }

    /// Constructs an image with every pixel set to `pixel`.
    pub fn from_pixel(width: PixelLength, height: PixelLength, pixel: P) -> Self {
        let mut image = Self::new(width, height);
        for row in image.rows_mut() {
            row.fill(pixel);
        }
        image
    }

    /// Constructs an image by calling `f` for every coordinate.
    pub fn from_fn<F>(width: PixelLength, height: PixelLength, mut f: F) -> Self
    where
        F: FnMut(PixelIndex, PixelIndex) -> P,
    {
        let mut image = Self::new(width, height);
        for y in height.indices() {
            for (x, p) in width.indices().zip(image.row_mut(y)) {
                *p = f(x, y);
            }
        }
        image
    }

    /// Copies row-major, tightly packed pixels into a new image.
    ///
    /// Fails with a dimension mismatch if `pixels` does not hold exactly `width * height` pixels.
    pub fn from_pixels(width: PixelLength, height: PixelLength, pixels: &[P]) -> ImageResult<Self> {
        let w = width.get().max(0) as usize;
        let h = height.get().max(0) as usize;
        if w.checked_mul(h) != Some(pixels.len()) {
            return Err(ImageError::parameter(ParameterErrorKind::DimensionMismatch));
        }
        let mut image = Self::new(width, height);
        if w > 0 {
            for (row, chunk) in image.rows_mut().zip(pixels.chunks_exact(w)) {
                row.copy_from_slice(chunk);
            }
        }
        Ok(image)
    }

    /// Resizes the image to `layout`, keeping the current storage when possible.
    ///
    /// Storage is kept when the required byte count is unchanged, or when it is smaller and
    /// `shrink_to_fit` is not set, and the current storage satisfies `alignment`. Pixel values are
    /// unspecified after a reallocation that keeps the storage.
    ///
    /// Returns whether new storage was allocated.
    pub fn reallocate(
        &mut self,
        layout: TypedLayout,
        alignment: ImageRowAlignment,
        shrink_to_fit: bool,
    ) -> bool {
        let layout = layout.resolve::<P>(alignment);
        let required = layout.total_bytes::<P>().to_usize();
        let alignment = normalize_alignment(alignment.get()).max(1) as usize;
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

        self.data = MemoryBlock::allocate(required, alignment.max(core::mem::align_of::<P>()));
        if self.data.is_valid() {
            self.layout = layout;
        } else {
            warn!(
                "leaving image empty, could not allocate {}x{} pixels",
                layout.width, layout.height
            );
            self.layout = TypedLayout::default();
        }
        true
    }

    /// Releases the storage. The image is empty afterwards.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Whether the last allocation succeeded.
    pub fn is_valid(&self) -> bool {
        self.data.is_valid()
    }

    pub fn layout(&self) -> TypedLayout {
        self.layout
    }

    pub fn width(&self) -> PixelLength {
        self.layout.width
    }

    pub fn height(&self) -> PixelLength {
        self.layout.height
    }

    pub fn stride_bytes(&self) -> Stride {
        self.layout.stride_bytes::<P>()
    }

    pub fn row_bytes(&self) -> ByteCount {
        self.layout.row_bytes::<P>()
    }

    pub fn total_bytes(&self) -> ByteCount {
        self.layout.total_bytes::<P>()
    }

    pub fn is_packed(&self) -> bool {
        self.layout.is_packed::<P>()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.width.get() == 0 || self.layout.height.get() == 0
    }

    /// The alignment the storage was allocated with.
    pub fn row_alignment(&self) -> ImageRowAlignment {
        ImageRowAlignment::new(self.data.alignment() as i64)
    }

    fn geometry(&self) -> Geometry {
        self.layout.geometry::<P>()
    }

    /// The storage bytes, including row padding.
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

    /// The pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    #[inline]
    pub fn row(&self, y: PixelIndex) -> &[P] {
        bytemuck::cast_slice(self.byte_row(y))
    }

    #[inline]
    pub fn row_mut(&mut self, y: PixelIndex) -> &mut [P] {
        let range = self.geometry().row_range(y.to_usize());
        bytemuck::cast_slice_mut(&mut self.data.as_bytes_mut()[range])
    }

    /// Iterates over all rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[P]> + '_ {
        self.height().indices().map(move |y| self.row(y))
    }

    /// Iterates mutably over all rows, top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [P]> + '_ {
        let geometry = self.geometry();
        let row_bytes = geometry.row_bytes();
        let total = self.total_bytes().to_usize();
        self.data.as_bytes_mut()[..total]
            .chunks_mut(geometry.stride.max(1))
            .take(geometry.height)
            .map(move |chunk| bytemuck::cast_slice_mut(&mut chunk[..row_bytes]))
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn get_pixel(&self, x: PixelIndex, y: PixelIndex) -> P {
        self.row(y)[x.to_usize()]
    }

    pub fn put_pixel(&mut self, x: PixelIndex, y: PixelIndex, pixel: P) {
        self.row_mut(y)[x.to_usize()] = pixel;
    }

    /// A read-only view of the whole image.
    pub fn view(&self) -> ImageView<'_, P, Constant> {
        ImageView::from_parts(DataPtr::<Constant>::new(self.as_bytes()), self.layout)
    }

    /// A mutable view of the whole image.
    pub fn view_mut(&mut self) -> ImageView<'_, P, Mutable> {
        let layout = self.layout;
        ImageView::from_parts(DataPtr::<Mutable>::new(self.as_bytes_mut()), layout)
    }

    /// A read-only view of the region `bbox`. It keeps the stride of this image.
    ///
    /// # Panics
    ///
    /// Panics if `bbox` exceeds the image.
    pub fn sub_view(&self, bbox: &BoundingBox) -> ImageView<'_, P, Constant> {
        self.view().into_sub_view(bbox)
    }

    pub fn sub_view_mut(&mut self, bbox: &BoundingBox) -> ImageView<'_, P, Mutable> {
        self.view_mut().into_sub_view(bbox)
    }

    /// Crops the image to `bbox` in place, keeping the storage and the stride.
    ///
    /// # Panics
    ///
    /// Panics if `bbox` exceeds the image.
    pub fn crop(&mut self, bbox: &BoundingBox) {
        let geometry = self.geometry();
        let (range, sub) = geometry.sub_region(bbox);
        let row_bytes = sub.row_bytes();
        let bytes = self.data.as_bytes_mut();
        for y in 0..sub.height {
            let src = range.start + y * geometry.stride;
            bytes.copy_within(src..src + row_bytes, y * geometry.stride);
        }
        self.layout = TypedLayout::with_stride(bbox.width(), bbox.height(), self.layout.stride_bytes);
    }

    /// Copies the pixels to a runtime-typed image, with semantics derived from `P`.
    pub fn to_dyn_image(&self) -> DynImage {
        let mut dst = DynImage::new(
            UntypedLayout::from_typed::<P>(&TypedLayout::new(self.width(), self.height())),
            ImageSemantics::from_pixel::<P>(),
            self.row_alignment(),
        );
        for y in self.height().indices() {
            dst.byte_row_mut(y).copy_from_slice(self.byte_row(y));
        }
        dst
    }

    /// Converts into a runtime-typed image without copying.
    pub fn into_dyn_image(self) -> DynImage {
        self.into_dyn_image_with(ImageSemantics::from_pixel::<P>())
    }

    /// Converts into a runtime-typed image with explicit semantics, without copying.
    pub fn into_dyn_image_with(self, semantics: ImageSemantics) -> DynImage {
        let layout = UntypedLayout::from_typed::<P>(&self.layout);
        DynImage::from_parts(self.data, layout, semantics)
    }

    pub(crate) fn from_parts(data: MemoryBlock, layout: TypedLayout) -> Self {
        debug_assert!(data.len() >= layout.total_bytes::<P>().to_usize());
        Image {
            data,
            layout,
            _pixel: PhantomData,
        }
    }
}

impl<P: PixelType> ImageAccess for Image<P> {
    type Pixel = P;

    fn width(&self) -> PixelLength {
        self.layout.width
    }

    fn height(&self) -> PixelLength {
        self.layout.height
    }

    fn stride_bytes(&self) -> Stride {
        Image::stride_bytes(self)
    }

    #[inline]
    fn row(&self, y: PixelIndex) -> &[P] {
        Image::row(self, y)
    }
}

impl<P: PixelType> ImageAccessMut for Image<P> {
    #[inline]
    fn row_mut(&mut self, y: PixelIndex) -> &mut [P] {
        Image::row_mut(self, y)
    }
}

impl<P: PixelType> Index<(PixelIndex, PixelIndex)> for Image<P> {
    type Output = P;

    fn index(&self, (x, y): (PixelIndex, PixelIndex)) -> &P {
        &self.row(y)[x.to_usize()]
    }
}

impl<P: PixelType> IndexMut<(PixelIndex, PixelIndex)> for Image<P> {
    fn index_mut(&mut self, (x, y): (PixelIndex, PixelIndex)) -> &mut P {
        &mut self.row_mut(y)[x.to_usize()]
    }
}

/// Copies row by row into storage of the same alignment. Padding is not copied.
impl<P: PixelType> Clone for Image<P> {
    fn clone(&self) -> Self {
        let mut image = Self::with_alignment(self.width(), self.height(), self.row_alignment());
        for (dst, src) in image.rows_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
        image
    }
}

/// Images are equal when they have the same extent and pixel values. Strides may differ.
impl<P: PixelType> PartialEq for Image<P> {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.rows().zip(other.rows()).all(|(a, b)| a == b)
    }
}

impl<P: PixelType> Default for Image<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: PixelType> fmt::Debug for Image<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("layout", &self.layout)
            .field("valid", &self.data.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::{PixelRgb8, PixelY16, PixelY8};
    use crate::math::{idx, px};

    #[test]
    fn new_image_is_zeroed_and_aligned() {
        for alignment in [0, 1, 4, 16, 64] {
            let image = Image::<PixelRgb8>::with_alignment(
                px(7),
                px(5),
                ImageRowAlignment::new(alignment),
            );
            assert!(image.is_valid());
            let a = alignment.max(1) as usize;
            for y in image.height().indices() {
                assert_eq!(image.row(y).as_ptr() as usize % a, 0);
                assert!(image.row(y).iter().all(|p| *p == PixelRgb8::zero()));
            }
            assert!(image.stride_bytes().get() >= 21);
        }
        let packed = Image::<PixelRgb8>::with_alignment(px(7), px(5), ImageRowAlignment::new(0));
        assert!(packed.is_packed());
    }

    #[test]
    fn from_pixels_checks_length() {
        let pixels: Vec<_> = (0u8..6).map(|v| PixelY8::new([v])).collect();
        let image = Image::from_pixels(px(3), px(2), &pixels).unwrap();
        assert_eq!(image[(idx(2), idx(1))], PixelY8::new([5]));
        assert!(Image::from_pixels(px(4), px(2), &pixels).is_err());
    }

    #[test]
    fn reallocate_reuses_storage() {
        let mut image = Image::<PixelY8>::with_alignment(px(16), px(4), ImageRowAlignment::new(16));
        assert_eq!(image.total_bytes().get(), 64);

        // same byte count
        assert!(!image.reallocate(TypedLayout::new(px(32), px(2)), ImageRowAlignment::new(16), false));
        assert_eq!(image.width(), px(32));

        // smaller, storage kept unless shrinking is requested
        assert!(!image.reallocate(TypedLayout::new(px(8), px(2)), ImageRowAlignment::new(16), false));
        assert!(image.reallocate(TypedLayout::new(px(8), px(2)), ImageRowAlignment::new(16), true));
        assert_eq!(image.total_bytes().get(), 32);

        // larger
        assert!(image.reallocate(TypedLayout::new(px(64), px(4)), ImageRowAlignment::new(16), false));
        assert_eq!(image.total_bytes().get(), 256);

        // stricter alignment
        assert!(image.reallocate(TypedLayout::new(px(64), px(4)), ImageRowAlignment::new(128), false));
        assert_eq!(image.row(idx(0)).as_ptr() as usize % 128, 0);
    }

    #[test]
    fn rows_do_not_include_padding() {
        let mut image = Image::<PixelY16>::with_alignment(px(3), px(2), ImageRowAlignment::new(32));
        assert_eq!(image.stride_bytes().get(), 32);
        assert_eq!(image.rows().count(), 2);
        for row in image.rows_mut() {
            assert_eq!(row.len(), 3);
            row.fill(PixelY16::new([7]));
        }
        assert_eq!(image.get_pixel(idx(2), idx(1)), PixelY16::new([7]));
    }

    #[test]
    fn crop_in_place() {
        let mut image =
            Image::<PixelY8>::from_fn(px(4), px(4), |x, y| PixelY8::new([(x.get() + 4 * y.get()) as u8]));
        let stride = image.stride_bytes();
        image.crop(&BoundingBox::new(idx(1), idx(2), px(2), px(2)));
        assert_eq!(image.width(), px(2));
        assert_eq!(image.height(), px(2));
        assert_eq!(image.stride_bytes(), stride);
        let values: Vec<u8> = image.rows().flatten().map(|p| p[0]).collect();
        assert_eq!(values, vec![9, 10, 13, 14]);
    }

    #[test]
    fn clone_and_eq() {
        let image = Image::<PixelRgb8>::from_fn(px(5), px(3), |x, y| {
            PixelRgb8::new([x.get() as u8, y.get() as u8, 1])
        });
        let copy = image.clone();
        assert_eq!(copy, image);
        assert_eq!(copy.row_alignment(), image.row_alignment());
        let packed = Image::<PixelRgb8>::with_alignment(px(5), px(3), ImageRowAlignment::new(1));
        assert_ne!(packed, image);
    }

    #[test]
    fn limits_are_checked() {
        let mut limits = Limits::default();
        limits.max_image_width = Some(8);
        assert!(Image::<PixelY8>::with_limits(px(8), px(8), &mut limits).is_ok());
        assert!(Image::<PixelY8>::with_limits(px(9), px(8), &mut limits).is_err());

        let mut limits = Limits::default();
        limits.max_alloc = Some(100);
        assert!(Image::<PixelY8>::with_limits(px(16), px(16), &mut limits).is_err());
    }

    #[test]
    fn empty_image() {
        let image = Image::<PixelRgb8>::new(px(0), px(0));
        assert!(image.is_valid());
        assert!(image.is_empty());
        assert_eq!(image.rows().count(), 0);
        assert_eq!(image.clone(), image);
    }
}
