use core::fmt;
use core::marker::PhantomData;

use super::buffer::Image;
use super::data_ptr::{Constant, DataPtr, Modifiability, Mutable};
use super::dynimage::DynImageView;
use super::generic_image::{ImageAccess, ImageAccessMut};
use super::layout::{Geometry, ImageSemantics, TypedLayout, UntypedLayout};
use crate::color::PixelType;
use crate::math::{BoundingBox, ByteCount, PixelIndex, PixelLength, Stride};

/// A non-owning view of `P` pixels stored elsewhere.
///
/// Views never outlive the storage they borrow. A view may cover memory that was not allocated
/// by this crate, with any stride that holds a full row.
pub struct ImageView<'a, P: PixelType, M: Modifiability> {
    data: DataPtr<'a, M>,
    layout: TypedLayout,
    _pixel: PhantomData<P>,
}

/// A read-only view.
pub type ConstantImageView<'a, P> = ImageView<'a, P, Constant>;

/// A view that allows writing pixels.
pub type MutableImageView<'a, P> = ImageView<'a, P, Mutable>;

impl<'a, P: PixelType, M: Modifiability> ImageView<'a, P, M> {
    /// Wraps borrowed bytes laid out as described by `layout`.
    ///
    /// An undecided stride in `layout` means the rows are packed.
    ///
    /// # Panics
    ///
    /// Panics if the stride is smaller than a row, if `bytes` is too short for the layout, or if
    /// the bytes or the stride are not aligned for the element type of `P`.
    pub fn from_bytes(bytes: M::Bytes<'a>, layout: TypedLayout) -> Self {
        let data = DataPtr::new(bytes);
        let layout = TypedLayout::with_stride(layout.width, layout.height, layout.stride_bytes::<P>());
        let geometry = layout.geometry::<P>();
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
        let align = core::mem::align_of::<P>();
        assert!(
            data.address() % align == 0 && geometry.stride % align == 0,
            "pixel data is not aligned to {align} bytes"
        );
        Self::from_parts(data, layout)
    }

    pub(crate) fn from_parts(data: DataPtr<'a, M>, layout: TypedLayout) -> Self {
        debug_assert!(data.len() >= layout.geometry::<P>().min_len());
        ImageView {
            data,
            layout,
            _pixel: PhantomData,
        }
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

    fn geometry(&self) -> Geometry {
        self.layout.geometry::<P>()
    }

    /// Address of the first pixel.
    pub fn address(&self) -> usize {
        self.data.address()
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

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[P]> + '_ {
        let bytes = self.data.as_bytes();
        let geometry = self.geometry();
        self.height()
            .indices()
            .map(move |y| bytemuck::cast_slice(&bytes[geometry.row_range(y.to_usize())]))
    }

    pub fn get_pixel(&self, x: PixelIndex, y: PixelIndex) -> P {
        self.row(y)[x.to_usize()]
    }

    /// A read-only view of the same pixels.
    pub fn view(&self) -> ConstantImageView<'_, P> {
        ImageView::from_parts(self.data.as_const(), self.layout)
    }

    /// Restricts the view to `bbox`, keeping the stride.
    ///
    /// # Panics
    ///
    /// Panics if `bbox` exceeds the view.
    pub fn into_sub_view(self, bbox: &BoundingBox) -> Self {
        let (range, _) = self.geometry().sub_region(bbox);
        let layout = TypedLayout::with_stride(bbox.width(), bbox.height(), self.stride_bytes());
        ImageView::from_parts(self.data.narrow(range), layout)
    }

    /// A runtime-typed view of the same pixels, with semantics derived from `P`.
    pub fn into_dyn(self) -> DynImageView<'a, M> {
        let layout = UntypedLayout::from_typed::<P>(&self.layout);
        DynImageView::from_parts(self.data, layout, ImageSemantics::from_pixel::<P>())
    }

    /// Copies the pixels into a new owning image.
    pub fn to_image(&self) -> Image<P> {
        let mut image = Image::new(self.width(), self.height());
        for (dst, src) in image.rows_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
        image
    }
}

impl<'a, P: PixelType> ImageView<'a, P, Constant> {
    /// Views tightly packed row-major pixels.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` holds fewer than `width * height` pixels.
    pub fn from_pixels(pixels: &'a [P], width: PixelLength, height: PixelLength) -> Self {
        Self::from_bytes(bytemuck::cast_slice::<P, u8>(pixels), TypedLayout::new(width, height))
    }

    /// A read-only view of `bbox` borrowing for the full lifetime of this view.
    pub fn sub_view(&self, bbox: &BoundingBox) -> Self {
        (*self).into_sub_view(bbox)
    }

    pub fn as_dyn(&self) -> DynImageView<'a, Constant> {
        (*self).into_dyn()
    }
}

impl<'a, P: PixelType> ImageView<'a, P, Mutable> {
    pub fn from_pixels_mut(pixels: &'a mut [P], width: PixelLength, height: PixelLength) -> Self {
        Self::from_bytes(bytemuck::cast_slice_mut::<P, u8>(pixels), TypedLayout::new(width, height))
    }

    #[inline]
    pub fn row_mut(&mut self, y: PixelIndex) -> &mut [P] {
        let range = self.geometry().row_range(y.to_usize());
        bytemuck::cast_slice_mut(&mut self.data.as_bytes_mut()[range])
    }

    pub fn put_pixel(&mut self, x: PixelIndex, y: PixelIndex, pixel: P) {
        self.row_mut(y)[x.to_usize()] = pixel;
    }

    /// A shorter mutable view of the same pixels.
    pub fn reborrow(&mut self) -> MutableImageView<'_, P> {
        ImageView::from_parts(self.data.reborrow(), self.layout)
    }

    pub fn sub_view_mut(&mut self, bbox: &BoundingBox) -> MutableImageView<'_, P> {
        self.reborrow().into_sub_view(bbox)
    }

    /// Gives up write access.
    pub fn into_const(self) -> ConstantImageView<'a, P> {
        ImageView::from_parts(self.data.into_const(), self.layout)
    }
}

impl<P: PixelType> Clone for ImageView<'_, P, Constant> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: PixelType> Copy for ImageView<'_, P, Constant> {}

impl<P: PixelType, M: Modifiability> ImageAccess for ImageView<'_, P, M> {
    type Pixel = P;

    fn width(&self) -> PixelLength {
        self.layout.width
    }

    fn height(&self) -> PixelLength {
        self.layout.height
    }

    fn stride_bytes(&self) -> Stride {
        self.layout.stride_bytes::<P>()
    }

    #[inline]
    fn row(&self, y: PixelIndex) -> &[P] {
        ImageView::row(self, y)
    }
}

impl<P: PixelType> ImageAccessMut for ImageView<'_, P, Mutable> {
    #[inline]
    fn row_mut(&mut self, y: PixelIndex) -> &mut [P] {
        ImageView::row_mut(self, y)
    }
}

impl<P: PixelType, M: Modifiability> fmt::Debug for ImageView<'_, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("layout", &self.layout)
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PixelRgb8, PixelY16, PixelY8};
    use crate::math::{idx, px};

    fn numbered(width: i32, height: i32) -> Image<PixelY8> {
        Image::from_fn(px(width), px(height), |x, y| {
            PixelY8::new([(x.get() + width * y.get()) as u8])
        })
    }

    #[test]
    fn sub_view_keeps_parent_stride() {
        let image = numbered(6, 4);
        let view = image.sub_view(&BoundingBox::new(idx(2), idx(1), px(3), px(2)));
        assert_eq!(view.width(), px(3));
        assert_eq!(view.stride_bytes(), image.stride_bytes());
        assert!(!view.is_packed());
        assert_eq!(view.get_pixel(idx(0), idx(0)), PixelY8::new([8]));
        assert_eq!(view.get_pixel(idx(2), idx(1)), PixelY8::new([16]));
        assert_eq!(
            view.address(),
            image.view().address() + image.stride_bytes().get() as usize + 2
        );

        let nested = view.sub_view(&BoundingBox::new(idx(1), idx(1), px(1), px(1)));
        assert_eq!(nested.get_pixel(idx(0), idx(0)), PixelY8::new([15]));
    }

    #[test]
    fn mutable_sub_view_writes_through() {
        let mut image = numbered(4, 4);
        {
            let mut view = image.sub_view_mut(&BoundingBox::new(idx(1), idx(1), px(2), px(2)));
            view.put_pixel(idx(1), idx(1), PixelY8::new([200]));
            let mut inner = view.sub_view_mut(&BoundingBox::new(idx(0), idx(0), px(1), px(1)));
            inner.put_pixel(idx(0), idx(0), PixelY8::new([100]));
        }
        assert_eq!(image.get_pixel(idx(2), idx(2)), PixelY8::new([200]));
        assert_eq!(image.get_pixel(idx(1), idx(1)), PixelY8::new([100]));
    }

    #[test]
    fn foreign_buffer_with_padding() {
        // two rows of three RGB pixels, each padded to 12 bytes
        let mut bytes = vec![0u8; 24];
        bytes[9..12].copy_from_slice(&[7, 7, 7]);
        bytes[12..15].copy_from_slice(&[1, 2, 3]);
        let layout = TypedLayout::with_stride(px(3), px(2), Stride::new(12));
        let view = ConstantImageView::<PixelRgb8>::from_bytes(&bytes[..], layout);
        assert!(!view.is_packed());
        assert_eq!(view.row(idx(0)).len(), 3);
        assert_eq!(view.get_pixel(idx(0), idx(1)), PixelRgb8::new([1, 2, 3]));
        // padding is not part of any row
        assert!(view.row(idx(0)).iter().all(|p| *p == PixelRgb8::zero()));
    }

    #[test]
    #[should_panic]
    fn short_buffer_is_rejected() {
        let bytes = [0u8; 10];
        let _ = ConstantImageView::<PixelY8>::from_bytes(&bytes[..], TypedLayout::new(px(4), px(3)));
    }

    #[test]
    fn last_row_needs_no_padding() {
        let bytes = [0u8; 12 + 5];
        let layout = TypedLayout::with_stride(px(5), px(2), Stride::new(12));
        let view = ConstantImageView::<PixelY8>::from_bytes(&bytes[..], layout);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn views_from_pixels() {
        let mut pixels = vec![PixelY16::new([3]); 6];
        {
            let mut view = MutableImageView::from_pixels_mut(&mut pixels, px(3), px(2));
            view.put_pixel(idx(2), idx(0), PixelY16::new([9]));
            let copy = view.to_image();
            assert_eq!(copy.get_pixel(idx(2), idx(0)), PixelY16::new([9]));
        }
        let view = ConstantImageView::from_pixels(&pixels, px(3), px(2));
        assert!(view.is_packed());
        assert_eq!(view.get_pixel(idx(2), idx(0)), PixelY16::new([9]));
    }
}
