//! Geometry descriptors mapping pixel coordinates to byte offsets.

use core::ops::Range;

use crate::color::{PixelFormat, PixelType, SampleFormat};
use crate::math::{
    compute_stride_bytes, BoundingBox, ByteCount, ImageRowAlignment, PixelLength, Stride,
};

/// Row alignment used by constructors that do not take one.
pub const DEFAULT_ROW_ALIGNMENT: ImageRowAlignment = ImageRowAlignment::new(16);

/// Geometry of an image whose pixel type is known at compile time.
///
/// A `stride_bytes` of zero means the stride has not been decided yet. It is computed from the
/// requested row alignment when the layout is used to allocate an image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypedLayout {
    pub width: PixelLength,
    pub height: PixelLength,
    pub stride_bytes: Stride,
}

impl TypedLayout {
    /// A layout whose stride is computed on allocation.
    pub fn new(width: PixelLength, height: PixelLength) -> Self {
        Self::with_stride(width, height, Stride::new(0))
    }

    pub fn with_stride(width: PixelLength, height: PixelLength, stride_bytes: Stride) -> Self {
        assert!(
            width.get() >= 0 && height.get() >= 0,
            "negative image extent {}x{}",
            width,
            height
        );
        TypedLayout {
            width,
            height,
            stride_bytes,
        }
    }

    pub fn row_bytes<P: PixelType>(&self) -> ByteCount {
        ByteCount::new(i64::from(self.width.get()) * P::NR_BYTES as i64)
    }

    /// The stride, or the packed row size while the stride is undecided.
    pub fn stride_bytes<P: PixelType>(&self) -> Stride {
        if self.stride_bytes.get() == 0 {
            Stride::new(self.row_bytes::<P>().get())
        } else {
            self.stride_bytes
        }
    }

    pub fn total_bytes<P: PixelType>(&self) -> ByteCount {
        ByteCount::new(self.stride_bytes::<P>().get() * i64::from(self.height.get()))
    }

    pub fn is_packed<P: PixelType>(&self) -> bool {
        self.stride_bytes::<P>().get() == self.row_bytes::<P>().get()
    }

    /// Fixes the stride: an undecided stride is computed from `alignment`, a given stride is
    /// checked to hold a full row.
    ///
    /// # Panics
    ///
    /// When the stride is smaller than a row.
    pub fn resolve<P: PixelType>(self, alignment: ImageRowAlignment) -> Self {
        let row_bytes = self.row_bytes::<P>();
        let stride_bytes = if self.stride_bytes.get() == 0 {
            compute_stride_bytes(row_bytes, alignment)
        } else {
            self.stride_bytes
        };
        assert!(
            stride_bytes.get() >= row_bytes.get(),
            "stride of {} bytes is smaller than a row of {} bytes",
            stride_bytes,
            row_bytes
        );
        TypedLayout {
            stride_bytes,
            ..self
        }
    }

    pub(crate) fn geometry<P: PixelType>(&self) -> Geometry {
        Geometry {
            width: self.width.get() as usize,
            height: self.height.get() as usize,
            bytes_per_pixel: P::NR_BYTES,
            stride: self.stride_bytes::<P>().to_usize(),
        }
    }
}

/// Geometry of an image whose channel count and width are only known at runtime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UntypedLayout {
    pub width: PixelLength,
    pub height: PixelLength,
    pub nr_channels: u16,
    pub nr_bytes_per_channel: u16,
    pub stride_bytes: Stride,
}

impl UntypedLayout {
    /// A layout whose stride is computed on allocation.
    pub fn new(
        width: PixelLength,
        height: PixelLength,
        nr_channels: u16,
        nr_bytes_per_channel: u16,
    ) -> Self {
        Self::with_stride(
            width,
            height,
            nr_channels,
            nr_bytes_per_channel,
            Stride::new(0),
        )
    }

    pub fn with_stride(
        width: PixelLength,
        height: PixelLength,
        nr_channels: u16,
        nr_bytes_per_channel: u16,
        stride_bytes: Stride,
    ) -> Self {
        assert!(
            width.get() >= 0 && height.get() >= 0,
            "negative image extent {}x{}",
            width,
            height
        );
        UntypedLayout {
            width,
            height,
            nr_channels,
            nr_bytes_per_channel,
            stride_bytes,
        }
    }

    /// The layout of an image of `P` pixels with the same geometry.
    pub fn from_typed<P: PixelType>(layout: &TypedLayout) -> Self {
        Self::with_stride(
            layout.width,
            layout.height,
            P::CHANNEL_COUNT as u16,
            core::mem::size_of::<P::Subpixel>() as u16,
            layout.stride_bytes,
        )
    }

    pub fn to_typed(&self) -> TypedLayout {
        TypedLayout::with_stride(self.width, self.height, self.stride_bytes)
    }

    pub fn nr_bytes_per_pixel(&self) -> usize {
        usize::from(self.nr_channels) * usize::from(self.nr_bytes_per_channel)
    }

    pub fn row_bytes(&self) -> ByteCount {
        ByteCount::new(i64::from(self.width.get()) * self.nr_bytes_per_pixel() as i64)
    }

    /// The stride, or the packed row size while the stride is undecided.
    pub fn stride_bytes(&self) -> Stride {
        if self.stride_bytes.get() == 0 {
            Stride::new(self.row_bytes().get())
        } else {
            self.stride_bytes
        }
    }

    pub fn total_bytes(&self) -> ByteCount {
        ByteCount::new(self.stride_bytes().get() * i64::from(self.height.get()))
    }

    pub fn is_packed(&self) -> bool {
        self.stride_bytes().get() == self.row_bytes().get()
    }

    /// See [`TypedLayout::resolve`].
    pub fn resolve(self, alignment: ImageRowAlignment) -> Self {
        let row_bytes = self.row_bytes();
        let stride_bytes = if self.stride_bytes.get() == 0 {
            compute_stride_bytes(row_bytes, alignment)
        } else {
            self.stride_bytes
        };
        assert!(
            stride_bytes.get() >= row_bytes.get(),
            "stride of {} bytes is smaller than a row of {} bytes",
            stride_bytes,
            row_bytes
        );
        UntypedLayout {
            stride_bytes,
            ..self
        }
    }

    pub(crate) fn geometry(&self) -> Geometry {
        Geometry {
            width: self.width.get() as usize,
            height: self.height.get() as usize,
            bytes_per_pixel: self.nr_bytes_per_pixel(),
            stride: self.stride_bytes().to_usize(),
        }
    }
}

/// Pixel format and sample format of a runtime-typed image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSemantics {
    pub pixel_format: PixelFormat,
    pub sample_format: SampleFormat,
}

impl ImageSemantics {
    pub fn new(pixel_format: PixelFormat, sample_format: SampleFormat) -> Self {
        ImageSemantics {
            pixel_format,
            sample_format,
        }
    }

    /// The semantics implied by a pixel type.
    pub fn from_pixel<P: PixelType>() -> Self {
        Self::new(P::PIXEL_FORMAT, P::SAMPLE_FORMAT)
    }
}

impl Default for ImageSemantics {
    fn default() -> Self {
        Self::new(PixelFormat::Unknown, SampleFormat::Unknown)
    }
}

/// Resolved geometry in plain machine units, shared by typed and untyped containers.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Geometry {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) bytes_per_pixel: usize,
    pub(crate) stride: usize,
}

impl Geometry {
    pub(crate) fn row_bytes(&self) -> usize {
        self.width * self.bytes_per_pixel
    }

    /// Bytes a buffer needs to hold every row; the last row needs no padding.
    pub(crate) fn min_len(&self) -> usize {
        if self.height == 0 {
            0
        } else {
            self.stride * (self.height - 1) + self.row_bytes()
        }
    }

    /// Byte range of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// When `y` is outside the image.
    #[inline]
    pub(crate) fn row_range(&self, y: usize) -> Range<usize> {
        assert!(
            y < self.height,
            "row {} out of bounds for height {}",
            y,
            self.height
        );
        let start = y * self.stride;
        start..start + self.row_bytes()
    }

    /// Byte range covering the sub-region `bbox` along with its geometry, which keeps the stride.
    ///
    /// # Panics
    ///
    /// When `bbox` does not lie within the image.
    pub(crate) fn sub_region(&self, bbox: &BoundingBox) -> (Range<usize>, Geometry) {
        assert!(
            bbox.fits_within(
                PixelLength::new(self.width as i32),
                PixelLength::new(self.height as i32)
            ),
            "region {:?} exceeds the image extent {}x{}",
            bbox,
            self.width,
            self.height
        );
        let sub = Geometry {
            width: bbox.width().get() as usize,
            height: bbox.height().get() as usize,
            ..*self
        };
        let start =
            self.stride * bbox.y0().get() as usize + self.bytes_per_pixel * bbox.x0().get() as usize;
        (start..start + sub.min_len(), sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PixelRgb8, PixelY16};
    use crate::math::{idx, px};

    #[test]
    fn typed_layout_sizes() {
        let layout = TypedLayout::new(px(10), px(4)).resolve::<PixelRgb8>(DEFAULT_ROW_ALIGNMENT);
        assert_eq!(layout.row_bytes::<PixelRgb8>().get(), 30);
        assert_eq!(layout.stride_bytes.get(), 32);
        assert_eq!(layout.total_bytes::<PixelRgb8>().get(), 128);
        assert!(!layout.is_packed::<PixelRgb8>());

        let packed = TypedLayout::new(px(8), px(2));
        assert!(packed.is_packed::<PixelY16>());
        assert_eq!(packed.total_bytes::<PixelY16>().get(), 32);
    }

    #[test]
    #[should_panic]
    fn stride_smaller_than_row_is_rejected() {
        let _ = TypedLayout::with_stride(px(10), px(1), Stride::new(20))
            .resolve::<PixelRgb8>(DEFAULT_ROW_ALIGNMENT);
    }

    #[test]
    fn untyped_layout_matches_typed() {
        let typed = TypedLayout::new(px(7), px(3)).resolve::<PixelRgb8>(ImageRowAlignment::new(8));
        let untyped = UntypedLayout::from_typed::<PixelRgb8>(&typed);
        assert_eq!(untyped.nr_bytes_per_pixel(), 3);
        assert_eq!(untyped.row_bytes().get(), 21);
        assert_eq!(untyped.stride_bytes().get(), 24);
        assert_eq!(untyped.total_bytes().get(), 72);
        assert_eq!(untyped.to_typed(), typed);
    }

    #[test]
    fn sub_region_keeps_stride() {
        let geometry = TypedLayout::new(px(6), px(5))
            .resolve::<PixelRgb8>(DEFAULT_ROW_ALIGNMENT)
            .geometry::<PixelRgb8>();
        let bbox = BoundingBox::new(idx(1), idx(2), px(3), px(2));
        let (range, sub) = geometry.sub_region(&bbox);
        assert_eq!(sub.stride, 32);
        assert_eq!(range.start, 2 * 32 + 3);
        assert_eq!(range.len(), 32 + 9);
    }
}
