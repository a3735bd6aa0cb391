use crate::color::PixelType;
use crate::math::{PixelIndex, PixelLength, Stride};

/// Trait to inspect an image.
///
/// Implemented by owning images and views alike, so algorithms written against it accept both.
///
/// ```
/// use imgkit::{ImageAccess, Image, PixelRgb8};
/// use imgkit::math::px;
///
/// let buffer = Image::<PixelRgb8>::new(px(10), px(10));
/// let image: &dyn ImageAccess<Pixel = PixelRgb8> = &buffer;
/// assert_eq!(image.width(), px(10));
/// ```
pub trait ImageAccess {
    /// The type of pixel.
    type Pixel: PixelType;

    /// The width of this image.
    fn width(&self) -> PixelLength;

    /// The height of this image.
    fn height(&self) -> PixelLength;

    /// Distance in bytes between the starts of two consecutive rows.
    fn stride_bytes(&self) -> Stride;

    /// The pixels of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    fn row(&self, y: PixelIndex) -> &[Self::Pixel];

    /// The width and height of this image.
    fn dimensions(&self) -> (PixelLength, PixelLength) {
        (self.width(), self.height())
    }

    fn is_empty(&self) -> bool {
        self.width().get() == 0 || self.height().get() == 0
    }

    /// Returns true if this x, y coordinate is contained inside the image.
    fn in_bounds(&self, x: PixelIndex, y: PixelIndex) -> bool {
        x.get() >= 0 && y.get() >= 0 && x < self.width() && y < self.height()
    }

    /// Returns the pixel located at (x, y). Indexed from top left.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    fn pixel(&self, x: PixelIndex, y: PixelIndex) -> Self::Pixel {
        self.row(y)[x.to_usize()]
    }
}

/// A trait for manipulating images.
pub trait ImageAccessMut: ImageAccess {
    /// The pixels of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    fn row_mut(&mut self, y: PixelIndex) -> &mut [Self::Pixel];

    /// Gets a reference to the mutable pixel at location `(x, y)`. Indexed from top left.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    fn pixel_mut(&mut self, x: PixelIndex, y: PixelIndex) -> &mut Self::Pixel {
        &mut self.row_mut(y)[x.to_usize()]
    }

    /// Put a pixel at location (x, y). Indexed from top left.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    fn put_pixel(&mut self, x: PixelIndex, y: PixelIndex, pixel: Self::Pixel) {
        *self.pixel_mut(x, y) = pixel;
    }
}

impl<I: ImageAccess + ?Sized> ImageAccess for &I {
    type Pixel = I::Pixel;

    fn width(&self) -> PixelLength {
        (**self).width()
    }

    fn height(&self) -> PixelLength {
        (**self).height()
    }

    fn stride_bytes(&self) -> Stride {
        (**self).stride_bytes()
    }

    fn row(&self, y: PixelIndex) -> &[Self::Pixel] {
        (**self).row(y)
    }
}
