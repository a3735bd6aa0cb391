use super::types::{PixelIndex, PixelLength};

/// A rectangular image region defined by its top left corner, width and height.
///
/// A default constructed box is empty. Boxes built with [`BoundingBox::new`] always cover at
/// least one pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    x0: PixelIndex,
    y0: PixelIndex,
    width: PixelLength,
    height: PixelLength,
}

impl BoundingBox {
    /// Construct a box from its top left corner and extent.
    ///
    /// # Panics
    ///
    /// When `width` or `height` is not positive.
    pub fn new(x0: PixelIndex, y0: PixelIndex, width: PixelLength, height: PixelLength) -> Self {
        assert!(
            width.get() > 0 && height.get() > 0,
            "bounding box must have a positive area, got {}x{}",
            width,
            height
        );
        BoundingBox {
            x0,
            y0,
            width,
            height,
        }
    }

    /// Construct a box spanning `x0..x1` and `y0..y1`.
    ///
    /// ```
    /// use imgkit::math::{idx, px, BoundingBox};
    ///
    /// let bbox = BoundingBox::from_corners(idx(10), idx(30), idx(20), idx(50));
    /// assert_eq!(bbox.width(), px(10));
    /// assert_eq!(bbox.height(), px(20));
    /// ```
    pub fn from_corners(x0: PixelIndex, y0: PixelIndex, x1: PixelIndex, y1: PixelIndex) -> Self {
        Self::new(
            x0,
            y0,
            PixelLength::new(x1.get() - x0.get()),
            PixelLength::new(y1.get() - y0.get()),
        )
    }

    pub fn x0(&self) -> PixelIndex {
        self.x0
    }

    pub fn y0(&self) -> PixelIndex {
        self.y0
    }

    /// One past the rightmost column.
    pub fn x1(&self) -> PixelIndex {
        self.x0 + self.width
    }

    /// One past the bottom row.
    pub fn y1(&self) -> PixelIndex {
        self.y0 + self.height
    }

    pub fn width(&self) -> PixelLength {
        self.width
    }

    pub fn height(&self) -> PixelLength {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width.get() <= 0 || self.height.get() <= 0
    }

    /// Whether the box lies completely inside an image of the given extent.
    pub fn fits_within(&self, width: PixelLength, height: PixelLength) -> bool {
        self.x0.get() >= 0
            && self.y0.get() >= 0
            && self.x1().get() <= width.get()
            && self.y1().get() <= height.get()
    }

    /// Clamps the box to an image of extent `max_width` x `max_height`.
    ///
    /// The result may be empty if the box lies outside the image.
    pub fn sanitize(&mut self, max_width: PixelLength, max_height: PixelLength) {
        let x1 = self.x1().get().min(max_width.get());
        let y1 = self.y1().get().min(max_height.get());
        self.x0 = PixelIndex::new(self.x0.get().clamp(0, max_width.get().max(0)));
        self.y0 = PixelIndex::new(self.y0.get().clamp(0, max_height.get().max(0)));
        self.width = PixelLength::new((x1 - self.x0.get()).max(0));
        self.height = PixelLength::new((y1 - self.y0.get()).max(0));
    }

    /// Returns a sanitized copy, see [`BoundingBox::sanitize`].
    #[must_use]
    pub fn sanitized(mut self, max_width: PixelLength, max_height: PixelLength) -> Self {
        self.sanitize(max_width, max_height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{idx, px};

    #[test]
    fn corners() {
        let bbox = BoundingBox::new(idx(2), idx(3), px(4), px(5));
        assert_eq!(bbox.x1(), idx(6));
        assert_eq!(bbox.y1(), idx(8));
        assert!(!bbox.is_empty());
        assert!(BoundingBox::default().is_empty());
    }

    #[test]
    #[should_panic]
    fn negative_area_is_rejected() {
        let _ = BoundingBox::new(idx(0), idx(0), px(-3), px(2));
    }

    #[test]
    fn sanitize_clamps_to_image() {
        let bbox = BoundingBox::new(idx(-2), idx(1), px(6), px(10)).sanitized(px(3), px(4));
        assert_eq!(bbox.x0(), idx(0));
        assert_eq!(bbox.y0(), idx(1));
        assert_eq!(bbox.width(), px(3));
        assert_eq!(bbox.height(), px(3));
        assert!(bbox.fits_within(px(3), px(4)));

        let outside = BoundingBox::new(idx(5), idx(5), px(2), px(2)).sanitized(px(3), px(3));
        assert!(outside.is_empty());
    }
}
