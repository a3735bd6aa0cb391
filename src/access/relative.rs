use crate::access::border::BorderAccessor;
use crate::access::interpolate::InterpolationMode;
use crate::color::{FormatTag, Pixel};
use crate::images::ImageAccess;
use crate::math::PixelIndex;
use crate::traits::Sample;

/// Reads an image in coordinates relative to an anchor pixel.
///
/// The accessor translates `(rx, ry)` to `(ax + rx, ay + ry)` and leaves border handling to the
/// policy passed to [`RelativeAccessor::get`]. It performs no bounds checks of its own.
#[derive(Debug)]
pub struct RelativeAccessor<'a, I: ImageAccess + ?Sized> {
    image: &'a I,
    anchor_x: PixelIndex,
    anchor_y: PixelIndex,
}

impl<'a, I: ImageAccess + ?Sized> RelativeAccessor<'a, I> {
    pub fn new(image: &'a I, anchor_x: PixelIndex, anchor_y: PixelIndex) -> Self {
        RelativeAccessor {
            image,
            anchor_x,
            anchor_y,
        }
    }

    pub fn image(&self) -> &'a I {
        self.image
    }

    pub fn anchor(&self) -> (PixelIndex, PixelIndex) {
        (self.anchor_x, self.anchor_y)
    }

    pub fn set_anchor(&mut self, anchor_x: PixelIndex, anchor_y: PixelIndex) {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
    }

    /// The absolute image coordinate of `(rx, ry)`.
    #[inline(always)]
    pub fn absolute(&self, rx: PixelIndex, ry: PixelIndex) -> (PixelIndex, PixelIndex) {
        (self.anchor_x + rx, self.anchor_y + ry)
    }

    #[inline(always)]
    pub fn get<B: BorderAccessor>(&self, rx: PixelIndex, ry: PixelIndex) -> I::Pixel {
        let (x, y) = self.absolute(rx, ry);
        B::access(self.image, x, y)
    }
}

impl<'a, I, T, F, const N: usize> RelativeAccessor<'a, I>
where
    I: ImageAccess<Pixel = Pixel<T, N, F>> + ?Sized,
    T: Sample,
    F: FormatTag,
{
    /// Interpolates at the fractional offset `(rx, ry)` from the anchor.
    #[inline]
    pub fn interpolate<M: InterpolationMode, B: BorderAccessor>(&self, rx: f64, ry: f64) -> Pixel<f64, N, F> {
        let x = f64::from(self.anchor_x.get()) + rx;
        let y = f64::from(self.anchor_y.get()) + ry;
        M::interpolate::<B, I, T, F, N>(self.image, x, y)
    }
}

impl<I: ImageAccess + ?Sized> Clone for RelativeAccessor<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ImageAccess + ?Sized> Copy for RelativeAccessor<'_, I> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Bilinear, Replicated, Unchecked, ZeroPadding};
    use crate::color::PixelY8;
    use crate::images::Image;
    use crate::math::{idx, px};

    #[test]
    fn offsets_from_anchor() {
        let img = Image::from_fn(px(4), px(4), |x, y| PixelY8::new([(y.get() * 4 + x.get()) as u8]));
        let mut acc = RelativeAccessor::new(&img, idx(1), idx(2));
        assert_eq!(acc.absolute(idx(-1), idx(1)), (idx(0), idx(3)));
        assert_eq!(acc.get::<Unchecked>(idx(0), idx(0))[0], 9);
        assert_eq!(acc.get::<Unchecked>(idx(2), idx(-2))[0], 3);
        assert_eq!(acc.get::<ZeroPadding>(idx(0), idx(2))[0], 0);
        assert_eq!(acc.get::<Replicated>(idx(-5), idx(0))[0], 8);

        acc.set_anchor(idx(3), idx(3));
        assert_eq!(acc.anchor(), (idx(3), idx(3)));
        assert_eq!(acc.get::<Unchecked>(idx(0), idx(0))[0], 15);
    }

    #[test]
    fn interpolates_relative_to_anchor() {
        let img = Image::from_fn(px(3), px(1), |x, _| PixelY8::new([(x.get() * 10) as u8]));
        let acc = RelativeAccessor::new(&img, idx(1), idx(0));
        let v = acc.interpolate::<Bilinear, Replicated>(0.5, 0.0);
        assert!((v[0] - 15.0).abs() < 1e-9);
    }
}
