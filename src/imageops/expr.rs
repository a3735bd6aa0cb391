//! Lazy pixel expressions.
//!
//! An expression describes an image without storing it: every pixel is computed on demand by
//! [`ImageExpr::eval`]. Expressions are combined like iterator adaptors and materialized with
//! [`ImageExpr::evaluate`] or [`ImageExpr::evaluate_into`].
//!
//! ```
//! use imgkit::imageops::expr::{image_expr, ImageExpr};
//! use imgkit::imageops::FlipDirection;
//! use imgkit::math::{idx, px, BoundingBox};
//! use imgkit::{Image, PixelY8};
//!
//! let img = Image::from_fn(px(4), px(3), |x, y| PixelY8::new([(10 * y.get() + x.get()) as u8]));
//! let out = image_expr(&img)
//!     .crop(BoundingBox::new(idx(1), idx(1), px(2), px(2)))
//!     .flip(FlipDirection::Horizontal)
//!     .transform(|p| PixelY8::new([p[0] * 2]))
//!     .evaluate();
//! assert_eq!(out.get_pixel(idx(0), idx(0))[0], 24);
//! ```

use core::marker::PhantomData;

use crate::color::PixelType;
use crate::images::{Image, ImageAccess};
use crate::imageops::{allocate, FlipDirection};
use crate::math::{BoundingBox, PixelIndex, PixelLength};

/// An image whose pixels are computed on demand.
pub trait ImageExpr {
    type Pixel: PixelType;

    fn width(&self) -> PixelLength;

    fn height(&self) -> PixelLength;

    /// The pixel at `(x, y)`, which must lie inside the expression's extent.
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> Self::Pixel;

    /// Computes every pixel into `dst`, which is resized to the expression's extent.
    fn evaluate_into(&self, dst: &mut Image<Self::Pixel>) {
        if !allocate(dst, self.width(), self.height()) {
            return;
        }
        let width = self.width();
        for y in self.height().indices() {
            for (x, p) in width.indices().zip(dst.row_mut(y)) {
                *p = self.eval(x, y);
            }
        }
    }

    /// Computes every pixel into a new image.
    fn evaluate(&self) -> Image<Self::Pixel> {
        let mut dst = Image::empty();
        self.evaluate_into(&mut dst);
        dst
    }

    fn transform<Q, F>(self, f: F) -> TransformExpr<Self, F>
    where
        Self: Sized,
        Q: PixelType,
        F: Fn(Self::Pixel) -> Q,
    {
        transform_expr(self, f)
    }

    fn transform_with_position<Q, F>(self, f: F) -> TransformWithPositionExpr<Self, F>
    where
        Self: Sized,
        Q: PixelType,
        F: Fn(Self::Pixel, PixelIndex, PixelIndex) -> Q,
    {
        TransformWithPositionExpr { inner: self, f }
    }

    fn crop(self, region: BoundingBox) -> CropExpr<Self>
    where
        Self: Sized,
    {
        crop_expr(self, region)
    }

    fn transpose(self) -> TransposeExpr<Self>
    where
        Self: Sized,
    {
        transpose_expr(self)
    }

    fn flip(self, direction: FlipDirection) -> FlipExpr<Self>
    where
        Self: Sized,
    {
        flip_expr(self, direction)
    }
}

/// An expression reading the pixels of an existing image.
#[derive(Debug)]
pub struct ImageSource<'a, I: ImageAccess + ?Sized> {
    image: &'a I,
}

impl<I: ImageAccess + ?Sized> Clone for ImageSource<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ImageAccess + ?Sized> Copy for ImageSource<'_, I> {}

/// Starts an expression from `image`.
pub fn image_expr<I: ImageAccess + ?Sized>(image: &I) -> ImageSource<'_, I> {
    ImageSource { image }
}

impl<I: ImageAccess + ?Sized> ImageExpr for ImageSource<'_, I> {
    type Pixel = I::Pixel;

    fn width(&self) -> PixelLength {
        self.image.width()
    }

    fn height(&self) -> PixelLength {
        self.image.height()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        self.image.pixel(x, y)
    }
}

/// An expression with pixel `f(x, y)` at `(x, y)`.
#[derive(Clone, Debug)]
pub struct GenerationExpr<P, F> {
    width: PixelLength,
    height: PixelLength,
    f: F,
    _pixel: PhantomData<P>,
}

pub fn generate_expr<P, F>(width: PixelLength, height: PixelLength, f: F) -> GenerationExpr<P, F>
where
    P: PixelType,
    F: Fn(PixelIndex, PixelIndex) -> P,
{
    GenerationExpr {
        width,
        height,
        f,
        _pixel: PhantomData,
    }
}

impl<P, F> ImageExpr for GenerationExpr<P, F>
where
    P: PixelType,
    F: Fn(PixelIndex, PixelIndex) -> P,
{
    type Pixel = P;

    fn width(&self) -> PixelLength {
        self.width
    }

    fn height(&self) -> PixelLength {
        self.height
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> P {
        (self.f)(x, y)
    }
}

/// Applies a function to every pixel of an expression.
#[derive(Clone, Debug)]
pub struct TransformExpr<E, F> {
    inner: E,
    f: F,
}

pub fn transform_expr<E, Q, F>(inner: E, f: F) -> TransformExpr<E, F>
where
    E: ImageExpr,
    Q: PixelType,
    F: Fn(E::Pixel) -> Q,
{
    TransformExpr { inner, f }
}

impl<E, Q, F> ImageExpr for TransformExpr<E, F>
where
    E: ImageExpr,
    Q: PixelType,
    F: Fn(E::Pixel) -> Q,
{
    type Pixel = Q;

    fn width(&self) -> PixelLength {
        self.inner.width()
    }

    fn height(&self) -> PixelLength {
        self.inner.height()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> Q {
        (self.f)(self.inner.eval(x, y))
    }
}

/// Applies a function to every pixel and its position.
#[derive(Clone, Debug)]
pub struct TransformWithPositionExpr<E, F> {
    inner: E,
    f: F,
}

impl<E, Q, F> ImageExpr for TransformWithPositionExpr<E, F>
where
    E: ImageExpr,
    Q: PixelType,
    F: Fn(E::Pixel, PixelIndex, PixelIndex) -> Q,
{
    type Pixel = Q;

    fn width(&self) -> PixelLength {
        self.inner.width()
    }

    fn height(&self) -> PixelLength {
        self.inner.height()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> Q {
        (self.f)(self.inner.eval(x, y), x, y)
    }
}

/// A rectangular region of an expression.
#[derive(Clone, Debug)]
pub struct CropExpr<E> {
    inner: E,
    region: BoundingBox,
}

/// Restricts `inner` to `region`.
///
/// # Panics
///
/// Panics if `region` does not lie within `inner`.
pub fn crop_expr<E: ImageExpr>(inner: E, region: BoundingBox) -> CropExpr<E> {
    assert!(
        region.fits_within(inner.width(), inner.height()),
        "crop region {region:?} exceeds the {}x{} expression",
        inner.width(),
        inner.height()
    );
    CropExpr { inner, region }
}

impl<E: ImageExpr> ImageExpr for CropExpr<E> {
    type Pixel = E::Pixel;

    fn width(&self) -> PixelLength {
        self.region.width()
    }

    fn height(&self) -> PixelLength {
        self.region.height()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> E::Pixel {
        self.inner.eval(x + self.region.x0(), y + self.region.y0())
    }
}

/// Swaps the axes of an expression.
#[derive(Clone, Debug)]
pub struct TransposeExpr<E> {
    inner: E,
}

pub fn transpose_expr<E: ImageExpr>(inner: E) -> TransposeExpr<E> {
    TransposeExpr { inner }
}

impl<E: ImageExpr> ImageExpr for TransposeExpr<E> {
    type Pixel = E::Pixel;

    fn width(&self) -> PixelLength {
        self.inner.height()
    }

    fn height(&self) -> PixelLength {
        self.inner.width()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> E::Pixel {
        self.inner.eval(y, x)
    }
}

/// Mirrors an expression.
#[derive(Clone, Debug)]
pub struct FlipExpr<E> {
    inner: E,
    direction: FlipDirection,
}

pub fn flip_expr<E: ImageExpr>(inner: E, direction: FlipDirection) -> FlipExpr<E> {
    FlipExpr { inner, direction }
}

impl<E: ImageExpr> ImageExpr for FlipExpr<E> {
    type Pixel = E::Pixel;

    fn width(&self) -> PixelLength {
        self.inner.width()
    }

    fn height(&self) -> PixelLength {
        self.inner.height()
    }

    #[inline]
    fn eval(&self, x: PixelIndex, y: PixelIndex) -> E::Pixel {
        let mirror_x = PixelIndex::new(self.inner.width().get() - 1 - x.get());
        let mirror_y = PixelIndex::new(self.inner.height().get() - 1 - y.get());
        match self.direction {
            FlipDirection::Horizontal => self.inner.eval(mirror_x, y),
            FlipDirection::Vertical => self.inner.eval(x, mirror_y),
            FlipDirection::Both => self.inner.eval(mirror_x, mirror_y),
        }
    }
}
