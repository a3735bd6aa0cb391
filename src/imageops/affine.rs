//! Functions for performing affine transformations.

use crate::images::{Image, ImageAccess, ImageAccessMut};
use crate::imageops::{allocate, clone_into};
use crate::math::PixelIndex;

/// Axis of a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlipDirection {
    /// Mirror columns.
    Horizontal,
    /// Mirror rows.
    Vertical,
    /// Mirror rows and columns.
    Both,
}

/// Rotation in multiples of 90 degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Clockwise0,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// The rotation by `degrees` counterclockwise, which must be a multiple of 90.
    pub fn counterclockwise(degrees: u32) -> Option<Rotation> {
        match degrees % 360 {
            0 => Some(Rotation::Clockwise0),
            90 => Some(Rotation::Clockwise270),
            180 => Some(Rotation::Clockwise180),
            270 => Some(Rotation::Clockwise90),
            _ => None,
        }
    }
}

/// `dst(x, y) = src(y, x)`, optionally mirrored.
///
/// `FLIP_H` mirrors the output horizontally, `FLIP_V` mirrors it vertically.
fn transpose_flipped<I, const FLIP_H: bool, const FLIP_V: bool>(src: &I, dst: &mut Image<I::Pixel>)
where
    I: ImageAccess + ?Sized,
{
    let (src_w, src_h) = (src.width().get(), src.height().get());
    if !allocate(dst, src.height(), src.width()) {
        return;
    }
    for dst_y in 0..src_w {
        let src_x = PixelIndex::new(if FLIP_V { src_w - 1 - dst_y } else { dst_y });
        let out = dst.row_mut(PixelIndex::new(dst_y));
        for (dst_x, p) in (0..src_h).zip(out.iter_mut()) {
            let src_y = PixelIndex::new(if FLIP_H { src_h - 1 - dst_x } else { dst_x });
            *p = src.pixel(src_x, src_y);
        }
    }
}

/// Transposes `src` into `dst`, which becomes `src.height()` wide and `src.width()` high.
pub fn transpose_into<I>(src: &I, dst: &mut Image<I::Pixel>)
where
    I: ImageAccess + ?Sized,
{
    transpose_flipped::<I, false, false>(src, dst);
}

/// Transposes an image.
pub fn transpose<I>(src: &I) -> Image<I::Pixel>
where
    I: ImageAccess + ?Sized,
{
    let mut dst = Image::empty();
    transpose_into(src, &mut dst);
    dst
}

/// Flips `src` into `dst`.
pub fn flip_into<I>(src: &I, direction: FlipDirection, dst: &mut Image<I::Pixel>)
where
    I: ImageAccess + ?Sized,
{
    if !allocate(dst, src.width(), src.height()) {
        return;
    }
    let height = src.height().get();
    let vertical = matches!(direction, FlipDirection::Vertical | FlipDirection::Both);
    let horizontal = matches!(direction, FlipDirection::Horizontal | FlipDirection::Both);
    for y in 0..height {
        let src_y = if vertical { height - 1 - y } else { y };
        let row = src.row(PixelIndex::new(src_y));
        let out = dst.row_mut(PixelIndex::new(y));
        if horizontal {
            for (p, q) in out.iter_mut().zip(row.iter().rev()) {
                *p = *q;
            }
        } else {
            out.copy_from_slice(row);
        }
    }
}

/// Flips an image.
pub fn flip<I>(src: &I, direction: FlipDirection) -> Image<I::Pixel>
where
    I: ImageAccess + ?Sized,
{
    let mut dst = Image::empty();
    flip_into(src, direction, &mut dst);
    dst
}

/// Flip an image horizontally
pub fn flip_horizontal<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    flip(src, FlipDirection::Horizontal)
}

/// Flip an image vertically
pub fn flip_vertical<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    flip(src, FlipDirection::Vertical)
}

/// Flip an image horizontally and vertically.
pub fn flip_both<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    flip(src, FlipDirection::Both)
}

/// Mirrors every row in place.
pub fn flip_horizontal_in_place<I: ImageAccessMut + ?Sized>(image: &mut I) {
    for y in image.height().indices() {
        image.row_mut(y).reverse();
    }
}

/// Swaps rows top to bottom in place.
pub fn flip_vertical_in_place<I: ImageAccessMut + ?Sized>(image: &mut I) {
    let height = image.height().get();
    for top in 0..height / 2 {
        let (top, bottom) = (PixelIndex::new(top), PixelIndex::new(height - 1 - top));
        for x in image.width().indices() {
            let a = image.pixel(x, top);
            let b = image.pixel(x, bottom);
            image.put_pixel(x, top, b);
            image.put_pixel(x, bottom, a);
        }
    }
}

/// Rotates `src` into `dst`.
pub fn rotate_into<I>(src: &I, rotation: Rotation, dst: &mut Image<I::Pixel>)
where
    I: ImageAccess + ?Sized,
{
    match rotation {
        Rotation::Clockwise0 => clone_into(src, dst),
        Rotation::Clockwise90 => transpose_flipped::<I, true, false>(src, dst),
        Rotation::Clockwise180 => flip_into(src, FlipDirection::Both, dst),
        Rotation::Clockwise270 => transpose_flipped::<I, false, true>(src, dst),
    }
}

/// Rotates an image in multiples of 90 degrees.
pub fn rotate<I>(src: &I, rotation: Rotation) -> Image<I::Pixel>
where
    I: ImageAccess + ?Sized,
{
    let mut dst = Image::empty();
    rotate_into(src, rotation, &mut dst);
    dst
}

/// Rotate an image 90 degrees clockwise.
pub fn rotate90<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    rotate(src, Rotation::Clockwise90)
}

/// Rotate an image 180 degrees clockwise.
pub fn rotate180<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    rotate(src, Rotation::Clockwise180)
}

/// Rotate an image 270 degrees clockwise.
pub fn rotate270<I: ImageAccess + ?Sized>(src: &I) -> Image<I::Pixel> {
    rotate(src, Rotation::Clockwise270)
}
