//! # Overview
//!
//! This crate provides in-memory images with an explicit row layout, pixel access with
//! configurable border handling and interpolation, and separable convolution.
//!
//! Images are rows of pixels placed `stride_bytes()` apart. The stride may exceed the bytes a
//! row needs, either because rows are aligned ([`DEFAULT_ROW_ALIGNMENT`]) or because a view was
//! taken of a region of a larger image. Every algorithm walks rows and never touches the bytes
//! between them.
//!
//! ```
//! use imgkit::access::Replicated;
//! use imgkit::imageops::{convolution_x, convolution_y};
//! use imgkit::kernel::gaussian_kernel;
//! use imgkit::math::{idx, px, BoundingBox};
//! use imgkit::{Image, PixelY8};
//!
//! let img = Image::from_fn(px(64), px(48), |x, y| PixelY8::new([(x.get() ^ y.get()) as u8]));
//! let region = img.sub_view(&BoundingBox::new(idx(8), idx(8), px(32), px(16)));
//!
//! let kernel = gaussian_kernel(1.5, 7);
//! let blurred = convolution_y(&convolution_x(&region, &kernel, Replicated), &kernel, Replicated);
//! assert_eq!(blurred.width(), px(32));
//! ```
//!
//! # Typed and runtime-typed images
//!
//! [`Image`] and [`ImageView`] know their pixel type at compile time. [`DynImage`] and
//! [`DynImageView`] carry a channel count, a channel width and [`ImageSemantics`] at runtime
//! instead; converting to a typed image checks them and returns an [`ImageError`] on mismatch.
#![warn(unused_qualifications)]
#![deny(deprecated)]
#![warn(missing_copy_implementations)]
#![allow(clippy::many_single_char_names)]

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub use crate::color::{
    formats, FormatTag, Pixel, PixelFormat, PixelType, SampleFormat, PixelBgr8, PixelBgra8,
    PixelRgb16, PixelRgb8, PixelRgba16, PixelRgba8, PixelRgbaf32, PixelRgbf32, PixelY16, PixelY8,
    PixelYa8, PixelYf32, PixelYf64,
};
pub use crate::error::{
    ImageError, ImageResult, LimitErrorKind, ParameterErrorKind, UnsupportedErrorKind,
};
pub use crate::images::{
    Constant, ConstantImageView, DataPtr, DynImage, DynImageView, Image, ImageAccess,
    ImageAccessMut, ImageSemantics, ImageView, MemoryBlock, Modifiability, Mutable,
    MutableImageView, TypedLayout, UntypedLayout, DEFAULT_ROW_ALIGNMENT,
};
pub use crate::limits::Limits;
pub use crate::traits::{Primitive, Sample};

#[cfg(feature = "rayon")]
pub use crate::buffer_par::{ParRows, ParRowsMut};

/// Pixel access with border handling and interpolation
pub mod access;
/// Image processing functions
pub mod imageops;
/// Convolution kernels
pub mod kernel;
/// Strongly-typed geometry scalars and rectangles
pub mod math;

#[cfg(feature = "rayon")]
mod buffer_par;
mod color;
pub mod error;
mod images;
mod limits;
mod traits;
