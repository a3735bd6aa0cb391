//! Pixel access under border policies, at fractional coordinates, or relative to an anchor.

mod border;
mod interpolate;
mod relative;

pub use self::border::{
    access_with_mode, BorderAccessMode, BorderAccessor, ImageBorderAccessor, Replicated,
    Unchecked, ZeroPadding,
};
pub use self::interpolate::{
    interpolate_with_mode, Bilinear, ImageInterpolationMode, ImageInterpolator,
    InterpolationMode, NearestNeighbor,
};
pub use self::relative::RelativeAccessor;
