//! Mathematical helper functions and types.
mod rect;
mod types;
mod utils;

pub use self::rect::BoundingBox;
pub use self::types::{
    compute_stride_bytes, guess_row_alignment, idx, px, tags, ByteCount, Explicit,
    ImageRowAlignment, PixelIndex, PixelLength, Stride,
};
pub(crate) use self::types::normalize_alignment;
pub use self::utils::{round, round_half_down, round_half_up};
