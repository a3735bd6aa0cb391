//! Image containers: owning images, views, and their runtime-typed counterparts.

mod buffer;
mod data_ptr;
mod dynimage;
mod generic_image;
mod layout;
mod memory;
mod sub_image;

pub use self::buffer::Image;
pub use self::data_ptr::{Constant, DataPtr, Modifiability, Mutable};
pub use self::dynimage::{DynImage, DynImageView};
pub use self::generic_image::{ImageAccess, ImageAccessMut};
pub use self::layout::{ImageSemantics, TypedLayout, UntypedLayout, DEFAULT_ROW_ALIGNMENT};
pub use self::memory::MemoryBlock;
pub use self::sub_image::{ConstantImageView, ImageView, MutableImageView};

pub(crate) use self::dynimage::{dynamic_map, dynamic_map_channels};
