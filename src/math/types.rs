//! Strongly typed scalars for pixel coordinates, extents and byte quantities.
//!
//! Every quantity is an [`Explicit`] value tagged with a zero-sized marker, so a width can not be
//! passed where an index is expected and neither mixes with plain integers without an explicit
//! conversion.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// A value of type `V` whose meaning is fixed by the marker `Tag`.
pub struct Explicit<V, Tag> {
    value: V,
    _tag: PhantomData<Tag>,
}

#[doc(hidden)]
pub mod tags {
    pub enum PixelIndex {}
    pub enum PixelLength {}
    pub enum Stride {}
    pub enum ByteCount {}
    pub enum RowAlignment {}
}

/// A signed pixel coordinate. May be negative or exceed the image extent before border handling.
pub type PixelIndex = Explicit<i32, tags::PixelIndex>;
/// A pixel extent (width or height).
pub type PixelLength = Explicit<i32, tags::PixelLength>;
/// Distance in bytes from the start of one row to the start of the next.
pub type Stride = Explicit<i64, tags::Stride>;
/// A number of bytes.
pub type ByteCount = Explicit<i64, tags::ByteCount>;
/// Requested byte alignment of image rows.
pub type ImageRowAlignment = Explicit<i64, tags::RowAlignment>;

impl<V, Tag> Explicit<V, Tag> {
    /// Wraps a raw value.
    #[inline]
    pub const fn new(value: V) -> Self {
        Explicit {
            value,
            _tag: PhantomData,
        }
    }
}

impl<V: Copy, Tag> Explicit<V, Tag> {
    /// The raw value.
    #[inline]
    pub fn get(self) -> V {
        self.value
    }
}

impl<Tag> Explicit<i32, Tag> {
    /// Converts to an index into pixel storage.
    ///
    /// Negative values wrap to out of range indices, which every slice access rejects.
    #[inline]
    pub(crate) fn to_usize(self) -> usize {
        self.value as usize
    }
}

impl<Tag> Explicit<i64, Tag> {
    #[inline]
    pub(crate) fn to_usize(self) -> usize {
        debug_assert!(self.value >= 0);
        self.value as usize
    }
}

/// Shorthand for `PixelIndex::new(v)`.
#[inline]
pub const fn idx(v: i32) -> PixelIndex {
    PixelIndex::new(v)
}

/// Shorthand for `PixelLength::new(v)`.
#[inline]
pub const fn px(v: i32) -> PixelLength {
    PixelLength::new(v)
}

impl PixelIndex {
    /// Reinterprets this index as a length, e.g. the extent up to this coordinate.
    #[inline]
    pub const fn to_pixel_length(self) -> PixelLength {
        PixelLength::new(self.value)
    }
}

impl PixelLength {
    /// Reinterprets this length as an index, e.g. one past the last coordinate.
    #[inline]
    pub const fn to_pixel_index(self) -> PixelIndex {
        PixelIndex::new(self.value)
    }

    /// All indices in `0..self`.
    pub fn indices(self) -> impl DoubleEndedIterator<Item = PixelIndex> + ExactSizeIterator {
        (0..self.value.max(0)).map(PixelIndex::new)
    }
}

impl Stride {
    #[inline]
    pub const fn to_byte_count(self) -> ByteCount {
        ByteCount::new(self.value)
    }
}

/// Computes the stride of rows holding `row_bytes` bytes at the requested alignment.
///
/// An alignment of 0 or 1 disables padding. Alignments that are not a power of two are rounded up
/// to the next power of two.
pub fn compute_stride_bytes(row_bytes: ByteCount, alignment: ImageRowAlignment) -> Stride {
    let row_bytes = row_bytes.get();
    let alignment = normalize_alignment(alignment.get());
    if alignment <= 1 {
        return Stride::new(row_bytes);
    }
    Stride::new((row_bytes + alignment - 1) / alignment * alignment)
}

pub(crate) fn normalize_alignment(alignment: i64) -> i64 {
    if alignment <= 1 {
        return alignment.max(0);
    }
    (alignment as u64).next_power_of_two() as i64
}

/// Largest power of two, at most 128, that divides both `address` and `stride`.
pub fn guess_row_alignment(address: usize, stride: Stride) -> ImageRowAlignment {
    let stride = stride.get();
    let mut candidate: i64 = 128;
    while candidate > 1 {
        if address % candidate as usize == 0 && stride % candidate == 0 {
            break;
        }
        candidate /= 2;
    }
    ImageRowAlignment::new(candidate)
}

impl<V: Clone, Tag> Clone for Explicit<V, Tag> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<V: Copy, Tag> Copy for Explicit<V, Tag> {}

impl<V: Default, Tag> Default for Explicit<V, Tag> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: PartialEq, Tag> PartialEq for Explicit<V, Tag> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: Eq, Tag> Eq for Explicit<V, Tag> {}

impl<V: PartialOrd, Tag> PartialOrd for Explicit<V, Tag> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<V: Ord, Tag> Ord for Explicit<V, Tag> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<V: Hash, Tag> Hash for Explicit<V, Tag> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl<V: fmt::Debug, Tag> fmt::Debug for Explicit<V, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<V: fmt::Display, Tag> fmt::Display for Explicit<V, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<V: Add<Output = V>, Tag> Add for Explicit<V, Tag> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl<V: Sub<Output = V>, Tag> Sub for Explicit<V, Tag> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl<V: AddAssign, Tag> AddAssign for Explicit<V, Tag> {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl<V: SubAssign, Tag> SubAssign for Explicit<V, Tag> {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl Add<PixelLength> for PixelIndex {
    type Output = PixelIndex;

    fn add(self, rhs: PixelLength) -> PixelIndex {
        PixelIndex::new(self.value + rhs.value)
    }
}

impl Sub<PixelLength> for PixelIndex {
    type Output = PixelIndex;

    fn sub(self, rhs: PixelLength) -> PixelIndex {
        PixelIndex::new(self.value - rhs.value)
    }
}

impl Sub<PixelIndex> for PixelLength {
    type Output = PixelLength;

    fn sub(self, rhs: PixelIndex) -> PixelLength {
        PixelLength::new(self.value - rhs.value)
    }
}

impl PartialEq<PixelLength> for PixelIndex {
    fn eq(&self, other: &PixelLength) -> bool {
        self.value == other.value
    }
}

impl PartialOrd<PixelLength> for PixelIndex {
    fn partial_cmp(&self, other: &PixelLength) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize, Tag> serde::Serialize for Explicit<V, Tag> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, V: serde::Deserialize<'de>, Tag> serde::Deserialize<'de> for Explicit<V, Tag> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        V::deserialize(deserializer).map(Self::new)
    }
}
