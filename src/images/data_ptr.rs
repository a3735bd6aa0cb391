//! Borrowed pixel storage tagged with its modifiability.

use core::ops::{Deref, Range};

mod sealed {
    pub trait Sealed {}
}

/// Read-only access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Constant;

/// Read and write access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mutable;

impl sealed::Sealed for Constant {}
impl sealed::Sealed for Mutable {}

/// Whether borrowed pixel data may be written. Implemented by [`Constant`] and [`Mutable`].
pub trait Modifiability: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// The borrow used to reach the bytes.
    type Bytes<'a>: Deref<Target = [u8]>;

    #[doc(hidden)]
    fn narrow<'a>(bytes: Self::Bytes<'a>, range: Range<usize>) -> Self::Bytes<'a>;
}

impl Modifiability for Constant {
    type Bytes<'a> = &'a [u8];

    fn narrow<'a>(bytes: Self::Bytes<'a>, range: Range<usize>) -> Self::Bytes<'a> {
        &bytes[range]
    }
}

impl Modifiability for Mutable {
    type Bytes<'a> = &'a mut [u8];

    fn narrow<'a>(bytes: Self::Bytes<'a>, range: Range<usize>) -> Self::Bytes<'a> {
        &mut bytes[range]
    }
}

/// Bytes of an image owned elsewhere.
///
/// A `DataPtr<Constant>` never hands out mutable access.
pub struct DataPtr<'a, M: Modifiability> {
    bytes: M::Bytes<'a>,
}

impl<'a, M: Modifiability> DataPtr<'a, M> {
    pub fn new(bytes: M::Bytes<'a>) -> Self {
        DataPtr { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Address of the first byte.
    pub fn address(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    /// Restricts the borrow to `range`.
    pub fn narrow(self, range: Range<usize>) -> Self {
        DataPtr {
            bytes: M::narrow(self.bytes, range),
        }
    }

    /// A read-only borrow of the same bytes.
    pub fn as_const(&self) -> DataPtr<'_, Constant> {
        DataPtr::<Constant>::new(self.as_bytes())
    }
}

impl<'a> DataPtr<'a, Constant> {
    /// The underlying slice with the full borrow lifetime.
    pub fn into_bytes(self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> DataPtr<'a, Mutable> {
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    /// A shorter mutable borrow of the same bytes.
    pub fn reborrow(&mut self) -> DataPtr<'_, Mutable> {
        DataPtr::<Mutable>::new(&mut *self.bytes)
    }

    pub fn into_bytes_mut(self) -> &'a mut [u8] {
        self.bytes
    }

    /// Gives up write access for the rest of the borrow.
    pub fn into_const(self) -> DataPtr<'a, Constant> {
        let bytes: &'a [u8] = self.bytes;
        DataPtr::<Constant>::new(bytes)
    }
}

impl Clone for DataPtr<'_, Constant> {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for DataPtr<'_, Constant> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_keeps_modifiability() {
        let mut buffer = [0u8, 1, 2, 3, 4, 5];
        let mut ptr = DataPtr::<Mutable>::new(&mut buffer[..]);
        ptr.reborrow().narrow(2..4).as_bytes_mut()[0] = 42;
        assert_eq!(ptr.as_const().as_bytes(), &[0, 1, 42, 3, 4, 5]);

        let constant = ptr.into_const().narrow(1..3);
        let copy = constant;
        assert_eq!(copy.as_bytes(), constant.into_bytes());
        assert_eq!(constant.len(), 2);
    }
}
