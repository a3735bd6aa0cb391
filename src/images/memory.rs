//! Owned, aligned pixel storage.

use log::{debug, warn};

/// A heap buffer whose first byte is aligned to a requested power of two.
///
/// The alignment is obtained by over-allocating a byte vector and starting the usable region at
/// the first aligned address. Moving the block does not move its heap allocation, so the
/// alignment holds for the lifetime of the block.
pub struct MemoryBlock {
    storage: Vec<u8>,
    offset: usize,
    len: usize,
    alignment: usize,
    valid: bool,
}

impl MemoryBlock {
    /// An empty block. It is valid and holds no bytes.
    pub fn empty() -> Self {
        MemoryBlock {
            storage: Vec::new(),
            offset: 0,
            len: 0,
            alignment: 1,
            valid: true,
        }
    }

    fn failed() -> Self {
        MemoryBlock {
            valid: false,
            ..Self::empty()
        }
    }

    /// Allocates `len` zeroed bytes aligned to `alignment`.
    ///
    /// An alignment that is not a power of two is rounded up to the next one. On allocation
    /// failure the returned block is empty and [`MemoryBlock::is_valid`] returns `false`.
    pub fn allocate(len: usize, alignment: usize) -> Self {
        let alignment = alignment.max(1).next_power_of_two();
        // Zero-length blocks still get an aligned start so that empty rows cast to any pixel type.
        let Some(capacity) = len.checked_add(alignment - 1) else {
            warn!("allocation of {len} bytes at alignment {alignment} overflows");
            return Self::failed();
        };

        let mut storage = Vec::new();
        if storage.try_reserve_exact(capacity).is_err() {
            warn!("failed to allocate {capacity} bytes for pixel data");
            return Self::failed();
        }
        storage.resize(capacity, 0u8);

        let offset = storage.as_ptr().align_offset(alignment);
        if offset >= alignment {
            warn!("could not align pixel data to {alignment} bytes");
            return Self::failed();
        }

        debug!("allocated {len} bytes aligned to {alignment}");
        MemoryBlock {
            storage,
            offset,
            len,
            alignment,
            valid: true,
        }
    }

    /// Whether the allocation that produced this block succeeded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The alignment this block was allocated with.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.len]
    }
}

impl Default for MemoryBlock {
    fn default() -> Self {
        Self::empty()
    }
}

impl core::fmt::Debug for MemoryBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .field("valid", &self.valid)
            .finish()
    }
}
