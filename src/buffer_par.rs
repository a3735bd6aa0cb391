use rayon::iter::plumbing::*;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::{ChunksExact, ChunksExactMut, ParallelSlice, ParallelSliceMut};
use std::fmt;
use std::marker::PhantomData;

use crate::color::PixelType;
use crate::images::Image;
use crate::math::{PixelIndex, PixelLength};

/// Parallel iterator over the rows of an image.
///
/// Every item holds the pixels of one row, without the padding that follows it.
#[derive(Clone)]
pub struct ParRows<'a, P: PixelType> {
    chunks: ChunksExact<'a, u8>,
    row_bytes: usize,
    _pixel: PhantomData<P>,
}

impl<'a, P: PixelType> ParallelIterator for ParRows<'a, P> {
    type Item = &'a [P];

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice(&c[..row_bytes]))
            .drive_unindexed(consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<P: PixelType> IndexedParallelIterator for ParRows<'_, P> {
    fn drive<C: Consumer<Self::Item>>(self, consumer: C) -> C::Result {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice(&c[..row_bytes]))
            .drive(consumer)
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn with_producer<CB: ProducerCallback<Self::Item>>(self, callback: CB) -> CB::Output {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice(&c[..row_bytes]))
            .with_producer(callback)
    }
}

impl<P: PixelType> fmt::Debug for ParRows<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParRows")
            .field("len", &self.chunks.len())
            .field("row_bytes", &self.row_bytes)
            .finish()
    }
}

/// Parallel iterator over the mutable rows of an image.
pub struct ParRowsMut<'a, P: PixelType> {
    chunks: ChunksExactMut<'a, u8>,
    row_bytes: usize,
    _pixel: PhantomData<P>,
}

impl<'a, P: PixelType> ParallelIterator for ParRowsMut<'a, P> {
    type Item = &'a mut [P];

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice_mut(&mut c[..row_bytes]))
            .drive_unindexed(consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<P: PixelType> IndexedParallelIterator for ParRowsMut<'_, P> {
    fn drive<C: Consumer<Self::Item>>(self, consumer: C) -> C::Result {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice_mut(&mut c[..row_bytes]))
            .drive(consumer)
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn with_producer<CB: ProducerCallback<Self::Item>>(self, callback: CB) -> CB::Output {
        let row_bytes = self.row_bytes;
        self.chunks
            .map(move |c| bytemuck::cast_slice_mut(&mut c[..row_bytes]))
            .with_producer(callback)
    }
}

impl<P: PixelType> fmt::Debug for ParRowsMut<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParRowsMut")
            .field("len", &self.chunks.len())
            .field("row_bytes", &self.row_bytes)
            .finish()
    }
}

impl<P: PixelType> Image<P> {
    /// Stride in bytes for splitting the storage into rows, at least 1 so that an image without
    /// pixels splits into no rows.
    fn par_chunk_len(&self) -> usize {
        (self.stride_bytes().get() as usize).max(1)
    }

    /// Returns a parallel iterator over the rows of this image, usable with `rayon`.
    ///
    /// An image with zero width or height yields no rows.
    pub fn par_rows(&self) -> ParRows<'_, P> {
        let row_bytes = self.row_bytes().get() as usize;
        let chunk_len = self.par_chunk_len();
        ParRows {
            chunks: self.as_bytes().par_chunks_exact(chunk_len),
            row_bytes,
            _pixel: PhantomData,
        }
    }

    /// Returns a parallel iterator over the mutable rows of this image, usable with `rayon`.
    ///
    /// The rows are disjoint, so every row can be written from a different thread.
    pub fn par_rows_mut(&mut self) -> ParRowsMut<'_, P> {
        let row_bytes = self.row_bytes().get() as usize;
        let chunk_len = self.par_chunk_len();
        ParRowsMut {
            chunks: self.as_bytes_mut().par_chunks_exact_mut(chunk_len),
            row_bytes,
            _pixel: PhantomData,
        }
    }

    /// Constructs a new image by repeated application of the supplied function, utilizing
    /// multi-threading via `rayon`.
    ///
    /// The arguments to the function are the pixel's x and y coordinates.
    pub fn from_par_fn<F>(width: PixelLength, height: PixelLength, f: F) -> Image<P>
    where
        F: Fn(PixelIndex, PixelIndex) -> P + Send + Sync,
    {
        let mut image = Image::new(width, height);
        let width = image.width();
        image.par_rows_mut().enumerate().for_each(|(y, row)| {
            let y = PixelIndex::new(y as i32);
            for (x, p) in width.indices().zip(row.iter_mut()) {
                *p = f(x, y);
            }
        });
        image
    }
}
