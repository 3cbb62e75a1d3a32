//! # Chunk Iteration Module
//!
//! This module provides an iterator over every cell of a chunk together with
//! its local position, walking the flat storage array in order (x fastest,
//! then y, then z).

use super::Chunk;
use crate::engine_state::voxels::coords::LocalPos;

/// An iterator over all cells in a chunk.
///
/// The local position is reconstructed from the running storage offset, so no
/// per-axis counters need to be kept in sync.
pub struct ChunkIterator<'a, T> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk<T>,
    /// Current offset into the storage array
    current_offset: usize,
}

impl<'a, T: Copy> ChunkIterator<'a, T> {
    /// Creates a new `ChunkIterator` positioned at local `(0, 0, 0)`.
    pub fn new(chunk_ref: &'a Chunk<T>) -> Self {
        ChunkIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl<'a, T: Copy> Iterator for ChunkIterator<'a, T> {
    type Item = (LocalPos, T);

    fn next(&mut self) -> Option<Self::Item> {
        let cells = self.chunk_ref.as_slice();
        let value = *cells.get(self.current_offset)?;
        let position = Chunk::<T>::position_of(self.current_offset);
        self.current_offset += 1;
        Some((position, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunk_ref.as_slice().len() - self.current_offset;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy> ExactSizeIterator for ChunkIterator<'a, T> {}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;

    #[test]
    fn visits_every_cell_in_storage_order() {
        let chunk: Chunk<u8> = Chunk::new();
        let positions: Vec<_> = chunk.iter().map(|(pos, _)| pos).collect();
        assert_eq!(positions.len(), CHUNK_SIZE as usize);
        assert_eq!(positions[0], Point3::new(0, 0, 0));
        assert_eq!(positions[1], Point3::new(1, 0, 0));
        assert_eq!(positions[16], Point3::new(0, 1, 0));
        assert_eq!(positions[256], Point3::new(0, 0, 1));
        assert_eq!(chunk.iter().len(), CHUNK_SIZE as usize);
    }
}
