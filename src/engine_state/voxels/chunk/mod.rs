//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a dense 16x16x16 block of voxel
//! values. Chunks are the unit of sparse storage in the world, of copy-on-write
//! snapshots in the edit layer, and of meshing.
//!
//! ## Layout
//!
//! Cells are stored in a single flat array indexed by `x + y·N + z·N²`, so a
//! whole chunk can be compared, cloned or filled with one slice operation.
//!
//! ### Performance Characteristics
//! - **Lookup / Store**: O(1)
//! - **Uniform fill / copy**: one slice operation
//! - **Memory Usage**: N³ · sizeof(T), 8 KiB for the default voxel

use std::fmt;

use cgmath::Point3;

use super::{coords::LocalPos, voxel::Voxel};

pub mod chunk_iteration;

use chunk_iteration::ChunkIterator;

/// The dimension (width, height, depth) of a chunk in voxels.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of voxels in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of voxels in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// A dense N×N×N array of cells.
///
/// A chunk has no knowledge of its own position; the world or edit layer that
/// owns it keys it by chunk coordinate.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk<T = Voxel> {
    cells: Box<[T]>,
}

impl<T: Copy + Default> Chunk<T> {
    /// Creates a chunk filled with the default value.
    pub fn new() -> Self {
        Self::filled(T::default())
    }
}

impl<T: Copy + Default> Default for Chunk<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Chunk<T> {
    /// Creates a chunk where every cell holds `value`.
    pub fn filled(value: T) -> Self {
        Chunk {
            cells: vec![value; CHUNK_SIZE as usize].into_boxed_slice(),
        }
    }

    /// Flat array index of a local position.
    ///
    /// # Panics
    /// Panics if any component is outside `0..CHUNK_DIMENSION`.
    pub fn index(local: LocalPos) -> usize {
        assert!(
            Self::in_bounds(local),
            "local position {:?} outside chunk",
            local
        );
        local.x + local.y * CHUNK_DIMENSION as usize + local.z * CHUNK_PLANE_SIZE as usize
    }

    /// Inverse of [`Chunk::index`].
    pub fn position_of(index: usize) -> LocalPos {
        let n = CHUNK_DIMENSION as usize;
        Point3::new(index % n, (index / n) % n, index / (n * n))
    }

    pub fn in_bounds(local: LocalPos) -> bool {
        let n = CHUNK_DIMENSION as usize;
        local.x < n && local.y < n && local.z < n
    }

    pub fn get(&self, local: LocalPos) -> T {
        self.cells[Self::index(local)]
    }

    /// Stores `value` and returns the previous value.
    pub fn set(&mut self, local: LocalPos, value: T) -> T {
        std::mem::replace(&mut self.cells[Self::index(local)], value)
    }

    /// Replaces the cell with `f(old)` and returns the new value.
    pub fn update(&mut self, local: LocalPos, f: impl FnOnce(T) -> T) -> T {
        let cell = &mut self.cells[Self::index(local)];
        *cell = f(*cell);
        *cell
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Sets every cell in the inclusive local box `min..=max` to `value`.
    pub fn fill_region(&mut self, min: LocalPos, max: LocalPos, value: T) {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                let start = Self::index(Point3::new(min.x, y, z));
                let end = Self::index(Point3::new(max.x, y, z));
                self.cells[start..=end].fill(value);
            }
        }
    }

    /// Overwrites this chunk's cells with `other`'s.
    pub fn copy_from(&mut self, other: &Chunk<T>) {
        self.cells.copy_from_slice(&other.cells);
    }

    /// Maps every cell through `f`, keeping the layout.
    pub fn transform<U: Copy>(&self, f: impl Fn(T) -> U) -> Chunk<U> {
        Chunk {
            cells: self.cells.iter().map(|cell| f(*cell)).collect(),
        }
    }

    /// Iterates over `(local position, value)` in storage order.
    pub fn iter(&self) -> ChunkIterator<'_, T> {
        ChunkIterator::new(self)
    }

    /// Raw cells in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<T: Copy + PartialEq> Chunk<T> {
    /// Whether every cell equals `value`.
    pub fn is_uniform(&self, value: T) -> bool {
        self.cells.iter().all(|cell| *cell == value)
    }
}

impl<T: Copy + Default + PartialEq> Chunk<T> {
    /// Whether every cell holds the default value, making the chunk
    /// indistinguishable from an absent one.
    pub fn is_default(&self) -> bool {
        self.is_uniform(T::default())
    }
}

impl<T: Copy + PartialEq + fmt::Debug> fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.cells[0];
        if self.is_uniform(first) {
            return f.debug_struct("Chunk").field("uniform", &first).finish();
        }
        let distinct = self
            .cells
            .iter()
            .filter(|cell| **cell != first)
            .count();
        f.debug_struct("Chunk")
            .field("first", &first)
            .field("cells_differing_from_first", &distinct)
            .finish()
    }
}
