//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of the edited
//! level. It is the committed state that edit commands write into and that the
//! mesher reads from.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach: only chunks that have been written
//! are kept in memory. A missing chunk is indistinguishable from a chunk full
//! of default voxels; reads treat it that way and writes materialize it on
//! demand.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - Box fills replace fully covered chunks wholesale instead of walking them
//! - Fully default chunks can be pruned after an edit to keep the map small

use std::collections::HashMap;

use cgmath::Point3;

use super::{
    chunk::{Chunk, CHUNK_DIMENSION},
    coords::{chunk_origin, split, ChunkPos, VoxelPos},
    region::Region,
    view::{ChunkRef, ChunkView, VoxelRead, VoxelView},
    voxel::Voxel,
};

/// Represents a voxel world composed of multiple chunks.
///
/// The world is stored as a sparse 3D grid of chunks, where each chunk is a
/// 16x16x16 collection of cells.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_editor_engine::{Voxel, World};
///
/// let mut world = World::new();
/// world.set(Point3::new(-1, 0, 0), Voxel::OPEN);
///
/// assert!(world.get(Point3::new(-1, 0, 0)).is_open());
/// assert!(!world.get(Point3::new(0, 0, 0)).is_open());
/// ```
#[derive(Clone)]
pub struct World<T = Voxel> {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkPos, Chunk<T>>,
}

impl<T: Copy + Default> Default for World<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> World<T> {
    /// Creates a new, empty world.
    ///
    /// # Returns
    ///
    /// A new `World` instance with no chunks materialized.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Number of materialized chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn contains_chunk(&self, position: ChunkPos) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Retrieves the chunk at the specified chunk coordinates, if materialized.
    pub fn chunk_at(&self, position: ChunkPos) -> Option<&Chunk<T>> {
        self.chunks.get(&position)
    }

    /// Retrieves the chunk at `position`, creating a default one if absent.
    pub fn chunk_at_mut(&mut self, position: ChunkPos) -> &mut Chunk<T> {
        self.chunks.entry(position).or_default()
    }

    /// Stores `chunk` at `position`, returning whatever was there before.
    pub fn insert_chunk(&mut self, position: ChunkPos, chunk: Chunk<T>) -> Option<Chunk<T>> {
        self.chunks.insert(position, chunk)
    }

    pub fn remove_chunk(&mut self, position: ChunkPos) -> Option<Chunk<T>> {
        self.chunks.remove(&position)
    }

    /// Positions of all materialized chunks, in no particular order.
    pub fn chunk_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// All materialized chunks with their positions, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkPos, &Chunk<T>)> + '_ {
        self.chunks.iter().map(|(position, chunk)| (*position, chunk))
    }

    /// Returns the value at global `pos`, or the default if its chunk is absent.
    pub fn get(&self, pos: VoxelPos) -> T {
        let (chunk, local) = split(pos);
        self.chunks
            .get(&chunk)
            .map(|chunk| chunk.get(local))
            .unwrap_or_default()
    }

    /// Stores `value` at global `pos` and returns the previous value.
    pub fn set(&mut self, pos: VoxelPos, value: T) -> T {
        let (chunk, local) = split(pos);
        self.chunk_at_mut(chunk).set(local, value)
    }

    /// Replaces the value at `pos` with `f(old)` and returns the new value.
    pub fn update(&mut self, pos: VoxelPos, f: impl FnOnce(T) -> T) -> T {
        let (chunk, local) = split(pos);
        self.chunk_at_mut(chunk).update(local, f)
    }

    /// Sets every voxel in `region` to `value`.
    ///
    /// Chunks entirely inside the region are replaced by a uniformly filled
    /// chunk; only the partially covered border chunks are written cell by
    /// cell.
    pub fn fill(&mut self, region: Region, value: T) {
        for chunk in region.chunks() {
            self.fill_chunk(chunk, &region, value);
        }
    }

    /// Fills the part of `region` that lies in `chunk`.
    pub(crate) fn fill_chunk(&mut self, chunk: ChunkPos, region: &Region, value: T) {
        if region.covers_chunk(chunk) {
            self.chunks.insert(chunk, Chunk::filled(value));
        } else if let Some((min, max)) = region.intersect_chunk(chunk) {
            self.chunk_at_mut(chunk).fill_region(min, max, value);
        }
    }

    /// Maps every cell through `f`, keeping the sparse structure.
    ///
    /// Absent chunks stay absent, so they read as `U::default()` in the result
    /// regardless of what `f(T::default())` would be.
    pub fn transform<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> World<U> {
        World {
            chunks: self
                .chunks
                .iter()
                .map(|(position, chunk)| (*position, chunk.transform(&f)))
                .collect(),
        }
    }

    /// Voxel bounds of the materialized chunks as `(inclusive min, exclusive max)`.
    ///
    /// The exclusive end saturates at `i32::MAX` for chunks at the top of the
    /// coordinate range. Returns `None` for a world with no chunks.
    pub fn bounds(&self) -> Option<(VoxelPos, VoxelPos)> {
        let mut positions = self.chunks.keys();
        let first = *positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), pos| {
            (
                Point3::new(min.x.min(pos.x), min.y.min(pos.y), min.z.min(pos.z)),
                Point3::new(max.x.max(pos.x), max.y.max(pos.y), max.z.max(pos.z)),
            )
        });
        let end = chunk_origin(max);
        Some((
            chunk_origin(min),
            Point3::new(
                end.x.saturating_add(CHUNK_DIMENSION),
                end.y.saturating_add(CHUNK_DIMENSION),
                end.z.saturating_add(CHUNK_DIMENSION),
            ),
        ))
    }

    /// A read-only view scoped to one chunk, used for meshing.
    pub fn read_view(&self, chunk: ChunkPos) -> ChunkRef<'_, T> {
        ChunkRef::new(self, chunk)
    }

    /// A mutable view scoped to one chunk.
    pub fn chunk_view(&mut self, chunk: ChunkPos) -> ChunkView<'_, T> {
        ChunkView::new(self, chunk)
    }
}

impl<T: Copy + Default + PartialEq> World<T> {
    /// Drops any of the given chunks that hold only default values.
    ///
    /// Returns the number of chunks removed. Reads are unaffected.
    pub fn prune_default_chunks(&mut self, positions: impl IntoIterator<Item = ChunkPos>) -> usize {
        let mut pruned = 0;
        for position in positions {
            if self.chunks.get(&position).is_some_and(|chunk| chunk.is_default()) {
                self.chunks.remove(&position);
                pruned += 1;
            }
        }
        if pruned > 0 {
            log::debug!("Pruned {} default chunks", pruned);
        }
        pruned
    }
}

/// Worlds compare by content: an absent chunk equals a default chunk.
impl<T: Copy + Default + PartialEq> PartialEq for World<T> {
    fn eq(&self, other: &Self) -> bool {
        let matches = |a: &World<T>, b: &World<T>| {
            a.chunks.iter().all(|(position, chunk)| match b.chunks.get(position) {
                Some(other) => chunk == other,
                None => chunk.is_default(),
            })
        };
        matches(self, other) && matches(other, self)
    }
}

impl<T: Copy + Default> VoxelRead<T> for World<T> {
    fn get(&self, pos: VoxelPos) -> T {
        World::get(self, pos)
    }
}

impl<T: Copy + Default> VoxelView<T> for World<T> {
    fn set(&mut self, pos: VoxelPos, value: T) -> T {
        World::set(self, pos, value)
    }

    fn update(&mut self, pos: VoxelPos, f: &dyn Fn(T) -> T) -> T {
        World::update(self, pos, f)
    }

    fn fill(&mut self, region: Region, value: T) {
        World::fill(self, region, value)
    }
}

impl<T> std::fmt::Debug for World<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_pos(rng: &mut fastrand::Rng) -> VoxelPos {
        Point3::new(rng.i32(-40..40), rng.i32(-40..40), rng.i32(-40..40))
    }

    #[test]
    fn set_then_get_returns_value() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut world = World::new();
        for _ in 0..500 {
            let pos = random_pos(&mut rng);
            let value = Voxel::new(rng.bool()).with_subdivision(rng.u8(0..3));
            world.set(pos, value);
            assert_eq!(world.get(pos), value);
        }
    }

    #[test]
    fn absent_chunks_read_as_default() {
        let world: World = World::new();
        assert_eq!(world.get(Point3::new(1000, -1000, 7)), Voxel::default());
        assert_eq!(world.chunk_count(), 0);
        assert_eq!(world.bounds(), None);
    }

    #[test]
    fn fill_changes_exactly_the_box() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..20 {
            let mut world = World::new();
            let region = Region::new(random_pos(&mut rng), random_pos(&mut rng));
            world.fill(region, Voxel::OPEN);

            for _ in 0..500 {
                let pos = random_pos(&mut rng);
                assert_eq!(world.get(pos).is_open(), region.contains(pos), "{:?}", pos);
            }
            assert!(world.get(region.min()).is_open());
            assert!(world.get(region.max()).is_open());
        }
    }

    #[test]
    fn fill_preserves_outside_values() {
        let mut world = World::new();
        let outside = Point3::new(-1, 5, 5);
        world.set(outside, Voxel::OPEN.with_subdivision(1));
        world.fill(
            Region::new(Point3::new(0, 0, 0), Point3::new(40, 40, 40)),
            Voxel::OPEN,
        );
        assert_eq!(world.get(outside), Voxel::OPEN.with_subdivision(1));
        assert!(world.chunk_at(Point3::new(1, 1, 1)).unwrap().is_uniform(Voxel::OPEN));
    }

    #[test]
    fn bounds_cover_materialized_chunks() {
        let mut world = World::new();
        world.set(Point3::new(-1, 0, 0), Voxel::OPEN);
        world.set(Point3::new(20, 33, 0), Voxel::OPEN);
        assert_eq!(
            world.bounds(),
            Some((Point3::new(-16, 0, 0), Point3::new(32, 48, 16)))
        );
    }

    #[test]
    fn bounds_saturate_at_the_coordinate_limits() {
        let mut world = World::new();
        world.set(Point3::new(i32::MAX, 0, i32::MIN), Voxel::OPEN);
        assert_eq!(
            world.bounds(),
            Some((
                Point3::new(i32::MAX - 15, 0, i32::MIN),
                Point3::new(i32::MAX, 16, i32::MIN + 16)
            ))
        );
        assert!(world.get(Point3::new(i32::MAX, 0, i32::MIN)).is_open());
    }

    #[test]
    fn transform_maps_values() {
        let mut world = World::new();
        world.set(Point3::new(3, -3, 3), Voxel::OPEN.with_subdivision(2));
        let levels: World<u8> = world.transform(|voxel| voxel.subdivision());
        assert_eq!(levels.get(Point3::new(3, -3, 3)), 2);
        assert_eq!(levels.get(Point3::new(0, 0, 0)), 0);
        assert_eq!(levels.chunk_count(), world.chunk_count());
    }

    #[test]
    fn equality_ignores_default_chunks() {
        let mut a = World::new();
        let b = World::new();
        a.set(Point3::new(0, 0, 0), Voxel::CLOSED);
        assert_eq!(a.chunk_count(), 1);
        assert_eq!(a, b);

        a.set(Point3::new(0, 0, 0), Voxel::OPEN);
        assert_ne!(a, b);
    }

    #[test]
    fn pruning_removes_only_default_chunks() {
        let mut world = World::new();
        world.set(Point3::new(0, 0, 0), Voxel::OPEN);
        world.set(Point3::new(0, 0, 0), Voxel::CLOSED);
        world.set(Point3::new(16, 0, 0), Voxel::OPEN);

        let before = world.clone();
        let pruned = world.prune_default_chunks(world.chunk_positions().collect::<Vec<_>>());
        assert_eq!(pruned, 1);
        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world, before);
    }

    #[test]
    fn update_reads_and_writes() {
        let mut world = World::new();
        let pos = Point3::new(-17, 2, 40);
        let new = world.update(pos, |voxel: Voxel| voxel.with_open(true).with_subdivision(1));
        assert_eq!(world.get(pos), new);
        assert!(new.is_open());
    }
}
