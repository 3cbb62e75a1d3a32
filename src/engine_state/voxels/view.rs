//! # Voxel View Module
//!
//! A uniform read/write interface over voxel storage. The mesher and the edit
//! operations are written once against these traits and run unchanged against
//! the whole world, a single chunk, or a copy-on-write edit layer.
//!
//! ## Addressing
//!
//! * [`World`] and the edit layer address voxels by global position.
//! * [`ChunkRef`] and [`ChunkView`] address voxels relative to their chunk's
//!   origin. Positions inside `0..CHUNK_DIMENSION` hit the chunk array
//!   directly; anything outside falls back to the backing world after
//!   translating to global coordinates. Relative positions that land outside
//!   the `i32` range read as the default and ignore writes.

use cgmath::Point3;

use super::{
    chunk::Chunk,
    coords::{checked_offset, chunk_origin, ChunkPos, VoxelPos},
    region::Region,
    world::World,
};

/// Read access to voxel storage.
pub trait VoxelRead<T> {
    /// Returns the value at `pos`. Unmaterialized storage reads as the default.
    fn get(&self, pos: VoxelPos) -> T;
}

/// Read/write access to voxel storage.
pub trait VoxelView<T>: VoxelRead<T> {
    /// Stores `value` at `pos` and returns the previous value.
    fn set(&mut self, pos: VoxelPos, value: T) -> T;

    /// Replaces the value at `pos` with `f(old)` and returns the new value.
    fn update(&mut self, pos: VoxelPos, f: &dyn Fn(T) -> T) -> T;

    /// Sets every voxel in `region` to `value`.
    fn fill(&mut self, region: Region, value: T);
}

fn relative_to_local(rel: VoxelPos) -> Option<Point3<usize>> {
    let local = Point3::new(rel.x as usize, rel.y as usize, rel.z as usize);
    let in_range = rel.x >= 0 && rel.y >= 0 && rel.z >= 0;
    (in_range && Chunk::<()>::in_bounds(local)).then_some(local)
}

/// A read-only, chunk-scoped view used by the mesher.
///
/// The chunk itself may be absent from the world, in which case in-range reads
/// return the default like any other absent storage.
pub struct ChunkRef<'a, T> {
    world: &'a World<T>,
    position: ChunkPos,
    chunk: Option<&'a Chunk<T>>,
}

impl<'a, T: Copy + Default> ChunkRef<'a, T> {
    pub(super) fn new(world: &'a World<T>, position: ChunkPos) -> Self {
        ChunkRef {
            world,
            position,
            chunk: world.chunk_at(position),
        }
    }

    /// Chunk coordinate this view is scoped to.
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Global position of relative `(0, 0, 0)`.
    pub fn origin(&self) -> VoxelPos {
        chunk_origin(self.position)
    }

    /// Whether the viewed chunk exists in the world.
    pub fn is_materialized(&self) -> bool {
        self.chunk.is_some()
    }
}

impl<'a, T: Copy + Default> VoxelRead<T> for ChunkRef<'a, T> {
    fn get(&self, rel: VoxelPos) -> T {
        match relative_to_local(rel) {
            Some(local) => self.chunk.map(|chunk| chunk.get(local)).unwrap_or_default(),
            None => checked_offset(self.origin(), rel - Point3::new(0, 0, 0))
                .map(|global| self.world.get(global))
                .unwrap_or_default(),
        }
    }
}

/// A mutable, chunk-scoped view.
///
/// The chunk is taken out of the world for the lifetime of the view so it can
/// be written directly while out-of-range accesses still reach the world. It
/// is put back when the view is dropped.
pub struct ChunkView<'a, T: Copy + Default> {
    world: &'a mut World<T>,
    position: ChunkPos,
    chunk: Chunk<T>,
    materialize: bool,
}

impl<'a, T: Copy + Default> ChunkView<'a, T> {
    pub(super) fn new(world: &'a mut World<T>, position: ChunkPos) -> Self {
        let existing = world.remove_chunk(position);
        let materialize = existing.is_some();
        ChunkView {
            world,
            position,
            chunk: existing.unwrap_or_default(),
            materialize,
        }
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    pub fn origin(&self) -> VoxelPos {
        chunk_origin(self.position)
    }

    fn global(&self, rel: VoxelPos) -> Option<VoxelPos> {
        checked_offset(self.origin(), rel - Point3::new(0, 0, 0))
    }
}

impl<'a, T: Copy + Default> VoxelRead<T> for ChunkView<'a, T> {
    fn get(&self, rel: VoxelPos) -> T {
        match relative_to_local(rel) {
            Some(local) => self.chunk.get(local),
            None => self
                .global(rel)
                .map(|global| self.world.get(global))
                .unwrap_or_default(),
        }
    }
}

impl<'a, T: Copy + Default> VoxelView<T> for ChunkView<'a, T> {
    fn set(&mut self, rel: VoxelPos, value: T) -> T {
        match relative_to_local(rel) {
            Some(local) => {
                self.materialize = true;
                self.chunk.set(local, value)
            }
            None => match self.global(rel) {
                Some(global) => self.world.set(global, value),
                None => T::default(),
            },
        }
    }

    fn update(&mut self, rel: VoxelPos, f: &dyn Fn(T) -> T) -> T {
        match relative_to_local(rel) {
            Some(local) => {
                self.materialize = true;
                self.chunk.update(local, f)
            }
            None => match self.global(rel) {
                Some(global) => self.world.update(global, f),
                None => T::default(),
            },
        }
    }

    fn fill(&mut self, region: Region, value: T) {
        let Some(global) = region.clipped_translate(self.origin() - Point3::new(0, 0, 0)) else {
            return;
        };
        for chunk_pos in global.chunks() {
            if chunk_pos == self.position {
                if let Some((min, max)) = global.intersect_chunk(chunk_pos) {
                    self.materialize = true;
                    self.chunk.fill_region(min, max, value);
                }
            } else {
                self.world.fill_chunk(chunk_pos, &global, value);
            }
        }
    }
}

impl<'a, T: Copy + Default> Drop for ChunkView<'a, T> {
    fn drop(&mut self) {
        if self.materialize {
            let chunk = std::mem::take(&mut self.chunk);
            self.world.insert_chunk(self.position, chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel::Voxel;

    #[test]
    fn chunk_ref_falls_back_to_neighbours() {
        let mut world = World::new();
        world.set(Point3::new(-1, 0, 0), Voxel::OPEN);
        world.set(Point3::new(16, 2, 3), Voxel::OPEN);
        world.set(Point3::new(4, 4, 4), Voxel::OPEN);

        let view = world.read_view(Point3::new(0, 0, 0));
        assert!(view.get(Point3::new(-1, 0, 0)).is_open());
        assert!(view.get(Point3::new(16, 2, 3)).is_open());
        assert!(view.get(Point3::new(4, 4, 4)).is_open());
        assert!(!view.get(Point3::new(5, 4, 4)).is_open());
    }

    #[test]
    fn views_at_the_coordinate_limits_stay_in_range() {
        let top = Point3::new(i32::MAX, 0, 0);
        let chunk = Point3::new(i32::MAX.div_euclid(16), 0, 0);
        let mut world = World::new();
        world.set(top, Voxel::OPEN);

        let view = world.read_view(chunk);
        assert!(view.get(Point3::new(15, 0, 0)).is_open());
        assert_eq!(view.get(Point3::new(16, 0, 0)), Voxel::CLOSED);
        assert_eq!(view.get(Point3::new(i32::MAX, 0, 0)), Voxel::default());

        {
            let mut view = world.chunk_view(chunk);
            assert_eq!(view.set(Point3::new(16, 0, 0), Voxel::OPEN), Voxel::CLOSED);
            view.update(Point3::new(17, 0, 0), &|v| v.with_open(true));
            view.fill(
                Region::new(Point3::new(14, 1, 0), Point3::new(40, 1, 0)),
                Voxel::OPEN,
            );
        }
        assert!(world.get(Point3::new(i32::MAX - 1, 1, 0)).is_open());
        assert!(world.get(Point3::new(i32::MAX, 1, 0)).is_open());
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn chunk_ref_is_relative_to_its_chunk() {
        let mut world = World::new();
        world.set(Point3::new(-16, 0, 0), Voxel::OPEN);
        let view = world.read_view(Point3::new(-1, 0, 0));
        assert_eq!(view.origin(), Point3::new(-16, 0, 0));
        assert!(view.get(Point3::new(0, 0, 0)).is_open());
    }

    #[test]
    fn chunk_view_writes_land_in_world() {
        let mut world = World::new();
        {
            let mut view = world.chunk_view(Point3::new(1, 0, 0));
            view.set(Point3::new(0, 0, 0), Voxel::OPEN);
            view.set(Point3::new(-1, 0, 0), Voxel::OPEN);
            view.update(Point3::new(16, 0, 0), &|v| v.with_open(true));
        }
        assert!(world.get(Point3::new(16, 0, 0)).is_open());
        assert!(world.get(Point3::new(15, 0, 0)).is_open());
        assert!(world.get(Point3::new(32, 0, 0)).is_open());
        assert_eq!(world.chunk_count(), 3);
    }

    #[test]
    fn chunk_view_fill_spans_neighbours() {
        let mut world = World::new();
        {
            let mut view = world.chunk_view(Point3::new(0, 0, 0));
            view.fill(
                Region::new(Point3::new(14, 0, 0), Point3::new(17, 0, 0)),
                Voxel::OPEN,
            );
        }
        let open: Vec<i32> = (10..20)
            .filter(|x| world.get(Point3::new(*x, 0, 0)).is_open())
            .collect();
        assert_eq!(open, vec![14, 15, 16, 17]);
    }

    #[test]
    fn untouched_chunk_view_does_not_materialize() {
        let mut world: World<Voxel> = World::new();
        {
            let view = world.chunk_view(Point3::new(3, 3, 3));
            assert!(!view.get(Point3::new(0, 0, 0)).is_open());
        }
        assert_eq!(world.chunk_count(), 0);
    }
}
