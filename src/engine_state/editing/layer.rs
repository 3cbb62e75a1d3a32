//! # Modified World Layer
//!
//! A copy-on-write overlay over a borrowed [`World`]. Commands write through the
//! layer exactly as they would write to the world, but the world itself is only
//! touched once the command has finished and its changes are committed.
//!
//! ## Lifecycle
//!
//! 1. [`ModifiedWorldLayer::new`] borrows the committed world immutably
//! 2. Writes clone the affected chunk into the overlay on first use
//! 3. [`ModifiedWorldLayer::finish`] ends the borrow and yields the [`LayerChanges`]
//! 4. [`LayerChanges::commit`] swaps the overlay chunks into the world and returns
//!    the pre- and post-images the command needs for undo and redo
//!
//! Besides the chunks it changed, the layer records every neighbouring chunk that
//! shares a face with a written voxel, since those need remeshing too.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::engine_state::voxels::{
    chunk::{Chunk, CHUNK_DIMENSION},
    coords::{split, ChunkPos, LocalPos, VoxelPos},
    region::Region,
    view::{VoxelRead, VoxelView},
    voxel::{direction::Direction, Voxel},
    world::World,
};

/// Copy-on-write edit overlay. See the module documentation.
pub struct ModifiedWorldLayer<'w> {
    world: &'w World,
    chunks: HashMap<ChunkPos, Chunk>,
    touched: HashSet<ChunkPos>,
    adjoining: HashSet<ChunkPos>,
}

impl<'w> ModifiedWorldLayer<'w> {
    pub fn new(world: &'w World) -> Self {
        ModifiedWorldLayer {
            world,
            chunks: HashMap::new(),
            touched: HashSet::new(),
            adjoining: HashSet::new(),
        }
    }

    /// The committed world underneath the overlay.
    pub fn world(&self) -> &'w World {
        self.world
    }

    /// Chunks written through this layer.
    pub fn touched(&self) -> &HashSet<ChunkPos> {
        &self.touched
    }

    /// Neighbours sharing a face with a written voxel.
    pub fn adjoining(&self) -> &HashSet<ChunkPos> {
        &self.adjoining
    }

    /// The overlay copy of `position`, cloned from the world on first write.
    fn chunk_mut(&mut self, position: ChunkPos) -> &mut Chunk {
        let world = self.world;
        self.chunks
            .entry(position)
            .or_insert_with(|| world.chunk_at(position).cloned().unwrap_or_default())
    }

    /// Records a write covering the inclusive local box `min..=max` of `chunk`.
    fn record_write(&mut self, chunk: ChunkPos, min: LocalPos, max: LocalPos) {
        let last = CHUNK_DIMENSION as usize - 1;
        self.touched.insert(chunk);
        for direction in Direction::all() {
            let axis = direction.axis().index();
            let on_face = if direction.is_positive() {
                max[axis] == last
            } else {
                min[axis] == 0
            };
            if on_face {
                self.adjoining.insert(chunk + direction.offset());
            }
        }
    }

    /// Ends the edit, releasing the borrow of the world.
    pub fn finish(self) -> LayerChanges {
        LayerChanges {
            chunks: self.chunks,
            touched: self.touched,
            adjoining: self.adjoining,
        }
    }
}

impl<'w> VoxelRead<Voxel> for ModifiedWorldLayer<'w> {
    fn get(&self, pos: VoxelPos) -> Voxel {
        let (chunk, local) = split(pos);
        match self.chunks.get(&chunk) {
            Some(overlay) => overlay.get(local),
            None => self.world.get(pos),
        }
    }
}

impl<'w> VoxelView<Voxel> for ModifiedWorldLayer<'w> {
    fn set(&mut self, pos: VoxelPos, value: Voxel) -> Voxel {
        let (chunk, local) = split(pos);
        self.record_write(chunk, local, local);
        self.chunk_mut(chunk).set(local, value)
    }

    fn update(&mut self, pos: VoxelPos, f: &dyn Fn(Voxel) -> Voxel) -> Voxel {
        let (chunk, local) = split(pos);
        self.record_write(chunk, local, local);
        self.chunk_mut(chunk).update(local, f)
    }

    fn fill(&mut self, region: Region, value: Voxel) {
        for chunk in region.chunks() {
            let Some((min, max)) = region.intersect_chunk(chunk) else {
                continue;
            };
            self.record_write(chunk, min, max);
            if region.covers_chunk(chunk) {
                self.chunks.insert(chunk, Chunk::filled(value));
            } else {
                self.chunk_mut(chunk).fill_region(min, max, value);
            }
        }
    }
}

/// The outcome of a finished layer, not yet committed.
#[derive(Debug)]
pub struct LayerChanges {
    chunks: HashMap<ChunkPos, Chunk>,
    touched: HashSet<ChunkPos>,
    adjoining: HashSet<ChunkPos>,
}

impl LayerChanges {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Writes every overlay chunk into `world`.
    ///
    /// # Returns
    /// The chunk images before and after the commit. Chunks that did not exist
    /// before are recorded as default chunks.
    pub fn commit(self, world: &mut World) -> ChunkSnapshots {
        let mut pre_images = HashMap::with_capacity(self.chunks.len());
        let mut post_images = HashMap::with_capacity(self.chunks.len());

        for (position, chunk) in self.chunks {
            let previous = world.insert_chunk(position, chunk.clone());
            pre_images.insert(position, previous.unwrap_or_default());
            post_images.insert(position, chunk);
        }

        debug!(
            "Committed {} chunks ({} adjoining)",
            post_images.len(),
            self.adjoining.len()
        );

        ChunkSnapshots {
            pre_images,
            post_images,
            touched: self.touched,
            adjoining: self.adjoining,
        }
    }
}

/// Whole-chunk images recorded when an edit was committed.
///
/// Undo and redo replay these images verbatim instead of re-running the edit,
/// so they restore the exact prior state.
#[derive(Debug, Clone, Default)]
pub struct ChunkSnapshots {
    pre_images: HashMap<ChunkPos, Chunk>,
    post_images: HashMap<ChunkPos, Chunk>,
    touched: HashSet<ChunkPos>,
    adjoining: HashSet<ChunkPos>,
}

impl ChunkSnapshots {
    /// Writes the pre-images back into `world`.
    pub fn restore_pre(&self, world: &mut World) {
        for (position, chunk) in &self.pre_images {
            world.insert_chunk(*position, chunk.clone());
        }
    }

    /// Writes the post-images back into `world`.
    pub fn restore_post(&self, world: &mut World) {
        for (position, chunk) in &self.post_images {
            world.insert_chunk(*position, chunk.clone());
        }
    }

    pub fn pre_image(&self, position: ChunkPos) -> Option<&Chunk> {
        self.pre_images.get(&position)
    }

    pub fn post_image(&self, position: ChunkPos) -> Option<&Chunk> {
        self.post_images.get(&position)
    }

    /// Chunks whose meshes may have changed: the touched chunks and their
    /// face-adjacent neighbours.
    pub fn affected_chunks(&self) -> HashSet<ChunkPos> {
        self.touched.union(&self.adjoining).copied().collect()
    }

    pub fn touched(&self) -> &HashSet<ChunkPos> {
        &self.touched
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn writes_are_isolated_until_committed() {
        let mut world = World::new();
        world.set(Point3::new(1, 1, 1), Voxel::OPEN);

        let changes = {
            let mut layer = ModifiedWorldLayer::new(&world);
            layer.set(Point3::new(2, 2, 2), Voxel::OPEN);
            layer.set(Point3::new(1, 1, 1), Voxel::CLOSED);

            assert!(layer.get(Point3::new(2, 2, 2)).is_open());
            assert!(!layer.get(Point3::new(1, 1, 1)).is_open());
            assert!(!world.get(Point3::new(2, 2, 2)).is_open());
            assert!(world.get(Point3::new(1, 1, 1)).is_open());
            layer.finish()
        };

        let snapshots = changes.commit(&mut world);
        assert!(world.get(Point3::new(2, 2, 2)).is_open());
        assert!(!world.get(Point3::new(1, 1, 1)).is_open());

        let chunk = Point3::new(0, 0, 0);
        assert!(snapshots.pre_image(chunk).is_some_and(|c| c.get(Point3::new(1, 1, 1)).is_open()));
        assert!(snapshots.post_image(chunk).is_some_and(|c| c.get(Point3::new(2, 2, 2)).is_open()));
    }

    #[test]
    fn reads_fall_through_to_the_world() {
        let mut world = World::new();
        world.set(Point3::new(-20, 3, 40), Voxel::OPEN.with_subdivision(2));
        let layer = ModifiedWorldLayer::new(&world);
        assert_eq!(layer.get(Point3::new(-20, 3, 40)).subdivision(), 2);
        assert!(layer.touched().is_empty());
    }

    #[test]
    fn boundary_writes_mark_adjoining_chunks() {
        let world = World::new();
        let mut layer = ModifiedWorldLayer::new(&world);

        layer.set(Point3::new(5, 5, 5), Voxel::OPEN);
        assert!(layer.adjoining().is_empty());

        layer.set(Point3::new(0, 15, 7), Voxel::OPEN);
        let expected: HashSet<_> = [Point3::new(-1, 0, 0), Point3::new(0, 1, 0)].into();
        assert_eq!(layer.adjoining(), &expected);

        layer.update(Point3::new(-1, 0, 0), &|v| v.with_open(true));
        assert!(layer.touched().contains(&Point3::new(-1, 0, 0)));
        assert!(layer.adjoining().contains(&Point3::new(0, 0, 0)));
        assert!(layer.adjoining().contains(&Point3::new(-1, -1, 0)));
        assert!(layer.adjoining().contains(&Point3::new(-1, 0, -1)));
    }

    #[test]
    fn fill_bookkeeping_matches_individual_sets() {
        let world = World::new();
        let mut rng = fastrand::Rng::with_seed(11);

        for _ in 0..10 {
            let a = Point3::new(rng.i32(-20..36), rng.i32(-20..36), rng.i32(-20..36));
            let b = Point3::new(rng.i32(-20..36), rng.i32(-20..36), rng.i32(-20..36));
            let region = Region::new(a, b);

            let mut filled = ModifiedWorldLayer::new(&world);
            filled.fill(region, Voxel::OPEN);

            let mut stepped = ModifiedWorldLayer::new(&world);
            for position in region.iter() {
                stepped.set(position, Voxel::OPEN);
            }

            assert_eq!(filled.touched(), stepped.touched());
            assert_eq!(filled.adjoining(), stepped.adjoining());

            let filled = filled.finish();
            let stepped = stepped.finish();
            assert_eq!(filled.chunks, stepped.chunks);
        }
    }

    #[test]
    fn absent_chunks_snapshot_as_default() {
        let mut world = World::new();
        let mut layer = ModifiedWorldLayer::new(&world);
        layer.fill(
            Region::new(Point3::new(16, 0, 0), Point3::new(31, 15, 15)),
            Voxel::OPEN,
        );
        let snapshots = layer.finish().commit(&mut world);
        assert!(snapshots
            .pre_image(Point3::new(1, 0, 0))
            .is_some_and(|chunk| chunk.is_default()));

        snapshots.restore_pre(&mut world);
        assert_eq!(world, World::new());
        snapshots.restore_post(&mut world);
        assert!(world.get(Point3::new(20, 4, 4)).is_open());
    }
}
