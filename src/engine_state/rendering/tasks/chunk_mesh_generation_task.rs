//! Background remeshing of a single chunk.
//!
//! This module contains the `ChunkMeshGenerationTask`, which runs the greedy mesher
//! for one chunk on a worker so the editor stays responsive while edits are remeshed.

use std::time::Duration;

use log::debug;
use web_time::Instant;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::{greedy_quads, Mesh, MeshCache},
        task_management::task::{Task, TaskResult},
        voxels::{coords::ChunkPos, world::World},
    },
};

/// A task that generates the mesh of one chunk in a background thread.
///
/// The world read lock is held for the whole meshing pass, so the mesh reflects
/// one consistent snapshot and no edit can interleave with it.
pub struct ChunkMeshGenerationTask {
    /// Shared handle to the committed world
    world: MtResource<World>,
    /// The chunk to mesh
    chunk: ChunkPos,
    /// Chunk generation this job was scheduled for
    generation: u64,
    /// UV scale handed to the mesher
    texel_scale: f32,
}

impl ChunkMeshGenerationTask {
    /// Describes one remesh job.
    ///
    /// # Arguments
    /// * `world` - Shared handle to the committed world
    /// * `chunk` - The chunk to mesh
    /// * `generation` - Generation returned by [`MeshCache::invalidate`] for this chunk
    /// * `texel_scale` - UV scale handed to the mesher
    pub fn new(world: MtResource<World>, chunk: ChunkPos, generation: u64, texel_scale: f32) -> Self {
        ChunkMeshGenerationTask {
            world,
            chunk,
            generation,
            texel_scale,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let start = Instant::now();
        let mesh = {
            let world = self.world.get();
            Mesh::from_quads(greedy_quads(&world, self.chunk, self.texel_scale))
        };
        let elapsed = start.elapsed();
        debug!(
            "Greedy meshing chunk {:?} took {:?}",
            self.chunk, elapsed
        );

        Box::new(ChunkMeshGenerationTaskResult {
            chunk: self.chunk,
            generation: self.generation,
            mesh,
            elapsed,
        })
    }
}

/// A finished chunk mesh on its way back to the cache.
pub struct ChunkMeshGenerationTaskResult {
    chunk: ChunkPos,
    generation: u64,
    mesh: Mesh,
    elapsed: Duration,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Stores the mesh in the cache; stale results are dropped there.
    fn handle_result(self: Box<Self>, mesh_cache: &mut MeshCache) -> Vec<Box<dyn Task + Send>> {
        mesh_cache.insert(self.chunk, self.generation, self.mesh, self.elapsed);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::voxel::Voxel;

    #[test]
    fn meshes_a_world_snapshot() {
        let world = MtResource::new(World::new());
        world.get_mut().set(Point3::new(1, 2, 3), Voxel::OPEN);

        let mut cache = MeshCache::new(4);
        let chunk = Point3::new(0, 0, 0);
        let generation = cache.invalidate(chunk);

        let task = ChunkMeshGenerationTask::new(world.clone(), chunk, generation, 1.0);
        let follow_ups = task.process().handle_result(&mut cache);

        assert!(follow_ups.is_empty());
        assert!(cache.is_current(chunk));
        assert_eq!(cache.peek(chunk).map(|cached| cached.mesh.quad_count()), Some(6));
    }
}
