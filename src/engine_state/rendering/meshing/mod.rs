//! Mesh generation and caching for voxel surfaces.
//!
//! This module owns the conversion of committed voxel data into meshes and keeps
//! the finished meshes around for the consumer that draws or collides with them.
//!
//! # Architecture
//! - `mesh/`: the greedy mesher and the quad/mesh types it produces
//! - `MeshCache`: finished chunk meshes in an LRU, with per-chunk generation stamps
//!
//! # Generation Stamps
//! Meshes are built on worker threads while the editor keeps working. Every edit
//! that affects a chunk bumps that chunk's generation; a mesh job records the
//! generation it was scheduled for, and its result is discarded if the chunk has
//! moved on since. A stale mesh can therefore never overwrite a newer one.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

use log::{debug, warn};
use lru::LruCache;

mod mesh;

pub use mesh::*;

use crate::engine_state::voxels::coords::ChunkPos;

/// A finished mesh and the bookkeeping it was built with.
#[derive(Debug, Clone)]
pub struct CachedMesh {
    /// The chunk's geometry, batched by material
    pub mesh: Mesh,
    /// Generation of the chunk the mesh was built from
    pub generation: u64,
    /// Time spent meshing on the worker
    pub elapsed: Duration,
}

/// Generation bookkeeping for one chunk.
#[derive(Debug, Clone, Copy, Default)]
struct Stamp {
    generation: u64,
    /// Remesh jobs scheduled but not yet handed back
    pending: usize,
}

/// Least-recently-used store of finished chunk meshes.
///
/// Capacity bounds the meshes kept. A chunk's generation stamp lives while it
/// has a cached mesh or a remesh job in flight, so the stamps are bounded by
/// the capacity plus the jobs outstanding.
pub struct MeshCache {
    meshes: LruCache<ChunkPos, CachedMesh>,
    stamps: HashMap<ChunkPos, Stamp>,
}

impl MeshCache {
    /// Creates a cache holding at most `capacity` meshes (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MeshCache {
            meshes: LruCache::new(capacity),
            stamps: HashMap::new(),
        }
    }

    /// Current generation of a chunk. Chunks with no cached mesh and no
    /// remesh in flight are at 0.
    pub fn generation(&self, chunk: ChunkPos) -> u64 {
        self.stamps.get(&chunk).map_or(0, |stamp| stamp.generation)
    }

    /// Marks a chunk's mesh as outdated.
    ///
    /// Every call must be answered by exactly one [`MeshCache::insert`] for the
    /// returned generation, stale or not.
    ///
    /// # Returns
    /// The new generation a remesh job must be scheduled with.
    pub fn invalidate(&mut self, chunk: ChunkPos) -> u64 {
        let stamp = self.stamps.entry(chunk).or_default();
        stamp.generation += 1;
        stamp.pending += 1;
        stamp.generation
    }

    /// Stores a finished mesh unless a newer edit has invalidated it.
    ///
    /// # Returns
    /// `true` if the mesh was stored, `false` if it was discarded as stale.
    pub fn insert(&mut self, chunk: ChunkPos, generation: u64, mesh: Mesh, elapsed: Duration) -> bool {
        let current = match self.stamps.get_mut(&chunk) {
            Some(stamp) => {
                stamp.pending = stamp.pending.saturating_sub(1);
                stamp.generation
            }
            None => 0,
        };
        if generation < current {
            warn!(
                "Discarding stale mesh for chunk {:?} (generation {} < {})",
                chunk, generation, current
            );
            self.forget_if_idle(chunk);
            return false;
        }

        debug!(
            "Cached mesh for chunk {:?}: {} quads in {:?}",
            chunk,
            mesh.quad_count(),
            elapsed
        );
        if let Some((evicted, _)) = self.meshes.push(
            chunk,
            CachedMesh {
                mesh,
                generation,
                elapsed,
            },
        ) {
            if evicted != chunk {
                debug!("Evicted mesh for chunk {:?}", evicted);
                self.forget_if_idle(evicted);
            }
        }
        self.forget_if_idle(chunk);
        true
    }

    /// Drops the stamp of a chunk with no cached mesh and no job in flight.
    ///
    /// A later invalidation restarts the chunk at generation 1, which is safe
    /// because no older result can still arrive.
    fn forget_if_idle(&mut self, chunk: ChunkPos) {
        let idle = self
            .stamps
            .get(&chunk)
            .is_some_and(|stamp| stamp.pending == 0 && !self.meshes.contains(&chunk));
        if idle {
            self.stamps.remove(&chunk);
        }
    }

    /// The cached mesh for a chunk, marking it as recently used.
    ///
    /// The mesh may be older than the chunk's latest edit; see [`MeshCache::is_current`].
    pub fn get(&mut self, chunk: ChunkPos) -> Option<&CachedMesh> {
        self.meshes.get(&chunk)
    }

    /// Like [`MeshCache::get`] without touching the recency order.
    pub fn peek(&self, chunk: ChunkPos) -> Option<&CachedMesh> {
        self.meshes.peek(&chunk)
    }

    /// Whether the cached mesh reflects the chunk's latest edit.
    pub fn is_current(&self, chunk: ChunkPos) -> bool {
        self.peek(chunk)
            .is_some_and(|cached| cached.generation == self.generation(chunk))
    }

    pub fn remove(&mut self, chunk: ChunkPos) -> Option<CachedMesh> {
        let removed = self.meshes.pop(&chunk);
        self.forget_if_idle(chunk);
        removed
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Chunks with a cached mesh, most recently used first.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.meshes.iter().map(|(chunk, _)| *chunk)
    }
}
