//! Mesh generation for voxel surfaces.
//!
//! This module converts chunk voxel data into quads along the boundary between open
//! and closed space, and assembles those quads into flat vertex/index buffers.
//!
//! # Architecture
//! - [`GreedyMesher`]: lazy iterator merging coplanar unit faces of one chunk into quads
//! - [`FaceType`]: the merge-compatibility key (portalability, subdivision, winding)
//! - [`Quad`]: a merged, world-space rectangle with normal, UVs and material
//! - [`Mesh`]: per-material vertex and index buffers built from quads
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_editor_engine::{greedy_quads, Mesh, Region, Voxel, World};
//!
//! let mut world = World::new();
//! world.fill(Region::new(Point3::new(0, 0, 0), Point3::new(3, 0, 3)), Voxel::OPEN);
//! let mesh = Mesh::from_quads(greedy_quads(&world, Point3::new(0, 0, 0), 1.0));
//! assert_eq!(mesh.quad_count(), 6);
//! ```

mod face;
mod greedy;
mod mesh;
mod quad;

pub use face::FaceType;
pub use greedy::{greedy_quads, GreedyMesher};
pub use mesh::*;
pub use quad::Quad;
