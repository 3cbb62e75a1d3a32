//! Surface extraction for the voxel editor.
//!
//! This module turns committed voxel data into geometry: the greedy mesher, the
//! vertex format and mesh buffers built from its quads, the mesh cache and the
//! background tasks that keep it up to date after edits.

pub mod meshing;
pub mod tasks;
mod vertex;

pub use vertex::Vertex;
