//! Background tasks for the meshing system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: greedy-meshes one chunk against a snapshot of the world

pub mod chunk_mesh_generation_task;
