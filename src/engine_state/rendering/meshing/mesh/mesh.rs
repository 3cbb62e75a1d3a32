//! Mesh data structures for meshed voxel surfaces.
//!
//! This module turns the quads produced by the greedy mesher into flat vertex and
//! index buffers, one batch per material so a consumer can bind each material
//! once and draw its batch in a single call.

use super::{face::FaceType, quad::Quad};
use crate::engine_state::rendering::Vertex;

/// The vertices and indices of every quad sharing one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBatch {
    /// The vertex data for this batch
    pub vertices: Vec<Vertex>,
    /// The index data for this batch, two triangles per quad
    pub indices: Vec<u32>,
    /// The material all quads in this batch share
    pub material: u32,
}

impl MeshBatch {
    /// Creates a new, empty batch for `material`.
    pub fn new(material: u32) -> Self {
        MeshBatch {
            vertices: Vec::new(),
            indices: Vec::new(),
            material,
        }
    }

    /// Number of quads in this batch.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends a quad, keeping its winding.
    pub fn push_quad(&mut self, quad: &Quad) {
        let num_faces_generated = self.quad_count() as u32;
        self.vertices.extend(Mesh::generate_face_vertices(quad));
        self.indices.extend(Mesh::generate_face_indices(num_faces_generated));
    }
}

/// A complete mesh for one chunk, batched by material.
///
/// The batch array is indexed by [`FaceType::material`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// One batch per material, in material order
    pub batches: Vec<MeshBatch>,
}

impl Default for Mesh {
    fn default() -> Self {
        Mesh::new()
    }
}

impl Mesh {
    /// Creates a new, empty mesh with a batch for every material.
    pub fn new() -> Self {
        Mesh {
            batches: (0..FaceType::MATERIAL_COUNT as u32).map(MeshBatch::new).collect(),
        }
    }

    /// Builds a mesh from a sequence of quads.
    ///
    /// # Arguments
    /// * `quads` - Quads in any order; they are appended to their material's batch
    pub fn from_quads(quads: impl IntoIterator<Item = Quad>) -> Self {
        let mut mesh = Mesh::new();
        for quad in quads {
            mesh.push_quad(&quad);
        }
        mesh
    }

    /// Appends a quad to its material's batch, growing the batch list for
    /// materials beyond the known range.
    pub fn push_quad(&mut self, quad: &Quad) {
        let material = quad.material as usize;
        while self.batches.len() <= material {
            let next = self.batches.len() as u32;
            self.batches.push(MeshBatch::new(next));
        }
        self.batches[material].push_quad(quad);
    }

    /// Total quads across every batch.
    pub fn quad_count(&self) -> usize {
        self.batches.iter().map(MeshBatch::quad_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|batch| batch.vertices.is_empty())
    }

    /// Generates vertex data for a single quad.
    ///
    /// # Returns
    /// The four corners of the quad in its winding order.
    pub fn generate_face_vertices(quad: &Quad) -> [Vertex; 4] {
        [0, 1, 2, 3].map(|i| Vertex::new(quad.positions[i], quad.normal, quad.uvs[i], quad.material))
    }

    /// Generates index data for a quad, adjusted by the number of previously generated quads.
    ///
    /// # Arguments
    /// * `num_faces_generated` - The number of quads already in the batch
    ///
    /// # Returns
    /// Six indices forming the triangles `(0, 1, 2)` and `(0, 2, 3)` of the quad.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }

    /// Gets the number of vertices for each material batch.
    pub fn get_vertex_lens(&self) -> Vec<u64> {
        self.batches
            .iter()
            .map(|batch| batch.vertices.len() as u64)
            .collect()
    }
}
