//! Vertex data structures for meshed voxel surfaces.
//!
//! This module defines the flat vertex format produced from mesher quads. It is
//! plain old data so buffers can be handed to any renderer or collision builder
//! as raw bytes.

use cgmath::{Point3, Vector3};

/// A single corner of a meshed quad.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Material: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    position: [f32; 3],
    /// Unit surface normal
    normal: [f32; 3],
    /// Texture coordinates, already scaled by texel scale and subdivision
    tex_coords: [f32; 2],
    /// Material index of the quad this vertex belongs to
    material: u32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - The position of the vertex in world space
    /// * `normal` - The surface normal
    /// * `tex_coords` - Texture coordinates
    /// * `material` - Material index
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coords: [f32; 2], material: u32) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
            material,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position.into()
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }

    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }

    pub fn material(&self) -> u32 {
        self.material
    }
}
