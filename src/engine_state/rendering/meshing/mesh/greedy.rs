//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces of the same [`FaceType`] into larger quads, reducing the number of vertices
//! needed to draw the surface between open and closed space.
//!
//! # Algorithm
//! For each of the three axes and both sweep directions along it, and for each face
//! type, a plane is swept through the chunk. At every plane a 2D bit mask records the
//! cells whose open voxel borders a closed voxel one step further along the sweep
//! direction. The mask is then consumed in row-major order: each unconsumed cell grows
//! a rectangle first along `u`, then along `v`, and the covered cells are cleared.
//!
//! # Ownership
//! A face belongs to the chunk holding its open voxel. Neighbouring voxels outside the
//! chunk are read through the view, but faces whose open voxel lies outside are left
//! to the neighbour, so meshing every chunk yields every face exactly once.

use std::collections::VecDeque;

use bitvec::vec::BitVec;
use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    chunk::CHUNK_DIMENSION,
    coords::{ChunkPos, VoxelPos},
    view::{ChunkRef, VoxelRead},
    voxel::{direction::Axis, Voxel},
    world::World,
};

use super::{face::FaceType, quad::Quad};

/// Position within the sweep: which axis, direction, face type and plane comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SweepCursor {
    axis: usize,
    positive: bool,
    face_type: usize,
    plane: i32,
}

impl SweepCursor {
    const FIRST_PLANE: i32 = -1;
    const LAST_PLANE: i32 = CHUNK_DIMENSION - 1;

    fn first() -> Self {
        SweepCursor {
            axis: 0,
            positive: true,
            face_type: 0,
            plane: Self::FIRST_PLANE,
        }
    }

    /// The cursor after this one, or `None` once every plane has been swept.
    fn advance(self) -> Option<Self> {
        let mut next = self;
        next.plane += 1;
        if next.plane <= Self::LAST_PLANE {
            return Some(next);
        }
        next.plane = Self::FIRST_PLANE;
        next.face_type += 1;
        if next.face_type < FaceType::PER_DIRECTION {
            return Some(next);
        }
        next.face_type = 0;
        if next.positive {
            next.positive = false;
            return Some(next);
        }
        next.positive = true;
        next.axis += 1;
        (next.axis < 3).then_some(next)
    }
}

/// A lazy iterator over the quads of one chunk.
///
/// Quads are produced one sweep plane at a time, so a consumer that stops early
/// never pays for the remaining planes. The mesher only reads, and may run on
/// any thread that can hold the view.
///
/// The view must address voxels relative to the chunk origin, the way
/// [`ChunkRef`] does; `origin` is only used to place the output geometry in
/// world space.
pub struct GreedyMesher<V> {
    view: V,
    origin: VoxelPos,
    texel_scale: f32,
    cursor: Option<SweepCursor>,
    mask: BitVec,
    pending: VecDeque<Quad>,
}

impl<V: VoxelRead<Voxel>> GreedyMesher<V> {
    /// Creates a mesher over a chunk-relative view.
    ///
    /// # Arguments
    /// * `view` - Chunk-relative voxel view, reading neighbours outside `0..CHUNK_DIMENSION`
    /// * `origin` - Global position of the chunk's relative `(0, 0, 0)`
    /// * `texel_scale` - Texture coordinates per voxel edge at subdivision 0
    pub fn new(view: V, origin: VoxelPos, texel_scale: f32) -> Self {
        let n = CHUNK_DIMENSION as usize;
        GreedyMesher {
            view,
            origin,
            texel_scale,
            cursor: Some(SweepCursor::first()),
            mask: BitVec::repeat(false, n * n),
            pending: VecDeque::new(),
        }
    }

    /// Relative position of the cell `(u, v)` on `layer` along `axis`.
    fn compose(axis: Axis, layer: i32, u: i32, v: i32) -> VoxelPos {
        let mut position = Point3::new(0, 0, 0);
        position[axis.index()] = layer;
        position[axis.u().index()] = u;
        position[axis.v().index()] = v;
        position
    }

    /// Fills the mask for one plane and merges it into quads.
    fn sweep(&mut self, cursor: SweepCursor) {
        let axis = Axis::all()[cursor.axis];
        let direction = axis.direction(cursor.positive);
        let Some(face_type) = FaceType::nth(cursor.face_type, !cursor.positive) else {
            return;
        };

        let (open_layer, closed_layer) = if cursor.positive {
            (cursor.plane, cursor.plane + 1)
        } else {
            (cursor.plane + 1, cursor.plane)
        };
        if !(0..CHUNK_DIMENSION).contains(&open_layer) {
            return;
        }

        let mut any = false;
        for v in 0..CHUNK_DIMENSION {
            for u in 0..CHUNK_DIMENSION {
                let open = self.view.get(Self::compose(axis, open_layer, u, v));
                if !open.is_open() || FaceType::of(open, direction) != face_type {
                    continue;
                }
                if self.view.get(Self::compose(axis, closed_layer, u, v)).is_open() {
                    continue;
                }
                self.mask.set((u + v * CHUNK_DIMENSION) as usize, true);
                any = true;
            }
        }

        if any {
            self.merge(axis, cursor.plane + 1, face_type);
        }
    }

    /// Consumes the mask, emitting one quad per greedy rectangle.
    fn merge(&mut self, axis: Axis, layer: i32, face_type: FaceType) {
        let n = CHUNK_DIMENSION as usize;

        while let Some(start) = self.mask.first_one() {
            let (u0, v0) = (start % n, start / n);

            let mut width = 1;
            while u0 + width < n && self.mask[start + width] {
                width += 1;
            }

            let mut height = 1;
            while v0 + height < n {
                let row = start + height * n;
                if !self.mask[row..row + width].all() {
                    break;
                }
                height += 1;
            }

            for dv in 0..height {
                let row = start + dv * n;
                self.mask[row..row + width].fill(false);
            }

            let quad = self.quad(axis, layer, face_type, [u0, v0, width, height].map(|x| x as i32));
            self.pending.push_back(quad);
        }
    }

    /// Builds the world-space quad for a merged rectangle `[u, v, width, height]`.
    fn quad(&self, axis: Axis, layer: i32, face_type: FaceType, rect: [i32; 4]) -> Quad {
        let [u0, v0, width, height] = rect;
        // The normal points from the closed voxel into the open one.
        let normal_positive = face_type.reversed;
        let corners = if normal_positive {
            [(0, 0), (width, 0), (width, height), (0, height)]
        } else {
            [(0, 0), (0, height), (width, height), (width, 0)]
        };

        let uv_scale = self.texel_scale * f32::from(1u8 << face_type.subdivision);
        let mut positions = [Point3::new(0.0, 0.0, 0.0); 4];
        let mut uvs = [[0.0; 2]; 4];
        for (i, (du, dv)) in corners.into_iter().enumerate() {
            let relative = Self::compose(axis, layer, u0 + du, v0 + dv);
            // Far corners of the topmost chunk sit one past `i32::MAX`.
            let global = [0, 1, 2].map(|c| i64::from(self.origin[c]) + i64::from(relative[c]));
            positions[i] = Point3::new(global[0] as f32, global[1] as f32, global[2] as f32);
            uvs[i] = [
                global[axis.u().index()] as f32 * uv_scale,
                global[axis.v().index()] as f32 * uv_scale,
            ];
        }

        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        normal[axis.index()] = if normal_positive { 1.0 } else { -1.0 };

        Quad {
            positions,
            normal,
            uvs,
            material: face_type.material(),
        }
    }
}

impl<V: VoxelRead<Voxel>> Iterator for GreedyMesher<V> {
    type Item = Quad;

    fn next(&mut self) -> Option<Quad> {
        loop {
            if let Some(quad) = self.pending.pop_front() {
                return Some(quad);
            }
            let cursor = self.cursor?;
            self.cursor = cursor.advance();
            self.sweep(cursor);
        }
    }
}

impl<'a> GreedyMesher<ChunkRef<'a, Voxel>> {
    /// Creates a mesher for the chunk a read view is scoped to.
    ///
    /// Chunks absent from the world hold no open voxels, so their mesh is empty
    /// without sweeping.
    pub fn for_chunk(view: ChunkRef<'a, Voxel>, texel_scale: f32) -> Self {
        let materialized = view.is_materialized();
        let origin = view.origin();
        let mut mesher = GreedyMesher::new(view, origin, texel_scale);
        if !materialized {
            mesher.cursor = None;
        }
        mesher
    }
}

/// Greedy-meshes one chunk of `world`.
///
/// # Arguments
/// * `world` - The committed world state
/// * `chunk` - Chunk coordinate to mesh
/// * `texel_scale` - Texture coordinates per voxel edge at subdivision 0
///
/// # Returns
/// A lazy iterator over the chunk's quads.
pub fn greedy_quads(world: &World, chunk: ChunkPos, texel_scale: f32) -> GreedyMesher<ChunkRef<'_, Voxel>> {
    GreedyMesher::for_chunk(world.read_view(chunk), texel_scale)
}
