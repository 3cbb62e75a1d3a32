//! # Coordinate Module
//!
//! Conversions between global voxel coordinates, chunk coordinates and
//! chunk-local coordinates.
//!
//! Splitting uses floor division and non-negative modulo, so `-1` maps to
//! chunk `-1`, local `15` rather than chunk `0`, local `-1`.

use cgmath::{Point3, Vector3};

use super::chunk::CHUNK_DIMENSION;

/// Position of a chunk in chunk coordinates.
pub type ChunkPos = Point3<i32>;

/// Position of a single voxel in global coordinates.
pub type VoxelPos = Point3<i32>;

/// Position of a voxel inside its chunk, each component in `0..CHUNK_DIMENSION`.
pub type LocalPos = Point3<usize>;

/// The chunk containing `pos`.
pub fn chunk_of(pos: VoxelPos) -> ChunkPos {
    Point3::new(
        pos.x.div_euclid(CHUNK_DIMENSION),
        pos.y.div_euclid(CHUNK_DIMENSION),
        pos.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// The position of `pos` inside its chunk.
pub fn local_of(pos: VoxelPos) -> LocalPos {
    Point3::new(
        pos.x.rem_euclid(CHUNK_DIMENSION) as usize,
        pos.y.rem_euclid(CHUNK_DIMENSION) as usize,
        pos.z.rem_euclid(CHUNK_DIMENSION) as usize,
    )
}

/// Splits a global position into its chunk and local parts.
pub fn split(pos: VoxelPos) -> (ChunkPos, LocalPos) {
    (chunk_of(pos), local_of(pos))
}

/// Global position of the chunk's `(0, 0, 0)` voxel.
pub fn chunk_origin(chunk: ChunkPos) -> VoxelPos {
    Point3::new(
        chunk.x * CHUNK_DIMENSION,
        chunk.y * CHUNK_DIMENSION,
        chunk.z * CHUNK_DIMENSION,
    )
}

/// Joins a chunk position and a local position back into a global one.
pub fn to_global(chunk: ChunkPos, local: LocalPos) -> VoxelPos {
    let origin = chunk_origin(chunk);
    Point3::new(
        origin.x + local.x as i32,
        origin.y + local.y as i32,
        origin.z + local.z as i32,
    )
}

/// `pos + offset`, or `None` when a component leaves the `i32` range.
pub fn checked_offset(pos: VoxelPos, offset: Vector3<i32>) -> Option<VoxelPos> {
    Some(Point3::new(
        pos.x.checked_add(offset.x)?,
        pos.y.checked_add(offset.y)?,
        pos.z.checked_add(offset.z)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor() {
        let (chunk, local) = split(Point3::new(-1, -16, -17));
        assert_eq!(chunk, Point3::new(-1, -1, -2));
        assert_eq!(local, Point3::new(15, 0, 15));
    }

    #[test]
    fn split_and_join_are_inverse() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let pos = Point3::new(
                rng.i32(-1000..1000),
                rng.i32(-1000..1000),
                rng.i32(-1000..1000),
            );
            let (chunk, local) = split(pos);
            assert!(local.x < 16 && local.y < 16 && local.z < 16);
            assert_eq!(to_global(chunk, local), pos);
        }
    }

    #[test]
    fn offsets_past_the_coordinate_range_are_rejected() {
        let top = Point3::new(i32::MAX - 15, 0, i32::MIN);
        assert_eq!(checked_offset(top, Vector3::new(15, 1, 0)), Some(Point3::new(i32::MAX, 1, i32::MIN)));
        assert_eq!(checked_offset(top, Vector3::new(16, 0, 0)), None);
        assert_eq!(checked_offset(top, Vector3::new(0, 0, -1)), None);
    }
}
