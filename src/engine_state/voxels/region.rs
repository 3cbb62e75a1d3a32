//! # Region Module
//!
//! Inclusive axis-aligned boxes of voxels, used by bulk fills, edit
//! operations and the editor selection.

use cgmath::{Point3, Vector3};

use super::{
    chunk::CHUNK_DIMENSION,
    coords::{checked_offset, chunk_of, chunk_origin, ChunkPos, LocalPos, VoxelPos},
    voxel::direction::Direction,
};

/// An inclusive box of voxels. `min` is never greater than `max` on any axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    min: VoxelPos,
    max: VoxelPos,
}

impl Region {
    /// Creates the box spanned by two corners, in any order.
    pub fn new(a: VoxelPos, b: VoxelPos) -> Self {
        Region {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A region covering exactly one voxel.
    pub fn single(pos: VoxelPos) -> Self {
        Region { min: pos, max: pos }
    }

    /// Inclusive minimum corner.
    pub fn min(&self) -> VoxelPos {
        self.min
    }

    /// Inclusive maximum corner.
    pub fn max(&self) -> VoxelPos {
        self.max
    }

    /// Edge lengths in voxels.
    pub fn size(&self) -> Vector3<u64> {
        let edge = |axis: usize| (i64::from(self.max[axis]) - i64::from(self.min[axis]) + 1) as u64;
        Vector3::new(edge(0), edge(1), edge(2))
    }

    /// Number of voxels covered, saturating at `u64::MAX`.
    pub fn volume(&self) -> u64 {
        let size = self.size();
        size.x.saturating_mul(size.y).saturating_mul(size.z)
    }

    pub fn contains(&self, pos: VoxelPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// The same box moved by `offset`, or `None` if a corner leaves the `i32` range.
    pub fn checked_translate(&self, offset: Vector3<i32>) -> Option<Region> {
        Some(Region {
            min: checked_offset(self.min, offset)?,
            max: checked_offset(self.max, offset)?,
        })
    }

    /// The part of the moved box that lies inside the `i32` range, if any.
    pub fn clipped_translate(&self, offset: Vector3<i32>) -> Option<Region> {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            let lo = i64::from(self.min[axis]) + i64::from(offset[axis]);
            let hi = i64::from(self.max[axis]) + i64::from(offset[axis]);
            let range = i64::from(i32::MIN)..=i64::from(i32::MAX);
            if hi < *range.start() || lo > *range.end() {
                return None;
            }
            min[axis] = lo.max(*range.start()) as i32;
            max[axis] = hi.min(*range.end()) as i32;
        }
        Some(Region { min, max })
    }

    /// The one-voxel-thick slab of this region on the side facing `direction`.
    pub fn face(&self, direction: Direction) -> Region {
        let axis = direction.axis().index();
        let mut min = self.min;
        let mut max = self.max;
        if direction.is_positive() {
            min[axis] = max[axis];
        } else {
            max[axis] = min[axis];
        }
        Region { min, max }
    }

    /// Grows the region by `amount` voxels towards `direction`, stopping at
    /// the edge of the `i32` range.
    pub fn extend(&self, direction: Direction, amount: i32) -> Region {
        let axis = direction.axis().index();
        let mut min = self.min;
        let mut max = self.max;
        if direction.is_positive() {
            max[axis] = max[axis].saturating_add(amount);
        } else {
            min[axis] = min[axis].saturating_sub(amount);
        }
        Region::new(min, max)
    }

    /// Every voxel position in the region, x fastest.
    pub fn iter(&self) -> impl Iterator<Item = VoxelPos> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Point3::new(x, y, z)))
        })
    }

    /// Every chunk position the region touches.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> {
        let min = chunk_of(self.min);
        let max = chunk_of(self.max);
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Point3::new(x, y, z)))
        })
    }

    /// The inclusive local range of `chunk` covered by this region, if any.
    pub fn intersect_chunk(&self, chunk: ChunkPos) -> Option<(LocalPos, LocalPos)> {
        let origin = chunk_origin(chunk);
        let mut local_min = Point3::new(0, 0, 0);
        let mut local_max = Point3::new(0, 0, 0);
        for axis in 0..3 {
            let origin = i64::from(origin[axis]);
            let lo = (i64::from(self.min[axis]) - origin).max(0);
            let hi = (i64::from(self.max[axis]) - origin).min(i64::from(CHUNK_DIMENSION) - 1);
            if lo > hi {
                return None;
            }
            local_min[axis] = lo as usize;
            local_max[axis] = hi as usize;
        }
        Some((local_min, local_max))
    }

    /// Whether the region covers every voxel of `chunk`.
    pub fn covers_chunk(&self, chunk: ChunkPos) -> bool {
        let last = CHUNK_DIMENSION as usize - 1;
        matches!(
            self.intersect_chunk(chunk),
            Some((lo, hi)) if lo == Point3::new(0, 0, 0) && hi == Point3::new(last, last, last)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_normalised() {
        let region = Region::new(Point3::new(5, -2, 3), Point3::new(-1, 4, 3));
        assert_eq!(region.min(), Point3::new(-1, -2, 3));
        assert_eq!(region.max(), Point3::new(5, 4, 3));
        assert_eq!(region.volume(), 7 * 7);
        assert_eq!(region.iter().count() as u64, region.volume());
    }

    #[test]
    fn chunk_intersection_clips_to_chunk() {
        let region = Region::new(Point3::new(-3, 0, 0), Point3::new(20, 15, 15));
        let chunks: Vec<_> = region.chunks().collect();
        assert_eq!(chunks, vec![Point3::new(-1, 0, 0), Point3::new(0, 0, 0), Point3::new(1, 0, 0)]);

        assert_eq!(
            region.intersect_chunk(Point3::new(-1, 0, 0)),
            Some((Point3::new(13, 0, 0), Point3::new(15, 15, 15)))
        );
        assert!(region.covers_chunk(Point3::new(0, 0, 0)));
        assert!(!region.covers_chunk(Point3::new(1, 0, 0)));
        assert_eq!(region.intersect_chunk(Point3::new(0, 1, 0)), None);
    }

    #[test]
    fn face_and_extend() {
        let region = Region::new(Point3::new(0, 0, 0), Point3::new(3, 3, 3));
        let top = region.face(Direction::PosY);
        assert_eq!(top, Region::new(Point3::new(0, 3, 0), Point3::new(3, 3, 3)));
        let grown = region.extend(Direction::NegX, 2);
        assert_eq!(grown.min(), Point3::new(-2, 0, 0));
        assert_eq!(grown.max(), Point3::new(3, 3, 3));
    }

    #[test]
    fn full_range_regions_do_not_overflow() {
        let everything = Region::new(
            Point3::new(i32::MIN, i32::MIN, i32::MIN),
            Point3::new(i32::MAX, i32::MAX, i32::MAX),
        );
        assert_eq!(everything.size().x, 1u64 << 32);
        assert_eq!(everything.volume(), u64::MAX);
        assert!(everything.covers_chunk(Point3::new(i32::MAX.div_euclid(16), 0, -1)));
        assert_eq!(everything.extend(Direction::PosX, 5), everything);
        assert_eq!(everything.checked_translate(Vector3::new(1, 0, 0)), None);

        let edge = Region::new(Point3::new(i32::MAX - 3, 0, 0), Point3::new(i32::MAX, 0, 0));
        assert_eq!(
            edge.clipped_translate(Vector3::new(2, 0, 0)),
            Some(Region::new(Point3::new(i32::MAX - 1, 0, 0), Point3::new(i32::MAX, 0, 0)))
        );
        assert_eq!(edge.clipped_translate(Vector3::new(4, 0, 0)), None);
    }
}
