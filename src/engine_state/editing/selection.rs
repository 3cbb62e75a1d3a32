//! The editor's current selection.

use cgmath::Vector3;

use crate::engine_state::voxels::{region::Region, voxel::direction::Direction};

/// A selected box of voxels and the face direction it is being worked from.
///
/// Selections are plain values. World commands capture the selection before
/// and after they run so undo and redo put it back along with the voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    region: Option<Region>,
    facing: Direction,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::none()
    }
}

impl Selection {
    pub fn new(region: Region, facing: Direction) -> Self {
        Selection {
            region: Some(region),
            facing,
        }
    }

    /// An empty selection.
    pub fn none() -> Self {
        Selection {
            region: None,
            facing: Direction::PosY,
        }
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_none()
    }

    /// The one-voxel-thick slab of the selection on its facing side.
    pub fn face_region(&self) -> Option<Region> {
        self.region.map(|region| region.face(self.facing))
    }

    /// The same selection moved by `offset`, or `None` if it would leave the
    /// coordinate range.
    pub fn translated(&self, offset: Vector3<i32>) -> Option<Self> {
        let region = match self.region {
            Some(region) => Some(region.checked_translate(offset)?),
            None => None,
        };
        Some(Selection {
            region,
            facing: self.facing,
        })
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn face_and_translation() {
        let selection = Selection::new(
            Region::new(Point3::new(0, 0, 0), Point3::new(3, 2, 1)),
            Direction::NegX,
        );
        assert_eq!(
            selection.face_region(),
            Some(Region::new(Point3::new(0, 0, 0), Point3::new(0, 2, 1)))
        );

        let moved = selection.translated(Vector3::new(-2, 0, 0)).expect("in range");
        assert_eq!(moved.region().map(|r| r.min()), Some(Point3::new(-2, 0, 0)));
        assert_eq!(moved.facing(), Direction::NegX);
        assert_eq!(selection.translated(Vector3::new(i32::MIN, 0, 0)), None);
        assert_eq!(Selection::none().translated(Vector3::new(1, 0, 0)), Some(Selection::none()));
        assert!(Selection::default().face_region().is_none());
    }
}
