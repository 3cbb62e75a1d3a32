//! # Direction Module
//!
//! This module defines the three world axes and the six face directions of a
//! voxel. Directions are used to address per-face voxel attributes and to walk
//! between neighbouring voxels and chunks.

use cgmath::Vector3;
use num_derive::FromPrimitive;

use crate::error::{EditorError, EditorResult};

/// One of the three world axes.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All axes in index order.
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    /// Component index of this axis (0, 1 or 2).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The first axis spanning the plane orthogonal to this one.
    ///
    /// `u`, `v` and `self` always form a right-handed frame, so `u × v` points
    /// along the positive direction of `self`.
    pub fn u(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// The second axis spanning the plane orthogonal to this one.
    pub fn v(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Y => Axis::X,
            Axis::Z => Axis::Y,
        }
    }

    /// The face direction along this axis with the given sign.
    pub fn direction(self, positive: bool) -> Direction {
        match (self, positive) {
            (Axis::X, true) => Direction::PosX,
            (Axis::X, false) => Direction::NegX,
            (Axis::Y, true) => Direction::PosY,
            (Axis::Y, false) => Direction::NegY,
            (Axis::Z, true) => Direction::PosZ,
            (Axis::Z, false) => Direction::NegZ,
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = EditorError;

    fn try_from(value: u8) -> EditorResult<Self> {
        num::FromPrimitive::from_u8(value).ok_or(EditorError::invalid_argument("axis", value))
    }
}

/// Represents the six faces of a voxel.
///
/// Each variant is assigned a fixed integer value which is also the bit index
/// of the face's portalability flag inside the packed voxel.
///
/// The order is: [POS_X, NEG_X, POS_Y, NEG_Y, POS_Z, NEG_Z]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum Direction {
    /// Facing positive X
    PosX = 0,
    /// Facing negative X
    NegX = 1,
    /// Facing positive Y
    PosY = 2,
    /// Facing negative Y
    NegY = 3,
    /// Facing positive Z
    PosZ = 4,
    /// Facing negative Z
    NegZ = 5,
}

impl Direction {
    /// Returns an array containing all six directions in a consistent order.
    ///
    /// This is useful for iterating over all possible faces of a voxel.
    pub fn all() -> [Direction; 6] {
        [
            Direction::PosX,
            Direction::NegX,
            Direction::PosY,
            Direction::NegY,
            Direction::PosZ,
            Direction::NegZ,
        ]
    }

    /// The axis this direction runs along.
    pub fn axis(self) -> Axis {
        match self {
            Direction::PosX | Direction::NegX => Axis::X,
            Direction::PosY | Direction::NegY => Axis::Y,
            Direction::PosZ | Direction::NegZ => Axis::Z,
        }
    }

    /// Whether this direction points along the positive half of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::PosX | Direction::PosY | Direction::PosZ)
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        self.axis().direction(!self.is_positive())
    }

    /// Unit step for this direction.
    pub fn offset(self) -> Vector3<i32> {
        let sign = if self.is_positive() { 1 } else { -1 };
        let mut offset = Vector3::new(0, 0, 0);
        offset[self.axis().index()] = sign;
        offset
    }
}

impl TryFrom<u8> for Direction {
    type Error = EditorError;

    fn try_from(value: u8) -> EditorResult<Self> {
        num::FromPrimitive::from_u8(value).ok_or(EditorError::invalid_argument("direction", value))
    }
}
