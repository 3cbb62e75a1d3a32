//! # Voxel Module
//!
//! This module provides the per-cell record stored in every chunk. A voxel is
//! either open (carved-out space the player can stand in) or closed (solid),
//! carries one portalability flag per face, and a subdivision level that picks
//! how finely its surfaces are tiled.

use std::fmt;

pub mod direction;

use direction::Direction;

/// The underlying integer type used to pack a voxel in memory.
pub type VoxelBits = u16;

/// Highest supported subdivision level.
pub const MAX_SUBDIVISION: u8 = 2;

const OPEN_BIT: VoxelBits = 1;
const PORTALABLE_SHIFT: u32 = 1;
const PORTALABLE_MASK: VoxelBits = 0b11_1111 << PORTALABLE_SHIFT;
const SUBDIVISION_SHIFT: u32 = 7;
const SUBDIVISION_MASK: VoxelBits = 0b11 << SUBDIVISION_SHIFT;

/// A single voxel cell.
///
/// Voxels are plain values: two voxels are equal exactly when all their
/// attributes are equal. Every modifier returns a new value.
///
/// # Memory Layout
/// The `#[repr(transparent)]` attribute keeps the packed representation a
/// single `u16`. The bit layout is private and only reachable through the
/// constructors and modifiers, so the subdivision level never exceeds
/// [`MAX_SUBDIVISION`].
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    bits: VoxelBits,
}

impl Voxel {
    /// A closed, non-portalable voxel at subdivision 0.
    pub const CLOSED: Voxel = Voxel { bits: 0 };

    /// An open voxel with no portalable faces at subdivision 0.
    pub const OPEN: Voxel = Voxel { bits: OPEN_BIT };

    /// Creates a voxel with the given openness and default attributes.
    pub fn new(open: bool) -> Self {
        Self::CLOSED.with_open(open)
    }

    /// Whether this voxel is carved-out space.
    pub fn is_open(self) -> bool {
        self.bits & OPEN_BIT != 0
    }

    /// Whether the face pointing in `direction` accepts portals.
    pub fn is_portalable(self, direction: Direction) -> bool {
        self.bits & Self::portalable_bit(direction) != 0
    }

    /// Whether any face of this voxel accepts portals.
    pub fn any_portalable(self) -> bool {
        self.bits & PORTALABLE_MASK != 0
    }

    /// Subdivision level in `0..=MAX_SUBDIVISION`.
    pub fn subdivision(self) -> u8 {
        ((self.bits & SUBDIVISION_MASK) >> SUBDIVISION_SHIFT) as u8
    }

    /// Returns a copy with the open flag replaced.
    pub fn with_open(self, open: bool) -> Self {
        let bits = if open {
            self.bits | OPEN_BIT
        } else {
            self.bits & !OPEN_BIT
        };
        Voxel { bits }
    }

    /// Returns a copy with a single face's portalability replaced.
    pub fn with_portalable(self, direction: Direction, portalable: bool) -> Self {
        let bit = Self::portalable_bit(direction);
        let bits = if portalable {
            self.bits | bit
        } else {
            self.bits & !bit
        };
        Voxel { bits }
    }

    /// Returns a copy with every face's portalability replaced.
    pub fn with_all_portalable(self, portalable: bool) -> Self {
        Direction::all()
            .into_iter()
            .fold(self, |voxel, direction| voxel.with_portalable(direction, portalable))
    }

    /// Returns a copy with the face's portalability inverted.
    pub fn toggled_portalable(self, direction: Direction) -> Self {
        self.with_portalable(direction, !self.is_portalable(direction))
    }

    /// Returns a copy with the subdivision level replaced.
    ///
    /// Levels above [`MAX_SUBDIVISION`] are clamped.
    pub fn with_subdivision(self, subdivision: u8) -> Self {
        let level = subdivision.min(MAX_SUBDIVISION) as VoxelBits;
        Voxel {
            bits: (self.bits & !SUBDIVISION_MASK) | (level << SUBDIVISION_SHIFT),
        }
    }

    fn portalable_bit(direction: Direction) -> VoxelBits {
        1 << (PORTALABLE_SHIFT + direction as u32)
    }
}

impl fmt::Debug for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let portalable: Vec<Direction> = Direction::all()
            .into_iter()
            .filter(|direction| self.is_portalable(*direction))
            .collect();
        f.debug_struct("Voxel")
            .field("open", &self.is_open())
            .field("portalable", &portalable)
            .field("subdivision", &self.subdivision())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_closed_plain_voxel() {
        let voxel = Voxel::default();
        assert_eq!(voxel, Voxel::CLOSED);
        assert!(!voxel.is_open());
        assert!(!voxel.any_portalable());
        assert_eq!(voxel.subdivision(), 0);
    }

    #[test]
    fn face_flags_are_independent() {
        let voxel = Voxel::OPEN.with_portalable(Direction::PosY, true);
        for direction in Direction::all() {
            assert_eq!(voxel.is_portalable(direction), direction == Direction::PosY);
        }
        assert!(voxel.is_open());

        let cleared = voxel.toggled_portalable(Direction::PosY);
        assert_eq!(cleared, Voxel::OPEN);
    }

    #[test]
    fn modifiers_do_not_disturb_other_fields() {
        let voxel = Voxel::new(true)
            .with_all_portalable(true)
            .with_subdivision(2)
            .with_open(false);
        assert!(!voxel.is_open());
        assert_eq!(voxel.subdivision(), 2);
        assert!(Direction::all().iter().all(|d| voxel.is_portalable(*d)));

        let voxel = voxel.with_subdivision(1);
        assert_eq!(voxel.subdivision(), 1);
        assert!(voxel.any_portalable());
    }

    #[test]
    fn subdivision_is_clamped() {
        assert_eq!(Voxel::OPEN.with_subdivision(7).subdivision(), MAX_SUBDIVISION);
    }
}
