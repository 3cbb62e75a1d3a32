use crate::engine_state::voxels::voxel::{direction::Direction, Voxel, MAX_SUBDIVISION};

/// The attributes that decide whether two neighbouring unit faces may be
/// merged into one quad.
///
/// Faces of different types never merge, so each type gets its own mask pass
/// in the greedy sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceType {
    /// Whether the open voxel's face is marked as portal-capable
    pub portalable: bool,
    /// Texture subdivision level of the open voxel
    pub subdivision: u8,
    /// Whether the face was found sweeping toward the negative end of its axis
    pub reversed: bool,
}

impl FaceType {
    /// Number of face types sharing one sweep direction.
    pub const PER_DIRECTION: usize = (MAX_SUBDIVISION as usize + 1) * 2;

    /// Number of distinct materials a quad can carry.
    pub const MATERIAL_COUNT: usize = Self::PER_DIRECTION;

    /// Face type of the face `open` shows toward `direction`.
    ///
    /// # Arguments
    /// * `open` - The open voxel the face belongs to
    /// * `direction` - Direction from the open voxel toward the closed one
    pub fn of(open: Voxel, direction: Direction) -> Self {
        FaceType {
            portalable: open.is_portalable(direction),
            subdivision: open.subdivision(),
            reversed: !direction.is_positive(),
        }
    }

    /// The `index`-th face type of a sweep direction, subdivision-major.
    ///
    /// # Returns
    /// `None` once `index` reaches [`FaceType::PER_DIRECTION`].
    pub fn nth(index: usize, reversed: bool) -> Option<Self> {
        (index < Self::PER_DIRECTION).then(|| FaceType {
            portalable: index % 2 == 1,
            subdivision: (index / 2) as u8,
            reversed,
        })
    }

    /// Material index used to group quads into draw batches.
    pub fn material(self) -> u32 {
        u32::from(self.portalable) * (MAX_SUBDIVISION as u32 + 1) + self.subdivision as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_every_type_once() {
        let types: Vec<_> = (0..)
            .map_while(|index| FaceType::nth(index, false))
            .collect();
        assert_eq!(types.len(), FaceType::PER_DIRECTION);

        let mut materials: Vec<_> = types.iter().map(|face| face.material()).collect();
        materials.sort_unstable();
        materials.dedup();
        assert_eq!(materials.len(), FaceType::MATERIAL_COUNT);
    }

    #[test]
    fn face_type_of_open_voxel() {
        let voxel = Voxel::OPEN
            .with_subdivision(1)
            .with_portalable(Direction::NegY, true);
        let face = FaceType::of(voxel, Direction::NegY);
        assert!(face.portalable && face.reversed);
        assert_eq!(face.subdivision, 1);
        assert!(!FaceType::of(voxel, Direction::PosY).portalable);
    }
}
