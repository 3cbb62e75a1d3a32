//! # Editor Operations
//!
//! The concrete voxel edits the editor offers. Each one is a [`WorldEdit`], so
//! wrapping it in a [`WorldCommand`] makes it undoable.
//!
//! * [`FillRegion`]: set every voxel of a box to one value
//! * [`SetPortalable`]: set or toggle one face flag on the open voxels of a box
//! * [`SetSubdivision`]: change the subdivision level of the open voxels of a box
//! * [`Extrude`]: push the selected face out into closed space or back into open space

use super::{
    layer::ModifiedWorldLayer,
    selection::Selection,
    world_command::{WorldCommand, WorldEdit},
};
use crate::{
    engine_state::voxels::{
        region::Region,
        view::{VoxelRead, VoxelView},
        voxel::{direction::Direction, Voxel, MAX_SUBDIVISION},
    },
    error::{EditorError, EditorResult},
};

/// Sets every voxel in a region to a fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRegion {
    pub region: Region,
    pub value: Voxel,
}

impl FillRegion {
    pub fn new(region: Region, value: Voxel) -> Self {
        FillRegion { region, value }
    }

    /// Carves the region out as open space.
    pub fn open(region: Region) -> WorldCommand<Self> {
        WorldCommand::new(FillRegion::new(region, Voxel::OPEN))
    }

    /// Fills the region back in.
    pub fn close(region: Region) -> WorldCommand<Self> {
        WorldCommand::new(FillRegion::new(region, Voxel::CLOSED))
    }
}

impl WorldEdit for FillRegion {
    fn name(&self) -> &str {
        "Fill Region"
    }

    fn apply(&self, layer: &mut ModifiedWorldLayer<'_>, selection: &Selection) -> EditorResult<Selection> {
        layer.fill(self.region, self.value);
        Ok(*selection)
    }
}

/// How [`SetPortalable`] changes the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalMode {
    Set(bool),
    Toggle,
}

/// Changes the portalability of one face on the open voxels of a region.
///
/// Closed voxels are left alone; their faces are never drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPortalable {
    pub region: Region,
    pub direction: Direction,
    pub mode: PortalMode,
}

impl SetPortalable {
    pub fn new(region: Region, direction: Direction, mode: PortalMode) -> Self {
        SetPortalable {
            region,
            direction,
            mode,
        }
    }
}

impl WorldEdit for SetPortalable {
    fn name(&self) -> &str {
        match self.mode {
            PortalMode::Set(true) => "Make Portalable",
            PortalMode::Set(false) => "Make Non-Portalable",
            PortalMode::Toggle => "Toggle Portalable",
        }
    }

    fn apply(&self, layer: &mut ModifiedWorldLayer<'_>, selection: &Selection) -> EditorResult<Selection> {
        for position in self.region.iter() {
            let voxel = layer.get(position);
            if !voxel.is_open() {
                continue;
            }
            let changed = match self.mode {
                PortalMode::Set(portalable) => voxel.with_portalable(self.direction, portalable),
                PortalMode::Toggle => voxel.toggled_portalable(self.direction),
            };
            layer.set(position, changed);
        }
        Ok(*selection)
    }
}

/// Changes the subdivision level of the open voxels of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSubdivision {
    pub region: Region,
    pub level: u8,
}

impl SetSubdivision {
    pub fn new(region: Region, level: u8) -> Self {
        SetSubdivision { region, level }
    }
}

impl WorldEdit for SetSubdivision {
    fn name(&self) -> &str {
        "Set Subdivision"
    }

    fn apply(&self, layer: &mut ModifiedWorldLayer<'_>, selection: &Selection) -> EditorResult<Selection> {
        if self.level > MAX_SUBDIVISION {
            return Err(EditorError::invalid_argument("subdivision", self.level));
        }
        let level = self.level;
        for position in self.region.iter() {
            if layer.get(position).is_open() {
                layer.update(position, &|v: Voxel| v.with_subdivision(level));
            }
        }
        Ok(*selection)
    }
}

/// Pushes the selected face along the selection's facing direction.
///
/// A positive amount carves that many layers of new open space beyond the
/// face, each copying the attributes of the face voxel it grows from. A
/// negative amount closes that many layers from the face inward. The
/// selection moves with the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extrude {
    pub amount: i32,
}

impl Extrude {
    pub fn new(amount: i32) -> Self {
        Extrude { amount }
    }
}

impl WorldEdit for Extrude {
    fn name(&self) -> &str {
        if self.amount >= 0 {
            "Extrude"
        } else {
            "Intrude"
        }
    }

    fn apply(&self, layer: &mut ModifiedWorldLayer<'_>, selection: &Selection) -> EditorResult<Selection> {
        let out_of_range = || EditorError::invalid_argument("extrude amount", self.amount);
        if self.amount == 0 || self.amount == i32::MIN {
            return Err(out_of_range());
        }
        let face = selection.face_region().ok_or_else(|| EditorError::CommandFailed {
            command: self.name().to_string(),
            message: "nothing is selected".to_string(),
        })?;
        let step = selection.facing().offset();
        // Every touched voxel lies between the selection and its moved copy.
        let moved = selection.translated(step * self.amount).ok_or_else(out_of_range)?;

        if self.amount > 0 {
            for source in face.iter() {
                let voxel = layer.get(source).with_open(true);
                for layer_index in 1..=self.amount {
                    layer.set(source + step * layer_index, voxel);
                }
            }
        } else {
            let depth = -self.amount;
            let closed = face.extend(selection.facing().opposite(), depth - 1);
            layer.fill(closed, Voxel::CLOSED);
        }

        Ok(moved)
    }
}
