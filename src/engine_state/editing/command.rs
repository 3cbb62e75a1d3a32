//! # Command Trait
//!
//! The contract every undoable editor operation implements. The command stack
//! treats commands as opaque; it only sequences execute, undo and redo and
//! collects the chunks each call reports as changed.

use std::collections::HashSet;

use super::selection::Selection;
use crate::{
    engine_state::voxels::{coords::ChunkPos, world::World},
    error::EditorResult,
};

/// Everything a command may read or change, passed in explicitly on every call.
pub struct EditContext<'a> {
    /// The committed world
    pub world: &'a mut World,
    /// The editor's current selection
    pub selection: &'a mut Selection,
}

impl<'a> EditContext<'a> {
    pub fn new(world: &'a mut World, selection: &'a mut Selection) -> Self {
        EditContext { world, selection }
    }
}

/// An undoable unit of work.
///
/// Each method returns the chunks whose meshes may have changed, for the
/// remesh scheduler.
///
/// # Implementation Guidelines
/// - `execute` runs once, when the command is first pushed.
/// - `undo` and `redo` restore recorded state; they must not re-derive it from
///   the current world, which may have been edited in between only by commands
///   that have since been undone themselves.
/// - A failing `undo` or `redo` leaves the world in an unknown state; the stack
///   discards its history in response.
pub trait Command {
    /// Human-readable name shown in undo/redo menus.
    fn name(&self) -> &str;

    fn execute(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>>;

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>>;

    fn redo(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>>;
}
