//! # Editing Module
//!
//! Undoable editing on top of the voxel store.
//!
//! ## Key Components
//!
//! * `command` - The [`Command`] contract and the [`EditContext`] handed to it
//! * `command_stack` - Undo/redo history with failure recovery
//! * `layer` - Copy-on-write overlay edits are staged in
//! * `world_command` - Generic command recording chunk snapshots for any [`WorldEdit`]
//! * `operations` - The concrete edits
//! * `selection` - The selected box and its facing direction
//!
//! ## Data Flow
//!
//! A command runs its edit against a [`ModifiedWorldLayer`] borrowed from the
//! world, so a failure can never leave a half-applied edit behind. On success the
//! layer is committed, the pre- and post-images of every changed chunk are kept
//! for undo and redo, and the touched and adjoining chunks are reported to the
//! caller for remeshing.

pub mod command;
pub mod command_stack;
pub mod layer;
pub mod operations;
pub mod selection;
pub mod world_command;

pub use command::{Command, EditContext};
pub use command_stack::{CommandStack, ErrorHandler};
pub use layer::{ChunkSnapshots, LayerChanges, ModifiedWorldLayer};
pub use operations::{Extrude, FillRegion, PortalMode, SetPortalable, SetSubdivision};
pub use selection::Selection;
pub use world_command::{WorldCommand, WorldEdit};
