//! # World Commands
//!
//! The generic command behind every voxel edit. A [`WorldEdit`] describes what
//! to change; [`WorldCommand`] runs it inside a [`ModifiedWorldLayer`], commits the
//! result and keeps the chunk images and selections needed to undo and redo it.

use std::collections::HashSet;

use log::debug;

use super::{
    command::{Command, EditContext},
    layer::{ChunkSnapshots, ModifiedWorldLayer},
    selection::Selection,
};
use crate::{
    engine_state::voxels::coords::ChunkPos,
    error::{EditorError, EditorResult},
};

/// A voxel edit expressed against the copy-on-write layer.
pub trait WorldEdit {
    /// Human-readable name of the edit.
    fn name(&self) -> &str;

    /// Performs the edit.
    ///
    /// # Arguments
    /// * `layer` - Overlay to read and write voxels through
    /// * `selection` - The selection at the time the edit runs
    ///
    /// # Returns
    /// The selection after the edit. An error discards every write made so far.
    fn apply(&self, layer: &mut ModifiedWorldLayer<'_>, selection: &Selection) -> EditorResult<Selection>;
}

/// What an executed world command recorded.
#[derive(Debug, Clone)]
struct EditRecord {
    snapshots: ChunkSnapshots,
    selection_before: Selection,
    selection_after: Selection,
}

/// An undoable command wrapping a [`WorldEdit`].
pub struct WorldCommand<E> {
    edit: E,
    record: Option<EditRecord>,
}

impl<E: WorldEdit> WorldCommand<E> {
    pub fn new(edit: E) -> Self {
        WorldCommand { edit, record: None }
    }

    pub fn edit(&self) -> &E {
        &self.edit
    }

    /// Chunk images captured by the last execute, if any.
    pub fn snapshots(&self) -> Option<&ChunkSnapshots> {
        self.record.as_ref().map(|record| &record.snapshots)
    }

    fn record(&self) -> EditorResult<&EditRecord> {
        self.record.as_ref().ok_or_else(|| EditorError::NotExecuted {
            command: self.edit.name().to_string(),
        })
    }
}

impl<E: WorldEdit> Command for WorldCommand<E> {
    fn name(&self) -> &str {
        self.edit.name()
    }

    fn execute(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
        let selection_before = *ctx.selection;
        let (changes, selection_after) = {
            let mut layer = ModifiedWorldLayer::new(ctx.world);
            let selection_after = self.edit.apply(&mut layer, &selection_before)?;
            (layer.finish(), selection_after)
        };

        let snapshots = changes.commit(ctx.world);
        *ctx.selection = selection_after;
        let affected = snapshots.affected_chunks();
        debug!(
            "{} changed {} chunks",
            self.edit.name(),
            snapshots.touched().len()
        );

        self.record = Some(EditRecord {
            snapshots,
            selection_before,
            selection_after,
        });
        Ok(affected)
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
        let record = self.record()?;
        record.snapshots.restore_pre(ctx.world);
        *ctx.selection = record.selection_before;
        Ok(record.snapshots.affected_chunks())
    }

    fn redo(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
        let record = self.record()?;
        record.snapshots.restore_post(ctx.world);
        *ctx.selection = record.selection_after;
        Ok(record.snapshots.affected_chunks())
    }
}
