//! # Engine State Module
//!
//! The editing session: the world, the selection, the undo/redo history and the
//! background meshing that keeps chunk meshes in step with edits.
//!
//! ## Key Components
//!
//! * `EngineState` - The session container coordinating every subsystem
//! * `editing` - Commands, the command stack and the copy-on-write edit layer
//! * `rendering` - Greedy meshing, mesh buffers, the mesh cache and mesh tasks
//! * `task_management` - Worker threads running mesh tasks
//! * `voxels` - Voxel, chunk and world storage
//!
//! ## Architecture
//!
//! `EngineState` owns every subsystem. Edits run on the session thread with
//! exclusive access to the world; after each successful execute, undo or redo the
//! reported chunks are invalidated in the mesh cache and remesh tasks are
//! published to the workers, which read the world behind a shared lock.
//!
//! ```text
//! execute/undo/redo ──▶ CommandStack ──▶ dirty chunks
//!                                           │ invalidate + publish
//!                                           ▼
//!       MeshCache ◀── process_tasks ◀── TaskManager workers
//! ```

use std::collections::HashSet;

use log::{debug, info};

use editing::{Command, CommandStack, EditContext, Selection};
use rendering::{
    meshing::{Mesh, MeshCache},
    tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
};
use task_management::TaskManager;
use voxels::{coords::ChunkPos, world::World};

use crate::{config::EditorConfig, core::MtResource, error::EditorResult};

pub mod editing;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The state of one editing session.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_editor_engine::{EditorConfig, EngineState, FillRegion, Region};
///
/// let mut engine = EngineState::new(EditorConfig::default());
/// engine
///     .execute(Box::new(FillRegion::open(Region::new(
///         Point3::new(0, 0, 0),
///         Point3::new(3, 3, 3),
///     ))))
///     .unwrap();
///
/// engine.finish_tasks();
/// assert_eq!(engine.mesh(Point3::new(0, 0, 0)).map(|mesh| mesh.quad_count()), Some(6));
///
/// assert!(engine.undo());
/// engine.finish_tasks();
/// assert_eq!(engine.mesh(Point3::new(0, 0, 0)).map(|mesh| mesh.quad_count()), Some(0));
/// ```
pub struct EngineState {
    /// Session tunables
    config: EditorConfig,
    /// The committed world, shared with mesh workers
    world: MtResource<World>,
    /// The current selection
    selection: Selection,
    /// Undo/redo history
    command_stack: CommandStack,
    /// Worker pool running mesh tasks
    task_manager: TaskManager,
    /// Finished chunk meshes
    mesh_cache: MeshCache,
}

impl EngineState {
    /// Creates an empty session.
    ///
    /// # Arguments
    /// * `config` - Session tunables; worker threads are started immediately
    pub fn new(config: EditorConfig) -> Self {
        info!(
            "Starting editing session: {} workers, texel scale {}",
            config.worker_count, config.texel_scale
        );

        Self {
            world: MtResource::new(World::new()),
            selection: Selection::none(),
            command_stack: CommandStack::new().with_history_limit(config.history_limit),
            task_manager: TaskManager::new(config.worker_count),
            mesh_cache: MeshCache::new(config.mesh_cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Shared handle to the committed world.
    ///
    /// Writing through this handle bypasses the undo history; call
    /// [`EngineState::remesh`] afterwards for the chunks changed.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replaces the selection. Selection changes are not undoable on their own.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn command_stack(&self) -> &CommandStack {
        &self.command_stack
    }

    /// Mutable access to the history, e.g. to install an error handler.
    pub fn command_stack_mut(&mut self) -> &mut CommandStack {
        &mut self.command_stack
    }

    pub fn mesh_cache(&self) -> &MeshCache {
        &self.mesh_cache
    }

    /// The cached mesh of a chunk, if one has been built.
    pub fn mesh(&self, chunk: ChunkPos) -> Option<&Mesh> {
        self.mesh_cache.peek(chunk).map(|cached| &cached.mesh)
    }

    /// Executes a new command and schedules the chunks it changed for remeshing.
    ///
    /// # Returns
    /// The chunks the command reported as changed.
    pub fn execute(&mut self, command: Box<dyn Command>) -> EditorResult<HashSet<ChunkPos>> {
        let affected = {
            let mut world = self.world.get_mut();
            let mut ctx = EditContext::new(&mut world, &mut self.selection);
            self.command_stack.execute(command, &mut ctx)?
        };
        self.flush_dirty_chunks();
        Ok(affected)
    }

    /// Undoes the most recent command. See [`CommandStack::undo`].
    pub fn undo(&mut self) -> bool {
        let undone = {
            let mut world = self.world.get_mut();
            let mut ctx = EditContext::new(&mut world, &mut self.selection);
            self.command_stack.undo(&mut ctx)
        };
        self.flush_dirty_chunks();
        undone
    }

    /// Redoes the most recently undone command. See [`CommandStack::redo`].
    pub fn redo(&mut self) -> bool {
        let redone = {
            let mut world = self.world.get_mut();
            let mut ctx = EditContext::new(&mut world, &mut self.selection);
            self.command_stack.redo(&mut ctx)
        };
        self.flush_dirty_chunks();
        redone
    }

    fn flush_dirty_chunks(&mut self) {
        let dirty = self.command_stack.take_dirty_chunks();
        if dirty.is_empty() {
            return;
        }
        if self.config.prune_empty_chunks {
            self.world.get_mut().prune_default_chunks(dirty.iter().copied());
        }
        self.remesh(dirty);
    }

    /// Invalidates the given chunks and publishes a mesh task for each.
    pub fn remesh(&mut self, chunks: impl IntoIterator<Item = ChunkPos>) {
        let mut scheduled = 0;
        for chunk in chunks {
            let generation = self.mesh_cache.invalidate(chunk);
            self.task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
                self.world.clone(),
                chunk,
                generation,
                self.config.texel_scale,
            )));
            scheduled += 1;
        }
        debug!("Scheduled {} chunk meshes", scheduled);
    }

    /// Remeshes every chunk stored in the world.
    pub fn remesh_all(&mut self) {
        let chunks: Vec<ChunkPos> = self.world.get().chunk_positions().collect();
        self.remesh(chunks);
    }

    /// Stores finished meshes and hands queued tasks to idle workers.
    ///
    /// Call once per editor frame.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_tasks(&mut self) -> usize {
        let handled = self.task_manager.process_completed_tasks(&mut self.mesh_cache);
        self.task_manager.process_queued_tasks();
        handled
    }

    /// Blocks until every published mesh task has finished and been stored.
    pub fn finish_tasks(&mut self) -> usize {
        self.task_manager.finish_all(&mut self.mesh_cache)
    }

    /// Number of mesh tasks queued or running.
    pub fn pending_tasks(&self) -> usize {
        self.task_manager.pending_tasks()
    }

    /// Whether the world changed since [`EngineState::mark_saved`].
    pub fn is_dirty(&self) -> bool {
        self.command_stack.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.command_stack.mark_saved();
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use super::editing::{Extrude, FillRegion, WorldCommand};
    use super::voxels::{region::Region, voxel::direction::Direction};

    fn engine() -> EngineState {
        EngineState::new(EditorConfig {
            worker_count: 2,
            ..EditorConfig::default()
        })
    }

    #[test]
    fn edits_are_remeshed_and_undone() {
        let mut engine = engine();
        let region = Region::new(Point3::new(14, 0, 0), Point3::new(17, 2, 2));
        let affected = engine.execute(Box::new(FillRegion::open(region))).expect("fill");
        engine.finish_tasks();

        for chunk in &affected {
            assert!(engine.mesh_cache().is_current(*chunk));
        }
        let quads: usize = affected
            .iter()
            .filter_map(|chunk| engine.mesh(*chunk))
            .map(Mesh::quad_count)
            .sum();
        assert!(quads >= 6);

        assert!(engine.undo());
        engine.finish_tasks();
        assert!(affected.iter().all(|chunk| engine.mesh(*chunk).is_some_and(Mesh::is_empty)));
        assert_eq!(engine.world().get().chunk_count(), 0);
        assert_eq!(engine.pending_tasks(), 0);
    }

    #[test]
    fn pruning_can_be_disabled() {
        let mut engine = EngineState::new(EditorConfig {
            worker_count: 1,
            prune_empty_chunks: false,
            ..EditorConfig::default()
        });
        engine
            .execute(Box::new(FillRegion::open(Region::single(Point3::new(1, 1, 1)))))
            .expect("fill");
        assert!(engine.undo());
        assert_eq!(engine.world().get().chunk_count(), 1);
        assert_eq!(*engine.world().get(), World::new());

        engine.remesh_all();
        engine.finish_tasks();
        assert!(engine.mesh(Point3::new(0, 0, 0)).is_some_and(Mesh::is_empty));
    }

    #[test]
    fn selection_follows_extrude_through_history() {
        let mut engine = engine();
        let room = Region::new(Point3::new(0, 0, 0), Point3::new(2, 2, 2));
        engine.execute(Box::new(FillRegion::open(room))).expect("fill");
        engine.set_selection(Selection::new(room, Direction::PosZ));

        engine
            .execute(Box::new(WorldCommand::new(Extrude::new(3))))
            .expect("extrude");
        assert_eq!(engine.selection().region().map(|r| r.max()), Some(Point3::new(2, 2, 5)));
        assert!(engine.is_dirty());

        assert!(engine.undo());
        assert_eq!(engine.selection(), Selection::new(room, Direction::PosZ));
        assert!(engine.redo());
        assert_eq!(engine.selection().region().map(|r| r.min()), Some(Point3::new(0, 0, 3)));

        engine.mark_saved();
        assert!(!engine.is_dirty());
    }
}
