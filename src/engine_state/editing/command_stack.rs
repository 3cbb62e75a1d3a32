//! # Command Stack
//!
//! The undo/redo engine. Commands move between two histories:
//!
//! ```text
//! execute ──▶ undo history ──undo──▶ redo history
//!                  ▲                      │
//!                  └─────────redo─────────┘
//! ```
//!
//! Executing a new command discards the redo history. A failing undo or redo
//! leaves the world in a state no history entry describes, so both histories
//! are discarded and the failure is reported through the error handler instead
//! of being returned to the caller.
//!
//! Every successful call adds the chunks it reported to a pending set the
//! remesh scheduler drains with [`CommandStack::take_dirty_chunks`].

use std::collections::{HashSet, VecDeque};
use std::fmt;

use log::{error, info};

use super::command::{Command, EditContext};
use crate::{
    engine_state::voxels::coords::ChunkPos,
    error::{EditorError, EditorResult},
};

/// Callback invoked with a message and the causing error when undo or redo fails.
pub type ErrorHandler = Box<dyn FnMut(&str, &EditorError)>;

fn log_error(message: &str, err: &EditorError) {
    error!("{}: {}", message, err);
}

/// Undo/redo history for one editing session.
pub struct CommandStack {
    undo_history: VecDeque<Box<dyn Command>>,
    redo_history: Vec<Box<dyn Command>>,
    history_limit: Option<usize>,
    error_handler: ErrorHandler,
    dirty_chunks: HashSet<ChunkPos>,
    dirty: bool,
}

impl Default for CommandStack {
    fn default() -> Self {
        CommandStack::new()
    }
}

impl CommandStack {
    /// Creates an empty stack with unbounded history that logs failures.
    pub fn new() -> Self {
        CommandStack {
            undo_history: VecDeque::new(),
            redo_history: Vec::new(),
            history_limit: None,
            error_handler: Box::new(log_error),
            dirty_chunks: HashSet::new(),
            dirty: false,
        }
    }

    /// Keeps at most `limit` undo entries, dropping the oldest first.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self.enforce_history_limit();
        self
    }

    /// Replaces the handler called when undo or redo fails.
    pub fn set_error_handler(&mut self, handler: impl FnMut(&str, &EditorError) + 'static) {
        self.error_handler = Box::new(handler);
    }

    fn enforce_history_limit(&mut self) {
        if let Some(limit) = self.history_limit {
            while self.undo_history.len() > limit {
                if let Some(dropped) = self.undo_history.pop_front() {
                    info!("History limit reached, forgetting '{}'", dropped.name());
                }
            }
        }
    }

    /// Runs a new command and pushes it onto the undo history.
    ///
    /// The redo history is discarded once the command succeeds. If the command
    /// fails it is dropped and the error returned; commands write through a
    /// copy-on-write layer, so a failed execute leaves the world and both
    /// histories untouched.
    ///
    /// # Returns
    /// The chunks the command reported as changed.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        ctx: &mut EditContext<'_>,
    ) -> EditorResult<HashSet<ChunkPos>> {
        let affected = command.execute(ctx)?;
        info!("Executed '{}'", command.name());
        self.redo_history.clear();

        self.undo_history.push_back(command);
        self.enforce_history_limit();
        self.dirty = true;
        self.dirty_chunks.extend(affected.iter().copied());
        Ok(affected)
    }

    /// Undoes the most recent command.
    ///
    /// # Returns
    /// `false` if there was nothing to undo or the undo failed.
    pub fn undo(&mut self, ctx: &mut EditContext<'_>) -> bool {
        let Some(mut command) = self.undo_history.pop_back() else {
            return false;
        };
        match command.undo(ctx) {
            Ok(affected) => {
                info!("Undid '{}'", command.name());
                self.dirty_chunks.extend(affected);
                self.redo_history.push(command);
                self.dirty = true;
                true
            }
            Err(err) => {
                self.fail(&format!("Failed to undo '{}'", command.name()), &err);
                false
            }
        }
    }

    /// Redoes the most recently undone command.
    ///
    /// # Returns
    /// `false` if there was nothing to redo or the redo failed.
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) -> bool {
        let Some(mut command) = self.redo_history.pop() else {
            return false;
        };
        match command.redo(ctx) {
            Ok(affected) => {
                info!("Redid '{}'", command.name());
                self.dirty_chunks.extend(affected);
                self.undo_history.push_back(command);
                self.enforce_history_limit();
                self.dirty = true;
                true
            }
            Err(err) => {
                self.fail(&format!("Failed to redo '{}'", command.name()), &err);
                false
            }
        }
    }

    fn fail(&mut self, message: &str, err: &EditorError) {
        self.clear();
        (self.error_handler)(message, err);
    }

    /// Forgets both histories.
    pub fn clear(&mut self) {
        self.undo_history.clear();
        self.redo_history.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_history.is_empty()
    }

    /// Name of the command [`CommandStack::undo`] would undo.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_history.back().map(|command| command.name())
    }

    /// Name of the command [`CommandStack::redo`] would redo.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_history.last().map(|command| command.name())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_history.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_history.len()
    }

    /// Drains the chunks reported by every execute, undo and redo since the
    /// last call.
    pub fn take_dirty_chunks(&mut self) -> HashSet<ChunkPos> {
        std::mem::take(&mut self.dirty_chunks)
    }

    /// Whether the project changed since it was last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Records that the project was saved.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

impl fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStack")
            .field("undo", &self.undo_history.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("redo", &self.redo_history.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("history_limit", &self.history_limit)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cgmath::Point3;

    use super::*;
    use crate::engine_state::{
        editing::{
            operations::{FillRegion, SetSubdivision},
            selection::Selection,
            world_command::WorldCommand,
        },
        voxels::{region::Region, world::World},
    };

    struct Session {
        world: World,
        selection: Selection,
        stack: CommandStack,
    }

    impl Session {
        fn new() -> Self {
            Session {
                world: World::new(),
                selection: Selection::none(),
                stack: CommandStack::new(),
            }
        }

        fn execute(&mut self, command: Box<dyn Command>) -> EditorResult<HashSet<ChunkPos>> {
            let mut ctx = EditContext::new(&mut self.world, &mut self.selection);
            self.stack.execute(command, &mut ctx)
        }

        fn undo(&mut self) -> bool {
            self.stack.undo(&mut EditContext::new(&mut self.world, &mut self.selection))
        }

        fn redo(&mut self) -> bool {
            self.stack.redo(&mut EditContext::new(&mut self.world, &mut self.selection))
        }
    }

    fn open_box(a: (i32, i32, i32), b: (i32, i32, i32)) -> Box<dyn Command> {
        Box::new(FillRegion::open(Region::new(
            Point3::new(a.0, a.1, a.2),
            Point3::new(b.0, b.1, b.2),
        )))
    }

    /// Command whose undo and redo always fail.
    struct Broken;

    impl Command for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn execute(&mut self, _ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
            Ok(HashSet::new())
        }

        fn undo(&mut self, _ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
            Err(EditorError::CommandFailed {
                command: "Broken".to_string(),
                message: "cannot undo".to_string(),
            })
        }

        fn redo(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<HashSet<ChunkPos>> {
            self.undo(ctx)
        }
    }

    #[test]
    fn undo_and_redo_restore_exact_state() {
        let mut session = Session::new();
        session.execute(open_box((0, 0, 0), (20, 3, 3))).expect("fill");
        let before = session.world.clone();

        session.execute(open_box((-5, -5, -5), (40, 0, 2))).expect("fill");
        let after = session.world.clone();

        assert!(session.undo());
        assert_eq!(session.world, before);
        assert!(session.redo());
        assert_eq!(session.world, after);
    }

    #[test]
    fn history_ordering() {
        let mut session = Session::new();
        session.execute(open_box((0, 0, 0), (1, 1, 1))).expect("A");
        let after_a = session.world.clone();
        session.execute(open_box((4, 4, 4), (5, 5, 5))).expect("B");
        let after_b = session.world.clone();

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.world, World::new());
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.world, after_a);
        assert!(session.redo());
        assert_eq!(session.world, after_b);
        assert!(!session.redo());

        assert!(session.undo());
        session.execute(open_box((8, 8, 8), (9, 9, 9))).expect("C");
        assert!(!session.stack.can_redo());
        assert!(!session.redo());
        assert!(!session.world.get(Point3::new(4, 4, 4)).is_open());
        assert!(session.world.get(Point3::new(8, 8, 8)).is_open());
    }

    #[test]
    fn failed_execute_keeps_redo_history() {
        let mut session = Session::new();
        session.execute(open_box((0, 0, 0), (1, 1, 1))).expect("fill");
        assert!(session.undo());
        let before = session.world.clone();

        let region = Region::new(Point3::new(0, 0, 0), Point3::new(1, 1, 1));
        let result = session.execute(Box::new(WorldCommand::new(SetSubdivision::new(region, 3))));
        assert!(matches!(result, Err(EditorError::InvalidArgument { .. })));
        assert_eq!(session.world, before);
        assert_eq!(session.stack.redo_name(), Some("Fill Region"));
        assert!(!session.stack.can_undo());

        assert!(session.redo());
        assert!(session.world.get(Point3::new(1, 1, 1)).is_open());
    }

    #[test]
    fn failed_undo_clears_history_and_reports() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::new();
        let sink = reports.clone();
        session
            .stack
            .set_error_handler(move |message, err| sink.borrow_mut().push(format!("{message}: {err}")));

        session.execute(open_box((0, 0, 0), (1, 1, 1))).expect("fill");
        session.execute(Box::new(Broken)).expect("broken executes");
        session.execute(open_box((2, 2, 2), (3, 3, 3))).expect("fill");
        assert!(session.undo());
        assert_eq!(session.stack.redo_len(), 1);

        assert!(!session.undo());
        assert!(!session.stack.can_undo());
        assert!(!session.stack.can_redo());
        assert_eq!(
            reports.borrow().as_slice(),
            ["Failed to undo 'Broken': Command 'Broken' failed: cannot undo"]
        );

        // The session stays usable.
        session.execute(open_box((6, 6, 6), (6, 6, 6))).expect("fill");
        assert!(session.undo());
        assert!(session.world.get(Point3::new(0, 0, 0)).is_open());
        assert!(!session.world.get(Point3::new(6, 6, 6)).is_open());
    }

    #[test]
    fn history_limit_drops_oldest() {
        let mut session = Session::new();
        session.stack = CommandStack::new().with_history_limit(Some(2));
        for x in 0..4 {
            session.execute(open_box((x, 0, 0), (x, 0, 0))).expect("fill");
        }
        assert_eq!(session.stack.undo_len(), 2);
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert!(session.world.get(Point3::new(1, 0, 0)).is_open());
        assert!(!session.world.get(Point3::new(2, 0, 0)).is_open());
    }

    #[test]
    fn dirty_chunks_and_saved_state() {
        let mut session = Session::new();
        assert!(!session.stack.is_dirty());

        let affected = session.execute(open_box((15, 0, 3), (16, 0, 3))).expect("fill");
        assert!(session.stack.is_dirty());
        assert_eq!(session.stack.undo_name(), Some("Fill Region"));
        assert!(affected.contains(&Point3::new(0, 0, 0)));
        assert!(affected.contains(&Point3::new(1, 0, 0)));
        assert!(affected.contains(&Point3::new(0, -1, 0)));

        session.stack.mark_saved();
        assert!(!session.stack.is_dirty());
        assert_eq!(session.stack.take_dirty_chunks(), affected);
        assert!(session.stack.take_dirty_chunks().is_empty());

        assert!(session.undo());
        assert!(session.stack.is_dirty());
        assert_eq!(session.stack.redo_name(), Some("Fill Region"));
        assert_eq!(session.stack.take_dirty_chunks(), affected);
        assert_eq!(session.world, World::new());
    }
}
