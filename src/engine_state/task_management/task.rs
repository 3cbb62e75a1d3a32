//! # Task Traits
//!
//! The two halves of a background job: the part that runs on a worker and the
//! part that runs back on the session thread.
//!
//! A [`Task`] is published with `TaskManager::publish_task()`, its `process()`
//! runs on a worker and returns a boxed [`TaskResult`], and that result's
//! `handle_result()` runs on the session thread with access to the mesh cache.
//! Both halves cross threads, so both are `Send`; shared state such as the
//! world travels inside the task as an `MtResource` handle.

use crate::engine_state::rendering::meshing::MeshCache;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own everything they need, typically a clone of a shared resource
/// handle plus the parameters of the job.
pub trait Task: Send {
    /// Performs the work and returns a result for the session thread.
    ///
    /// Runs on a background thread. Errors are handled internally and reported
    /// through the result.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Handles the result of a completed task on the session thread.
    ///
    /// # Arguments
    /// * `mesh_cache` - Cache finished chunk meshes are stored in
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, mesh_cache: &mut MeshCache) -> Vec<Box<dyn Task + Send>>;
}
