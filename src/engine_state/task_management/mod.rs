//! # Task Management
//!
//! A small worker pool that remeshes chunks off the session thread, so an edit
//! spanning many chunks never stalls the editor.
//!
//! ## Pieces
//!
//! - `TaskManager`: owns the workers, hands out jobs and collects what comes back
//! - `Task`: a job run on a worker
//! - `TaskResult`: what a job sends back; handling it may publish further jobs
//! - `TaskChannel`: the task/result channel pair of one worker
//!
//! Each worker is a `std::thread` fed through its own mpsc channel. Jobs go to
//! workers round-robin, at most [`MAX_TASKS_IN_FLIGHT`] per worker; the rest wait
//! in a FIFO queue.
//!
//! ## Flow
//! 1. The session publishes a job with `TaskManager::publish_task()`
//! 2. An idle worker takes it right away, otherwise it waits in the queue
//! 3. The worker runs the job and sends the result back
//! 4. `process_completed_tasks()` hands results to the mesh cache on the session thread
//! 5. `process_queued_tasks()` moves waiting jobs onto workers that became idle
//!
//! ## Example Usage
//! ```rust
//! use voxel_editor_engine::{MeshCache, TaskManager};
//!
//! let mut task_manager = TaskManager::new(2);
//! let mut mesh_cache = MeshCache::new(64);
//!
//! // In the editor loop:
//! task_manager.process_completed_tasks(&mut mesh_cache);
//! task_manager.process_queued_tasks();
//! assert_eq!(task_manager.pending_tasks(), 0);
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{error, info};
use task::{Task, TaskResult};

use super::rendering::meshing::MeshCache;

/// A communication channel between the session thread and a worker thread.
///
/// Dropping the channel drops the task sender, which ends the worker's receive
/// loop and lets the thread exit.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// The mesh worker pool.
///
/// `current_channel` is where the next round-robin search starts.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Jobs a single worker may hold at once.
///
/// At 1 a busy worker never sits on a backlog while another worker is idle.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Spawns `num_workers` worker threads (at least one).
    pub fn new(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        info!(
            "Started {} mesh workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks queued or running.
    pub fn pending_tasks(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    /// Hands `task` to worker `channel_idx`.
    ///
    /// A worker that has exited gives the task back as `Err` so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                error!("Mesh worker {} is no longer running", channel_idx);
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|idx| self.channels[*idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Schedules a job.
    ///
    /// # Returns
    /// `true` if a worker took it straight away, `false` if it was queued.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers as long as any worker is free.
    ///
    /// Tasks are dispatched in FIFO order. Dispatch stops at the first task no
    /// worker can take.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles every result that has already arrived, without blocking.
    ///
    /// Follow-up tasks returned by the results are published.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self, mesh_cache: &mut MeshCache) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                tasks_to_queue.extend(result.handle_result(mesh_cache));
                handled += 1;
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Runs until every queued and in-flight task has completed, blocking on
    /// worker results.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn finish_all(&mut self, mesh_cache: &mut MeshCache) -> usize {
        let mut handled = 0;
        loop {
            self.process_queued_tasks();
            let Some(channel_idx) = self
                .channels
                .iter()
                .position(|channel| channel.num_tasks_in_flight > 0)
            else {
                if self.queued_tasks.is_empty() {
                    return handled;
                }
                // Every worker has exited; the queue can never drain.
                error!("Dropping {} tasks with no worker left", self.queued_tasks.len());
                self.queued_tasks.clear();
                return handled;
            };

            let channel = &mut self.channels[channel_idx];
            channel.num_tasks_in_flight -= 1;
            match channel.result_receiver.recv() {
                Ok(result) => {
                    for task in result.handle_result(mesh_cache) {
                        self.publish_task(task);
                    }
                    handled += 1;
                }
                Err(_) => error!("Mesh worker {} stopped before returning a result", channel_idx),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountingTask {
        counter: Arc<AtomicUsize>,
        follow_ups: usize,
    }

    struct CountingResult {
        counter: Arc<AtomicUsize>,
        follow_ups: usize,
    }

    impl Task for CountingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingResult {
                counter: self.counter.clone(),
                follow_ups: self.follow_ups,
            })
        }
    }

    impl TaskResult for CountingResult {
        fn handle_result(self: Box<Self>, _mesh_cache: &mut MeshCache) -> Vec<Box<dyn Task + Send>> {
            (0..self.follow_ups)
                .map(|_| {
                    Box::new(CountingTask {
                        counter: self.counter.clone(),
                        follow_ups: 0,
                    }) as Box<dyn Task + Send>
                })
                .collect()
        }
    }

    #[test]
    fn runs_queued_and_follow_up_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(2);
        let mut cache = MeshCache::new(4);

        for _ in 0..5 {
            manager.publish_task(Box::new(CountingTask {
                counter: counter.clone(),
                follow_ups: 1,
            }));
        }
        assert_eq!(manager.pending_tasks(), 5);

        let handled = manager.finish_all(&mut cache);
        assert_eq!(handled, 10);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert_eq!(manager.pending_tasks(), 0);
    }

    #[test]
    fn zero_workers_still_gets_one() {
        assert_eq!(TaskManager::new(0).worker_count(), 1);
    }
}
