//! Background execution of simulation runs.
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Done,
    /// Holds the error description.
    Failed(String),
}

pub type Work = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

pub trait TaskQueue {
    /// Queues `work` for simulation `key`.
    ///
    /// While a task for `key` is still pending, its id is returned and `work` is dropped.
    fn submit(&self, key: &str, work: Work) -> TaskId;
    fn poll(&self, id: TaskId) -> Option<TaskState>;
    /// Most recent task submitted for `key`.
    fn task_for(&self, key: &str) -> Option<TaskId>;
}

#[derive(Default)]
struct QueueState {
    next_id: u64,
    states: HashMap<TaskId, TaskState>,
    latest: HashMap<String, TaskId>,
    handles: HashMap<TaskId, JoinHandle<()>>,
}

/// Runs every task on its own OS thread.
#[derive(Clone, Default)]
pub struct LocalTaskQueue {
    state: Arc<Mutex<QueueState>>,
}

impl LocalTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        lock(&self.state)
    }

    /// Blocks until task `id` has finished and returns its final state.
    pub fn wait(&self, id: TaskId) -> Option<TaskState> {
        let handle = self.lock().handles.remove(&id);
        if let Some(handle) = handle {
            // panics are caught inside the task
            let _ = handle.join();
        }
        self.poll(id)
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TaskQueue for LocalTaskQueue {
    fn submit(&self, key: &str, work: Work) -> TaskId {
        let mut state = self.lock();
        if let Some(&id) = state.latest.get(key) {
            if state.states.get(&id) == Some(&TaskState::Pending) {
                log::info!("simulation {key} already has task {id} in flight");
                return id;
            }
        }

        let id = TaskId(state.next_id);
        state.next_id += 1;
        state.states.insert(id, TaskState::Pending);
        state.latest.insert(key.to_string(), id);

        let shared = Arc::clone(&self.state);
        let key = key.to_string();
        let handle = thread::spawn(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(Ok(())) => TaskState::Done,
                Ok(Err(e)) => TaskState::Failed(e.to_string()),
                Err(_) => TaskState::Failed("task panicked".to_string()),
            };
            match &outcome {
                TaskState::Failed(reason) => log::error!("task {id} for {key} failed: {reason}"),
                _ => log::info!("task {id} for {key} finished"),
            }
            lock(&shared).states.insert(id, outcome);
        });
        state.handles.insert(id, handle);
        id
    }

    fn poll(&self, id: TaskId) -> Option<TaskState> {
        self.lock().states.get(&id).cloned()
    }

    fn task_for(&self, key: &str) -> Option<TaskId> {
        self.lock().latest.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::mpsc;

    #[test]
    fn test_done_and_failed() {
        let queue = LocalTaskQueue::new();
        let ok = queue.submit("sim_a", Box::new(|| Ok(())));
        let bad = queue.submit(
            "sim_b",
            Box::new(|| Err(Error::Config("worker count must be at least 1".to_string()))),
        );
        assert_eq!(queue.wait(ok), Some(TaskState::Done));
        assert_eq!(
            queue.wait(bad),
            Some(TaskState::Failed(
                "invalid configuration: worker count must be at least 1".to_string()
            ))
        );
        assert_eq!(queue.poll(TaskId(99)), None);
    }

    #[test]
    fn test_in_flight_dedupe() {
        let queue = LocalTaskQueue::new();
        let (release, gate) = mpsc::channel::<()>();
        let first = queue.submit(
            "sim_a",
            Box::new(move || {
                let _ = gate.recv();
                Ok(())
            }),
        );
        assert_eq!(queue.poll(first), Some(TaskState::Pending));
        let again = queue.submit("sim_a", Box::new(|| Ok(())));
        assert_eq!(again, first);
        let other = queue.submit("sim_b", Box::new(|| Ok(())));
        assert_ne!(other, first);

        release.send(()).unwrap();
        assert_eq!(queue.wait(first), Some(TaskState::Done));

        // finished tasks do not block resubmission
        let rerun = queue.submit("sim_a", Box::new(|| Ok(())));
        assert_ne!(rerun, first);
        assert_eq!(queue.task_for("sim_a"), Some(rerun));
        queue.wait(rerun);
        queue.wait(other);
    }

    #[test]
    fn test_panic_is_failure() {
        let queue = LocalTaskQueue::new();
        let id = queue.submit("sim_c", Box::new(|| -> Result<()> { panic!("boom") }));
        assert_eq!(queue.wait(id), Some(TaskState::Failed("task panicked".to_string())));
    }
}
