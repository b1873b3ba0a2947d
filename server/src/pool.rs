//! Fixed-size worker pool fed by a FIFO task queue.
//!
//! Workers block on a condition variable while the queue is empty. Every
//! submission wakes all idle workers; one of them claims the task and the rest
//! go back to waiting. Tasks run with the queue unlocked.
//!
//! Shutdown sets a flag, wakes everyone, joins the workers, and then runs any
//! task still queued on the calling thread, so a submitted task always runs
//! exactly once.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// One unit of work. Consumed by exactly one worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    tasks: VecDeque<Task>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `num_workers` workers.
    ///
    /// A worker that cannot be spawned is logged and left out; the pool keeps
    /// running with the ones that did start.
    pub fn start(num_workers: usize) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState { tasks: VecDeque::new(), shutdown: false }),
            available: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("search-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, &shared));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => tracing::error!(worker_id, error = %err, "failed to spawn worker"),
            }
        }
        tracing::info!(requested = num_workers, live = workers.len(), "worker pool started");

        Self { shared, workers }
    }

    /// Queue `task` behind everything already submitted.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        state.tasks.push_back(Box::new(task));
        self.shared.available.notify_all();
    }

    /// Workers that started successfully.
    pub fn live_workers(&self) -> usize {
        self.workers.len()
    }

    /// Tasks queued but not yet claimed by a worker.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().tasks.len()
    }

    /// Stop the workers and run whatever is left in the queue before returning.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            self.shared.available.notify_all();
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker exited abnormally");
            }
        }

        // Workers are gone; nothing else can pop from the queue now.
        let leftover: Vec<Task> = self.shared.state.lock().tasks.drain(..).collect();
        if !leftover.is_empty() {
            tracing::debug!(count = leftover.len(), "draining queued tasks on shutdown");
        }
        for task in leftover {
            if !run_task(task) {
                tracing::error!("queued task panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(worker_id: usize, shared: &Shared) {
    tracing::debug!(worker_id, "worker started");
    let mut state = shared.state.lock();
    loop {
        if let Some(task) = state.tasks.pop_front() {
            drop(state);
            if !run_task(task) {
                tracing::error!(worker_id, "task panicked");
            }
            state = shared.state.lock();
            continue;
        }
        if state.shutdown {
            break;
        }
        shared.available.wait(&mut state);
    }
    tracing::debug!(worker_id, "worker terminated");
}

// False if the task panicked.
fn run_task(task: Task) -> bool {
    panic::catch_unwind(AssertUnwindSafe(task)).is_ok()
}
