/*!
# Worker pool
A fixed-size pool that runs fallible tasks in submission order.
The first failure is kept, and any task that has not started yet is skipped once a failure is recorded.
*/

use anyhow::Context;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};

/// Counts tasks that are queued or running
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    done: Condvar
}

impl Pending {
    fn add(&self) {
        match self.count.lock() {
            Ok(mut count) => *count += 1,
            Err(poisoned) => *poisoned.into_inner() += 1
        }
    }

    fn remove(&self) {
        match self.count.lock() {
            Ok(mut count) => *count -= 1,
            Err(poisoned) => *poisoned.into_inner() -= 1
        }
        self.done.notify_all();
    }

    fn wait(&self) {
        let guard = match self.count.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner()
        };
        // a poisoned wait still means the count reached zero or a task panicked
        let remaining = match self.done.wait_while(guard, |count| *count > 0) {
            Ok(count) => count,
            Err(poisoned) => poisoned.into_inner()
        };
        drop(remaining);
    }
}

/// Decrements the pending count even if the task unwinds
struct PendingGuard(Arc<Pending>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.remove();
    }
}

/// Runs tasks on a dedicated thread pool
pub struct WorkerPool {
    /// The underlying pool
    pool: rayon::ThreadPool,
    /// Set on the first failure
    cancelled: Arc<AtomicBool>,
    /// The first failure
    error: Arc<OnceLock<anyhow::Error>>,
    /// Tasks not yet finished
    pending: Arc<Pending>
}

impl WorkerPool {
    /// Creates a pool
    /// # Arguments
    /// * `threads` - the number of worker threads
    /// # Errors
    /// * if the thread pool cannot be built
    pub fn new(threads: usize) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("haplosync-worker-{i}"))
            .build()
            .with_context(|| format!("Error while building a pool with {threads} threads:"))?;
        Ok(Self {
            pool,
            cancelled: Arc::new(AtomicBool::new(false)),
            error: Arc::new(OnceLock::new()),
            pending: Arc::new(Pending::default())
        })
    }

    /// Queues a task. Tasks start in the order they are queued.
    /// # Arguments
    /// * `label` - describes the task in error messages
    /// * `task` - the work to run
    pub fn execute<F>(&self, label: String, task: F)
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static
    {
        self.pending.add();
        let guard = PendingGuard(self.pending.clone());
        let cancelled = self.cancelled.clone();
        let error = self.error.clone();
        self.pool.spawn_fifo(move || {
            let _guard = guard;
            // dropped before the guard, so `terminate` sees the only remaining handle
            let (cancelled, error) = (cancelled, error);
            if cancelled.load(Ordering::Acquire) {
                debug!("Skipping {label} after an earlier failure");
                return;
            }
            if let Err(e) = task() {
                let e = e.context(format!("Error while processing {label}:"));
                cancelled.store(true, Ordering::Release);
                if let Err(later) = error.set(e) {
                    warn!("Additional failure ignored: {later:#}");
                }
            }
        });
    }

    /// True once any task has failed
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Waits for every queued task to finish or be skipped, then returns the first failure.
    /// # Errors
    /// * the first error returned by any task, with its context chain
    pub fn terminate(self) -> anyhow::Result<()> {
        self.pending.wait();
        let WorkerPool { error, .. } = self;
        match Arc::into_inner(error).and_then(|e| e.into_inner()) {
            Some(e) => Err(e),
            None => Ok(())
        }
    }
}
