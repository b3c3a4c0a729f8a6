//! # Worker Pool
//!
//! A fixed number of tasks draining one shared, order-preserving queue.
//!
//! Workers pull items until the queue is both **closed** (every sender has
//! been dropped) and **drained**, then exit. A pool is finished once all of
//! its workers have exited, which [`PoolHandle::wait`] observes by joining
//! them, no counters or polling involved.
//!
//! Anything a handler owns (typically the senders of downstream queues) is
//! dropped together with the worker, so a downstream queue closes exactly
//! when the last upstream worker is done.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Receiving end of a queue, shared by every worker of one pool.
pub struct WorkQueue<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> WorkQueue<T> {
    /// Waits for the next item, `None` once the queue is closed and empty.
    pub async fn next(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}

/// Creates a bounded queue. Senders block while it holds `capacity` items.
pub fn queue<T>(capacity: usize) -> (mpsc::Sender<T>, WorkQueue<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let queue = WorkQueue {
        rx: Arc::new(Mutex::new(rx)),
    };
    (tx, queue)
}

pub struct WorkerPool {
    name: &'static str,
    workers: usize,
}

impl WorkerPool {
    /// A pool always runs at least one worker, an empty pool would never
    /// drain its queue.
    pub fn new(name: &'static str, workers: usize) -> Self {
        if workers == 0 {
            warn!("{name}: zero workers requested, running one");
        }
        Self {
            name,
            workers: workers.max(1),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Starts the workers. Each one gets its own clone of `handler`.
    pub fn spawn<T, F, Fut>(self, queue: WorkQueue<T>, handler: F) -> PoolHandle
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut tasks: JoinSet<usize> = JoinSet::new();

        for _ in 0..self.workers {
            let queue: WorkQueue<T> = queue.clone();
            let handler: F = handler.clone();

            tasks.spawn(async move {
                let mut handled: usize = 0;
                while let Some(item) = queue.next().await {
                    handler(item).await;
                    handled += 1;
                }
                handled
            });
        }

        debug!("{}: {} workers started", self.name, self.workers);

        PoolHandle {
            name: self.name,
            tasks,
        }
    }
}

/// Completion handle of a running pool.
///
/// Dropping it aborts the workers, so it has to be awaited.
#[must_use = "dropping a PoolHandle aborts its workers"]
pub struct PoolHandle {
    name: &'static str,
    tasks: JoinSet<usize>,
}

impl PoolHandle {
    /// Waits for every worker to exit and returns the number of items
    /// handled by the whole pool.
    pub async fn wait(mut self) -> usize {
        let mut handled: usize = 0;
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(count) => handled += count,
                Err(e) => error!("{}: worker crashed: {e}", self.name),
            }
        }
        debug!("{}: drained after {handled} items", self.name);
        handled
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
