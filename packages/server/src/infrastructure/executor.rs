//! Bounded task executor
//!
//! A fixed number of workers pull fire-and-forget tasks from an unbounded
//! queue. Total concurrency is bounded by the worker count no matter how deep
//! the queue grows. Submitters never get a result back, so tasks log their own
//! failures.
//!
//! `stop_wait` is the only synchronization point: it closes the queue, lets
//! the workers drain everything that was already submitted, and returns once
//! every worker has exited.

use std::{
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
};

use futures_util::FutureExt;
use thiserror::Error;
use tokio::{
    sync::{Mutex as AsyncMutex, mpsc},
    task::JoinHandle,
};

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Submission errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("executor is stopped and no longer accepts tasks")]
    Stopped,
}

/// Fixed-size pool of background workers
pub struct TaskExecutor {
    /// `None` once `stop_wait` has begun
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    workers: AsyncMutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl TaskExecutor {
    /// Spawn `worker_count` workers on the current tokio runtime.
    ///
    /// A count of 0 is treated as 1.
    pub fn new(worker_count: usize) -> Arc<Self> {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = mpsc::unbounded_channel::<Task>();
        let queue = Arc::new(AsyncMutex::new(receiver));

        let workers = (0..worker_count)
            .map(|worker_id| tokio::spawn(worker_loop(worker_id, queue.clone())))
            .collect();

        tracing::info!("Task executor started with {} workers", worker_count);

        Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            workers: AsyncMutex::new(workers),
            worker_count,
        })
    }

    /// Enqueue a task and return immediately.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Stopped` once `stop_wait` has been called.
    pub fn submit<F>(&self, task: F) -> Result<(), ExecutorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => sender
                .send(Box::pin(task))
                .map_err(|_| ExecutorError::Stopped),
            None => Err(ExecutorError::Stopped),
        }
    }

    /// Stop accepting tasks and wait for queued and in-flight tasks to finish.
    ///
    /// Calling it again after the first call returns immediately.
    pub async fn stop_wait(&self) {
        // Dropping the sender closes the queue; workers exit once it is drained
        drop(
            self.sender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );

        let workers = std::mem::take(&mut *self.workers.lock().await);
        if workers.is_empty() {
            return;
        }

        tracing::info!("Waiting for {} workers to drain the queue", workers.len());
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!("Executor worker terminated abnormally: {}", e);
            }
        }
        tracing::info!("Task executor stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

async fn worker_loop(worker_id: usize, queue: Arc<AsyncMutex<mpsc::UnboundedReceiver<Task>>>) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        // Only one idle worker waits on the channel at a time; the lock is
        // released before the task runs.
        let task = queue.lock().await.recv().await;
        let Some(task) = task else {
            break;
        };

        // A panicking task must not take its worker down with it
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            tracing::error!("Worker {} caught a panicking task", worker_id);
        }
    }

    tracing::debug!("Worker {} exited", worker_id);
}
