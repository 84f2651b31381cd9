//! Background task execution for image loading.
//!
//! Work runs on a small pool of named worker threads; finished results queue up
//! until the owning thread calls [`BackgroundExecutor::process_results`]. That
//! keeps every scene mutation on the thread that dispatches pointer events,
//! while fetch and decode happen off it.

use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, trace};

/// Outcome of a task: its value, or the panic message if it panicked.
pub type TaskResult<T> = Result<T, String>;

type Job<T> = Box<dyn FnOnce() -> T + Send + 'static>;

struct Envelope<T> {
    name: String,
    job: Job<T>,
}

/// A finished task waiting to be applied on the owning thread.
#[derive(Debug)]
pub struct Completed<T> {
    pub name: String,
    pub result: TaskResult<T>,
    pub elapsed: Duration,
}

/// Fixed-size worker pool whose results are drained by the owner.
pub struct BackgroundExecutor<T: Send + 'static> {
    job_tx: Option<Sender<Envelope<T>>>,
    result_rx: Receiver<Completed<T>>,
    pending: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> BackgroundExecutor<T> {
    pub fn new(threads: usize) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Envelope<T>>();
        let (result_tx, result_rx) = mpsc::channel::<Completed<T>>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let workers = (0..threads.max(1))
            .filter_map(|index| {
                let job_rx = Arc::clone(&job_rx);
                let result_tx = result_tx.clone();
                thread::Builder::new()
                    .name(format!("overlay-loader-{index}"))
                    .spawn(move || worker_loop(job_rx, result_tx))
                    .map_err(|e| error!("Failed to spawn loader thread {}: {}", index, e))
                    .ok()
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            result_rx,
            pending: Arc::new(AtomicUsize::new(0)),
            workers,
        }
    }

    /// Queue `work` on the pool.
    pub fn spawn<F>(&self, name: &str, work: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let Some(ref job_tx) = self.job_tx else { return };

        self.pending.fetch_add(1, Ordering::SeqCst);
        let envelope = Envelope {
            name: name.to_string(),
            job: Box::new(work),
        };
        if job_tx.send(envelope).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!("Loader pool is gone, dropping task {}", name);
        }
    }

    /// Drain every result that has finished so far without blocking.
    pub fn process_results(&self) -> Vec<Completed<T>> {
        let mut finished = Vec::new();
        while let Ok(completed) = self.result_rx.try_recv() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            finished.push(completed);
        }
        finished
    }

    /// Block until all queued work has finished or `timeout` elapses.
    pub fn wait_for_all(&self, timeout: Duration) -> Vec<Completed<T>> {
        let deadline = Instant::now() + timeout;
        let mut finished = self.process_results();

        while self.has_pending() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(completed) => {
                    self.pending.fetch_sub(1, Ordering::SeqCst);
                    finished.push(completed);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        finished
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl<T: Send + 'static> Drop for BackgroundExecutor<T> {
    fn drop(&mut self) {
        // Closing the job channel ends each worker loop.
        self.job_tx.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop<T: Send + 'static>(
    job_rx: Arc<Mutex<Receiver<Envelope<T>>>>,
    result_tx: Sender<Completed<T>>,
) {
    loop {
        let envelope = {
            let rx = job_rx.lock();
            rx.recv()
        };
        let Ok(Envelope { name, job }) = envelope else { break };

        let start = Instant::now();
        let result = catch_unwind(AssertUnwindSafe(job)).map_err(|panic| panic_message(&*panic));
        let elapsed = start.elapsed();
        trace!(task = %name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Task finished");

        if result_tx.send(Completed { name, result, elapsed }).is_err() {
            break;
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}
