use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::TrySendError;

use crate::pipeline::detection_task::DetectionTask;
use crate::pipeline::task_dispatcher::{DispatchError, TaskDispatcher};
use crate::shared::frame::Frame;

/// Totals observed over the pool's lifetime, returned by `shutdown`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoolStats {
    pub completed: u64,
    pub failed: u64,
}

/// Bounded pool of detection workers.
///
/// Each worker thread owns one `DetectionTask`; a bounded channel feeds
/// them. Dispatch uses `try_send`, so a full queue surfaces as a rejection
/// at the call site instead of back-pressure on the capture loop. The
/// in-flight counter covers jobs queued plus jobs being processed.
pub struct DetectionWorkerPool {
    job_tx: crossbeam_channel::Sender<Frame>,
    workers: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl DetectionWorkerPool {
    /// One worker thread per task. `queue_capacity` bounds how many frames
    /// may wait for a free worker.
    pub fn new(tasks: Vec<DetectionTask>, queue_capacity: usize) -> Result<Self, &'static str> {
        if tasks.is_empty() {
            return Err("worker pool needs at least one task");
        }
        if queue_capacity == 0 {
            return Err("queue capacity must be >= 1");
        }

        let (job_tx, job_rx) = crossbeam_channel::bounded::<Frame>(queue_capacity);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let workers = tasks
            .into_iter()
            .enumerate()
            .map(|(id, task)| {
                spawn_worker(
                    id,
                    task,
                    job_rx.clone(),
                    in_flight.clone(),
                    completed.clone(),
                    failed.clone(),
                )
            })
            .collect();

        Ok(Self {
            job_tx,
            workers,
            in_flight,
            completed,
            failed,
        })
    }

    /// Jobs queued or currently being processed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Closes the queue, lets the workers drain it, and joins them.
    pub fn shutdown(self) -> PoolStats {
        let Self {
            job_tx,
            workers,
            completed,
            failed,
            ..
        } = self;

        drop(job_tx);
        for handle in workers {
            if handle.join().is_err() {
                log::error!("detection worker panicked");
            }
        }

        let stats = PoolStats {
            completed: completed.load(Ordering::SeqCst),
            failed: failed.load(Ordering::SeqCst),
        };
        log::info!(
            "detection workers drained: {} completed, {} failed",
            stats.completed,
            stats.failed
        );
        stats
    }
}

impl TaskDispatcher for DetectionWorkerPool {
    fn dispatch(&self, frame: Frame) -> Result<(), DispatchError> {
        // Count before sending so a fast worker can never decrement first.
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        match self.job_tx.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                let in_flight = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
                Err(DispatchError::QueueFull { in_flight })
            }
            Err(TrySendError::Disconnected(_)) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Err(DispatchError::Closed)
            }
        }
    }
}

fn spawn_worker(
    id: usize,
    mut task: DetectionTask,
    job_rx: crossbeam_channel::Receiver<Frame>,
    in_flight: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame in job_rx {
            let index = frame.index();
            match task.process(frame) {
                Ok(report) => {
                    if report.matched > 0 {
                        log::info!(
                            "worker {id}: frame {index}: {} record(s), {} notified, {} notify failure(s)",
                            report.records,
                            report.notified,
                            report.notify_failures
                        );
                    }
                    completed.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => {
                    log::error!("worker {id}: frame {index}: {e}");
                    failed.fetch_add(1, Ordering::SeqCst);
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    })
}
