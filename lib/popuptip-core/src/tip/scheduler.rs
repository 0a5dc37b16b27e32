use crate::{PopupTipError, PopupTipResult};
use log::{debug, trace};
use std::sync::mpsc;
use std::thread::{self, ThreadId};
use std::time::Duration;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// Single background worker that fires one-shot timeouts.
///
/// The worker thread drives a current-thread tokio runtime until the scheduler
/// is dropped. Every timeout is a task on that runtime, so actions never run
/// concurrently with each other.
pub struct Scheduler {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
    worker_id: ThreadId,
}

impl Scheduler {
    pub fn new() -> PopupTipResult<Self> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let worker = thread::Builder::new()
            .name("popuptip-scheduler".to_string())
            .spawn(move || {
                let rt = match Builder::new_current_thread().enable_time().build() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                let _ = ready_tx.send(Ok(rt.handle().clone()));
                rt.block_on(async {
                    let _ = shutdown_rx.await;
                });
                debug!("Scheduler worker stopped");
            })
            .map_err(|e| PopupTipError::Scheduler(format!("Failed to spawn worker: {e}")))?;

        let handle = ready_rx
            .recv()
            .map_err(|_| PopupTipError::Scheduler("Worker exited before starting".to_string()))?
            .map_err(PopupTipError::Scheduler)?;

        Ok(Self {
            handle,
            shutdown: Some(shutdown_tx),
            worker_id: worker.thread().id(),
            worker: Some(worker),
        })
    }

    /// Runs `action` on the worker once `delay` has elapsed. A zero delay fires
    /// on the next tick of the worker.
    pub fn schedule<F>(&self, delay: Duration, action: F) -> TimeoutHandle
    where
        F: FnOnce() + Send + 'static,
    {
        trace!("Scheduling timeout in {}ms", delay.as_millis());
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        TimeoutHandle {
            abort: task.abort_handle(),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        // Dropped from inside a timeout action; the worker finishes on its own.
        if thread::current().id() == self.worker_id {
            return;
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Cancellable handle to a scheduled timeout.
#[derive(Debug)]
pub struct TimeoutHandle {
    abort: AbortHandle,
}

impl TimeoutHandle {
    /// Best-effort cancellation. An action that has already started runs to
    /// completion.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_timeout_fires() {
        let scheduler = Scheduler::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let start = Instant::now();
        scheduler.schedule(Duration::from_millis(20), move || {
            let _ = tx.send(());
        });

        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_zero_delay_fires() {
        let scheduler = Scheduler::new().unwrap();
        let (tx, rx) = mpsc::channel();
        scheduler.schedule(Duration::ZERO, move || {
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let scheduler = Scheduler::new().unwrap();
        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        let timeout = scheduler.schedule(Duration::from_millis(50), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        timeout.cancel();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timeout.is_finished());
    }

    #[test]
    fn test_timeouts_fire_in_deadline_order() {
        let scheduler = Scheduler::new().unwrap();
        let (tx, rx) = mpsc::channel();
        for (delay, label) in [(60, "late"), (10, "early")] {
            let tx = tx.clone();
            scheduler.schedule(Duration::from_millis(delay), move || {
                let _ = tx.send(label);
            });
        }

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "early");
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "late");
    }

    #[test]
    fn test_drop_discards_pending() {
        let fired = Arc::new(AtomicU32::new(0));
        {
            let scheduler = Scheduler::new().unwrap();
            let fired_clone = fired.clone();
            scheduler.schedule(Duration::from_millis(50), move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            });
        }
        thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
