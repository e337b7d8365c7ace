//! Cancellable fixed-interval task scheduling.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Timing of a repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Delay before the first tick.
    pub initial_delay: Duration,
    /// Delay between the end of one tick and the start of the next.
    pub interval: Duration,
}

impl Schedule {
    pub fn every(interval: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

/// Handle to a task started by [`schedule`].
///
/// Releasing the handle (dropping it) cancels the task, as does
/// [`TaskHandle::cancel`]. Cancellation is observed between ticks: a tick
/// that is already running finishes, and no further tick starts.
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the task has exited (after cancellation, or a panic in a tick).
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel and wait for the in-flight tick, if any, to complete.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `tick` on the current tokio runtime according to `schedule`.
///
/// Ticks never overlap: the interval is measured from the completion of the
/// previous tick, whatever its outcome.
pub fn schedule<F, Fut>(schedule: Schedule, tick: F) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    schedule_after(None, schedule, tick)
}

/// Like [`schedule`], replacing `previous`.
///
/// `previous` is cancelled, and the new task waits for it to exit before its
/// first tick, so a tick of the old task still in flight never overlaps one
/// of the new task.
pub fn schedule_after<F, Fut>(
    previous: Option<TaskHandle>,
    schedule: Schedule,
    mut tick: F,
) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let predecessor = previous.and_then(|mut handle| {
        handle.cancel();
        handle.join.take()
    });
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let join = tokio::spawn(async move {
        // Awaited even when cancelled meanwhile: later replacements chain on
        // this task's exit.
        if let Some(predecessor) = predecessor {
            let _ = predecessor.await;
        }
        let mut delay = schedule.initial_delay;
        loop {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
            tick().await;
            delay = schedule.interval;
        }
    });
    TaskHandle {
        token,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<()> + Send {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_after_initial_delay_then_every_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let sched = Schedule::every(Duration::from_secs(5)).with_initial_delay(Duration::from_secs(1));
        let _handle = schedule(sched, counting(&counter));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_ticks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = schedule(Schedule::every(Duration::from_secs(1)), counting(&counter));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_waits_for_running_tick() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicUsize::new(0));
        let slow_tick = {
            let in_flight = in_flight.clone();
            let overlapped = overlapped.clone();
            move || {
                let in_flight = in_flight.clone();
                let overlapped = overlapped.clone();
                async move {
                    if in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlapped.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
            }
        };
        let first = schedule(Schedule::every(Duration::from_secs(5)), slow_tick.clone());
        tokio::time::sleep(Duration::from_millis(500)).await;

        let second = schedule_after(
            Some(first),
            Schedule::every(Duration::from_secs(5)),
            slow_tick,
        );
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(in_flight.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
        drop(second);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_task_exit() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = schedule(Schedule::every(Duration::from_secs(1)), counting(&counter));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
