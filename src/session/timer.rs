//! Cancellable timers backed by tokio tasks
//!
//! A `Timer` owns one spawned task. Cancelling or dropping it aborts the task,
//! so a session that goes away can never leave ticks running behind it.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a scheduled task
///
/// Must be created from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Timer {
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    /// A timer that is not running
    pub fn idle() -> Self {
        Self { handle: None }
    }

    /// Run `task` in the background until it finishes or the timer is cancelled
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(task)),
        }
    }

    /// Run `task` once after `delay`
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        })
    }

    /// Call `tick` every `period`, starting one period from now
    ///
    /// The timer stops on its own once `tick` resolves to `false`.
    pub fn every<F, Fut>(period: Duration, tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::spawn(run_periodic(period, tick))
    }

    /// Abort the task if it is still scheduled
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the task is scheduled and has not finished
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drive `tick` once per `period` until it returns `false`
pub(crate) async fn run_periodic<F, Fut>(period: Duration, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if !tick().await {
            break;
        }
    }
}
