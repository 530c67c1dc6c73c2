//! Scheduled refresh for list views.
//!
//! A [`PollingController`] owns at most one background task. The task fetches
//! immediately, then once per period, running fetches one after another.
//! `deactivate` cancels the schedule; a fetch already in flight is allowed to
//! finish, and the [`ActivityToken`] it was handed tells it whether its result
//! may still be applied.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// When a view refreshes its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// Fetch once on activation.
    Once,
    /// Fetch on activation and then every period until deactivated.
    Every(Duration),
}

impl RefreshSchedule {
    /// `None` or zero means fetch once.
    pub fn from_secs(secs: Option<u64>) -> Self {
        match secs {
            Some(secs) if secs > 0 => RefreshSchedule::Every(Duration::from_secs(secs)),
            _ => RefreshSchedule::Once,
        }
    }
}

/// Liveness of one activation of a view.
///
/// Cleared when the view is deactivated. Fetches check it before applying
/// results, so nothing lands in a view that is no longer shown.
#[derive(Debug, Clone)]
pub struct ActivityToken {
    active: Arc<AtomicBool>,
}

impl ActivityToken {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A token that is never deactivated, for one-shot refreshes.
    pub fn detached() -> Self {
        Self::new()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

type FetchFn = Arc<dyn Fn(ActivityToken) -> BoxFuture<'static, ()> + Send + Sync>;

struct Running {
    cancel: CancellationToken,
    token: ActivityToken,
    task: JoinHandle<()>,
}

/// Idle/Polling state machine around a fetch closure.
pub struct PollingController {
    name: String,
    schedule: RefreshSchedule,
    fetch: FetchFn,
    running: Mutex<Option<Running>>,
}

impl PollingController {
    pub fn new<F, Fut>(name: impl Into<String>, schedule: RefreshSchedule, fetch: F) -> Self
    where
        F: Fn(ActivityToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            schedule,
            fetch: Arc::new(move |token| -> BoxFuture<'static, ()> { Box::pin(fetch(token)) }),
            running: Mutex::new(None),
        }
    }

    pub fn schedule(&self) -> RefreshSchedule {
        self.schedule
    }

    fn lock(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts the schedule. Activating an already active controller is a
    /// no-op that returns the current token.
    pub fn activate(&self) -> ActivityToken {
        let mut running = self.lock();
        if let Some(current) = running.as_ref() {
            tracing::debug!(target: "polling", "[Polling] {} already active", self.name);
            return current.token.clone();
        }

        let cancel = CancellationToken::new();
        let token = ActivityToken::new();
        let task = tokio::spawn(run(
            self.name.clone(),
            self.schedule,
            self.fetch.clone(),
            cancel.clone(),
            token.clone(),
        ));
        tracing::debug!(target: "polling", "[Polling] {} activated ({:?})", self.name, self.schedule);

        *running = Some(Running {
            cancel,
            token: token.clone(),
            task,
        });
        token
    }

    /// Stops the schedule. No fetch starts after this returns; a fetch in
    /// flight completes but sees an inactive token.
    pub fn deactivate(&self) {
        if let Some(running) = self.lock().take() {
            running.cancel.cancel();
            running.token.clear();
            tracing::debug!(target: "polling", "[Polling] {} deactivated", self.name);
        }
    }

    /// Token of the current activation, if the controller is polling.
    pub fn token(&self) -> Option<ActivityToken> {
        self.lock().as_ref().map(|running| running.token.clone())
    }

    /// Whether the controller is in the Polling state.
    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Whether the background task has ended (schedule finished or cancelled).
    pub fn is_task_finished(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|running| running.task.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn run(
    name: String,
    schedule: RefreshSchedule,
    fetch: FetchFn,
    cancel: CancellationToken,
    token: ActivityToken,
) {
    match schedule {
        RefreshSchedule::Once => {
            if !cancel.is_cancelled() {
                fetch(token).await;
            }
        }
        RefreshSchedule::Every(period) => {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tracing::trace!(target: "polling", "[Polling] {} tick", name);
                fetch(token.clone()).await;
            }
        }
    }
    tracing::trace!(target: "polling", "[Polling] {} task ended", name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(
        schedule: RefreshSchedule,
        fetch_time: Duration,
    ) -> (PollingController, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let started = Arc::new(AtomicUsize::new(0));
        let applied = Arc::new(AtomicUsize::new(0));
        let (s, a) = (started.clone(), applied.clone());
        let controller = PollingController::new("test", schedule, move |token: ActivityToken| {
            let (s, a) = (s.clone(), a.clone());
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(fetch_time).await;
                if token.is_active() {
                    a.fetch_add(1, Ordering::SeqCst);
                }
            }
        });
        (controller, started, applied)
    }

    #[test]
    fn test_schedule_from_secs() {
        assert_eq!(RefreshSchedule::from_secs(None), RefreshSchedule::Once);
        assert_eq!(RefreshSchedule::from_secs(Some(0)), RefreshSchedule::Once);
        assert_eq!(
            RefreshSchedule::from_secs(Some(5)),
            RefreshSchedule::Every(Duration::from_secs(5))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_fetches_immediately_then_per_period() {
        let (controller, started, _) =
            counting(RefreshSchedule::Every(Duration::from_secs(5)), Duration::ZERO);

        controller.activate();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(started.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_stops_new_fetches() {
        let (controller, started, _) =
            counting(RefreshSchedule::Every(Duration::from_secs(5)), Duration::ZERO);

        controller.activate();
        tokio::time::sleep(Duration::from_secs(6)).await;
        let before = started.load(Ordering::SeqCst);
        assert_eq!(before, 2);

        controller.deactivate();
        assert!(!controller.is_active());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(started.load(Ordering::SeqCst), before);
        assert!(controller.is_task_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_fetch_completes_but_is_not_applied() {
        let (controller, started, applied) =
            counting(RefreshSchedule::Every(Duration::from_secs(5)), Duration::from_secs(2));

        controller.activate();
        // First fetch is mid-flight at t=1s
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        controller.deactivate();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(applied.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetches_do_not_overlap() {
        let (controller, started, applied) =
            counting(RefreshSchedule::Every(Duration::from_secs(1)), Duration::from_secs(3));

        controller.activate();
        tokio::time::sleep(Duration::from_millis(6500)).await;

        // Fetches at 0s, 3s, 6s run back to back
        assert_eq!(started.load(Ordering::SeqCst), 3);
        assert_eq!(applied.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_and_double_activation() {
        let (controller, started, applied) = counting(RefreshSchedule::Once, Duration::ZERO);

        let first = controller.activate();
        let second = controller.activate();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(first.is_active() && second.is_active());
        assert!(controller.is_active());
        assert!(controller.is_task_finished());

        assert!(controller.token().is_some_and(|t| t.is_active()));
        controller.deactivate();
        assert!(!first.is_active());
        assert!(controller.token().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_deactivates() {
        let (controller, started, _) =
            counting(RefreshSchedule::Every(Duration::from_secs(5)), Duration::ZERO);
        let token = controller.activate();
        tokio::time::sleep(Duration::from_millis(10)).await;

        drop(controller);
        assert!(!token.is_active());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
