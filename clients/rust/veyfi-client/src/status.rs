use log::trace;
use std::{
    fmt::{Debug, Formatter},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;

/// Transaction lifecycle flags. Exactly one of them is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStatus {
    pub none: bool,
    pub pending: bool,
    pub success: bool,
    pub error: bool,
}

impl Default for TxStatus {
    fn default() -> Self {
        Self::idle()
    }
}

impl TxStatus {
    pub const fn idle() -> Self {
        Self {
            none: true,
            pending: false,
            success: false,
            error: false,
        }
    }

    pub const fn pending() -> Self {
        Self {
            none: false,
            pending: true,
            success: false,
            error: false,
        }
    }

    pub const fn success() -> Self {
        Self {
            none: false,
            pending: false,
            success: true,
            error: false,
        }
    }

    pub const fn error() -> Self {
        Self {
            none: false,
            pending: false,
            success: false,
            error: true,
        }
    }
}

type StatusHandler = Arc<dyn Fn(TxStatus) + Send + Sync>;

struct ReporterState {
    current: TxStatus,
    /// Bumped by every report, reset schedule and cancel. A reset only
    /// fires while it still holds the latest value.
    generation: u64,
    reset_task: Option<JoinHandle<()>>,
}

impl ReporterState {
    fn new() -> Self {
        Self {
            current: TxStatus::idle(),
            generation: 0,
            reset_task: None,
        }
    }

    fn supersede(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
        self.generation
    }
}

/// Forwards status transitions of one action to an optional handler.
///
/// A scheduled reset is superseded by any later report, so it can never
/// overwrite the state of a newer invocation. Deliveries are serialized:
/// the handler observes statuses in the order they were applied and must
/// not report back into the same reporter.
pub struct StatusReporter {
    handler: Option<StatusHandler>,
    state: Arc<Mutex<ReporterState>>,
    delivery: Arc<Mutex<()>>,
}

impl StatusReporter {
    pub fn new(handler: impl Fn(TxStatus) + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Arc::new(handler)),
            state: Arc::new(Mutex::new(ReporterState::new())),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Tracks the status without notifying anyone.
    pub fn silent() -> Self {
        Self {
            handler: None,
            state: Arc::new(Mutex::new(ReporterState::new())),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    pub fn current(&self) -> TxStatus {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    pub fn report(&self, status: TxStatus) {
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.supersede();
            state.current = status;
        }
        trace!("tx status: {status:?}");
        if let Some(handler) = &self.handler {
            handler(status);
        }
    }

    /// Goes back to idle after `delay` unless something else is reported first.
    /// Must be called from within a tokio runtime.
    pub fn reset_after(&self, delay: Duration) {
        let handler = self.handler.clone();
        let state = Arc::clone(&self.state);
        let delivery = Arc::clone(&self.delivery);

        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.supersede();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let _delivery = delivery.lock().unwrap_or_else(PoisonError::into_inner);
            {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                if state.generation != generation {
                    return;
                }
                state.current = TxStatus::idle();
                state.reset_task = None;
            }
            trace!("tx status reset to idle");
            if let Some(handler) = handler {
                handler(TxStatus::idle());
            }
        });

        guard.reset_task = Some(task);
    }

    pub fn has_pending_reset(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn cancel_reset(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .supersede();
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::silent()
    }
}

impl Debug for StatusReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("current", &self.current())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl Drop for StatusReporter {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{sync::mpsc, thread};

    fn recording() -> (StatusReporter, Arc<Mutex<Vec<TxStatus>>>) {
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let reporter = StatusReporter::new(move |status| sink.lock().unwrap().push(status));
        (reporter, seen)
    }

    #[test]
    fn statuses_are_exclusive() {
        for status in [
            TxStatus::idle(),
            TxStatus::pending(),
            TxStatus::success(),
            TxStatus::error(),
        ] {
            let flags = [status.none, status.pending, status.success, status.error];
            assert_eq!(flags.iter().filter(|set| **set).count(), 1);
        }
        assert_eq!(TxStatus::default(), TxStatus::idle());
    }

    #[tokio::test(start_paused = true)]
    async fn resets_to_idle_after_delay() {
        let (reporter, seen) = recording();
        reporter.report(TxStatus::error());
        reporter.reset_after(Duration::from_secs(3));

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert_eq!(reporter.current(), TxStatus::error());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(reporter.current(), TxStatus::idle());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![TxStatus::error(), TxStatus::idle()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn later_report_cancels_reset() {
        let (reporter, seen) = recording();
        reporter.report(TxStatus::error());
        reporter.reset_after(Duration::from_secs(3));

        tokio::time::sleep(Duration::from_secs(1)).await;
        reporter.report(TxStatus::pending());
        assert!(!reporter.has_pending_reset());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(reporter.current(), TxStatus::pending());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![TxStatus::error(), TxStatus::pending()]
        );
    }

    #[test]
    fn report_during_idle_delivery_lands_last() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .build()
            .unwrap();
        let _guard = rt.enter();

        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(Some((started_tx, release_rx)));

        let seen = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let reporter = Arc::new(StatusReporter::new(move |status| {
            if status == TxStatus::idle() {
                if let Some((started, release)) = gate.lock().unwrap().take() {
                    started.send(()).unwrap();
                    release.recv().unwrap();
                }
            }
            sink.lock().unwrap().push(status);
        }));

        reporter.report(TxStatus::error());
        reporter.reset_after(Duration::from_millis(10));
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let next = {
            let reporter = Arc::clone(&reporter);
            thread::spawn(move || reporter.report(TxStatus::pending()))
        };
        thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();
        next.join().unwrap();

        assert_eq!(reporter.current(), TxStatus::pending());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![TxStatus::error(), TxStatus::idle(), TxStatus::pending()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reset_stays_silent() {
        let (reporter, seen) = recording();
        reporter.report(TxStatus::success());
        reporter.reset_after(Duration::from_secs(1));
        reporter.cancel_reset();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(reporter.current(), TxStatus::success());
        assert_eq!(*seen.lock().unwrap(), vec![TxStatus::success()]);
    }
}
