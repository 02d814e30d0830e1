use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(300);

/// Single-slot debounce: each trigger replaces the pending job and restarts
/// the quiet interval. Must be used from within a tokio runtime.
pub struct DebounceScheduler {
    quiet_interval: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebounceScheduler {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            pending: None,
        }
    }

    pub fn trigger<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            debug!("Debounce: superseded pending job");
        }

        let quiet = self.quiet_interval;
        self.pending = Some(tokio::spawn(async move {
            sleep(quiet).await;
            job.await;
        }));
    }

    /// Drop the pending job, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the pending job to run to completion.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Debounced job failed: {}", e);
                }
            }
        }
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_rapid_triggers_run_once_with_last_value() {
        let runs = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = DebounceScheduler::default();

        for value in ["a", "ap", "app"] {
            let runs = runs.clone();
            let seen = seen.clone();
            scheduler.trigger(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(value);
            });
            sleep(Duration::from_millis(100)).await;
        }
        assert!(scheduler.is_pending());
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(250)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["app"]);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_restarts_from_latest_trigger() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = DebounceScheduler::new(Duration::from_millis(300));

        let r = runs.clone();
        scheduler.trigger(async move {
            r.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(200)).await;

        let r = runs.clone();
        scheduler.trigger(async move {
            r.fetch_add(1, Ordering::SeqCst);
        });

        // 350ms after the first trigger, only 150ms after the second.
        sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        scheduler.settle().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_each_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = DebounceScheduler::default();

        for _ in 0..2 {
            let r = runs.clone();
            scheduler.trigger(async move {
                r.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(400)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = DebounceScheduler::default();

        let r = runs.clone();
        scheduler.trigger(async move {
            r.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.cancel());
        assert!(!scheduler.is_pending());
        assert!(!scheduler.cancel());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
