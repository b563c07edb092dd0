//! Resilient polling loop shared by the weather and dolar widgets.
//!
//! One cycle = fetch once, then up to `retries` more attempts spaced
//! `retry_delay` apart. A cycle ends at the first success or when the
//! budget runs out; the next cycle starts on the interval tick (or a
//! manual kick) with the budget restored. Cycles never overlap: the
//! interval is awaited only between cycles and missed ticks are
//! delayed, not burst.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::infrastructure::sources::DataSource;

/// Retry and polling cadence for one widget.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    /// Additional attempts after the first failed one.
    pub retries: u32,
    /// Pause between attempts within a cycle.
    pub retry_delay: Duration,
    /// Spacing between cycle starts.
    pub poll_interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(2000),
            poll_interval: Duration::from_millis(60_000),
        }
    }
}

/// How a cycle ended.
enum CycleOutcome<T> {
    /// Ran to a publishable result: a value or the terminal message.
    Published(Result<T, String>),
    /// Cancelled mid-cycle; nothing may be published.
    Cancelled,
}

/// Drive one source forever: immediate first cycle, then one cycle per
/// interval tick. `kick` restarts the cycle right away and re-phases
/// the interval. Returns only on cancellation.
pub async fn run_poller<S, F>(
    source: S,
    policy: RefreshPolicy,
    cancel: CancellationToken,
    mut kick: broadcast::Receiver<()>,
    publish: F,
) where
    S: DataSource,
    F: Fn(Result<S::Output, String>) + Send + 'static,
{
    let mut ticker = interval(policy.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            kicked = kick.recv() => {
                match kicked {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => ticker.reset(),
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
            _ = cancel.cancelled() => {
                debug!(source = source.name(), "poller cancelled");
                return;
            }
        }

        match fetch_cycle(&source, &policy, &cancel).await {
            CycleOutcome::Published(outcome) => publish(outcome),
            CycleOutcome::Cancelled => return,
        }
    }
}

/// One bounded fetch-with-retry sequence.
async fn fetch_cycle<S: DataSource>(
    source: &S,
    policy: &RefreshPolicy,
    cancel: &CancellationToken,
) -> CycleOutcome<S::Output> {
    let mut attempt = 0u32;

    loop {
        let fetched = tokio::select! {
            result = source.fetch() => result,
            _ = cancel.cancelled() => return CycleOutcome::Cancelled,
        };

        match fetched {
            Ok(value) => {
                if attempt > 0 {
                    debug!(source = source.name(), attempt, "recovered after retry");
                }
                return CycleOutcome::Published(Ok(value));
            }
            Err(err) => {
                if attempt >= policy.retries {
                    warn!(source = source.name(), error = %err, "retry budget exhausted");
                    return CycleOutcome::Published(Err(source.failure_message().to_string()));
                }
                debug!(source = source.name(), attempt, error = %err, "fetch failed, will retry");
                attempt += 1;

                tokio::select! {
                    _ = sleep(policy.retry_delay) => {}
                    _ = cancel.cancelled() => return CycleOutcome::Cancelled,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sources::FetchError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::timeout;

    /// Source that replays a fixed script of outcomes, then Ok(0).
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<u32, FetchError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<u32, FetchError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                script: Mutex::new(script.into()),
                calls: calls.clone(),
            };
            (source, calls)
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        type Output = u32;

        fn name(&self) -> &'static str {
            "scripted"
        }

        fn failure_message(&self) -> &'static str {
            "sin datos"
        }

        async fn fetch(&self) -> Result<u32, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(0))
        }
    }

    fn err500() -> Result<u32, FetchError> {
        Err(FetchError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }

    fn fast_policy() -> RefreshPolicy {
        RefreshPolicy {
            retries: 3,
            retry_delay: Duration::from_millis(2),
            poll_interval: Duration::from_millis(40),
        }
    }

    #[tokio::test]
    async fn success_on_first_attempt_publishes_value() {
        let (source, calls) = ScriptedSource::new(vec![Ok(21)]);
        let cancel = CancellationToken::new();

        match fetch_cycle(&source, &fast_policy(), &cancel).await {
            CycleOutcome::Published(outcome) => assert_eq!(outcome, Ok(21)),
            CycleOutcome::Cancelled => panic!("cycle was not cancelled"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_budget_publishes_failure_message() {
        let (source, calls) = ScriptedSource::new(vec![err500(), err500(), err500(), err500()]);
        let cancel = CancellationToken::new();

        match fetch_cycle(&source, &fast_policy(), &cancel).await {
            CycleOutcome::Published(outcome) => {
                assert_eq!(outcome, Err("sin datos".to_string()));
            }
            CycleOutcome::Cancelled => panic!("cycle was not cancelled"),
        }
        // 1 initial attempt + 3 retries, nothing more.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn success_on_final_retry_publishes_that_body() {
        let (source, calls) = ScriptedSource::new(vec![err500(), err500(), err500(), Ok(42)]);
        let cancel = CancellationToken::new();

        match fetch_cycle(&source, &fast_policy(), &cancel).await {
            CycleOutcome::Published(outcome) => assert_eq!(outcome, Ok(42)),
            CycleOutcome::Cancelled => panic!("cycle was not cancelled"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn mid_cycle_success_stops_further_attempts() {
        let (source, calls) = ScriptedSource::new(vec![err500(), Ok(7), err500()]);
        let cancel = CancellationToken::new();

        match fetch_cycle(&source, &fast_policy(), &cancel).await {
            CycleOutcome::Published(outcome) => assert_eq!(outcome, Ok(7)),
            CycleOutcome::Cancelled => panic!("cycle was not cancelled"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn next_interval_restarts_with_full_budget() {
        // Cycle 1 exhausts the budget, cycle 2 succeeds right away.
        let (source, calls) = ScriptedSource::new(vec![
            err500(),
            err500(),
            err500(),
            err500(),
            Ok(5),
        ]);
        let cancel = CancellationToken::new();
        let (kick_tx, _) = broadcast::channel(4);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_poller(
            source,
            fast_policy(),
            cancel.clone(),
            kick_tx.subscribe(),
            move |outcome| {
                let _ = tx.send(outcome);
            },
        ));

        let first = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, Err("sin datos".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let second = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        cancel.cancel();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn cancellation_stops_publishing() {
        let (source, _) = ScriptedSource::new(vec![]);
        let cancel = CancellationToken::new();
        let (kick_tx, _) = broadcast::channel(4);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_poller(
            source,
            fast_policy(),
            cancel.clone(),
            kick_tx.subscribe(),
            move |outcome| {
                let _ = tx.send(outcome);
            },
        ));

        // The immediate first cycle publishes, then we tear down.
        let first = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, Ok(0));

        cancel.cancel();
        timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller exits on cancel")
            .unwrap();

        // Drain whatever raced with the cancel, then expect silence.
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancellation_during_retry_delay_publishes_nothing() {
        let (source, calls) = ScriptedSource::new(vec![err500()]);
        let cancel = CancellationToken::new();
        let (kick_tx, _) = broadcast::channel(4);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let policy = RefreshPolicy {
            retries: 3,
            retry_delay: Duration::from_secs(30),
            poll_interval: Duration::from_secs(60),
        };
        let handle = tokio::spawn(run_poller(
            source,
            policy,
            cancel.clone(),
            kick_tx.subscribe(),
            move |outcome| {
                let _ = tx.send(outcome);
            },
        ));

        // Let the first attempt fail and the long retry sleep begin.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cancel.cancel();
        timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller exits mid-sleep")
            .unwrap();

        assert!(rx.try_recv().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn kick_restarts_cycle_before_interval() {
        let (source, calls) = ScriptedSource::new(vec![Ok(1), Ok(2)]);
        let cancel = CancellationToken::new();
        let (kick_tx, _) = broadcast::channel(4);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let policy = RefreshPolicy {
            retries: 3,
            retry_delay: Duration::from_millis(2),
            poll_interval: Duration::from_secs(60),
        };
        let handle = tokio::spawn(run_poller(
            source,
            policy,
            cancel.clone(),
            kick_tx.subscribe(),
            move |outcome| {
                let _ = tx.send(outcome);
            },
        ));

        let first = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, Ok(1));

        kick_tx.send(()).unwrap();
        let second = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cancel.cancel();
        let _ = handle.await;
    }
}
