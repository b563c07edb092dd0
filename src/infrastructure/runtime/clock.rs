//! Clock ticker: publishes a fresh snapshot immediately, then once per
//! interval, until cancelled.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::ClockSnapshot;

pub async fn run_clock<F>(tick: Duration, cancel: CancellationToken, publish: F)
where
    F: Fn(ClockSnapshot) + Send + 'static,
{
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => publish(ClockSnapshot::now()),
            _ = cancel.cancelled() => {
                debug!("clock ticker cancelled");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn first_tick_is_immediate() {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_clock(
            Duration::from_secs(60),
            cancel.clone(),
            move |snap| {
                let _ = tx.send(snap);
            },
        ));

        // Arrives well before the 60s interval elapses.
        let snap = timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("immediate first tick")
            .unwrap();
        assert!(!snap.date.is_empty());
        assert!(!snap.time.is_empty());

        cancel.cancel();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn ticks_repeat_on_interval_and_stop_on_cancel() {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_clock(
            Duration::from_millis(25),
            cancel.clone(),
            move |snap| {
                let _ = tx.send(snap);
            },
        ));

        for _ in 0..3 {
            timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("periodic tick")
                .unwrap();
        }

        cancel.cancel();
        timeout(Duration::from_secs(2), handle)
            .await
            .expect("clock exits on cancel")
            .unwrap();

        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
