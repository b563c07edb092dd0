//! Runtime bridge - connects the sync TUI thread with the async Tokio
//! runtime that owns the clock ticker and the two pollers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::domain::{ClockSnapshot, RateQuote, WeatherReading};
use crate::infrastructure::runtime::poller::RefreshPolicy;
use crate::infrastructure::runtime::worker::run_async_worker;
use crate::infrastructure::sources::{DolarSource, WeatherSource};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Restart both fetch cycles immediately with a full retry budget
    Refresh,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Fresh clock snapshot
    Clock(ClockSnapshot),
    /// Weather cycle finished: parsed body or terminal error message
    Weather(Result<WeatherReading, String>),
    /// Dolar cycle finished: parsed body or terminal error message
    Dolar(Result<RateQuote, String>),
}

/// Bridge between the sync TUI thread and the async Tokio runtime.
/// Dropping it cancels every background task; nothing is published
/// afterwards.
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
    cancel: CancellationToken,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime.
    pub fn new(
        weather: WeatherSource,
        dolar: DolarSource,
        policy: RefreshPolicy,
    ) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create Tokio runtime");
            rt.block_on(run_async_worker(
                weather,
                dolar,
                policy,
                worker_cancel,
                cmd_rx,
                evt_tx,
            ));
        });

        Ok(Self {
            cmd_tx,
            evt_rx,
            cancel,
        })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        self.cancel.cancel();
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn test_policy() -> RefreshPolicy {
        RefreshPolicy {
            retries: 1,
            retry_delay: Duration::from_millis(5),
            poll_interval: Duration::from_secs(60),
        }
    }

    /// Nothing listens on port 1, so every fetch attempt fails fast and
    /// both widgets reach their terminal error within one cycle.
    fn unreachable_bridge() -> RuntimeBridge {
        RuntimeBridge::new(
            WeatherSource::new("http://127.0.0.1:1", "Buenos Aires"),
            DolarSource::new("http://127.0.0.1:1/v1/dolares/oficial"),
            test_policy(),
        )
        .unwrap()
    }

    fn collect_until(
        bridge: &RuntimeBridge,
        deadline: Duration,
        done: impl Fn(&[RuntimeEvent]) -> bool,
    ) -> Vec<RuntimeEvent> {
        let start = Instant::now();
        let mut events = Vec::new();
        while start.elapsed() < deadline {
            events.extend(bridge.poll_events());
            if done(&events) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        events
    }

    #[test]
    fn publishes_clock_and_terminal_errors() {
        let bridge = unreachable_bridge();

        let events = collect_until(&bridge, Duration::from_secs(10), |events| {
            let clock = events.iter().any(|e| matches!(e, RuntimeEvent::Clock(_)));
            let weather = events
                .iter()
                .any(|e| matches!(e, RuntimeEvent::Weather(Err(_))));
            let dolar = events
                .iter()
                .any(|e| matches!(e, RuntimeEvent::Dolar(Err(_))));
            clock && weather && dolar
        });

        let weather_err = events.iter().find_map(|e| match e {
            RuntimeEvent::Weather(Err(msg)) => Some(msg.clone()),
            _ => None,
        });
        let dolar_err = events.iter().find_map(|e| match e {
            RuntimeEvent::Dolar(Err(msg)) => Some(msg.clone()),
            _ => None,
        });

        assert_eq!(weather_err.as_deref(), Some("No se pudo cargar el clima"));
        assert_eq!(
            dolar_err.as_deref(),
            Some("No se pudo cargar la cotización del dólar")
        );
        assert!(events.iter().any(|e| matches!(e, RuntimeEvent::Clock(_))));
    }

    #[test]
    fn refresh_command_starts_a_new_cycle() {
        let bridge = unreachable_bridge();

        // First cycle: one terminal error per widget.
        let first = collect_until(&bridge, Duration::from_secs(10), |events| {
            events
                .iter()
                .any(|e| matches!(e, RuntimeEvent::Weather(Err(_))))
        });
        let first_weather_errors = first
            .iter()
            .filter(|e| matches!(e, RuntimeEvent::Weather(Err(_))))
            .count();
        assert_eq!(first_weather_errors, 1);

        // The poll interval is 60s, so a second error can only come
        // from the manual refresh.
        bridge.send(RuntimeCommand::Refresh).unwrap();
        let second = collect_until(&bridge, Duration::from_secs(10), |events| {
            events
                .iter()
                .any(|e| matches!(e, RuntimeEvent::Weather(Err(_))))
        });
        assert!(second
            .iter()
            .any(|e| matches!(e, RuntimeEvent::Weather(Err(_)))));
    }

    #[test]
    fn drop_shuts_the_worker_down() {
        let bridge = unreachable_bridge();
        let _ = collect_until(&bridge, Duration::from_secs(5), |events| {
            !events.is_empty()
        });
        drop(bridge);
        // Nothing to assert beyond a clean drop: the worker exits on
        // the cancelled token and the closed command channel.
    }
}
