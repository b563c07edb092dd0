//! Async worker - runs in the Tokio runtime and owns the background
//! tasks: the clock ticker and one poller per remote source.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::infrastructure::runtime::clock::run_clock;
use crate::infrastructure::runtime::poller::{run_poller, RefreshPolicy};
use crate::infrastructure::sources::{DolarSource, WeatherSource};

/// The clock re-renders the header once a minute.
const CLOCK_TICK: Duration = Duration::from_secs(60);

/// Run the async worker loop until shutdown or cancellation.
pub async fn run_async_worker(
    weather: WeatherSource,
    dolar: DolarSource,
    policy: RefreshPolicy,
    cancel: CancellationToken,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    // Manual refresh fans out to both pollers.
    let (kick_tx, _) = broadcast::channel(8);

    let clock_tx = evt_tx.clone();
    let clock_task = tokio::spawn(run_clock(CLOCK_TICK, cancel.clone(), move |snap| {
        let _ = clock_tx.send(RuntimeEvent::Clock(snap));
    }));

    let weather_tx = evt_tx.clone();
    let weather_task = tokio::spawn(run_poller(
        weather,
        policy,
        cancel.clone(),
        kick_tx.subscribe(),
        move |outcome| {
            let _ = weather_tx.send(RuntimeEvent::Weather(outcome));
        },
    ));

    let dolar_tx = evt_tx;
    let dolar_task = tokio::spawn(run_poller(
        dolar,
        policy,
        cancel.clone(),
        kick_tx.subscribe(),
        move |outcome| {
            let _ = dolar_tx.send(RuntimeEvent::Dolar(outcome));
        },
    ));

    // Pump commands from the TUI thread (non-blocking channel).
    'pump: loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(RuntimeCommand::Refresh) => {
                    debug!("manual refresh requested");
                    let _ = kick_tx.send(());
                }
                Ok(RuntimeCommand::Shutdown) => break 'pump,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'pump,
            }
        }

        if cancel.is_cancelled() {
            break;
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    cancel.cancel();
    let _ = tokio::join!(clock_task, weather_task, dolar_task);
    debug!("async worker stopped");
}
