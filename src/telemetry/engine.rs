use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::random::UnitSource;
use super::reading::EngineState;
use super::simulator::TelemetrySimulator;

/// Receives every published engine state, synchronously within the tick.
pub trait StateObserver: Send + 'static {
    fn on_update(&mut self, state: &EngineState) -> Result<()>;
}

impl<F> StateObserver for F
where
    F: FnMut(&EngineState) -> Result<()> + Send + 'static,
{
    fn on_update(&mut self, state: &EngineState) -> Result<()> {
        self(state)
    }
}

pub struct TelemetryEngine;

impl TelemetryEngine {
    /// Spawns the tick loop on the current tokio runtime. The first tick
    /// fires one period after start.
    pub fn start<S, O>(simulator: TelemetrySimulator<S>, observer: O) -> EngineHandle
    where
        S: UnitSource,
        O: StateObserver,
    {
        let running = Arc::new(AtomicBool::new(true));
        let (shutdown, shutdown_rx) = broadcast::channel(1);

        info!(
            "Starting telemetry engine, tick every {} ms",
            simulator.config().tick_interval_ms
        );
        let task = tokio::spawn(Self::run(
            simulator,
            observer,
            running.clone(),
            shutdown_rx,
        ));

        EngineHandle {
            running,
            shutdown,
            task: Some(task),
        }
    }

    async fn run<S, O>(
        mut simulator: TelemetrySimulator<S>,
        mut observer: O,
        running: Arc<AtomicBool>,
        mut shutdown: broadcast::Receiver<()>,
    ) where
        S: UnitSource,
        O: StateObserver,
    {
        let period = simulator.config().tick_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {}
            }
            if !running.load(Ordering::SeqCst) {
                break;
            }

            let was_alert = simulator.state().alert_active;
            let state = match simulator.step() {
                Ok(state) => state,
                Err(e) => {
                    error!("Telemetry engine halted: {}", e);
                    break;
                }
            };

            debug!(
                tick = state.tick_counter,
                speed_kmh = state.latest.speed_kmh,
                distance_m = state.latest.v2v_distance_m,
                signal_pct = state.latest.signal_strength_pct,
                "Telemetry tick"
            );
            if state.alert_active && !was_alert {
                warn!(
                    "CRASH ALERT at tick {}: V2V distance {} m",
                    state.tick_counter, state.latest.v2v_distance_m
                );
            } else if was_alert && !state.alert_active {
                info!("Crash alert cleared at tick {}", state.tick_counter);
            }

            notify(&mut observer, state);
        }

        running.store(false, Ordering::SeqCst);
        info!("Telemetry engine stopped");
    }
}

/// Observer failures are logged and never stop the loop.
fn notify<O: StateObserver>(observer: &mut O, state: &EngineState) {
    match panic::catch_unwind(AssertUnwindSafe(|| observer.on_update(state))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Observer failed at tick {}: {:#}", state.tick_counter, e),
        Err(_) => error!("Observer panicked at tick {}", state.tick_counter),
    }
}

/// Controls a running engine. Dropping the handle stops the engine.
pub struct EngineHandle {
    running: Arc<AtomicBool>,
    shutdown: broadcast::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Prevents any further tick. Safe to call repeatedly.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("Stopping telemetry engine");
        }
        // No receiver left means the loop already exited.
        let _ = self.shutdown.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the engine and waits for the tick loop to finish.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stop();
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
