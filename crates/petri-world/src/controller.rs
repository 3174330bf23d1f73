//! Timer-driven simulation controller.
//!
//! Wraps a [`Simulation`] behind a lock and owns the single scheduled tick
//! task. Every transition to idle cancels that task: its handle is aborted
//! and the schedule epoch is bumped, and a tick whose epoch no longer matches
//! is discarded under the lock.

use crate::simulation::{Simulation, SimulationState, StartOutcome};
use parking_lot::Mutex;
use petri_core::{Error, GrowthConfig, Phase, Result};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

struct ScheduledTick {
    epoch: u64,
    handle: JoinHandle<()>,
}

struct Core {
    simulation: Simulation,
    scheduled: Option<ScheduledTick>,
    epoch: u64,
}

impl Core {
    fn cancel_scheduled(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(tick) = self.scheduled.take() {
            tick.handle.abort();
            debug!(epoch = tick.epoch, "Cancelled scheduled tick");
        }
    }
}

struct Shared {
    core: Mutex<Core>,
    updates: watch::Sender<SimulationState>,
}

impl Shared {
    fn publish(&self, core: &Core) {
        self.updates.send_replace(core.simulation.state().clone());
    }

    /// Interval for the next sleep, or `None` once `epoch` has been cancelled
    fn interval_for(&self, epoch: u64) -> Option<Duration> {
        let core = self.core.lock();
        (core.epoch == epoch).then(|| core.simulation.config().growth_interval())
    }

    /// Apply a tick from the task scheduled under `epoch`.
    /// Returns whether the task should keep ticking.
    fn fire(&self, epoch: u64) -> bool {
        let mut core = self.core.lock();
        if core.epoch != epoch {
            debug!(
                event = "stale_tick_dropped",
                epoch,
                current_epoch = core.epoch,
                "Dropping tick from cancelled schedule"
            );
            return false;
        }

        let outcome = core.simulation.tick();
        trace!(?outcome, "Tick applied");

        let continues = outcome.continues();
        if !continues {
            // The task is finishing on its own; nothing to abort.
            core.scheduled = None;
            core.epoch = core.epoch.wrapping_add(1);
        }
        self.publish(&core);
        continues
    }
}

async fn run_schedule(shared: Weak<Shared>, epoch: u64) {
    loop {
        let Some(interval) = shared.upgrade().and_then(|s| s.interval_for(epoch)) else {
            return;
        };
        tokio::time::sleep(interval).await;

        let Some(strong) = shared.upgrade() else {
            return;
        };
        if !strong.fire(epoch) {
            return;
        }
    }
}

/// Owns a petri dish and advances it on a timer while running.
///
/// All operations are synchronous and infallible; out-of-range inputs are
/// clamped or ignored. Presentations read [`state`](Self::state) or
/// [`subscribe`](Self::subscribe) to a stream of snapshots.
pub struct SimulationController {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl SimulationController {
    /// Create a controller on the current tokio runtime
    pub fn new(config: GrowthConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Self::with_handle(config, runtime))
    }

    pub fn with_handle(config: GrowthConfig, runtime: Handle) -> Self {
        let simulation = Simulation::new(config);
        let (updates, _) = watch::channel(simulation.state().clone());
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core {
                    simulation,
                    scheduled: None,
                    epoch: 0,
                }),
                updates,
            }),
            runtime,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.shared.core.lock().simulation.state().clone()
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SimulationState> {
        self.shared.updates.subscribe()
    }

    /// Whether a tick task is currently scheduled
    pub fn has_pending_tick(&self) -> bool {
        self.shared.core.lock().scheduled.is_some()
    }

    #[instrument(skip(self))]
    pub fn start(&self) -> StartOutcome {
        let mut core = self.shared.core.lock();
        let outcome = core.simulation.start();
        if outcome == StartOutcome::Started {
            self.schedule(&mut core);
        }
        self.shared.publish(&core);
        outcome
    }

    #[instrument(skip(self))]
    pub fn pause(&self) {
        let mut core = self.shared.core.lock();
        core.simulation.pause();
        core.cancel_scheduled();
        self.shared.publish(&core);
    }

    /// Start when idle, pause when running. Returns the new phase.
    pub fn toggle_running(&self) -> Phase {
        if self.shared.core.lock().simulation.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.state().phase()
    }

    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut core = self.shared.core.lock();
        core.simulation.reset();
        core.cancel_scheduled();
        self.shared.publish(&core);
    }

    /// Flip a cell. Returns the new occupancy, or `None` when out of bounds.
    pub fn toggle_cell(&self, x: i32, y: i32) -> Option<bool> {
        let mut core = self.shared.core.lock();
        let toggled = core.simulation.toggle_cell(x, y);
        if toggled.is_some() {
            if !core.simulation.is_running() && core.scheduled.is_some() {
                core.cancel_scheduled();
            }
            self.shared.publish(&core);
        }
        toggled
    }

    /// Change the tick interval. A tick already sleeping keeps its old delay;
    /// the new interval applies from the following tick.
    pub fn set_growth_interval(&self, interval_ms: u64) -> u64 {
        let mut core = self.shared.core.lock();
        let applied = core.simulation.set_growth_interval(interval_ms);
        self.shared.publish(&core);
        applied
    }

    /// Resize and clear the grid. A running simulation keeps running on a
    /// fresh schedule so no tick from the old grid can fire.
    #[instrument(skip(self))]
    pub fn set_grid_size(&self, grid_size: u32) -> u32 {
        let mut core = self.shared.core.lock();
        let applied = core.simulation.set_grid_size(grid_size);
        if core.simulation.is_running() {
            self.schedule(&mut core);
        } else {
            core.cancel_scheduled();
        }
        self.shared.publish(&core);
        applied
    }

    fn schedule(&self, core: &mut Core) {
        core.cancel_scheduled();
        let epoch = core.epoch;
        let handle = self
            .runtime
            .spawn(run_schedule(Arc::downgrade(&self.shared), epoch));
        core.scheduled = Some(ScheduledTick { epoch, handle });
        debug!(
            epoch,
            interval_ms = core.simulation.config().growth_interval_ms,
            "Scheduled tick"
        );
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        self.shared.core.lock().cancel_scheduled();
    }
}
