//! Terminal front end for the petri dish growth simulation.

mod command;
mod render;
mod telemetry;

use anyhow::{Context, Result};
use command::Command;
use petri_core::{RunnerConfig, ADVERTISED_GRID_SIZES, ADVERTISED_INTERVAL_STEP_MS};
use petri_world::{SimulationController, SimulationState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const CONFIG_ENV: &str = "PETRI_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    telemetry::init_telemetry(config.log_format)?;

    info!(
        grid_size = config.growth.grid_size,
        growth_interval_ms = config.growth.growth_interval_ms,
        seed_cells = config.seed_cells.len(),
        "Starting petri dish"
    );
    warn_outside_advertised_ranges(&config);

    let controller = SimulationController::new(config.growth)?;
    for cell in &config.seed_cells {
        controller.toggle_cell(cell.x, cell.y);
    }

    let renderer = config
        .render
        .then(|| tokio::spawn(render_loop(controller.subscribe())));

    if config.autostart {
        controller.start();
    }

    run_session(&controller).await?;

    let state = controller.state();
    info!(
        event = "session_summary",
        generations = state.generation(),
        occupied = state.occupied.len(),
        capacity = state.config.capacity(),
        full = state.is_full(),
        "Session finished"
    );

    // Dropping the controller closes the update channel and ends the renderer.
    drop(controller);
    if let Some(renderer) = renderer {
        renderer.await.context("renderer task failed")?;
    }

    Ok(())
}

/// Config file from the first argument or `PETRI_CONFIG`, defaults otherwise
fn load_config() -> Result<RunnerConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => RunnerConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}")),
        None => Ok(RunnerConfig::default()),
    }
}

fn warn_outside_advertised_ranges(config: &RunnerConfig) {
    let growth = &config.growth;
    if !ADVERTISED_GRID_SIZES.contains(&growth.grid_size) {
        warn!(
            grid_size = growth.grid_size,
            "Grid size outside the advertised {}-{} range",
            ADVERTISED_GRID_SIZES.start(),
            ADVERTISED_GRID_SIZES.end()
        );
    }
    if growth.growth_interval_ms < ADVERTISED_INTERVAL_STEP_MS {
        warn!(
            growth_interval_ms = growth.growth_interval_ms,
            "Growth interval below the advertised {} ms minimum",
            ADVERTISED_INTERVAL_STEP_MS
        );
    }
}

/// Apply stdin commands until quit, end of input, or a shutdown signal
async fn run_session(controller: &SimulationController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(command) => match command.execute(controller) {
                        Ok(reply) => println!("{reply}"),
                        Err(e) => println!("error: {e}"),
                    },
                    Err(e) => println!("error: {e}"),
                }
            }
        }
    }

    // Without more input, let a running simulation finish on its own.
    let mut updates = controller.subscribe();
    tokio::select! {
        _ = &mut shutdown => {}
        _ = wait_until_idle(&mut updates) => {}
    }
    Ok(())
}

async fn wait_until_idle(updates: &mut watch::Receiver<SimulationState>) {
    loop {
        if !updates.borrow_and_update().running {
            return;
        }
        if updates.changed().await.is_err() {
            return;
        }
    }
}

async fn render_loop(mut updates: watch::Receiver<SimulationState>) {
    loop {
        let frame = render::frame(&updates.borrow_and_update());
        println!("{frame}");
        if updates.changed().await.is_err() {
            return;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::GrowthConfig;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_idle_returns_when_grid_fills() {
        let controller = SimulationController::new(GrowthConfig {
            grid_size: 3,
            growth_interval_ms: 100,
        })
        .unwrap();
        controller.toggle_cell(0, 0);
        controller.start();

        let mut updates = controller.subscribe();
        tokio::time::timeout(Duration::from_secs(10), wait_until_idle(&mut updates))
            .await
            .unwrap();

        let state = controller.state();
        assert!(state.is_full());
        assert_eq!(state.history.as_slice(), &[3, 6, 8, 9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_idle_when_already_idle() {
        let controller = SimulationController::new(GrowthConfig::default()).unwrap();
        let mut updates = controller.subscribe();
        tokio::time::timeout(Duration::from_millis(1), wait_until_idle(&mut updates))
            .await
            .unwrap();
    }
}
