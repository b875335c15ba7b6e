// Restaurant wheel entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the store and restore the saved pool
// 4. Create mpsc channels
// 5. Spawn the coordinator task
// 6. Run the TUI until the user quits
// 7. Wait briefly for the coordinator to finish

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use wheel_app::app::{self, AppState};
use wheel_core::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Restaurant wheel starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} default restaurants, spin {}ms",
        config.pool.default_names().len(),
        config.wheel.spin_duration_ms
    );
    let frame_interval = Duration::from_millis(config.wheel.frame_interval_ms);

    // 3. Open the store and build the state
    let app_state = AppState::bootstrap(config).context("failed to open saved state")?;

    // 4. Create channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (rest_tx, rest_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Spawn the coordinator
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, rest_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI (blocks until the user quits)
    if let Err(e) = wheel_tui::run(ui_rx, cmd_tx, rest_tx, frame_interval).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for the coordinator to finish (with timeout)
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Restaurant wheel shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("restaurant-wheel.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("restaurant_wheel=info,wheel_core=info,wheel_app=info,wheel_tui=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
