use app::sync::{run, SyncParams};
use std::path::PathBuf;
use tokio::signal;
use tokio::sync::watch;
use utils::app_config::AppConfig;

pub async fn sync_cmd(
    source: PathBuf, replica: PathBuf, interval: u64, log_file: PathBuf,
) -> utils::error::Result<()> {
    let config = AppConfig::fetch()?;

    let params = SyncParams {
        source,
        replica,
        interval,
        log_file,
        track_new_items: config.sync.track_new_items,
        color: config.console.color,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                log::error!("Failed to listen for Ctrl+C: {}", e);
                // Keep the sender alive so the loop keeps running.
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    run(params, shutdown_rx).await?;

    println!("\nReceived shutdown signal, exiting...");
    Ok(())
}
