//! Async worker - runs in Tokio runtime and handles catalog calls

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::infrastructure::catalog::{CatalogClient, CatalogError};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Polling behavior of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Delay between successful polls
    pub poll_interval: Duration,
    /// Transient failures tolerated before a failure event is emitted
    pub max_retries: u32,
    /// Delay before retrying a transient failure
    pub retry_delay: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
enum PollTarget {
    Tiles,
    Tile(String),
}

/// Run the async worker loop until shutdown or until the TUI side hangs up
pub async fn run_async_worker(
    client: Arc<dyn CatalogClient>,
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    tracing::info!(endpoint = %client.endpoint_name(), "catalog worker started");

    // At most one polling task is alive at a time
    let mut poller: Option<JoinHandle<()>> = None;

    loop {
        // Process commands (non-blocking)
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stop_poller(&mut poller);
                    return Ok(());
                }
            };
            match cmd {
                RuntimeCommand::Shutdown => {
                    stop_poller(&mut poller);
                    tracing::info!("catalog worker stopped");
                    return Ok(());
                }

                RuntimeCommand::FetchTilesStart { generation } => {
                    stop_poller(&mut poller);
                    tracing::debug!(generation, "polling tiles");
                    poller = Some(tokio::spawn(poll(
                        Arc::clone(&client),
                        settings,
                        PollTarget::Tiles,
                        generation,
                        evt_tx.clone(),
                    )));
                }

                RuntimeCommand::FetchTileStart {
                    generation,
                    tile_id,
                } => {
                    stop_poller(&mut poller);
                    tracing::debug!(generation, tile_id = %tile_id, "polling tile");
                    poller = Some(tokio::spawn(poll(
                        Arc::clone(&client),
                        settings,
                        PollTarget::Tile(tile_id),
                        generation,
                        evt_tx.clone(),
                    )));
                }

                RuntimeCommand::FetchStop => stop_poller(&mut poller),

                RuntimeCommand::RefreshStaticApis => {
                    let client = Arc::clone(&client);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = match client.refresh_static_apis().await {
                            Ok(()) => RuntimeEvent::StaticApisRefreshed,
                            Err(err) => {
                                tracing::warn!("static refresh failed: {err}");
                                RuntimeEvent::StaticRefreshFailed {
                                    error: err.to_fetch_error(),
                                }
                            }
                        };
                        let _ = evt_tx.send(event);
                    });
                }

                RuntimeCommand::Login { username, password } => {
                    let client = Arc::clone(&client);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = match client.login(&username, &password).await {
                            Ok(()) => {
                                tracing::info!(username = %username, "logged in");
                                RuntimeEvent::LoggedIn { username }
                            }
                            Err(err) => {
                                tracing::warn!(username = %username, "login failed: {err}");
                                RuntimeEvent::LoginFailed {
                                    error: err.to_fetch_error(),
                                }
                            }
                        };
                        let _ = evt_tx.send(event);
                    });
                }

                RuntimeCommand::Logout => {
                    stop_poller(&mut poller);
                    let client = Arc::clone(&client);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        if let Err(err) = client.logout().await {
                            tracing::warn!("logout call failed: {err}");
                        }
                        let _ = evt_tx.send(RuntimeEvent::LoggedOut);
                    });
                }
            }
        }

        // Small yield to prevent busy loop
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn stop_poller(poller: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = poller.take() {
        handle.abort();
    }
}

async fn poll(
    client: Arc<dyn CatalogClient>,
    settings: WorkerSettings,
    target: PollTarget,
    generation: u64,
    evt_tx: Sender<RuntimeEvent>,
) {
    let mut failures = 0u32;
    loop {
        let result: Result<RuntimeEvent, CatalogError> = match &target {
            PollTarget::Tiles => client
                .containers()
                .await
                .map(|tiles| RuntimeEvent::TilesFetched { generation, tiles }),
            PollTarget::Tile(id) => client
                .container(id)
                .await
                .map(|tile| RuntimeEvent::TileFetched { generation, tile }),
        };

        match result {
            Ok(event) => {
                failures = 0;
                if evt_tx.send(event).is_err() {
                    return;
                }
            }
            Err(err) => {
                failures += 1;
                if err.is_transient() && failures <= settings.max_retries {
                    tracing::warn!(generation, attempt = failures, "fetch failed, retrying: {err}");
                    tokio::time::sleep(settings.retry_delay).await;
                    continue;
                }
                tracing::error!(generation, "fetch failed: {err}");
                let _ = evt_tx.send(RuntimeEvent::FetchFailed {
                    generation,
                    error: err.to_fetch_error(),
                });
                return;
            }
        }

        tokio::time::sleep(settings.poll_interval).await;
    }
}
