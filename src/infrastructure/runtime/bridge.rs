//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread never blocks on the network: it queues [`RuntimeCommand`]s
//! and drains [`RuntimeEvent`]s once per loop iteration.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::domain::{FetchError, TileSummary};
use crate::infrastructure::catalog::CatalogClient;
use crate::infrastructure::runtime::worker::{run_async_worker, WorkerSettings};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCommand {
    /// Start polling all tiles; replaces any running poll
    FetchTilesStart { generation: u64 },
    /// Start polling one tile; replaces any running poll
    FetchTileStart { generation: u64, tile_id: String },
    /// Stop the running poll
    FetchStop,
    /// Re-scan static API definitions
    RefreshStaticApis,
    /// Authenticate against the gateway
    Login { username: String, password: String },
    /// Drop the session
    Logout,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// Tiles loaded for a poll generation
    TilesFetched {
        generation: u64,
        tiles: Vec<TileSummary>,
    },
    /// Single tile loaded for a poll generation
    TileFetched { generation: u64, tile: TileSummary },
    /// Poll gave up after retries
    FetchFailed { generation: u64, error: FetchError },
    /// Static refresh finished
    StaticApisRefreshed,
    /// Static refresh failed
    StaticRefreshFailed { error: FetchError },
    /// Session established
    LoggedIn { username: String },
    /// Login rejected or failed
    LoginFailed { error: FetchError },
    /// Session dropped
    LoggedOut,
    /// Worker-level failure
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Start the worker thread with its own Tokio runtime
    pub fn new(client: Arc<dyn CatalogClient>, settings: WorkerSettings) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = Runtime::new().context("Failed to create Tokio runtime")?;
        thread::Builder::new()
            .name("apicat-worker".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(client, settings, cmd_rx, evt_tx.clone()).await
                    {
                        tracing::error!("worker exited: {err:#}");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
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
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
