//! Durable copy of the applied-patch table.
//!
//! Writes happen on a background task fed through a `watch` channel, so only
//! the most recent request is ever acted on.

use crate::{OrchestratorError, OrchestratorResult};

use hp_core::MethodPatch;

use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
enum PersistRequest {
    Idle,
    Save(Vec<MethodPatch>),
    Delete,
}

pub struct PatchStore {
    path: PathBuf,
    tx: watch::Sender<PersistRequest>,
    writer: JoinHandle<()>,
}

impl PatchStore {
    /// Spawn the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = watch::channel(PersistRequest::Idle);
        let writer = tokio::spawn(Self::write_loop(path.clone(), rx));
        Self { path, tx, writer }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, patches: Vec<MethodPatch>) {
        self.tx.send_replace(PersistRequest::Save(patches));
    }

    pub fn delete(&self) {
        self.tx.send_replace(PersistRequest::Delete);
    }

    /// Drop the sender and wait for the last pending write to land.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.writer.await {
            warn!("Patch store writer ended abnormally: {e}");
        }
    }

    async fn write_loop(path: PathBuf, mut rx: watch::Receiver<PersistRequest>) {
        while rx.changed().await.is_ok() {
            let request = rx.borrow_and_update().clone();
            let result = match request {
                PersistRequest::Idle => Ok(()),
                PersistRequest::Save(patches) => write_patches(&path, &patches).await,
                PersistRequest::Delete => delete_patches(&path).await,
            };
            if let Err(e) = result {
                warn!("{e}");
            }
        }
    }
}

async fn write_patches(path: &Path, patches: &[MethodPatch]) -> OrchestratorResult<()> {
    let json = serde_json::to_vec(patches).map_err(|e| OrchestratorError::json(path, e))?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| OrchestratorError::io(path, e))?;
    debug!("Persisted {} applied patches", patches.len());
    Ok(())
}

async fn delete_patches(path: &Path) -> OrchestratorResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("Deleted persisted patches");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OrchestratorError::io(path, e)),
    }
}

/// Load a persisted batch. A missing file is an empty batch.
pub fn load_patches(path: &Path) -> OrchestratorResult<Vec<MethodPatch>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(OrchestratorError::io(path, e)),
    };
    serde_json::from_slice(&bytes).map_err(|e| OrchestratorError::json(path, e))
}
