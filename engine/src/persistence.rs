//! Serialized durable-write queue for one storage key.
//!
//! A single writer task owns all IO for the key. Commands are applied in the
//! order they were enqueued; when several writes are already waiting, only the
//! newest is performed, so an older snapshot can never land after a newer one.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::storage::{KeyValueStorage, StorageError};

#[derive(Debug)]
enum WriteCommand {
    Save { generation: u64, bytes: Vec<u8> },
    Clear { generation: u64 },
    Flush(oneshot::Sender<Result<(), StorageError>>),
    Shutdown,
}

#[derive(Debug)]
enum PendingWrite {
    Save { generation: u64, bytes: Vec<u8> },
    Clear { generation: u64 },
}

impl PendingWrite {
    fn generation(&self) -> u64 {
        match self {
            PendingWrite::Save { generation, .. } | PendingWrite::Clear { generation } => {
                *generation
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct WriteQueue {
    tx: mpsc::UnboundedSender<WriteCommand>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl WriteQueue {
    /// Spawn the writer task on the current tokio runtime.
    pub(crate) fn spawn(storage: Arc<dyn KeyValueStorage>, key: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(storage, key, rx));
        Self {
            tx,
            handle: Mutex::new(Some(handle)),
        }
    }

    pub(crate) fn save(&self, generation: u64, bytes: Vec<u8>) {
        self.send(WriteCommand::Save { generation, bytes });
    }

    pub(crate) fn clear(&self, generation: u64) {
        self.send(WriteCommand::Clear { generation });
    }

    /// Resolve once every command enqueued before this call has been applied.
    ///
    /// Returns the error of the most recent durable write, if it failed.
    pub(crate) async fn flush(&self) -> Result<(), StorageError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(reply_tx)).is_err() {
            return Err(StorageError::Unavailable("write queue closed".to_string()));
        }
        reply_rx
            .await
            .unwrap_or_else(|_| Err(StorageError::Unavailable("writer task ended".to_string())))
    }

    /// Drain pending writes and stop the writer. Later calls are no-ops.
    pub(crate) async fn shutdown(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return;
        };
        let _ = self.tx.send(WriteCommand::Shutdown);
        if let Err(e) = handle.await {
            tracing::warn!("Leaderboard writer task failed: {e}");
        }
    }

    fn send(&self, command: WriteCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("Leaderboard write dropped: writer is shut down");
        }
    }
}

async fn run_writer(
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let mut applied_generation = 0u64;
    let mut last_error: Option<StorageError> = None;

    while let Some(first) = rx.recv().await {
        let mut pending: Option<PendingWrite> = None;
        let mut waiters = Vec::new();
        let mut shutdown = false;

        let mut absorb = |command: WriteCommand| match command {
            WriteCommand::Save { generation, bytes } => {
                pending = Some(PendingWrite::Save { generation, bytes });
            }
            WriteCommand::Clear { generation } => {
                pending = Some(PendingWrite::Clear { generation });
            }
            WriteCommand::Flush(reply) => waiters.push(reply),
            WriteCommand::Shutdown => shutdown = true,
        };
        absorb(first);
        while let Ok(command) = rx.try_recv() {
            absorb(command);
        }

        if let Some(write) = pending {
            let generation = write.generation();
            if generation < applied_generation {
                tracing::debug!(generation, applied_generation, "Skipping stale snapshot write");
            } else {
                let result = match write {
                    PendingWrite::Save { bytes, .. } => storage.set(&key, bytes).await,
                    PendingWrite::Clear { .. } => storage.delete(&key).await,
                };
                applied_generation = generation;
                match result {
                    Ok(()) => {
                        tracing::debug!(generation, "Leaderboard snapshot persisted");
                        last_error = None;
                    }
                    Err(e) => {
                        tracing::warn!(generation, "Leaderboard persistence failed: {e}");
                        last_error = Some(e);
                    }
                }
            }
        }

        for waiter in waiters {
            let _ = waiter.send(last_error.clone().map_or(Ok(()), Err));
        }

        if shutdown {
            break;
        }
    }
}
