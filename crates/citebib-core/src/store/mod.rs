//! Bibliography store
//!
//! [`BibliographyStore`] owns the current collection snapshot. Each
//! [`Action`] is applied through the pure reducer in [`transitions`], and a
//! snapshot that actually changed is handed to a background writer which
//! persists snapshots one at a time, in commit order.

mod action;
pub mod transitions;

pub use action::Action;
pub use transitions::{BibliographyField, NewCitation};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::domain::Collection;
use crate::error::PersistenceError;
use crate::persistence::{decode_collection, encode_collection, SnapshotStore, COLLECTION_KEY};

enum WriterCommand {
    Write(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the single task that writes snapshots
struct PersistenceWriter {
    tx: mpsc::UnboundedSender<WriterCommand>,
}

impl PersistenceWriter {
    /// Spawn the writer task. Requires a running tokio runtime.
    fn spawn(adapter: Arc<dyn SnapshotStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(adapter, rx));
        Self { tx }
    }

    fn enqueue(&self, collection: &Collection) {
        let blob = match encode_collection(collection) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "Failed to encode collection snapshot");
                return;
            }
        };
        if self.tx.send(WriterCommand::Write(blob)).is_err() {
            error!("Persistence writer stopped; snapshot dropped");
        }
    }

    async fn flush(&self) -> Result<(), PersistenceError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterCommand::Flush(done_tx))
            .map_err(|_| PersistenceError::WriterClosed)?;
        done_rx.await.map_err(|_| PersistenceError::WriterClosed)
    }
}

async fn run_writer(
    adapter: Arc<dyn SnapshotStore>,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriterCommand::Write(blob) => {
                if let Err(e) = adapter.put(COLLECTION_KEY, blob).await {
                    error!(error = %e, "Failed to persist collection snapshot");
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

/// The committed collection plus an optional persistence side effect
pub struct BibliographyStore {
    collection: Collection,
    writer: Option<PersistenceWriter>,
}

impl Default for BibliographyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BibliographyStore {
    /// An empty store that persists nothing
    pub fn new() -> Self {
        Self::from_collection(Collection::new())
    }

    pub fn from_collection(collection: Collection) -> Self {
        Self {
            collection,
            writer: None,
        }
    }

    /// A store that writes every changed snapshot to `adapter`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn with_persistence(collection: Collection, adapter: Arc<dyn SnapshotStore>) -> Self {
        Self {
            collection,
            writer: Some(PersistenceWriter::spawn(adapter)),
        }
    }

    /// Restore the collection from `adapter` and keep persisting to it.
    ///
    /// A missing snapshot starts an empty collection. Selection state is
    /// cleared on load.
    pub async fn load(adapter: Arc<dyn SnapshotStore>) -> Result<Self, PersistenceError> {
        let collection = match adapter.get(COLLECTION_KEY).await? {
            Some(blob) => decode_collection(&blob)?,
            None => Collection::new(),
        };
        info!(
            bibliographies = collection.len(),
            citations = collection.citation_count(),
            "Loaded collection"
        );
        Ok(Self::with_persistence(collection, adapter))
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn into_collection(self) -> Collection {
        self.collection
    }

    /// Apply an action and persist the result if it changed anything
    pub fn dispatch(&mut self, action: Action) -> &Collection {
        self.dispatch_at(action, Utc::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) -> &Collection {
        let name = action.name();
        let next = self.collection.apply_at(action, now);

        if next == self.collection {
            debug!(action = name, "Transition left collection unchanged");
            return &self.collection;
        }

        debug!(action = name, bibliographies = next.len(), "Committed transition");
        self.collection = next;
        if let Some(writer) = &self.writer {
            writer.enqueue(&self.collection);
        }
        &self.collection
    }

    /// Wait until every snapshot queued so far has been written
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        match &self.writer {
            Some(writer) => writer.flush().await,
            None => Ok(()),
        }
    }
}
