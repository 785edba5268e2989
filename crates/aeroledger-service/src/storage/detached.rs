//! Journal-then-commit for persistent backends
//!
//! A command is validated, written to the external journal, then committed
//! to the in-memory ledger. The three steps run on a spawned task that owns
//! the write lock, so dropping the request future (a client disconnect)
//! cannot leave a journaled event uncommitted.

use aeroledger_core::{Address, Command, JournalEntry, Ledger, LedgerEvent};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

use super::StorageError;

/// Validate `command`, hand the event to `journal`, then commit it
///
/// `journal` receives the sequence number and event to persist. If it fails
/// the ledger is left unchanged.
pub(crate) async fn commit_detached<J, Fut>(
    ledger: Arc<RwLock<Ledger>>,
    caller: Address,
    command: Command,
    journal: J,
) -> Result<JournalEntry, StorageError>
where
    J: FnOnce(u64, LedgerEvent) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), StorageError>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let name = command.name();
        let mut ledger = ledger.write().await;

        let validated = ledger.validate(&caller, &command, Utc::now()).map_err(|e| {
            warn!(caller = %caller, command = name, error = %e, "Command rejected");
            StorageError::from(e)
        })?;

        journal(validated.seq(), validated.event().clone()).await?;

        Ok(ledger.commit(validated)?)
    });

    task.await.map_err(|e| {
        error!(error = %e, "Commit task did not complete");
        StorageError::Task(e.to_string())
    })?
}
