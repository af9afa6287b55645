// appinfosync/src/sync/mod.rs
pub(crate) mod logic;
pub(crate) mod report;

use crate::catalog::ManagementClient;
use crate::config::SyncConfig;
use crate::errors::Result;
use crate::store::LookupClient;

pub use report::SyncReport;

/// Public entry point for the sync process.
/// Builds both clients from the resolved configuration and reconciles every app.
pub async fn run_sync_flow(config: &SyncConfig) -> Result<SyncReport> {
    let catalog = ManagementClient::new(config)?;
    let store = LookupClient::new(config)?;
    logic::reconcile(&catalog, &store).await
}
