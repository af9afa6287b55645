// appinfosync/src/sync/logic.rs
use crate::catalog::{Catalog, CatalogEntry};
use crate::errors::Result;
use crate::store::StoreLookup;

use super::SyncReport;

/// Compares the catalog's version string with the store's, exactly.
pub fn versions_match(app_name: &str, catalog_version: &str, store_version: &str) -> bool {
    if catalog_version != store_version {
        tracing::info!(
            "\"{}\" needs update: version in catalog: \"{}\", version in store: \"{}\"",
            app_name,
            catalog_version,
            store_version
        );
        false
    } else {
        tracing::info!("\"{}\" does not need to be updated", app_name);
        true
    }
}

/// Item-scoped errors are logged and turned into `None`; fatal ones propagate.
fn skip_item_error<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_item_scoped() => {
            tracing::warn!("an error occurred during the request: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Reconciles every catalog app against the store, one app at a time.
///
/// For each listed app:
/// 1. Fetches the detail subset and resolves the store ID.
/// 2. Looks the store ID up.
/// 3. Compares versions and pushes store metadata back on mismatch.
///
/// A non-success HTTP status for one app skips that app only; any other
/// error (transport, malformed URL, undecodable body) ends the run.
pub async fn reconcile(catalog: &impl Catalog, store: &impl StoreLookup) -> Result<SyncReport> {
    let mut report = SyncReport::start();

    let entries = catalog.list_apps().await?;
    report.listed = entries.len();
    if entries.is_empty() {
        return Ok(report);
    }
    tracing::info!("{} apps will be checked for updates", entries.len());

    for entry in entries {
        let name = entry.name.clone();
        let Some(detail) = skip_item_error(catalog.app_detail(entry.id).await)? else {
            tracing::warn!("the app \"{}\" will be skipped", name);
            report.skipped += 1;
            continue;
        };

        let entry: CatalogEntry = entry.with_detail(detail);
        let Some(store_id) = entry.store_id.as_deref() else {
            tracing::warn!(
                "the app \"{}\" will be skipped because no store URL could be found",
                name
            );
            report.skipped += 1;
            continue;
        };
        tracing::debug!(
            store_url = ?entry.store_url,
            has_description = entry.description.is_some(),
            "\"{}\" resolved to store ID {}",
            name,
            store_id
        );

        let Some(metadata) = skip_item_error(store.lookup(store_id).await)?.flatten() else {
            tracing::warn!("the app \"{}\" will be skipped", name);
            report.skipped += 1;
            continue;
        };

        if versions_match(&entry.name, &entry.version, &metadata.version) {
            report.up_to_date += 1;
            continue;
        }

        tracing::info!(
            "updating info for mobile device app \"{}\" at catalog ID: {}",
            metadata.name,
            entry.id
        );
        match catalog.update_app(entry.id, &metadata).await {
            Ok(()) => report.updated += 1,
            Err(e) if e.is_item_scoped() => {
                tracing::warn!("the update of \"{}\" was rejected: {}", name, e);
                report.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!("updates complete");
    Ok(report)
}
