// appinfosync/src/catalog/mod.rs
pub(crate) mod client;
pub(crate) mod xml;

use crate::errors::Result;
use crate::store::StoreMetadata;

pub use client::ManagementClient;

/// A mobile device app as recorded on the management server.
///
/// The listing fills `id`, `name` and `version`; the remaining fields come
/// from the per-app detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub store_url: Option<String>,
    pub store_id: Option<String>,
}

/// The `general` subset of a single app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDetail {
    pub description: Option<String>,
    pub store_url: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: u64, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
            description: None,
            store_url: None,
            store_id: None,
        }
    }

    pub fn with_detail(self, detail: AppDetail) -> Self {
        let store_id = detail.store_url.as_deref().and_then(parse_store_id);
        Self {
            description: detail.description,
            store_url: detail.store_url,
            store_id,
            ..self
        }
    }
}

/// The device-management server side of a sync run.
pub trait Catalog {
    /// Every app on the server; empty when the listing reports a size of 0.
    async fn list_apps(&self) -> Result<Vec<CatalogEntry>>;

    async fn app_detail(&self, id: u64) -> Result<AppDetail>;

    /// Replaces name, version and (unless disabled) descriptions of app `id`.
    async fn update_app(&self, id: u64, metadata: &StoreMetadata) -> Result<()>;
}

/// Extracts the numeric store id from a store URL such as
/// `https://itunes.apple.com/us/app/name/id123456789?mt=8`.
///
/// The last path segment loses its query string and its two-letter prefix.
pub fn parse_store_id(store_url: &str) -> Option<String> {
    let last_segment = store_url.rsplit('/').next().unwrap_or_default();
    let without_query = last_segment.split('?').next().unwrap_or_default();
    let store_id = without_query.get(2..)?;
    (!store_id.is_empty()).then(|| store_id.to_string())
}
