// appinfosync/src/store/mod.rs
pub(crate) mod lookup;

use crate::errors::Result;

pub use lookup::LookupClient;

/// Published metadata for one app, taken from a single lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub icon_url: String,
}

/// The public app store side of a sync run.
pub trait StoreLookup {
    /// `Ok(None)` when the id matches no app or more than one.
    async fn lookup(&self, store_id: &str) -> Result<Option<StoreMetadata>>;
}
