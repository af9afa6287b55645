// appinfosync/src/store/lookup.rs
use serde::Deserialize;
use url::Url;

use super::{StoreLookup, StoreMetadata};
use crate::config::SyncConfig;
use crate::errors::Result;
use crate::utils::read_success_body;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    result_count: u32,
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult {
    track_name: String,
    #[serde(default)]
    description: String,
    version: String,
    artwork_url512: Option<String>,
    artwork_url100: Option<String>,
}

impl From<LookupResult> for StoreMetadata {
    fn from(result: LookupResult) -> Self {
        // 512px artwork when the store has it, 100px otherwise.
        let icon_url = result
            .artwork_url512
            .or(result.artwork_url100)
            .unwrap_or_default();
        StoreMetadata {
            name: result.track_name,
            version: result.version,
            description: result.description,
            icon_url,
        }
    }
}

/// Unauthenticated client for the store's JSON lookup endpoint.
pub struct LookupClient<'a> {
    config: &'a SyncConfig,
    http: reqwest::Client,
}

impl<'a> LookupClient<'a> {
    pub fn new(config: &'a SyncConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("appinfosync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    fn lookup_url(&self, store_id: &str) -> Result<Url> {
        let base = format!("{}/lookup", self.config.lookup_url);
        Ok(Url::parse_with_params(&base, &[("id", store_id)])?)
    }
}

fn select_single(response: LookupResponse) -> Option<StoreMetadata> {
    if response.result_count < 1 {
        tracing::warn!("the search for the store ID yielded no results");
        return None;
    }
    if response.result_count > 1 {
        tracing::warn!("the search for the store ID yielded multiple results: the app will be skipped");
        return None;
    }
    let Some(result) = response.results.into_iter().next() else {
        tracing::warn!("the search for the store ID reported a result but returned none");
        return None;
    };
    Some(result.into())
}

impl StoreLookup for LookupClient<'_> {
    async fn lookup(&self, store_id: &str) -> Result<Option<StoreMetadata>> {
        let url = self.lookup_url(store_id)?;
        tracing::debug!("looking up store ID {} at {}", store_id, url);
        let response = self.http.get(url.clone()).send().await?;
        let body = read_success_body(url.as_str(), response).await?;
        let parsed: LookupResponse = serde_json::from_str(&body)?;

        let metadata = select_single(parsed);
        if let Some(found) = &metadata {
            tracing::debug!("store icon for \"{}\": {}", found.name, found.icon_url);
        }
        Ok(metadata)
    }
}
