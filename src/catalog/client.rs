// appinfosync/src/catalog/client.rs
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{AppDetail, Catalog, CatalogEntry, xml};
use crate::config::SyncConfig;
use crate::errors::Result;
use crate::store::StoreMetadata;
use crate::utils::{basic_auth_header, read_success_body};

const APPS_ENDPOINT: &str = "/JSSResource/mobiledeviceapps";

/// REST+XML client for mobile device apps on the management server.
pub struct ManagementClient<'a> {
    config: &'a SyncConfig,
    http: reqwest::Client,
    auth_header: String,
}

impl<'a> ManagementClient<'a> {
    pub fn new(config: &'a SyncConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("appinfosync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            config,
            http,
            auth_header: basic_auth_header(&config.credentials),
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.server_url, endpoint)
    }

    async fn get(&self, endpoint: &str) -> Result<String> {
        let url = self.url_for(endpoint);
        tracing::debug!("retrieving resource: ..{}", endpoint);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "text/xml")
            .send()
            .await?;
        read_success_body(&url, response).await
    }

    async fn put(&self, endpoint: &str, body: String) -> Result<String> {
        let url = self.url_for(endpoint);
        tracing::debug!("updating resource: ..{}", endpoint);
        let response = self
            .http
            .put(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;
        read_success_body(&url, response).await
    }
}

impl Catalog for ManagementClient<'_> {
    async fn list_apps(&self) -> Result<Vec<CatalogEntry>> {
        let body = self.get(APPS_ENDPOINT).await?;
        let (size, entries) = xml::parse_listing(&body)?;
        if size < 1 {
            tracing::info!("no mobile device apps were found on the server");
            return Ok(Vec::new());
        }
        tracing::info!(
            "there are {} app(s) listed on the server: retrieving their data",
            size
        );
        Ok(entries)
    }

    async fn app_detail(&self, id: u64) -> Result<AppDetail> {
        let body = self
            .get(&format!("{}/id/{}/subset/general", APPS_ENDPOINT, id))
            .await?;
        xml::parse_detail(&body)
    }

    async fn update_app(&self, id: u64, metadata: &StoreMetadata) -> Result<()> {
        let document = xml::update_document(metadata, self.config.skip_descriptions)?;
        self.put(&format!("{}/id/{}", APPS_ENDPOINT, id), document)
            .await?;
        Ok(())
    }
}
