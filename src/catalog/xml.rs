// appinfosync/src/catalog/xml.rs
use serde::{Deserialize, Serialize};

use super::{AppDetail, CatalogEntry};
use crate::errors::Result;
use crate::store::StoreMetadata;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// Documents returned by the management server
#[derive(Debug, Deserialize)]
struct AppListing {
    #[serde(default)]
    size: u32,
    #[serde(rename = "mobile_device_application", default)]
    apps: Vec<ListedApp>,
}

#[derive(Debug, Deserialize)]
struct ListedApp {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
struct AppDetailDocument {
    general: GeneralSubset,
}

#[derive(Debug, Deserialize)]
struct GeneralSubset {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    itunes_store_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

// Document sent back on update
#[derive(Debug, Serialize)]
#[serde(rename = "mobile_device_application")]
struct AppUpdate<'a> {
    general: GeneralUpdate<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    self_service: Option<SelfServiceUpdate<'a>>,
}

#[derive(Debug, Serialize)]
struct GeneralUpdate<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SelfServiceUpdate<'a> {
    self_service_description: &'a str,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parses the listing document into `(size, entries)`.
pub(crate) fn parse_listing(body: &str) -> Result<(u32, Vec<CatalogEntry>)> {
    let listing: AppListing = quick_xml::de::from_str(body)?;
    let entries = listing
        .apps
        .into_iter()
        .map(|app| CatalogEntry::new(app.id, app.name, app.version))
        .collect();
    Ok((listing.size, entries))
}

/// Parses a `general` subset. The store URL prefers `itunes_store_url` and
/// falls back to `url`.
pub(crate) fn parse_detail(body: &str) -> Result<AppDetail> {
    let document: AppDetailDocument = quick_xml::de::from_str(body)?;
    let general = document.general;
    let store_url = non_blank(general.itunes_store_url).or_else(|| non_blank(general.url));
    Ok(AppDetail {
        description: non_blank(general.description),
        store_url,
    })
}

/// Builds the full replacement document for an app. Descriptions go into both
/// `general` and `self_service` unless `skip_descriptions` is set.
pub(crate) fn update_document(metadata: &StoreMetadata, skip_descriptions: bool) -> Result<String> {
    let description = (!skip_descriptions).then_some(metadata.description.as_str());
    let update = AppUpdate {
        general: GeneralUpdate {
            name: &metadata.name,
            version: &metadata.version,
            description,
        },
        self_service: description.map(|d| SelfServiceUpdate {
            self_service_description: d,
        }),
    };
    let body = quick_xml::se::to_string(&update)?;
    Ok(format!("{XML_DECLARATION}{body}"))
}
