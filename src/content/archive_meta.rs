use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional enrichment for archive.org items: title, author and per-format
/// download links. Strictly best-effort; any failure degrades to `None` and
/// the viewer shows the identifier with a link to the external site.
/// Enrichment never blocks or fails resolution itself.
#[derive(Clone)]
pub struct ArchiveMetaClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ArchiveItemMeta {
    pub identifier: String,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub downloads: Vec<ArchiveDownload>,
    pub details_url: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ArchiveDownload {
    pub format: String,
    pub url: String,
}

#[derive(Deserialize)]
struct MetadataPayload {
    metadata: Option<MetadataFields>,
    files: Option<Vec<FileEntry>>,
}

// archive.org serves some metadata fields as either a string or an array of
// strings, depending on the item.
#[derive(Deserialize)]
struct MetadataFields {
    title: Option<serde_json::Value>,
    creator: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct FileEntry {
    name: Option<String>,
    format: Option<String>,
}

fn flatten_field(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => items
            .into_iter()
            .find_map(|item| item.as_str().map(|s| s.to_string())),
        _ => None,
    }
}

impl ArchiveMetaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build archive metadata http client");

        ArchiveMetaClient {
            http,
            base_url: base_url.into(),
        }
    }

    #[tracing::instrument(name = "Fetch archive metadata", skip(self))]
    pub async fn fetch(&self, identifier: &str) -> Option<ArchiveItemMeta> {
        let url = format!("{}/metadata/{}", self.base_url, identifier);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, identifier, "archive metadata request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                status = %response.status(),
                identifier,
                "archive metadata not available"
            );
            return None;
        }

        let payload: MetadataPayload = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, identifier, "malformed archive metadata payload");
                return None;
            }
        };

        let (title, creator) = match payload.metadata {
            Some(fields) => (flatten_field(fields.title), flatten_field(fields.creator)),
            None => (None, None),
        };

        let downloads = payload
            .files
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                let name = entry.name?;
                Some(ArchiveDownload {
                    format: entry.format.unwrap_or_else(|| "Unknown".to_string()),
                    url: format!("https://archive.org/download/{}/{}", identifier, name),
                })
            })
            .collect();

        Some(ArchiveItemMeta {
            identifier: identifier.to_string(),
            title,
            creator,
            downloads,
            details_url: format!("https://archive.org/details/{}", identifier),
        })
    }
}
