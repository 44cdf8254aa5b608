//! # Bulk Load
//!
//! Serializes document batches into the Elasticsearch `_bulk` NDJSON wire
//! format and delivers them over HTTP. Only the response status code is
//! consulted; per-item errors inside a 200 body are not inspected.

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::debug;

use crate::errors::EtlError;
use crate::types::IndexDocument;

/// Builds the newline-delimited `_bulk` body: one index directive per
/// document, each immediately followed by the document's own JSON line, with
/// a trailing newline. The directive `_id` is taken from the document itself.
pub fn bulk_payload<D>(documents: &[D], index: &str) -> Result<String, serde_json::Error>
where
    D: IndexDocument + Serialize,
{
    let mut payload = String::new();
    for document in documents {
        let action = serde_json::json!({
            "index": { "_id": document.id(), "_index": index }
        });
        payload.push_str(&serde_json::to_string(&action)?);
        payload.push('\n');
        payload.push_str(&serde_json::to_string(document)?);
        payload.push('\n');
    }
    Ok(payload)
}

/// HTTP client for the bulk-indexing endpoint.
pub struct BulkLoader {
    http: reqwest::Client,
    base_url: String,
}

impl BulkLoader {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Delivers one batch with a single `POST {base_url}/_bulk` request.
    ///
    /// A non-success status becomes [`EtlError::Delivery`]; the caller
    /// decides whether that aborts the run or just marks the batch failed.
    pub async fn deliver<D>(&self, documents: &[D], index: &str) -> Result<(), EtlError>
    where
        D: IndexDocument + Serialize,
    {
        let payload = bulk_payload(documents, index)?;
        let url = format!("{}/_bulk", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::Delivery {
                index: index.to_string(),
                status,
            });
        }
        debug!(index, documents = documents.len(), "bulk batch accepted");
        Ok(())
    }
}
