//! HTTP client for the generic business-record API.
//!
//! The dashboard treats persistence as an opaque success/failure boundary:
//! records are fetched with a plain GET and filtered client-side to the
//! `lead` record type; create/update/delete are dispatched and only the
//! status code is inspected. Response parsing is split into a pure function
//! so it can be tested without a server.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::leads::Lead;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 5;

pub const LEAD_RECORD_TYPE: &str = "lead";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("api returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Value>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Fetch the full record collection and keep the leads.
    pub async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError> {
        let url = format!("{}/records", self.base_url);
        debug!(%url, "fetching business records");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if status != 200 {
            return Err(ApiError::Status { status, body: text });
        }

        parse_leads(&text)
    }

    pub async fn create_lead(&self, lead: &Lead) -> Result<(), ApiError> {
        let url = format!("{}/records", self.base_url);
        let body = envelope(lead)?;
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        check_status(response).await
    }

    pub async fn update_lead(&self, lead: &Lead) -> Result<(), ApiError> {
        let url = format!("{}/records/{}", self.base_url, lead.id);
        let body = envelope(lead)?;
        let response = self
            .http
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        check_status(response).await
    }

    /// Bulk delete. Ids that fail are reported together; successes stand.
    pub async fn delete_leads(&self, ids: &[String]) -> Result<(), ApiError> {
        let mut failed = Vec::new();
        for id in ids {
            let url = format!("{}/records/{}", self.base_url, id);
            let result = self
                .http
                .delete(&url)
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()));
            match result {
                Ok(response) => {
                    if let Err(e) = check_status(response).await {
                        warn!(%id, error = %e, "delete failed");
                        failed.push(id.clone());
                    }
                }
                Err(e) => {
                    warn!(%id, error = %e, "delete failed");
                    failed.push(id.clone());
                }
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Request(format!(
                "failed to delete {} of {} records",
                failed.len(),
                ids.len()
            )))
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

/// Wrap a lead in the generic record envelope the API expects.
fn envelope(lead: &Lead) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(lead).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "recordType".to_string(),
            Value::String(LEAD_RECORD_TYPE.to_string()),
        );
    }
    Ok(value)
}

/// Parse a records payload, keeping entries whose `recordType` is `lead`.
/// Records of other types are skipped; a lead entry that fails to decode is
/// logged and skipped rather than failing the whole snapshot.
pub fn parse_leads(body: &str) -> Result<Vec<Lead>, ApiError> {
    let response: RecordsResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let mut leads = Vec::new();
    for record in response.records {
        let record_type = record
            .get("recordType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if record_type != LEAD_RECORD_TYPE {
            continue;
        }
        match serde_json::from_value::<Lead>(record) {
            Ok(lead) => leads.push(lead),
            Err(e) => warn!(error = %e, "skipping malformed lead record"),
        }
    }
    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::LeadStatus;

    #[test]
    fn test_parse_keeps_only_lead_records() {
        let body = r#"{
            "records": [
                {"recordType": "lead", "id": "l1", "name": "Acme Corp", "status": "qualified"},
                {"recordType": "quote", "id": "q1", "total": 1200},
                {"recordType": "lead", "id": "l2", "name": "Globex"}
            ]
        }"#;
        let leads = parse_leads(body).unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].id, "l1");
        assert_eq!(leads[0].status, LeadStatus::Qualified);
        assert_eq!(leads[1].id, "l2");
    }

    #[test]
    fn test_parse_skips_malformed_lead() {
        // Second record claims to be a lead but is missing the name field.
        let body = r#"{
            "records": [
                {"recordType": "lead", "id": "l1", "name": "Acme Corp"},
                {"recordType": "lead", "id": "broken"}
            ]
        }"#;
        let leads = parse_leads(body).unwrap();
        assert_eq!(leads.len(), 1);
    }

    #[test]
    fn test_parse_empty_and_missing_records_key() {
        assert!(parse_leads(r#"{"records": []}"#).unwrap().is_empty());
        assert!(parse_leads("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_leads("<html>gateway error</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_envelope_carries_record_type() {
        let lead = Lead::blank("l9".to_string());
        let value = envelope(&lead).unwrap();
        assert_eq!(value["recordType"], "lead");
        assert_eq!(value["id"], "l9");
    }
}
