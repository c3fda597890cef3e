//! Upload of the variables payload to the design tool's REST API.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use figma_tokens_core::VariablesPayload;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Longest slice of an error body kept in [`PushError::Status`].
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("variables API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not read variables API response: {0}")]
    Response(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub meta: PushMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMeta {
    /// Temporary ids from the payload mapped to the ids the API assigned.
    #[serde(default)]
    pub temp_id_to_real_id: HashMap<String, String>,
}

/// Sends a variables payload somewhere. [`HttpPusher`] is the real one.
#[async_trait]
pub trait PayloadPusher {
    async fn push_payload(
        &self,
        url: &str,
        token: &str,
        body: &VariablesPayload,
    ) -> Result<PushResponse, PushError>;
}

pub struct HttpPusher {
    http: Client,
}

impl HttpPusher {
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PushError::Client)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PayloadPusher for HttpPusher {
    async fn push_payload(
        &self,
        url: &str,
        token: &str,
        body: &VariablesPayload,
    ) -> Result<PushResponse, PushError> {
        tracing::debug!(url, variables = body.variables.len(), "posting variables payload");
        let response = self
            .http
            .post(url)
            .header("X-Figma-Token", token)
            .json(body)
            .send()
            .await
            .map_err(|source| PushError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let text = response.text().await.map_err(PushError::Response)?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|err| {
            tracing::warn!(%err, "variables API response was not JSON");
            PushResponse {
                status: Some(status.as_u16()),
                ..PushResponse::default()
            }
        }))
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_response() {
        let response: PushResponse = serde_json::from_str(
            r#"{ "status": 200, "error": false, "meta": { "tempIdToRealId": { "var-a": "VariableID:1:2" } } }"#,
        )
        .unwrap();
        assert_eq!(response.status, Some(200));
        assert!(!response.error);
        assert_eq!(
            response.meta.temp_id_to_real_id.get("var-a").map(String::as_str),
            Some("VariableID:1:2")
        );
    }

    #[test]
    fn tolerates_sparse_response() {
        let response: PushResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, PushResponse::default());
    }

    #[test]
    fn truncates_by_character() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn builds_client_with_timeout() {
        assert!(HttpPusher::new(Duration::from_secs(5)).is_ok());
    }
}
