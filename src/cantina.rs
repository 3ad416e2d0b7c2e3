//! Cantina API client for fetching contest findings
//!
//! Authenticates with the session cookie from `[provider]` configuration
//! (the `CANTINA_AUTH_COOKIE` environment variable takes precedence).
//! One request, one fixed timeout, no retry: on failure the run aborts
//! after reporting what the provider said.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_API_BASE: &str = "https://cantina.xyz/api/v0";

/// The findings endpoint rejects non-browser agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// How much of an error body is worth relaying to the user.
const BODY_SNIPPET_LEN: usize = 500;

/// Failure surface of the findings provider. All of these are fatal for
/// the run; record-level problems are handled downstream instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(String),
}

pub struct CantinaClient {
    client: reqwest::Client,
    base_url: String,
    cookie: String,
}

impl CantinaClient {
    /// Build a client with the given request timeout, falling back to the
    /// default client if the builder fails.
    pub fn new(base_url: &str, cookie: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: cookie.to_string(),
        }
    }

    fn findings_url(&self, repository: &str) -> String {
        format!("{}/repositories/{}/findings", self.base_url, repository)
    }

    /// Fetch the raw findings collection for a contest repository.
    ///
    /// `severities` narrows the fetch to payable tiers server-side; the
    /// pipeline still re-checks severity per record. A response without a
    /// findings array is "no data", not an error.
    pub async fn fetch_findings(
        &self,
        repository: &str,
        severities: &[&str],
        limit: u32,
    ) -> Result<Vec<Value>, ProviderError> {
        let url = self.findings_url(repository);
        info!("fetching findings from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("limit", limit.to_string()),
                ("with_events", "false".to_string()),
                ("with_files", "true".to_string()),
                ("duplicates", "true".to_string()),
                ("severity", severities.join(",")),
            ])
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Cookie", &self.cookie)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        debug!("provider responded with status {status}");

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(extract_findings(payload))
    }
}

/// Pull the findings array out of a response payload. A payload that is not
/// an object, or has no findings array, means the contest has no data yet.
fn extract_findings(payload: Value) -> Vec<Value> {
    match payload {
        Value::Object(mut map) => match map.remove("findings") {
            Some(Value::Array(findings)) => findings,
            Some(_) | None => {
                warn!("response carries no findings array, treating as empty");
                Vec::new()
            }
        },
        _ => {
            warn!("response is not a JSON object, treating as empty");
            Vec::new()
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_findings_url() {
        let client = CantinaClient::new(DEFAULT_API_BASE, "", Duration::from_secs(60));
        assert_eq!(
            client.findings_url("e7af4986"),
            "https://cantina.xyz/api/v0/repositories/e7af4986/findings"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = CantinaClient::new("https://cantina.xyz/api/v0/", "", Duration::from_secs(60));
        assert_eq!(
            client.findings_url("r-1"),
            "https://cantina.xyz/api/v0/repositories/r-1/findings"
        );
    }

    #[test]
    fn test_extract_findings_array() {
        let raw = extract_findings(json!({"findings": [{"id": "f-1"}, {"id": "f-2"}]}));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_extract_findings_missing_key_is_empty() {
        assert!(extract_findings(json!({"total": 0})).is_empty());
    }

    #[test]
    fn test_extract_findings_non_object_is_empty() {
        assert!(extract_findings(json!([1, 2, 3])).is_empty());
        assert!(extract_findings(json!("nope")).is_empty());
    }

    #[test]
    fn test_extract_findings_non_array_value_is_empty() {
        assert!(extract_findings(json!({"findings": "oops"})).is_empty());
    }

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(2000);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), BODY_SNIPPET_LEN + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(600);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= BODY_SNIPPET_LEN + 3);
    }
}
