//! FRED observations API client.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::domain::SeriesQuery;
use crate::error::PipelineError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const API_KEY_VAR: &str = "FRED_API_KEY";

/// One series' response body, as returned by FRED.
///
/// The body is kept opaque here; `table::normalize` is the layer that knows
/// what shape to expect inside it.
#[derive(Debug, Clone)]
pub struct RawSeriesResponse {
    series_id: String,
    body: Value,
}

impl RawSeriesResponse {
    pub fn new(series_id: impl Into<String>, body: Value) -> Self {
        Self {
            series_id: series_id.into(),
            body,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    /// Resolve the API key from the environment (`.env` supported) and build
    /// a client with the given per-request timeout.
    ///
    /// A missing key fails here, before any network call is attempted.
    pub fn from_env(timeout: Duration) -> Result<Self, PipelineError> {
        dotenvy::dotenv().ok();
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| PipelineError::MissingCredential)?;
        Self::new(api_key, timeout)
    }

    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Io {
                context: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Fetch one series' observations over the query's date range.
    ///
    /// One GET per call; no caching and no retry at this layer (the driver
    /// owns the retry policy).
    pub fn fetch(&self, query: &SeriesQuery) -> Result<RawSeriesResponse, PipelineError> {
        let series = query.series_id();
        let start = query.start().to_string();
        let end = query.end().to_string();

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series),
                ("api_key", self.api_key.as_str()),
                ("file_type", query.file_type()),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ])
            .send()
            .map_err(|e| PipelineError::Transport {
                series: series.to_string(),
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            if credential_rejected(status, &body) {
                return Err(PipelineError::Authentication {
                    series: series.to_string(),
                    detail: format!("status {status}: {}", excerpt(&body)),
                });
            }
            return Err(PipelineError::Transport {
                series: series.to_string(),
                detail: format!("status {status}"),
            });
        }

        let body: Value = resp.json().map_err(|e| PipelineError::MalformedResponse {
            series: series.to_string(),
            detail: format!("body is not JSON: {e}"),
        })?;

        Ok(RawSeriesResponse::new(series, body))
    }
}

/// FRED signals a bad or missing key as a 400 whose message names `api_key`;
/// gateways in front of it may also answer 401/403.
fn credential_rejected(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return true;
    }
    status == StatusCode::BAD_REQUEST && body.contains("api_key")
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= 200 {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(200).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_key_responses_classify_as_authentication() {
        let fred_message =
            r#"{"error_code":400,"error_message":"Bad Request. Variable api_key has not been set."}"#;
        assert!(credential_rejected(StatusCode::BAD_REQUEST, fred_message));
        assert!(credential_rejected(StatusCode::UNAUTHORIZED, ""));
        assert!(credential_rejected(StatusCode::FORBIDDEN, ""));
    }

    #[test]
    fn other_failures_classify_as_transport() {
        let unknown_series =
            r#"{"error_code":400,"error_message":"Bad Request. The series does not exist."}"#;
        assert!(!credential_rejected(StatusCode::BAD_REQUEST, unknown_series));
        assert!(!credential_rejected(StatusCode::INTERNAL_SERVER_ERROR, ""));
        assert!(!credential_rejected(StatusCode::TOO_MANY_REQUESTS, ""));
    }

    #[test]
    fn excerpt_bounds_error_detail_length() {
        let long = "x".repeat(500);
        assert!(excerpt(&long).len() < 250);
        assert_eq!(excerpt("  short  "), "short");
    }
}
