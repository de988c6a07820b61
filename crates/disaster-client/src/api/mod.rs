// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP layer for the disaster backend.
//!
//! Issues `GET {base}/api/disaster/{id}` and decodes the JSON point array.
//! There is no retry and no timeout; a failed request is reported once.

use log::debug;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::model::DisasterPoint;

/// Default backend address (a local development server).
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Errors that can occur while fetching disaster data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("disaster identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(StatusCode),

    #[error("invalid disaster payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the `/api/disaster/{id}` endpoint.
#[derive(Debug, Clone)]
pub struct DisasterApi {
    client: reqwest::Client,
    base_url: Url,
}

impl DisasterApi {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:5000`).
    ///
    /// A bare `host:port` without a scheme is taken as plain `http`.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let trimmed = base_url.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };

        let parsed = Url::parse(&candidate).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("disaster-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for a disaster identifier.
    ///
    /// The identifier is encoded as a single path segment.
    pub fn endpoint(&self, disaster: &str) -> Result<Url, FetchError> {
        let disaster = disaster.trim();
        if disaster.is_empty() {
            return Err(FetchError::EmptyIdentifier);
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "disaster", disaster]);

        Ok(url)
    }

    /// Fetch the points for a disaster.
    ///
    /// Returns `Ok(None)` when the backend answers with an empty body or
    /// JSON `null`.
    pub async fn fetch_points(&self, disaster: &str) -> Result<Option<Vec<DisasterPoint>>, FetchError> {
        let url = self.endpoint(disaster)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes for '{}'", body.len(), disaster);

        parse_payload(&body)
    }
}

/// Decode a response body into points.
pub fn parse_payload(body: &[u8]) -> Result<Option<Vec<DisasterPoint>>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path() {
        let api = DisasterApi::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            api.endpoint("fire").unwrap().as_str(),
            "http://127.0.0.1:5000/api/disaster/fire"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = DisasterApi::new("https://example.org/risk/").unwrap();
        assert_eq!(
            api.endpoint("flood").unwrap().as_str(),
            "https://example.org/risk/api/disaster/flood"
        );
    }

    #[test]
    fn test_endpoint_encodes_identifier() {
        let api = DisasterApi::new("http://localhost:5000").unwrap();
        assert_eq!(
            api.endpoint("wild fire/x").unwrap().as_str(),
            "http://localhost:5000/api/disaster/wild%20fire%2Fx"
        );
    }

    #[test]
    fn test_endpoint_rejects_empty_identifier() {
        let api = DisasterApi::new("http://localhost:5000").unwrap();
        assert!(matches!(api.endpoint("  "), Err(FetchError::EmptyIdentifier)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            DisasterApi::new("not a url"),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            DisasterApi::new("http://"),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            DisasterApi::new("localhost:notaport"),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_without_scheme() {
        let api = DisasterApi::new("localhost:5000").unwrap();
        assert_eq!(
            api.endpoint("fire").unwrap().as_str(),
            "http://localhost:5000/api/disaster/fire"
        );

        let api = DisasterApi::new(" 127.0.0.1:5000 ").unwrap();
        assert_eq!(
            api.endpoint("fire").unwrap().as_str(),
            "http://127.0.0.1:5000/api/disaster/fire"
        );
    }

    #[test]
    fn test_parse_payload() {
        let points = parse_payload(br#"[{"lat": 10, "lon": 20, "chance": 50}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            points,
            vec![DisasterPoint {
                lat: 10.0,
                lon: 20.0,
                chance: 50.0
            }]
        );
    }

    #[test]
    fn test_parse_missing_payload() {
        assert!(parse_payload(b"").unwrap().is_none());
        assert!(parse_payload(b" \n").unwrap().is_none());
        assert!(parse_payload(b"null").unwrap().is_none());
        assert_eq!(parse_payload(b"[]").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_parse_malformed_payload() {
        assert!(matches!(parse_payload(b"<html>"), Err(FetchError::Parse(_))));
        assert!(matches!(
            parse_payload(br#"[{"lat": 1}]"#),
            Err(FetchError::Parse(_))
        ));
    }
}
