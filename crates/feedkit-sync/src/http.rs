//! HTTP implementation of the calculation service
//!
//! Timeouts are delegated to the `reqwest` client. Non-2xx responses carry
//! the server's `error` or `message` field when the body is JSON.

use crate::backend::{CalculatorBackend, ShareRequest};
use async_trait::async_trait;
use feedkit_core::{
    CatalogEntry, CatalogKind, ResetError, ResolveError, ResolveRequest, ResolveResponse,
    ShareError,
};
use feedkit_settings::RemoteSettings;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Calculation service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    remote: RemoteSettings,
}

/// Outcome of one request before it is mapped to a domain error
enum Failure {
    Status(u16, String),
    Network(String),
    Malformed(String),
}

impl From<Failure> for ResolveError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Status(status, message) => ResolveError::Http { status, message },
            Failure::Network(message) => ResolveError::Network { message },
            Failure::Malformed(reason) => ResolveError::MalformedResponse { reason },
        }
    }
}

impl From<Failure> for ShareError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Status(status, message) => ShareError::Http { status, message },
            Failure::Network(message) => ShareError::Network { message },
            Failure::Malformed(reason) => ShareError::MalformedResponse { reason },
        }
    }
}

impl From<Failure> for ResetError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Status(status, message) => ResetError::Http { status, message },
            Failure::Network(message) | Failure::Malformed(message) => {
                ResetError::Network { message }
            }
        }
    }
}

impl HttpBackend {
    /// Create a backend for the configured service
    pub fn new(remote: RemoteSettings) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(remote.request_timeout())
            .build()
            .map_err(|e| ResolveError::Network {
                message: e.to_string(),
            })?;
        Ok(Self { client, remote })
    }

    /// Settings this backend was built from
    pub fn remote(&self) -> &RemoteSettings {
        &self.remote
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Response, Failure> {
        let response = request
            .send()
            .await
            .map_err(|e| Failure::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Failure::Status(status.as_u16(), error_message(status, &body)))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Failure> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Failure::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| Failure::Malformed(e.to_string()))
    }
}

/// Pick the most useful message out of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

#[async_trait]
impl CalculatorBackend for HttpBackend {
    async fn calculate(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError> {
        let url = self.remote.endpoint(&self.remote.resolve_path);
        tracing::debug!("POST {}", url);

        let response = Self::send(self.client.post(&url).json(request)).await?;
        Ok(Self::read_json(response).await?)
    }

    async fn catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ResolveError> {
        let url = format!(
            "{}/{}",
            self.remote.endpoint(&self.remote.catalog_path),
            kind.path_segment()
        );
        tracing::debug!("GET {}", url);

        let response = Self::send(self.client.get(&url)).await?;
        Ok(Self::read_json(response).await?)
    }

    async fn share_settings(
        &self,
        auth_token: &str,
        request: &ShareRequest,
    ) -> Result<(), ShareError> {
        let url = self.remote.endpoint(&self.remote.share_path);
        tracing::debug!("POST {}", url);

        let response =
            Self::send(self.client.post(&url).bearer_auth(auth_token).json(request)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ShareError::Network {
                message: e.to_string(),
            })?;
        if !bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| {
                ShareError::MalformedResponse {
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    async fn reset_preference(&self, auth_token: &str) -> Result<(), ResetError> {
        let url = self.remote.endpoint(&self.remote.reset_path);
        tracing::debug!("DELETE {}", url);

        Self::send(self.client.delete(&url).bearer_auth(auth_token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"Unknown bit"}"#),
            "Unknown bit"
        );
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"message":"Token expired"}"#),
            "Token expired"
        );
    }

    #[test]
    fn test_error_message_falls_back() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }
}
