//! Backend HTTP client.
//!
//! The console consumes exactly two endpoints: the agent roster
//! (`GET /api/agents`) and command dispatch (`POST /api/command?id=...`).
//! The [`Backend`] trait is the seam the scheduler and dispatcher are
//! written against; [`HttpBackend`] is the reqwest implementation.

use crate::error::ApiError;
use async_trait::async_trait;
use muster_types::{Agent, DispatchRequest, DispatchResponse};
use std::time::Duration;
use tracing::debug;

/// Request timeout for both endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The two console endpoints of the agent backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full agent roster, in backend order.
    async fn fetch_agents(&self) -> Result<Vec<Agent>, ApiError>;

    /// Submit a command for an agent. A 2xx answer means the backend has
    /// queued the command and assigned it an id.
    async fn dispatch(&self, agent_id: &str, command: &str)
        -> Result<DispatchResponse, ApiError>;
}

/// HTTP implementation of [`Backend`] against a fixed base URL.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the given base URL (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn body_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Schema(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_agents(&self) -> Result<Vec<Agent>, ApiError> {
        let url = format!("{}/api/agents", self.base_url);
        debug!(url = %url, "Fetching agent roster");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Protocol {
                status: status.as_u16(),
            });
        }

        resp.json::<Vec<Agent>>().await.map_err(body_error)
    }

    async fn dispatch(
        &self,
        agent_id: &str,
        command: &str,
    ) -> Result<DispatchResponse, ApiError> {
        let url = format!("{}/api/command", self.base_url);
        debug!(url = %url, agent = %agent_id, "Dispatching command");

        let resp = self
            .client
            .post(&url)
            .query(&[("id", agent_id)])
            .json(&DispatchRequest {
                command: command.to_string(),
            })
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Protocol {
                status: status.as_u16(),
            });
        }

        resp.json::<DispatchResponse>().await.map_err(body_error)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:8080/");
        assert_eq!(backend.base_url(), "http://localhost:8080");
    }
}
