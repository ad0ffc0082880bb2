//! PiShock HTTP API client.

use crate::shock::{ShockCommand, ShockError, ShockTransport};
use serde::Serialize;

/// Endpoint for device operations.
pub const API_URL: &str = "https://do.pishock.com/api/apioperate";

/// Account credentials for the PiShock API.
#[derive(Debug, Clone)]
pub struct PiShockCredentials {
    pub username: String,
    pub api_key: String,
    /// Share code of the target device
    pub code: String,
}

impl PiShockCredentials {
    /// Read `PISHOCK_USERNAME`, `PISHOCK_API_KEY` and `PISHOCK_CODE`.
    pub fn from_env() -> Result<Self, ShockError> {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ShockError::Config(format!("{key} is not set")))
        };

        Ok(Self {
            username: read("PISHOCK_USERNAME")?,
            api_key: read("PISHOCK_API_KEY")?,
            code: read("PISHOCK_CODE")?,
        })
    }
}

/// Request body understood by the PiShock API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OperateRequest<'a> {
    username: &'a str,
    name: &'a str,
    code: &'a str,
    intensity: u8,
    duration: u8,
    apikey: &'a str,
    op: u8,
}

/// Async PiShock client.
pub struct PiShockClient {
    credentials: PiShockCredentials,
    client: reqwest::Client,
}

impl PiShockClient {
    /// Create a client with a 30s request timeout.
    pub fn new(credentials: PiShockCredentials) -> Result<Self, ShockError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShockError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            client,
        })
    }

    /// Send one operation to the device.
    pub async fn operate(&self, command: &ShockCommand) -> Result<(), ShockError> {
        let body = OperateRequest {
            username: &self.credentials.username,
            name: &command.name,
            code: &self.credentials.code,
            intensity: command.intensity,
            duration: command.duration,
            apikey: &self.credentials.api_key,
            op: command.operation.code(),
        };

        let response = self
            .client
            .post(API_URL)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ShockError::Network(e.to_string()))?;

        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::info!(status = status.as_u16(), response = %message, "PiShock replied");

        if !status.is_success() {
            return Err(ShockError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Blocking PiShock client for use in synchronous contexts.
pub struct BlockingPiShockClient {
    inner: PiShockClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingPiShockClient {
    /// Create a client backed by its own current-thread runtime.
    pub fn new(credentials: PiShockCredentials) -> Result<Self, ShockError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ShockError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: PiShockClient::new(credentials)?,
            runtime,
        })
    }

    /// Create a client from environment credentials.
    pub fn from_env() -> Result<Self, ShockError> {
        Self::new(PiShockCredentials::from_env()?)
    }
}

impl ShockTransport for BlockingPiShockClient {
    fn deliver(&self, command: &ShockCommand) -> Result<(), ShockError> {
        self.runtime.block_on(self.inner.operate(command))
    }
}
