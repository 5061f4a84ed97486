//! Qdrant configuration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::QdrantBackend;
use crate::backend::{BackendConnector, VectorBackend};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Qdrant configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant server host.
    pub host: String,
    /// Qdrant gRPC port.
    #[serde(default = "default_qdrant_port")]
    pub port: u16,
    /// API key for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl QdrantConfig {
    /// Creates a new Qdrant configuration.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_qdrant_port(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Returns the gRPC endpoint URL.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> VectorResult<()> {
        if self.host.trim().is_empty() {
            return Err(VectorError::invalid_config("qdrant host cannot be empty"));
        }
        if self.port == 0 {
            return Err(VectorError::invalid_config("qdrant port cannot be zero"));
        }
        if self.timeout_secs == 0 {
            return Err(VectorError::invalid_config(
                "qdrant timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for QdrantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[async_trait]
impl BackendConnector for QdrantConfig {
    fn kind(&self) -> BackendKind {
        BackendKind::Qdrant
    }

    async fn connect(&self) -> VectorResult<Arc<dyn VectorBackend>> {
        Ok(Arc::new(QdrantBackend::new(self).await?))
    }
}

fn default_qdrant_port() -> u16 {
    6334
}

const fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_grpc_port() {
        let config = QdrantConfig::new("localhost");
        assert_eq!(config.url(), "http://localhost:6334");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_hides_api_key() {
        let config = QdrantConfig::new("localhost").with_api_key("secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("***"));
    }
}
