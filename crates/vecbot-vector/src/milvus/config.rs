//! Milvus configuration.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::MilvusBackend;
use crate::backend::{BackendConnector, VectorBackend};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Milvus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilvusConfig {
    /// Milvus server host.
    pub host: String,
    /// Milvus server port.
    #[serde(default = "default_milvus_port")]
    pub port: u16,
}

impl MilvusConfig {
    /// Creates a new Milvus configuration.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_milvus_port(),
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the endpoint URL passed to the client.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> VectorResult<()> {
        if self.host.trim().is_empty() {
            return Err(VectorError::invalid_config("milvus host cannot be empty"));
        }
        if self.port == 0 {
            return Err(VectorError::invalid_config("milvus port cannot be zero"));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendConnector for MilvusConfig {
    fn kind(&self) -> BackendKind {
        BackendKind::Milvus
    }

    async fn connect(&self) -> VectorResult<Arc<dyn VectorBackend>> {
        Ok(Arc::new(MilvusBackend::new(self).await?))
    }
}

fn default_milvus_port() -> u16 {
    19530
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_host_and_port() {
        let config = MilvusConfig::new("milvus.local").with_port(19531);
        assert_eq!(config.url(), "http://milvus.local:19531");
        assert_eq!(MilvusConfig::new("localhost").port, 19530);
    }

    #[test]
    fn rejects_empty_host() {
        assert!(MilvusConfig::new(" ").validate().is_err());
        assert!(MilvusConfig::new("localhost").with_port(0).validate().is_err());
        assert!(MilvusConfig::new("localhost").validate().is_ok());
    }
}
