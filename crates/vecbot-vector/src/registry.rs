//! Supported backends and the connection cache.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::TRACING_TARGET;
use crate::backend::{BackendConnector, VectorBackend};
use crate::config::VectorStoreConfig;
use crate::error::{VectorError, VectorResult};

/// Identifier of a supported vector database.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendKind {
    /// Milvus, schema-based collections.
    #[default]
    Milvus,
    /// Qdrant, point-addressed collections.
    Qdrant,
}

impl BackendKind {
    /// Returns the backend name as a static string.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parses a user-supplied backend name.
    ///
    /// Matching is exact: `"Qdrant"` or `" qdrant"` are unknown.
    pub fn parse(name: &str) -> VectorResult<Self> {
        name.parse()
            .map_err(|_| VectorError::unknown_backend(name))
    }
}

/// Returns every backend identifier the bot knows about.
pub fn list_backends() -> Vec<BackendKind> {
    BackendKind::iter().collect()
}

/// Lookup table from backend identifier to connector, plus the handles
/// opened so far.
///
/// Handles are created on first use and kept for the lifetime of the
/// registry.
#[derive(Default)]
pub struct BackendRegistry {
    connectors: BTreeMap<BackendKind, Box<dyn BackendConnector>>,
    handles: HashMap<BackendKind, Arc<dyn VectorBackend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the Milvus and Qdrant connectors from `config`.
    pub fn from_config(config: &VectorStoreConfig) -> Self {
        Self::new()
            .with_connector(config.milvus.clone())
            .with_connector(config.qdrant.clone())
    }

    /// Registers a connector, replacing any previous one for the same backend.
    pub fn with_connector(mut self, connector: impl BackendConnector + 'static) -> Self {
        self.register(connector);
        self
    }

    /// Registers a connector, replacing any previous one for the same backend.
    pub fn register(&mut self, connector: impl BackendConnector + 'static) {
        let kind = connector.kind();
        self.handles.remove(&kind);
        self.connectors.insert(kind, Box::new(connector));
    }

    /// Returns the registered backends in a stable order.
    pub fn kinds(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.connectors.keys().copied()
    }

    /// Resolves a user-supplied name to a registered backend.
    pub fn resolve(&self, name: &str) -> VectorResult<BackendKind> {
        let kind = BackendKind::parse(name)?;
        if self.connectors.contains_key(&kind) {
            Ok(kind)
        } else {
            Err(VectorError::unknown_backend(name))
        }
    }

    /// Returns whether a handle for `kind` has already been opened.
    pub fn is_connected(&self, kind: BackendKind) -> bool {
        self.handles.contains_key(&kind)
    }

    /// Returns the handle for `kind`, connecting on first use.
    pub async fn connect(&mut self, kind: BackendKind) -> VectorResult<Arc<dyn VectorBackend>> {
        if let Some(handle) = self.handles.get(&kind) {
            return Ok(Arc::clone(handle));
        }

        let connector = self
            .connectors
            .get(&kind)
            .ok_or_else(|| VectorError::unknown_backend(kind.as_str()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            backend = %kind,
            "Opening backend connection"
        );

        let handle = connector.connect().await?;
        self.handles.insert(kind, Arc::clone(&handle));

        tracing::info!(
            target: TRACING_TARGET,
            backend = %kind,
            "Backend connected"
        );

        Ok(handle)
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.connectors.keys().collect::<Vec<_>>())
            .field("connected", &self.handles.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConnector, MockState};

    fn registry(state: &MockState) -> BackendRegistry {
        BackendRegistry::new()
            .with_connector(MockConnector::new(BackendKind::Milvus, state.clone()))
            .with_connector(MockConnector::new(BackendKind::Qdrant, state.clone()))
    }

    #[test]
    fn lists_every_backend() {
        assert_eq!(
            list_backends(),
            vec![BackendKind::Milvus, BackendKind::Qdrant]
        );
        assert_eq!(BackendKind::default(), BackendKind::Milvus);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(BackendKind::parse("qdrant").unwrap(), BackendKind::Qdrant);
        assert_eq!(BackendKind::parse("milvus").unwrap(), BackendKind::Milvus);
        for name in ["Qdrant", "qdrant ", "pinecone", ""] {
            assert!(matches!(
                BackendKind::parse(name),
                Err(VectorError::UnknownBackend(n)) if n == name
            ));
        }
    }

    #[test]
    fn resolve_requires_a_registered_connector() {
        let state = MockState::default();
        let registry =
            BackendRegistry::new().with_connector(MockConnector::new(BackendKind::Qdrant, state));

        assert_eq!(registry.resolve("qdrant").unwrap(), BackendKind::Qdrant);
        assert!(matches!(
            registry.resolve("milvus"),
            Err(VectorError::UnknownBackend(_))
        ));
    }

    #[tokio::test]
    async fn connect_is_memoized() {
        let state = MockState::default();
        let mut registry = registry(&state);

        assert!(!registry.is_connected(BackendKind::Qdrant));
        registry.connect(BackendKind::Qdrant).await.unwrap();
        registry.connect(BackendKind::Qdrant).await.unwrap();

        assert!(registry.is_connected(BackendKind::Qdrant));
        assert!(!registry.is_connected(BackendKind::Milvus));
        assert_eq!(state.connect_calls(), 1);
    }

    #[tokio::test]
    async fn failed_connect_is_not_cached() {
        let state = MockState::default();
        state.set_unreachable(true);
        let mut registry = registry(&state);

        let err = registry.connect(BackendKind::Milvus).await.err().unwrap();
        assert!(matches!(err, VectorError::Connection { .. }));
        assert!(!registry.is_connected(BackendKind::Milvus));

        state.set_unreachable(false);
        registry.connect(BackendKind::Milvus).await.unwrap();
        assert_eq!(state.connect_calls(), 2);
    }
}
