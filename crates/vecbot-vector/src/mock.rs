//! In-memory backend for tests.
//!
//! [`MockBackend`] mirrors the existing-collection semantics of the real
//! adapters: a [`BackendKind::Qdrant`] mock drops and recreates, a
//! [`BackendKind::Milvus`] mock accepts a compatible schema and rejects an
//! incompatible one. Qdrant mocks upsert by id, Milvus mocks assign ids.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::backend::{BackendConnector, CollectionSpec, VectorBackend, VectorPoint};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// A collection stored by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCollection {
    /// Spec the collection was created with.
    pub spec: CollectionSpec,
    /// Stored points.
    pub points: Vec<VectorPoint>,
}

#[derive(Debug, Default)]
struct MockInner {
    unreachable: bool,
    connect_calls: usize,
    backend_calls: usize,
    collections: HashMap<(BackendKind, String), MockCollection>,
}

/// Shared state observed by tests, cloned into every mock connector.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<MockInner>>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes subsequent connection attempts fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Number of connection attempts so far.
    pub fn connect_calls(&self) -> usize {
        self.lock().connect_calls
    }

    /// Number of backend operations (create, describe, upsert) so far.
    pub fn backend_calls(&self) -> usize {
        self.lock().backend_calls
    }

    /// Returns a snapshot of a stored collection.
    pub fn collection(&self, kind: BackendKind, name: &str) -> Option<MockCollection> {
        self.lock()
            .collections
            .get(&(kind, name.to_owned()))
            .cloned()
    }

    /// Inserts a collection directly, bypassing the backend call counter.
    pub fn seed_collection(&self, kind: BackendKind, name: &str, spec: CollectionSpec) {
        self.lock().collections.insert(
            (kind, name.to_owned()),
            MockCollection {
                spec,
                points: Vec::new(),
            },
        );
    }
}

/// Connector producing [`MockBackend`] handles.
#[derive(Debug, Clone)]
pub struct MockConnector {
    kind: BackendKind,
    state: MockState,
}

impl MockConnector {
    /// Creates a connector for `kind` sharing `state`.
    pub fn new(kind: BackendKind, state: MockState) -> Self {
        Self { kind, state }
    }
}

#[async_trait]
impl BackendConnector for MockConnector {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn connect(&self) -> VectorResult<Arc<dyn VectorBackend>> {
        let mut inner = self.state.lock();
        inner.connect_calls += 1;
        if inner.unreachable {
            return Err(VectorError::connection(
                self.kind.as_str(),
                "connection refused",
            ));
        }

        Ok(Arc::new(MockBackend {
            kind: self.kind,
            state: self.state.clone(),
        }))
    }
}

/// In-memory [`VectorBackend`].
#[derive(Debug, Clone)]
pub struct MockBackend {
    kind: BackendKind,
    state: MockState,
}

#[async_trait]
impl VectorBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> VectorResult<()> {
        let mut inner = self.state.lock();
        inner.backend_calls += 1;

        let key = (self.kind, name.to_owned());
        if self.kind == BackendKind::Milvus
            && let Some(existing) = inner.collections.get(&key)
        {
            if existing.spec.dimensions == spec.dimensions {
                return Ok(());
            }
            return Err(VectorError::incompatible_schema(format!(
                "collection {name} already exists with {} dimensions",
                existing.spec.dimensions
            )));
        }

        inner.collections.insert(
            key,
            MockCollection {
                spec: *spec,
                points: Vec::new(),
            },
        );
        Ok(())
    }

    async fn collection_dimensions(&self, name: &str) -> VectorResult<u64> {
        let mut inner = self.state.lock();
        inner.backend_calls += 1;

        inner
            .collections
            .get(&(self.kind, name.to_owned()))
            .map(|c| c.spec.dimensions)
            .ok_or_else(|| VectorError::collection_not_found(name))
    }

    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> VectorResult<()> {
        let mut inner = self.state.lock();
        inner.backend_calls += 1;

        let kind = self.kind;
        let stored = inner
            .collections
            .get_mut(&(kind, collection.to_owned()))
            .ok_or_else(|| VectorError::collection_not_found(collection))?;

        let dimensions = stored.spec.dimensions as usize;
        if let Some(bad) = points.iter().find(|p| p.vector.len() != dimensions) {
            return Err(VectorError::backend(format!(
                "expected {dimensions} dimensions, got {}",
                bad.vector.len()
            )));
        }

        match kind {
            BackendKind::Qdrant => {
                stored
                    .points
                    .retain(|old| !points.iter().any(|new| new.id == old.id));
                stored.points.extend(points);
            }
            BackendKind::Milvus => {
                let next_id = stored.points.len() as u64;
                stored.points.extend(
                    points
                        .into_iter()
                        .enumerate()
                        .map(|(i, p)| VectorPoint::new(next_id + i as u64, p.vector)),
                );
            }
        }

        Ok(())
    }
}
