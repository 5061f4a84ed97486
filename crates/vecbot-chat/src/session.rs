//! Process-wide bot session.

use vecbot_vector::{
    BackendKind, BackendRegistry, CollectionConfig, CollectionCreated, VectorResult,
    VectorsInserted, create_collection, insert_random_vectors,
};

use crate::TRACING_TARGET;

/// The active backend and the connections opened so far.
///
/// Shared by every chat: selecting a backend in one chat changes it for all
/// of them.
#[derive(Debug)]
pub struct Session {
    active: BackendKind,
    registry: BackendRegistry,
    collection: CollectionConfig,
}

impl Session {
    /// Creates a session using the default backend.
    pub fn new(registry: BackendRegistry, collection: CollectionConfig) -> Self {
        Self {
            active: BackendKind::default(),
            registry,
            collection,
        }
    }

    /// Returns the active backend.
    pub fn active_backend(&self) -> BackendKind {
        self.active
    }

    /// Returns the backends that can be selected.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.registry.kinds().collect()
    }

    /// Returns the backend registry.
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Validates `name`, connects to it and makes it the active backend.
    ///
    /// On failure the active backend is left unchanged.
    pub async fn select_backend(&mut self, name: &str) -> VectorResult<BackendKind> {
        let kind = self.registry.resolve(name)?;
        self.registry.connect(kind).await?;

        if kind != self.active {
            tracing::info!(
                target: TRACING_TARGET,
                from = %self.active,
                to = %kind,
                "Active backend changed"
            );
        }

        self.active = kind;
        Ok(kind)
    }

    /// Creates a collection on the active backend.
    pub async fn create_collection(&mut self, name: &str) -> VectorResult<CollectionCreated> {
        let backend = self.registry.connect(self.active).await?;
        create_collection(backend.as_ref(), name, self.collection.spec()).await
    }

    /// Inserts a batch of random vectors into a collection of the active backend.
    pub async fn insert_vectors(&mut self, name: &str) -> VectorResult<VectorsInserted> {
        let backend = self.registry.connect(self.active).await?;
        insert_random_vectors(backend.as_ref(), name, self.collection.batch_size).await
    }
}
