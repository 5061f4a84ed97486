//! Backend traits shared by every vector database adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::DEFAULT_DIMENSIONS;
use crate::error::VectorResult;
use crate::registry::BackendKind;

/// Similarity metric declared on new collections.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Distance {
    /// Cosine similarity.
    #[default]
    Cosine,
    /// Dot product.
    Dot,
    /// Euclidean distance.
    Euclid,
}

/// Shape of a collection created by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Vector dimensionality.
    pub dimensions: u64,
    /// Similarity metric.
    pub distance: Distance,
}

impl CollectionSpec {
    /// Creates a new collection spec.
    pub fn new(dimensions: u64, distance: Distance) -> Self {
        Self {
            dimensions,
            distance,
        }
    }
}

impl Default for CollectionSpec {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS, Distance::Cosine)
    }
}

/// A single point to upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    /// Point id. Ignored by backends that assign ids themselves.
    pub id: u64,
    /// The vector.
    pub vector: Vec<f32>,
}

impl VectorPoint {
    /// Creates a new point.
    pub fn new(id: u64, vector: Vec<f32>) -> Self {
        Self { id, vector }
    }
}

/// Operations the bot needs from a connected vector database.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Returns which backend this handle talks to.
    fn kind(&self) -> BackendKind;

    /// Declares a collection.
    ///
    /// What happens when `name` already exists is backend-specific and must
    /// not be assumed idempotent.
    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> VectorResult<()>;

    /// Returns the vector dimensionality declared by an existing collection.
    async fn collection_dimensions(&self, name: &str) -> VectorResult<u64>;

    /// Upserts a batch of points in a single call.
    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> VectorResult<()>;
}

/// Opens connections to one backend.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// Returns which backend this connector opens.
    fn kind(&self) -> BackendKind;

    /// Establishes a new handle.
    ///
    /// Fails with [`VectorError::Connection`] when the backend is unreachable.
    ///
    /// [`VectorError::Connection`]: crate::VectorError::Connection
    async fn connect(&self) -> VectorResult<Arc<dyn VectorBackend>>;
}
