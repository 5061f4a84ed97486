//! Qdrant backend implementation.

use async_trait::async_trait;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeleteCollectionBuilder, Distance as QdrantDistance,
    GetCollectionInfoResponse, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

use super::QdrantConfig;
use crate::TRACING_TARGET;
use crate::backend::{CollectionSpec, Distance, VectorBackend, VectorPoint};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Qdrant backend implementation.
pub struct QdrantBackend {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantBackend {
    /// Creates a new Qdrant backend and checks that the server answers.
    pub async fn new(config: &QdrantConfig) -> VectorResult<Self> {
        let connection_error = |e: qdrant_client::QdrantError| {
            VectorError::connection(BackendKind::Qdrant.as_str(), e.to_string())
        };

        let client = Qdrant::from_url(&config.url())
            .api_key(config.api_key.clone())
            .timeout(config.timeout())
            .build()
            .map_err(connection_error)?;

        // The gRPC channel is lazy; the health check surfaces unreachable hosts.
        let health = client.health_check().await.map_err(connection_error)?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.url(),
            version = %health.version,
            "Connected to Qdrant"
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn collection_exists(&self, name: &str) -> VectorResult<bool> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))
    }
}

#[async_trait]
impl VectorBackend for QdrantBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Qdrant
    }

    /// Recreates the collection, dropping any existing one with the same name.
    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> VectorResult<()> {
        if self.collection_exists(name).await? {
            self.client
                .delete_collection(DeleteCollectionBuilder::new(name))
                .await
                .map_err(|e| VectorError::backend(e.to_string()))?;

            tracing::warn!(
                target: TRACING_TARGET,
                collection = %name,
                "Dropped existing Qdrant collection before recreating it"
            );
        }

        let vectors_config = VectorsConfig::Params(
            VectorParamsBuilder::new(spec.dimensions, qdrant_distance(spec.distance)).build(),
        );

        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            collection = %name,
            dimensions = spec.dimensions,
            url = %self.config.url(),
            "Created Qdrant collection"
        );

        Ok(())
    }

    async fn collection_dimensions(&self, name: &str) -> VectorResult<u64> {
        if !self.collection_exists(name).await? {
            return Err(VectorError::collection_not_found(name));
        }

        let info = self
            .client
            .collection_info(name)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        extract_dimensions(name, info)
    }

    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> VectorResult<()> {
        if points.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| PointStruct::new(p.id, p.vector, Payload::new()))
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for QdrantBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantBackend")
            .field("url", &self.config.url())
            .finish_non_exhaustive()
    }
}

fn qdrant_distance(distance: Distance) -> QdrantDistance {
    match distance {
        Distance::Cosine => QdrantDistance::Cosine,
        Distance::Dot => QdrantDistance::Dot,
        Distance::Euclid => QdrantDistance::Euclid,
    }
}

/// Reads the size of the unnamed vector from a collection info response.
fn extract_dimensions(name: &str, info: GetCollectionInfoResponse) -> VectorResult<u64> {
    let config = info
        .result
        .and_then(|i| i.config)
        .and_then(|c| c.params)
        .and_then(|p| p.vectors_config)
        .and_then(|v| v.config);

    match config {
        Some(VectorsConfig::Params(params)) => Ok(params.size),
        Some(VectorsConfig::ParamsMap(_)) => Err(VectorError::incompatible_schema(format!(
            "collection {name} uses named vectors"
        ))),
        None => Err(VectorError::backend(format!(
            "collection {name} reported no vector parameters"
        ))),
    }
}
