//! Milvus backend implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use milvus::client::Client;
use milvus::collection::Collection;
use milvus::data::FieldColumn;
use milvus::index::{IndexParams, IndexType, MetricType};
use milvus::schema::{CollectionSchemaBuilder, FieldSchema};
use milvus::value::ValueVec;

use super::MilvusConfig;
use crate::TRACING_TARGET;
use crate::backend::{CollectionSpec, Distance, VectorBackend, VectorPoint};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Auto-generated primary key field.
const ID_FIELD: &str = "id";
/// Float vector field.
const EMBEDDING_FIELD: &str = "embedding";

/// Milvus backend implementation.
pub struct MilvusBackend {
    client: Client,
    config: MilvusConfig,
}

impl MilvusBackend {
    /// Creates a new Milvus backend.
    pub async fn new(config: &MilvusConfig) -> VectorResult<Self> {
        let client = Client::new(config.url())
            .await
            .map_err(|e| VectorError::connection(BackendKind::Milvus.as_str(), e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            host = %config.host,
            port = %config.port,
            "Connected to Milvus"
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn get_collection(&self, name: &str) -> VectorResult<Collection> {
        self.client
            .get_collection(name)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))
    }

    async fn has_collection(&self, name: &str) -> VectorResult<bool> {
        self.client
            .has_collection(name)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))
    }

    /// Checks an existing collection against the requested spec.
    async fn check_existing(&self, name: &str, spec: &CollectionSpec) -> VectorResult<()> {
        let collection = self.get_collection(name).await?;

        match embedding_dimensions(&collection) {
            Some(dim) if dim == spec.dimensions => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    collection = %name,
                    "Milvus collection already exists with a compatible schema"
                );
                Ok(())
            }
            Some(dim) => Err(VectorError::incompatible_schema(format!(
                "collection {name} already exists with {dim}-dimensional '{EMBEDDING_FIELD}'"
            ))),
            None => Err(VectorError::incompatible_schema(format!(
                "collection {name} already exists without a '{EMBEDDING_FIELD}' field"
            ))),
        }
    }
}

#[async_trait]
impl VectorBackend for MilvusBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Milvus
    }

    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> VectorResult<()> {
        if self.has_collection(name).await? {
            return self.check_existing(name, spec).await;
        }

        let mut builder = CollectionSchemaBuilder::new(name, "vecbot collection");
        builder.add_field(FieldSchema::new_primary_int64(ID_FIELD, "primary key", true));
        builder.add_field(FieldSchema::new_float_vector(
            EMBEDDING_FIELD,
            "embedding vector",
            spec.dimensions as i64,
        ));

        let schema = builder
            .build()
            .map_err(|e| VectorError::backend(e.to_string()))?;

        self.client
            .create_collection(schema, None)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        let index_params = IndexParams::new(
            "embedding_index".to_string(),
            IndexType::IvfFlat,
            metric_type(spec.distance),
            HashMap::from([("nlist".to_string(), "128".to_string())]),
        );

        let collection = self.get_collection(name).await?;

        collection
            .create_index(EMBEDDING_FIELD, index_params)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        collection
            .load(1)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            collection = %name,
            dimensions = spec.dimensions,
            host = %self.config.host,
            "Created Milvus collection"
        );

        Ok(())
    }

    async fn collection_dimensions(&self, name: &str) -> VectorResult<u64> {
        if !self.has_collection(name).await? {
            return Err(VectorError::collection_not_found(name));
        }

        let collection = self.get_collection(name).await?;
        embedding_dimensions(&collection).ok_or_else(|| {
            VectorError::incompatible_schema(format!(
                "collection {name} has no '{EMBEDDING_FIELD}' field"
            ))
        })
    }

    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> VectorResult<()> {
        let Some(dim) = points.first().map(|p| p.vector.len()) else {
            return Ok(());
        };

        let coll = self.get_collection(collection).await?;

        // Ids are assigned by Milvus, only the vector column is sent.
        let embeddings: Vec<f32> = points.into_iter().flat_map(|p| p.vector).collect();
        let vector_schema =
            FieldSchema::new_float_vector(EMBEDDING_FIELD, "embedding vector", dim as i64);
        let columns = vec![FieldColumn::new(
            &vector_schema,
            ValueVec::Float(embeddings),
        )];

        coll.insert(columns, None)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for MilvusBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MilvusBackend")
            .field("url", &self.config.url())
            .finish_non_exhaustive()
    }
}

/// Maps a distance to the Milvus metric; cosine is served by inner product.
fn metric_type(distance: Distance) -> MetricType {
    match distance {
        Distance::Cosine | Distance::Dot => MetricType::IP,
        Distance::Euclid => MetricType::L2,
    }
}

fn embedding_dimensions(collection: &Collection) -> Option<u64> {
    collection
        .schema()
        .get_field(EMBEDDING_FIELD)
        .map(|field| field.dim as u64)
}
