//! Vector store configuration types.

use serde::{Deserialize, Serialize};

use crate::backend::{CollectionSpec, Distance};
use crate::error::{VectorError, VectorResult};
pub use crate::milvus::MilvusConfig;
pub use crate::qdrant::QdrantConfig;
use crate::{DEFAULT_BATCH_SIZE, DEFAULT_DIMENSIONS};

/// Connection settings for every supported backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Milvus connection settings.
    pub milvus: MilvusConfig,
    /// Qdrant connection settings.
    pub qdrant: QdrantConfig,
    /// Shape of created collections and size of insert batches.
    #[serde(default)]
    pub collection: CollectionConfig,
}

impl VectorStoreConfig {
    /// Validates all backend settings.
    pub fn validate(&self) -> VectorResult<()> {
        self.milvus.validate()?;
        self.qdrant.validate()?;
        self.collection.validate()
    }
}

/// Collection defaults applied by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Dimensionality of created collections.
    #[serde(default = "default_dimensions")]
    pub dimensions: u64,
    /// Similarity metric of created collections.
    #[serde(default)]
    pub distance: Distance,
    /// Number of random vectors inserted per request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl CollectionConfig {
    /// Returns the spec used when creating collections.
    pub fn spec(&self) -> CollectionSpec {
        CollectionSpec::new(self.dimensions, self.distance)
    }

    /// Validates the collection defaults.
    pub fn validate(&self) -> VectorResult<()> {
        if self.dimensions == 0 {
            return Err(VectorError::invalid_config(
                "collection dimensions must be greater than zero",
            ));
        }
        if self.batch_size == 0 {
            return Err(VectorError::invalid_config(
                "insert batch size must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            distance: Distance::Cosine,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

const fn default_dimensions() -> u64 {
    DEFAULT_DIMENSIONS
}

const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
