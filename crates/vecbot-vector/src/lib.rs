#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod milvus;
#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;
pub mod qdrant;

mod backend;
mod collection;
mod config;
mod error;
mod insert;
mod registry;

pub use backend::{BackendConnector, CollectionSpec, Distance, VectorBackend, VectorPoint};
pub use collection::{CollectionCreated, create_collection};
pub use config::{CollectionConfig, VectorStoreConfig};
pub use error::{VectorError, VectorResult};
pub use insert::{VectorsInserted, insert_random_vectors, random_points};
pub use registry::{BackendKind, BackendRegistry, list_backends};

/// Tracing target for vector store operations.
pub const TRACING_TARGET: &str = "vecbot_vector";

/// Dimensionality of collections created by the bot.
pub const DEFAULT_DIMENSIONS: u64 = 128;

/// Number of random vectors inserted per request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;
