//! Milvus vector store backend.

mod backend;
mod config;

pub use backend::MilvusBackend;
pub use config::MilvusConfig;
