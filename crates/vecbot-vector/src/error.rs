//! Vector store error types.

use thiserror::Error;

/// Result type for vector store operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Vector store errors.
///
/// The first four variants are the ones reported to chat users. The remaining
/// variants are produced by the backend adapters and normally reach the user
/// wrapped as the source of a [`VectorError::Collection`] or
/// [`VectorError::Insert`].
#[derive(Debug, Error)]
pub enum VectorError {
    /// The requested backend is not part of the registry.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// The backend could not be reached.
    #[error("connection to {backend} failed: {message}")]
    Connection { backend: String, message: String },

    /// Collection creation failed.
    #[error("failed to create collection '{collection}': {source}")]
    Collection {
        collection: String,
        #[source]
        source: Box<VectorError>,
    },

    /// Vector insertion failed.
    #[error("failed to insert vectors into '{collection}': {source}")]
    Insert {
        collection: String,
        #[source]
        source: Box<VectorError>,
    },

    /// Collection not found.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// Collection exists with a schema the bot cannot use.
    #[error("incompatible schema: {0}")]
    IncompatibleSchema(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),
}

impl VectorError {
    /// Creates an unknown backend error.
    pub fn unknown_backend(name: impl Into<String>) -> Self {
        Self::UnknownBackend(name.into())
    }

    /// Creates a connection error.
    pub fn connection(backend: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connection {
            backend: backend.into(),
            message: msg.into(),
        }
    }

    /// Wraps an error as a collection creation failure.
    pub fn collection(collection: impl Into<String>, source: VectorError) -> Self {
        Self::Collection {
            collection: collection.into(),
            source: Box::new(source),
        }
    }

    /// Wraps an error as a vector insertion failure.
    pub fn insert(collection: impl Into<String>, source: VectorError) -> Self {
        Self::Insert {
            collection: collection.into(),
            source: Box::new(source),
        }
    }

    /// Creates a collection not found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound(name.into())
    }

    /// Creates an incompatible schema error.
    pub fn incompatible_schema(msg: impl Into<String>) -> Self {
        Self::IncompatibleSchema(msg.into())
    }

    /// Creates an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Returns the innermost error for wrapped collection and insert failures.
    pub fn root_cause(&self) -> &VectorError {
        match self {
            Self::Collection { source, .. } | Self::Insert { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_the_backend_message() {
        let err = VectorError::insert("demo", VectorError::collection_not_found("demo"));
        assert_eq!(
            err.to_string(),
            "failed to insert vectors into 'demo': collection not found: demo"
        );
        assert!(matches!(
            err.root_cause(),
            VectorError::CollectionNotFound(name) if name == "demo"
        ));
    }

    #[test]
    fn connection_error_names_the_backend() {
        let err = VectorError::connection("qdrant", "refused");
        assert_eq!(err.to_string(), "connection to qdrant failed: refused");
    }
}
