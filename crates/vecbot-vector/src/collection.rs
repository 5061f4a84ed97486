//! Collection creation.

use crate::TRACING_TARGET;
use crate::backend::{CollectionSpec, VectorBackend};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Acknowledgement of a created collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCreated {
    /// Backend the collection lives on.
    pub backend: BackendKind,
    /// Collection name.
    pub collection: String,
    /// Spec the collection was declared with.
    pub spec: CollectionSpec,
}

/// Creates `name` on `backend` with the given spec.
///
/// Any backend failure is wrapped into [`VectorError::Collection`] and is not
/// retried.
pub async fn create_collection(
    backend: &dyn VectorBackend,
    name: &str,
    spec: CollectionSpec,
) -> VectorResult<CollectionCreated> {
    tracing::debug!(
        target: TRACING_TARGET,
        backend = %backend.kind(),
        collection = %name,
        dimensions = spec.dimensions,
        distance = %spec.distance,
        "Creating collection"
    );

    backend
        .create_collection(name, &spec)
        .await
        .map_err(|e| VectorError::collection(name, e))?;

    tracing::info!(
        target: TRACING_TARGET,
        backend = %backend.kind(),
        collection = %name,
        "Collection created"
    );

    Ok(CollectionCreated {
        backend: backend.kind(),
        collection: name.to_owned(),
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendConnector;
    use crate::mock::{MockConnector, MockState};

    #[tokio::test]
    async fn qdrant_recreates_existing_collection() {
        let state = MockState::default();
        let backend = MockConnector::new(BackendKind::Qdrant, state.clone())
            .connect()
            .await
            .unwrap();

        let small = CollectionSpec::new(4, Default::default());
        create_collection(backend.as_ref(), "demo", small)
            .await
            .unwrap();
        let created = create_collection(backend.as_ref(), "demo", CollectionSpec::default())
            .await
            .unwrap();

        assert_eq!(created.backend, BackendKind::Qdrant);
        let stored = state.collection(BackendKind::Qdrant, "demo").unwrap();
        assert_eq!(stored.spec, CollectionSpec::default());
    }

    #[tokio::test]
    async fn milvus_rejects_incompatible_schema() {
        let state = MockState::default();
        let spec = CollectionSpec::new(4, Default::default());
        state.seed_collection(BackendKind::Milvus, "demo", spec);
        let backend = MockConnector::new(BackendKind::Milvus, state.clone())
            .connect()
            .await
            .unwrap();

        let err = create_collection(backend.as_ref(), "demo", CollectionSpec::default())
            .await
            .unwrap_err();

        assert!(matches!(&err, VectorError::Collection { collection, .. } if collection == "demo"));
        assert!(matches!(err.root_cause(), VectorError::IncompatibleSchema(_)));
    }

    #[tokio::test]
    async fn milvus_accepts_compatible_schema() {
        let state = MockState::default();
        state.seed_collection(BackendKind::Milvus, "demo", CollectionSpec::default());
        let backend = MockConnector::new(BackendKind::Milvus, state)
            .connect()
            .await
            .unwrap();

        assert!(
            create_collection(backend.as_ref(), "demo", CollectionSpec::default())
                .await
                .is_ok()
        );
    }
}
