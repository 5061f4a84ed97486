//! Random vector insertion.

use rand::Rng;

use crate::TRACING_TARGET;
use crate::backend::{VectorBackend, VectorPoint};
use crate::error::{VectorError, VectorResult};
use crate::registry::BackendKind;

/// Acknowledgement of an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorsInserted {
    /// Backend the vectors were written to.
    pub backend: BackendKind,
    /// Target collection.
    pub collection: String,
    /// Number of vectors written.
    pub count: usize,
    /// Dimensionality discovered from the collection.
    pub dimensions: u64,
}

/// Generates `count` points of uniform random values in `[0, 1)`.
///
/// Ids are the dense sequence `0..count`. They are not checked against
/// points already stored, so repeated inserts into a point-addressed backend
/// overwrite the same ids.
pub fn random_points<R: Rng>(rng: &mut R, count: usize, dimensions: u64) -> Vec<VectorPoint> {
    (0..count as u64)
        .map(|id| {
            let vector = (0..dimensions).map(|_| rng.random::<f32>()).collect();
            VectorPoint::new(id, vector)
        })
        .collect()
}

/// Inserts `count` random vectors into an existing collection.
///
/// The dimensionality is read from the collection itself. Any failure,
/// including a missing collection, is wrapped into [`VectorError::Insert`].
/// Nothing is written unless the single bulk upsert succeeds.
pub async fn insert_random_vectors(
    backend: &dyn VectorBackend,
    collection: &str,
    count: usize,
) -> VectorResult<VectorsInserted> {
    let dimensions = backend
        .collection_dimensions(collection)
        .await
        .map_err(|e| VectorError::insert(collection, e))?;

    tracing::debug!(
        target: TRACING_TARGET,
        backend = %backend.kind(),
        collection = %collection,
        count,
        dimensions,
        "Inserting random vectors"
    );

    let points = random_points(&mut rand::rng(), count, dimensions);

    backend
        .upsert(collection, points)
        .await
        .map_err(|e| VectorError::insert(collection, e))?;

    tracing::info!(
        target: TRACING_TARGET,
        backend = %backend.kind(),
        collection = %collection,
        count,
        "Vectors inserted"
    );

    Ok(VectorsInserted {
        backend: backend.kind(),
        collection: collection.to_owned(),
        count,
        dimensions,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::mock::{MockConnector, MockState};
    use crate::{BackendConnector, CollectionSpec, DEFAULT_BATCH_SIZE};

    #[test]
    fn random_points_are_dense_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = random_points(&mut rng, 10, 3);

        assert_eq!(points.len(), 10);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.id, i as u64);
            assert_eq!(point.vector.len(), 3);
            assert!(point.vector.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[tokio::test]
    async fn uses_the_collection_dimensionality() {
        let state = MockState::default();
        let spec = CollectionSpec::new(16, Default::default());
        state.seed_collection(BackendKind::Qdrant, "small", spec);
        let backend = MockConnector::new(BackendKind::Qdrant, state.clone())
            .connect()
            .await
            .unwrap();

        let inserted = insert_random_vectors(backend.as_ref(), "small", DEFAULT_BATCH_SIZE)
            .await
            .unwrap();

        assert_eq!(inserted.dimensions, 16);
        assert_eq!(inserted.count, 1000);
        let stored = state.collection(BackendKind::Qdrant, "small").unwrap();
        assert_eq!(stored.points.len(), 1000);
        assert!(stored.points.iter().all(|p| p.vector.len() == 16));
    }

    #[tokio::test]
    async fn repeated_inserts_overwrite_ids_on_qdrant() {
        let state = MockState::default();
        state.seed_collection(BackendKind::Qdrant, "demo", CollectionSpec::default());
        let backend = MockConnector::new(BackendKind::Qdrant, state.clone())
            .connect()
            .await
            .unwrap();

        insert_random_vectors(backend.as_ref(), "demo", 10).await.unwrap();
        insert_random_vectors(backend.as_ref(), "demo", 10).await.unwrap();

        let stored = state.collection(BackendKind::Qdrant, "demo").unwrap();
        assert_eq!(stored.points.len(), 10);
    }

    #[tokio::test]
    async fn missing_collection_is_an_insert_error() {
        let state = MockState::default();
        let backend = MockConnector::new(BackendKind::Milvus, state.clone())
            .connect()
            .await
            .unwrap();

        let err = insert_random_vectors(backend.as_ref(), "missing", 1000)
            .await
            .unwrap_err();

        assert!(matches!(&err, VectorError::Insert { collection, .. } if collection == "missing"));
        assert!(matches!(err.root_cause(), VectorError::CollectionNotFound(_)));
        assert!(state.collection(BackendKind::Milvus, "missing").is_none());
        // Only the describe call reached the backend.
        assert_eq!(state.backend_calls(), 1);
    }
}
