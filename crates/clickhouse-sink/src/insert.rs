//! Batched, transactional inserts.

use crate::error::{StoreError, WriteError, WriteStage};
use crate::store::{Record, Store};
use biometric_generator::{ControlObject, FacialFeaturesVector};

/// Write a batch of records as a single transaction.
///
/// The insert statement is prepared once and executed once per record, in
/// batch order, before committing. Any failure abandons the whole batch: the
/// transaction is dropped uncommitted and the error names the failing stage
/// (and row, for execute failures). An empty batch opens no transaction.
pub async fn write_batch<S: Store, R: Record>(
    store: &S,
    records: &[R],
) -> Result<u64, WriteError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut transaction = store
        .begin::<R>()
        .await
        .map_err(failed_at::<R>(WriteStage::Begin))?;

    transaction
        .prepare()
        .await
        .map_err(failed_at::<R>(WriteStage::Prepare))?;

    for (row, record) in records.iter().enumerate() {
        transaction
            .execute(record.to_row())
            .await
            .map_err(failed_at::<R>(WriteStage::Execute { row }))?;
    }

    transaction
        .commit()
        .await
        .map_err(failed_at::<R>(WriteStage::Commit))?;

    Ok(records.len() as u64)
}

fn failed_at<R: Record>(stage: WriteStage) -> impl FnOnce(StoreError) -> WriteError {
    move |source| WriteError {
        table: R::TABLE,
        stage,
        source,
    }
}

/// Write a batch of control objects into `control_objects`.
pub async fn write_control_objects<S: Store>(
    store: &S,
    batch: &[ControlObject],
) -> Result<u64, WriteError> {
    let written = write_batch(store, batch).await?;
    tracing::debug!("Inserted {} control objects", written);
    Ok(written)
}

/// Write a batch of facial features vectors into `facial_features`.
pub async fn write_feature_vectors<S: Store>(
    store: &S,
    batch: &[FacialFeaturesVector],
) -> Result<u64, WriteError> {
    let written = write_batch(store, batch).await?;
    tracing::debug!("Inserted {} facial features vectors", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use biometric_generator::BiometricGenerator;

    fn batch(count: usize) -> (Vec<ControlObject>, Vec<FacialFeaturesVector>) {
        let mut generator = BiometricGenerator::new(42);
        let objects: Vec<_> = generator.control_objects(count).collect();
        let vectors = generator.feature_vectors_for(&objects);
        (objects, vectors)
    }

    #[tokio::test]
    async fn test_write_batch_commits_all_rows() {
        let store = MemoryStore::new();
        let (objects, vectors) = batch(5);

        assert_eq!(write_control_objects(&store, &objects).await.unwrap(), 5);
        assert_eq!(write_feature_vectors(&store, &vectors).await.unwrap(), 5);

        let committed = store.committed();
        assert_eq!(committed.len(), 2);
        assert_eq!(committed[0].table, "control_objects");
        assert_eq!(committed[0].rows.len(), 5);
        assert_eq!(committed[1].table, "facial_features");
        // Linkage survives the wire encoding
        for (object, vector) in committed[0].rows.iter().zip(&committed[1].rows) {
            assert_eq!(object["id"], vector["cob_id"]);
        }
    }

    #[tokio::test]
    async fn test_empty_batch_opens_no_transaction() {
        let store = MemoryStore::new();

        assert_eq!(write_control_objects(&store, &[]).await.unwrap(), 0);
        assert_eq!(store.begin_count(), 0);
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn test_execute_failure_reports_row() {
        let store = MemoryStore::new();
        store.fail_at("control_objects", 0, WriteStage::Execute { row: 2 });
        let (objects, _) = batch(5);

        let err = write_control_objects(&store, &objects).await.unwrap_err();

        assert_eq!(err.table, "control_objects");
        assert_eq!(err.stage, WriteStage::Execute { row: 2 });
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn test_each_stage_failure_abandons_batch() {
        for stage in [WriteStage::Begin, WriteStage::Prepare, WriteStage::Commit] {
            let store = MemoryStore::new();
            store.fail_at("facial_features", 0, stage);
            let (_, vectors) = batch(3);

            let err = write_feature_vectors(&store, &vectors).await.unwrap_err();

            assert_eq!(err.stage, stage);
            assert_eq!(err.table, "facial_features");
            assert!(store.committed().is_empty(), "stage {stage:?} committed rows");
        }
    }

    #[tokio::test]
    async fn test_failure_targets_one_batch() {
        let store = MemoryStore::new();
        store.fail_at("control_objects", 1, WriteStage::Commit);
        let (objects, _) = batch(4);

        write_control_objects(&store, &objects[..2]).await.unwrap();
        let err = write_control_objects(&store, &objects[2..]).await.unwrap_err();

        assert_eq!(err.stage, WriteStage::Commit);
        assert_eq!(store.committed().len(), 1);
    }
}
