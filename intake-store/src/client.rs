use async_trait::async_trait;

use crate::{
    error::StoreError,
    filter::Filter,
    records::{FileDownload, Record, RecordId, WriteResponse},
    schema::Collection,
};

/// Core trait for record store backends.
///
/// Four primitives with a uniform contract — query, create, update,
/// delete — plus file download. Every failure surfaces immediately to
/// the caller; no operation retries on its own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read records matching the filter, projected to the given fields
    async fn query(
        &self,
        collection: Collection,
        select: &[u32],
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError>;

    /// Create rows and return the new rows projected to `fields_to_return`
    /// alongside the created ids (in input order)
    async fn create_returning(
        &self,
        collection: Collection,
        rows: Vec<Record>,
        fields_to_return: &[u32],
    ) -> Result<WriteResponse, StoreError>;

    /// Create rows; created ids are returned in input order
    async fn create(
        &self,
        collection: Collection,
        rows: Vec<Record>,
    ) -> Result<Vec<RecordId>, StoreError> {
        let response = self.create_returning(collection, rows, &[]).await?;
        Ok(response.metadata.created_record_ids)
    }

    /// Upsert rows keyed by the record-id field each row must carry
    async fn update(&self, collection: Collection, rows: Vec<Record>) -> Result<(), StoreError>;

    /// Delete every record matching the filter; returns the count.
    /// The filter must not be empty.
    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u32, StoreError>;

    /// Fetch a stored file by its store-relative URL, authorized against
    /// the given collection
    async fn download(
        &self,
        collection: Collection,
        path: &str,
    ) -> Result<FileDownload, StoreError>;
}
