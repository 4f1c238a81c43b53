//! [`DocumentCollection`] for the MongoDB driver's `Collection<T>`

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::{Bson, Document};
use mongodb::error::{Error, ErrorKind, WriteFailure};
use mongodb::{Collection, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::store::{DUPLICATE_KEY_CODE, DocumentCollection, DocumentCursor, StoreError, StoreResult};

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
                StoreError::DuplicateKey(e.message.clone())
            }
            ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => {
                StoreError::DuplicateKey(e.message.clone())
            }
            ErrorKind::BsonSerialization(e) => StoreError::Serialization(e.to_string()),
            ErrorKind::BsonDeserialization(e) => StoreError::Serialization(e.to_string()),
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[async_trait]
impl<T> DocumentCollection<T> for Collection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static,
{
    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn find(&self, filter: Document) -> StoreResult<DocumentCursor<T>> {
        let cursor = Collection::find(self, filter).await?;
        Ok(cursor.map_err(StoreError::from).boxed())
    }

    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        Ok(Collection::find_one(self, filter).await?)
    }

    #[instrument(skip_all, fields(collection = %self.name()))]
    async fn insert_one(&self, document: &T) -> StoreResult<Bson> {
        let result = Collection::insert_one(self, document).await?;
        Ok(result.inserted_id)
    }

    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<u64> {
        let result = Collection::update_one(self, filter, update).await?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = Collection::delete_one(self, filter).await?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn create_index(&self, index: IndexModel) -> StoreResult<()> {
        Collection::create_index(self, index).await?;
        Ok(())
    }
}
