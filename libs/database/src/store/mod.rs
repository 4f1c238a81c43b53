//! Storage port shared by the catalog domains
//!
//! Services are generic over [`DocumentCollection`] so the same lifecycle code
//! runs against MongoDB in production and [`MemoryCollection`] in tests.
//! Filters and update documents are plain BSON documents; updates use `$set`.

mod memory;

pub use memory::MemoryCollection;

use async_trait::async_trait;
use futures::stream::BoxStream;
use mongodb::IndexModel;
use mongodb::bson::{Bson, Document};
use std::future::Future;
use std::time::Duration;

/// MongoDB server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Failures reported by a storage backend
///
/// Only [`StoreError::DuplicateKey`] carries meaning for callers; everything
/// else is an infrastructure failure. "No matching document" is not an error,
/// it is `Ok(None)` from [`DocumentCollection::find_one`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Storage call exceeded {0:?}")]
    Timeout(Duration),

    #[error("Document (de)serialization failed: {0}")]
    Serialization(String),

    #[error("Operation not supported by this backend: {0}")]
    Unsupported(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lazily materialized query results
pub type DocumentCursor<T> = BoxStream<'static, StoreResult<T>>;

/// A named collection of `T` documents
#[async_trait]
pub trait DocumentCollection<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Open a cursor over every document matching `filter`.
    /// An empty filter matches everything.
    async fn find(&self, filter: Document) -> StoreResult<DocumentCursor<T>>;

    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>>;

    /// Insert `document`, returning its `_id` (generated when absent)
    async fn insert_one(&self, document: &T) -> StoreResult<Bson>;

    /// Apply `update` to the first match, returning the matched count
    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<u64>;

    /// Delete the first match, returning the deleted count
    async fn delete_one(&self, filter: Document) -> StoreResult<u64>;

    async fn create_index(&self, index: IndexModel) -> StoreResult<()>;
}

/// Bound a storage call by `limit`.
///
/// The pending call is dropped when the deadline passes, which cancels it.
pub async fn with_deadline<F, T>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_deadline_passes_result_through() {
        let value = with_deadline(Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_with_deadline_times_out_hanging_call() {
        let err = with_deadline(Duration::from_millis(20), async {
            futures::future::pending::<StoreResult<()>>().await
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_with_deadline_keeps_inner_error() {
        let err = with_deadline(Duration::from_secs(1), async {
            Err::<(), _>(StoreError::DuplicateKey("email".into()))
        })
        .await
        .unwrap_err();

        assert!(err.is_duplicate_key());
    }
}
