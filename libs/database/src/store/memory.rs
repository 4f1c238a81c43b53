use super::{DocumentCollection, DocumentCursor, StoreError, StoreResult};
use async_trait::async_trait;
use futures::StreamExt;
use mongodb::IndexModel;
use mongodb::bson::{self, Bson, Document, oid::ObjectId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio::sync::RwLock;
use tracing::instrument;

#[derive(Debug, Default)]
struct State {
    documents: Vec<Document>,
    /// Field sets covered by unique indexes; `_id` is always unique
    unique_keys: Vec<Vec<String>>,
}

/// In-process collection holding documents as BSON
///
/// Supports the subset of the query language the catalog uses: top-level
/// equality filters (an array field matches when it contains the value) and
/// `$set` updates. Unique indexes are checked under the write lock, so two
/// concurrent inserts of the same key cannot both succeed.
pub struct MemoryCollection<T> {
    name: String,
    state: RwLock<State>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> MemoryCollection<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(State::default()),
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Raw stored documents, in insertion order
    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new("memory")
    }
}

fn matches(document: &Document, filter: &Document) -> StoreResult<bool> {
    for (field, expected) in filter {
        if field.starts_with('$') {
            return Err(StoreError::Unsupported(format!("query operator {field}")));
        }
        if let Bson::Document(inner) = expected {
            if let Some(op) = inner.keys().find(|k| k.starts_with('$')) {
                return Err(StoreError::Unsupported(format!("query operator {op}")));
            }
        }

        let found = match document.get(field) {
            Some(Bson::Array(items)) => {
                items.iter().any(|item| item == expected) || Bson::Array(items.clone()) == *expected
            }
            Some(value) => value == expected,
            None => *expected == Bson::Null,
        };
        if !found {
            return Ok(false);
        }
    }
    Ok(true)
}

fn key_of(document: &Document, fields: &[String]) -> Vec<Bson> {
    fields
        .iter()
        .map(|f| document.get(f).cloned().unwrap_or(Bson::Null))
        .collect()
}

impl State {
    fn all_unique_keys(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        std::iter::once(vec!["_id".to_string()]).chain(self.unique_keys.iter().cloned())
    }

    /// Reject `candidate` if it collides with any stored document other than
    /// the one at `skip`
    fn check_unique(&self, candidate: &Document, skip: Option<usize>) -> StoreResult<()> {
        for fields in self.all_unique_keys() {
            let key = key_of(candidate, &fields);
            let clash = self
                .documents
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != skip)
                .any(|(_, existing)| key_of(existing, &fields) == key);
            if clash {
                return Err(StoreError::DuplicateKey(format!(
                    "{} dup key on {:?}",
                    fields.join(", "),
                    key
                )));
            }
        }
        Ok(())
    }

    fn position(&self, filter: &Document) -> StoreResult<Option<usize>> {
        for (i, document) in self.documents.iter().enumerate() {
            if matches(document, filter)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    bson::from_document(document).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl<T> DocumentCollection<T> for MemoryCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    #[instrument(skip(self), fields(collection = %self.name))]
    async fn find(&self, filter: Document) -> StoreResult<DocumentCursor<T>> {
        let state = self.state.read().await;
        let mut selected = Vec::new();
        for document in &state.documents {
            if matches(document, &filter)? {
                selected.push(document.clone());
            }
        }

        Ok(futures::stream::iter(selected.into_iter().map(decode::<T>)).boxed())
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        let state = self.state.read().await;
        match state.position(&filter)? {
            Some(i) => decode(state.documents[i].clone()).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip_all, fields(collection = %self.name))]
    async fn insert_one(&self, document: &T) -> StoreResult<Bson> {
        let mut document =
            bson::to_document(document).map_err(|e| StoreError::Serialization(e.to_string()))?;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document.get("_id").cloned().unwrap_or(Bson::Null);

        let mut state = self.state.write().await;
        state.check_unique(&document, None)?;
        state.documents.push(document);

        Ok(id)
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<u64> {
        let mut changes = Document::new();
        for (op, value) in update {
            match (op.as_str(), value) {
                ("$set", Bson::Document(fields)) => {
                    for (field, value) in fields {
                        changes.insert(field, value);
                    }
                }
                (other, _) => {
                    return Err(StoreError::Unsupported(format!("update operator {other}")));
                }
            }
        }

        let mut state = self.state.write().await;
        let Some(i) = state.position(&filter)? else {
            return Ok(0);
        };

        let mut updated = state.documents[i].clone();
        for (field, value) in changes {
            if field == "_id" && updated.get("_id") != Some(&value) {
                return Err(StoreError::Backend(
                    "the immutable field '_id' cannot be modified".to_string(),
                ));
            }
            updated.insert(field, value);
        }
        state.check_unique(&updated, Some(i))?;
        state.documents[i] = updated;

        Ok(1)
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        match state.position(&filter)? {
            Some(i) => {
                state.documents.remove(i);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    async fn create_index(&self, index: IndexModel) -> StoreResult<()> {
        let unique = index
            .options
            .as_ref()
            .and_then(|o| o.unique)
            .unwrap_or(false);
        if !unique {
            return Ok(());
        }

        let fields: Vec<String> = index.keys.keys().cloned().collect();
        let mut state = self.state.write().await;
        if state.unique_keys.contains(&fields) {
            return Ok(());
        }

        let mut seen: Vec<Vec<Bson>> = Vec::with_capacity(state.documents.len());
        for document in &state.documents {
            let key = key_of(document, &fields);
            if seen.contains(&key) {
                return Err(StoreError::DuplicateKey(format!(
                    "cannot build unique index on {}",
                    fields.join(", ")
                )));
            }
            seen.push(key);
        }
        state.unique_keys.push(fields);

        Ok(())
    }
}
