//! Product Service - Business logic layer

use database::{DocumentCollection, StoreError, with_deadline};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::filter::{ID_FIELD, build_filter};
use crate::models::{Product, ProductPayload};

/// Upper bound for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Stored name of the product name field; `name` is accepted as an alias
const NAME_FIELD: &str = "product_name";

/// Product lifecycle operations over any [`DocumentCollection`] of products.
///
/// Every store call is bounded by the service timeout; an elapsed deadline
/// cancels the call and surfaces as a storage error.
pub struct ProductService<S: DocumentCollection<Product>> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: DocumentCollection<Product>> ProductService<S> {
    /// Create a new ProductService over the given collection
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// List products matching the query pairs, in store order.
    ///
    /// A store that cannot open the query reports `QueryFailed` (404); a
    /// failure while reading results is a storage error.
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: &[(String, String)]) -> ProductResult<Vec<Product>> {
        let filter = build_filter(params)?;

        let cursor = with_deadline(self.timeout, self.store.find(filter))
            .await
            .map_err(|e| match e {
                StoreError::Timeout(_) => ProductError::Storage(e),
                e => ProductError::QueryFailed(e),
            })?;
        let products: Vec<Product> = with_deadline(self.timeout, cursor.try_collect()).await?;

        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Get a product by ID
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        with_deadline(self.timeout, self.store.find_one(doc! { "_id": id }))
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_hex()))
    }

    /// Insert a batch of products, returning their new ids in input order.
    ///
    /// Every candidate is validated before the first insert. Client ids are
    /// never used. If an insert fails, the products already inserted by this
    /// call are deleted again and the whole batch fails.
    #[instrument(skip_all, fields(batch_size = candidates.len()))]
    pub async fn create_products(
        &self,
        candidates: Vec<ProductPayload>,
    ) -> ProductResult<Vec<ObjectId>> {
        for candidate in &candidates {
            candidate.validate()?;
        }

        let mut inserted = Vec::with_capacity(candidates.len());
        for payload in candidates {
            let product = Product::from_payload(ObjectId::new(), payload);
            if let Err(e) = with_deadline(self.timeout, self.store.insert_one(&product)).await {
                tracing::warn!(
                    inserted = inserted.len(),
                    "Batch insert failed, removing products inserted so far"
                );
                self.remove_inserted(&inserted).await;
                return Err(e.into());
            }
            inserted.push(product.id);
        }

        tracing::info!(count = inserted.len(), "Created products");
        Ok(inserted)
    }

    async fn remove_inserted(&self, ids: &[ObjectId]) {
        for id in ids {
            let result =
                with_deadline(self.timeout, self.store.delete_one(doc! { "_id": *id })).await;
            if let Err(e) = result {
                tracing::error!(product_id = %id, error = %e, "Failed to remove partially inserted product");
            }
        }
    }

    /// Merge `patch` over the stored product and save the result.
    ///
    /// Top-level keys in `patch` replace stored values; omitted keys keep
    /// theirs. The id cannot change. The merged product must pass validation.
    #[instrument(skip(self, id, patch), fields(product_id = %id))]
    pub async fn update_product(&self, id: ObjectId, patch: Value) -> ProductResult<Product> {
        let Value::Object(changes) = patch else {
            return Err(ProductError::InvalidPayload(
                "product update must be a JSON object".to_string(),
            ));
        };

        let stored = self.get_product(id).await?;
        let merged = merge(stored.into_payload(), changes)?;
        merged.validate()?;

        let product = Product::from_payload(id, merged);
        let mut fields =
            bson::to_document(&product).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fields.remove(ID_FIELD);

        let matched = with_deadline(
            self.timeout,
            self.store
                .update_one(doc! { "_id": id }, doc! { "$set": fields }),
        )
        .await?;
        if matched == 0 {
            return Err(ProductError::NotFound(id.to_hex()));
        }

        tracing::info!("Updated product");
        Ok(product)
    }

    /// Delete a product, returning how many were removed (0 or 1).
    ///
    /// An unknown id is not an error.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<u64> {
        let deleted =
            with_deadline(self.timeout, self.store.delete_one(doc! { "_id": id })).await?;
        tracing::info!(deleted, "Deleted product");
        Ok(deleted)
    }
}

fn merge(current: ProductPayload, changes: Map<String, Value>) -> ProductResult<ProductPayload> {
    let mut fields: Map<String, Value> = serde_json::to_value(current)
        .and_then(serde_json::from_value)
        .map_err(|e| ProductError::InvalidPayload(e.to_string()))?;

    for (key, value) in changes {
        let key = if key == "name" {
            NAME_FIELD.to_string()
        } else {
            key
        };
        fields.insert(key, value);
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ProductError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::{DocumentCursor, MemoryCollection, StoreResult};
    use futures::StreamExt;
    use mockall::mock;
    use mongodb::IndexModel;
    use mongodb::bson::{Bson, Document};
    use serde_json::json;
    use std::sync::Mutex;

    mock! {
        Store {}

        #[async_trait]
        impl DocumentCollection<Product> for Store {
            async fn find(&self, filter: Document) -> StoreResult<DocumentCursor<Product>>;
            async fn find_one(&self, filter: Document) -> StoreResult<Option<Product>>;
            async fn insert_one(&self, document: &Product) -> StoreResult<Bson>;
            async fn update_one(&self, filter: Document, update: Document) -> StoreResult<u64>;
            async fn delete_one(&self, filter: Document) -> StoreResult<u64>;
            async fn create_index(&self, index: IndexModel) -> StoreResult<()>;
        }
    }

    fn payload(name: &str) -> ProductPayload {
        ProductPayload {
            name: name.to_string(),
            price: 250,
            currency: "INR".to_string(),
            discount: None,
            vendor: "Google".to_string(),
            accessories: vec!["changer".to_string(), "subscription".to_string()],
            is_essential: false,
        }
    }

    fn memory_service() -> ProductService<MemoryCollection<Product>> {
        ProductService::new(MemoryCollection::new("products"))
    }

    fn query(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();
        assert_eq!(ids.len(), 1);

        let product = service.get_product(ids[0]).await.unwrap();
        assert_eq!(product.id, ids[0]);
        assert_eq!(product.into_payload(), payload("googletalk"));
    }

    #[tokio::test]
    async fn test_create_returns_ids_in_input_order() {
        let service = memory_service();
        let ids = service
            .create_products(vec![payload("first"), payload("second"), payload("third")])
            .await
            .unwrap();

        let names: Vec<String> = {
            let mut names = Vec::new();
            for id in &ids {
                names.push(service.get_product(*id).await.unwrap().name);
            }
            names
        };
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_create_validates_whole_batch_before_inserting() {
        let store = MockStore::new();
        let service = ProductService::new(store);

        let mut invalid = payload("second");
        invalid.currency = "RUPEE".to_string();

        let err = service
            .create_products(vec![payload("first"), invalid])
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_earlier_inserts() {
        let mut store = MockStore::new();
        let first_id = Arc::new(Mutex::new(None));

        let seen = first_id.clone();
        store
            .expect_insert_one()
            .withf(|product| product.name == "first")
            .times(1)
            .returning(move |product| {
                *seen.lock().unwrap() = Some(product.id);
                Ok(Bson::ObjectId(product.id))
            });
        store
            .expect_insert_one()
            .withf(|product| product.name == "second")
            .times(1)
            .returning(|_| Err(StoreError::Backend("connection reset".to_string())));

        let expected = first_id.clone();
        store
            .expect_delete_one()
            .withf(move |filter| filter.get_object_id(ID_FIELD).ok() == *expected.lock().unwrap())
            .times(1)
            .returning(|_| Ok(1));

        let service = ProductService::new(store);
        let err = service
            .create_products(vec![payload("first"), payload("second"), payload("third")])
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Storage(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let service = memory_service();
        let err = service.get_product(ObjectId::new()).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_everything() {
        let service = memory_service();
        service
            .create_products(vec![payload("first"), payload("second")])
            .await
            .unwrap();

        let products = service.list_products(&[]).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_list_filters_by_field_and_id() {
        let service = memory_service();
        let mut other = payload("zune");
        other.vendor = "Microsoft".to_string();
        let ids = service
            .create_products(vec![payload("googletalk"), other])
            .await
            .unwrap();

        let by_vendor = service
            .list_products(&query(&[("vendor", "Microsoft"), ("vendor", "Google")]))
            .await
            .unwrap();
        assert_eq!(by_vendor.len(), 1);
        assert_eq!(by_vendor[0].name, "zune");

        let by_id = service
            .list_products(&query(&[("_id", &ids[0].to_hex())]))
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_list_with_malformed_id_is_invalid_id() {
        let service = memory_service();
        let err = service
            .list_products(&query(&[("_id", "12345")]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_list_open_failure_is_query_failed() {
        let mut store = MockStore::new();
        store
            .expect_find()
            .returning(|_| Err(StoreError::Backend("no reachable servers".to_string())));

        let err = ProductService::new(store).list_products(&[]).await.unwrap_err();
        assert!(matches!(err, ProductError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_list_read_failure_is_storage_error() {
        let mut store = MockStore::new();
        store.expect_find().returning(|_| {
            let items: Vec<StoreResult<Product>> =
                vec![Err(StoreError::Serialization("bad document".to_string()))];
            Ok(futures::stream::iter(items).boxed())
        });

        let err = ProductService::new(store).list_products(&[]).await.unwrap_err();
        assert!(matches!(err, ProductError::Storage(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();

        let updated = service
            .update_product(ids[0], json!({ "currency": "USD", "discount": 10 }))
            .await
            .unwrap();
        assert_eq!(updated.currency, "USD");
        assert_eq!(updated.discount, Some(10));
        assert_eq!(updated.name, "googletalk");
        assert_eq!(updated.accessories, vec!["changer", "subscription"]);

        let stored = service.get_product(ids[0]).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();

        let updated = service
            .update_product(
                ids[0],
                json!({ "_id": ObjectId::new().to_hex(), "name": "hangouts" }),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, ids[0]);
        assert_eq!(updated.name, "hangouts");
    }

    #[tokio::test]
    async fn test_update_clears_accessories() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();

        service
            .update_product(ids[0], json!({ "accessories": [] }))
            .await
            .unwrap();
        let stored = service.get_product(ids[0]).await.unwrap();
        assert!(stored.accessories.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_payloads() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();

        let not_object = service
            .update_product(ids[0], json!(["currency", "USD"]))
            .await
            .unwrap_err();
        assert!(matches!(not_object, ProductError::InvalidPayload(_)));

        let wrong_type = service
            .update_product(ids[0], json!({ "price": "cheap" }))
            .await
            .unwrap_err();
        assert!(matches!(wrong_type, ProductError::InvalidPayload(_)));

        let invalid = service
            .update_product(ids[0], json!({ "price": 5000 }))
            .await
            .unwrap_err();
        assert!(matches!(invalid, ProductError::Validation(_)));

        let stored = service.get_product(ids[0]).await.unwrap();
        assert_eq!(stored.price, 250);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = memory_service();
        let err = service
            .update_product(ObjectId::new(), json!({ "currency": "USD" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_counts() {
        let service = memory_service();
        let ids = service.create_products(vec![payload("googletalk")]).await.unwrap();

        assert_eq!(service.delete_product(ids[0]).await.unwrap(), 1);
        assert_eq!(service.delete_product(ids[0]).await.unwrap(), 0);
        assert!(matches!(
            service.get_product(ids[0]).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_failure_is_storage_error() {
        let mut store = MockStore::new();
        store
            .expect_delete_one()
            .returning(|_| Err(StoreError::Backend("not primary".to_string())));

        let err = ProductService::new(store)
            .delete_product(ObjectId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Storage(_)));
    }
}
