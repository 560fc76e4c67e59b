//! Distributor collection access

use serde_json::Value;

use crate::{
    error::AppResult,
    models::Distributor,
    repository::firestore::{Document, FirestoreClient},
};

const COLLECTION: &str = "distributors";

#[derive(Clone)]
pub struct DistributorsRepository {
    store: FirestoreClient,
}

impl DistributorsRepository {
    pub fn new(store: FirestoreClient) -> Self {
        Self { store }
    }

    /// All distributors, newest first
    pub async fn list(&self) -> AppResult<Vec<Distributor>> {
        let documents = self
            .store
            .list_all(COLLECTION, Some("createdAt desc"))
            .await?;
        Ok(documents.into_iter().filter_map(decode_distributor).collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Distributor>> {
        let document = self.store.get(COLLECTION, id).await?;
        Ok(document.and_then(decode_distributor))
    }

    /// Create the document under the identity-provider uid
    pub async fn create(&self, id: &str, fields: &Value) -> AppResult<()> {
        self.store.create(COLLECTION, Some(id), fields).await?;
        Ok(())
    }

    pub async fn update(&self, id: &str, fields: &Value) -> AppResult<()> {
        self.store.patch(COLLECTION, id, fields).await
    }

    /// Attach a promo code id to the distributor's list
    pub async fn attach_promocode(&self, id: &str, promocode_id: &str) -> AppResult<()> {
        self.store
            .array_union(COLLECTION, id, "promocodes", &[Value::String(promocode_id.to_string())])
            .await
    }
}

fn decode_distributor((id, mut fields): Document) -> Option<Distributor> {
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.clone()));
    }
    match serde_json::from_value(fields) {
        Ok(distributor) => Some(distributor),
        Err(error) => {
            tracing::warn!("Skipping malformed distributor document {}: {}", id, error);
            None
        }
    }
}
