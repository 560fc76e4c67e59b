//! Promo code collection access

use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::PromoCode,
    repository::firestore::{Document, FirestoreClient},
};

const COLLECTION: &str = "promocodes";

#[derive(Clone)]
pub struct PromoCodesRepository {
    store: FirestoreClient,
}

impl PromoCodesRepository {
    pub fn new(store: FirestoreClient) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> AppResult<Vec<PromoCode>> {
        let documents = self.store.list_all(COLLECTION, None).await?;
        Ok(documents.into_iter().filter_map(decode_promocode).collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<PromoCode>> {
        let document = self.store.get(COLLECTION, id).await?;
        Ok(document.and_then(decode_promocode))
    }

    /// Fetch a batch by id, skipping ids that no longer resolve
    pub async fn get_many(&self, ids: &[String]) -> AppResult<Vec<PromoCode>> {
        let mut promocodes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(promocode) = self.get(id).await? {
                promocodes.push(promocode);
            }
        }
        Ok(promocodes)
    }

    /// Look a code up by its `code` field, falling back to `barcode`
    pub async fn find_by_code_or_barcode(&self, code: &str) -> AppResult<Option<PromoCode>> {
        let by_code = self
            .store
            .query_eq(COLLECTION, "code", &json!(code), Some(1))
            .await?;
        if let Some(document) = by_code.into_iter().next() {
            return Ok(decode_promocode(document));
        }
        let by_barcode = self
            .store
            .query_eq(COLLECTION, "barcode", &json!(code), Some(1))
            .await?;
        Ok(by_barcode.into_iter().next().and_then(decode_promocode))
    }

    /// Create one code document under the given id
    pub async fn create(&self, id: &str, fields: &Value) -> AppResult<String> {
        self.store.create(COLLECTION, Some(id), fields).await
    }
}

fn decode_promocode((id, mut fields): Document) -> Option<PromoCode> {
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.clone()));
    }
    match serde_json::from_value(fields) {
        Ok(promocode) => Some(promocode),
        Err(error) => {
            tracing::warn!("Skipping malformed promo code document {}: {}", id, error);
            None
        }
    }
}
