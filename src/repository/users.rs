//! User collection access

use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::UserRecord,
    repository::firestore::{Document, FirestoreClient},
};

const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct UsersRepository {
    store: FirestoreClient,
}

impl UsersRepository {
    pub fn new(store: FirestoreClient) -> Self {
        Self { store }
    }

    /// One page of user documents plus the continuation token
    pub async fn list_page(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> AppResult<(Vec<UserRecord>, Option<String>)> {
        let page_size = page_size.unwrap_or_else(|| self.store.scan_page_size());
        let (documents, next) = self
            .store
            .list_page(COLLECTION, page_size, page_token, None)
            .await?;
        Ok((decode_users(documents), next))
    }

    /// Materialize the whole user collection.
    ///
    /// The statistics aggregator works on an in-memory snapshot; paging
    /// through the store is handled here so the aggregation itself stays a
    /// pure single pass.
    pub async fn scan_all(&self) -> AppResult<Vec<UserRecord>> {
        let documents = self.store.list_all(COLLECTION, None).await?;
        Ok(decode_users(documents))
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<UserRecord>> {
        let document = self.store.get(COLLECTION, id).await?;
        Ok(document.and_then(decode_user))
    }

    /// Clinic accounts only
    pub async fn list_clinics(&self) -> AppResult<Vec<UserRecord>> {
        let documents = self
            .store
            .query_eq(COLLECTION, "isClinic", &json!(true), None)
            .await?;
        Ok(decode_users(documents))
    }

    /// First account registered with the given email, if any
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let documents = self
            .store
            .query_eq(COLLECTION, "email", &json!(email), Some(1))
            .await?;
        Ok(documents.into_iter().next().and_then(decode_user))
    }
}

fn decode_users(documents: Vec<Document>) -> Vec<UserRecord> {
    documents.into_iter().filter_map(decode_user).collect()
}

/// Inject the document id and deserialize; malformed documents are skipped
/// with a warning rather than failing the whole scan.
fn decode_user((id, mut fields): Document) -> Option<UserRecord> {
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.clone()));
    }
    match serde_json::from_value(fields) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!("Skipping malformed user document {}: {}", id, error);
            None
        }
    }
}
