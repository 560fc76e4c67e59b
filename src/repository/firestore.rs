//! REST client for the managed document database
//!
//! Thin wrapper over the store's JSON document API: list, get, create, patch
//! with an update mask, delete, a field-equality query and an array-union
//! commit. Wire values are translated to and from plain JSON so the models
//! can deserialize documents with serde.

use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{
    config::StoreConfig,
    error::AppResult,
};

/// A document id plus its decoded JSON fields
pub type Document = (String, Value);

#[derive(Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    config: StoreConfig,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    document: Option<WireDocument>,
}

impl FirestoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Page size used when scanning whole collections
    pub fn scan_page_size(&self) -> u32 {
        self.config.scan_page_size
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.config.base_url, self.config.project_id, self.config.database_id
        )
    }

    /// Full resource name of a document, as used by the commit endpoint
    fn resource_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.config.project_id, self.config.database_id, collection, id
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.config.access_token)
    }

    /// List one page of a collection
    pub async fn list_page(
        &self,
        collection: &str,
        page_size: u32,
        page_token: Option<&str>,
        order_by: Option<&str>,
    ) -> AppResult<(Vec<Document>, Option<String>)> {
        let mut request = self
            .http
            .get(format!("{}/{}", self.documents_root(), collection))
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        if let Some(order) = order_by {
            request = request.query(&[("orderBy", order)]);
        }

        let response = self.authorized(request).send().await?.error_for_status()?;
        let body: ListResponse = response.json().await?;
        let documents = body.documents.into_iter().map(decode_document).collect();
        Ok((documents, body.next_page_token))
    }

    /// Scan a whole collection, following page tokens
    pub async fn list_all(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> AppResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let (mut page, next) = self
                .list_page(
                    collection,
                    self.config.scan_page_size,
                    page_token.as_deref(),
                    order_by,
                )
                .await?;
            documents.append(&mut page);
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(documents)
    }

    /// Fetch a single document; `None` when it does not exist
    pub async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let request = self
            .http
            .get(format!("{}/{}/{}", self.documents_root(), collection, id));
        let response = self.authorized(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: WireDocument = response.error_for_status()?.json().await?;
        Ok(Some(decode_document(document)))
    }

    /// Create a document; the store assigns an id unless one is given
    pub async fn create(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: &Value,
    ) -> AppResult<String> {
        let mut request = self
            .http
            .post(format!("{}/{}", self.documents_root(), collection))
            .json(&json!({ "fields": encode_fields(fields) }));
        if let Some(document_id) = id {
            request = request.query(&[("documentId", document_id)]);
        }
        let document: WireDocument = self
            .authorized(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(document_id_from_name(&document.name))
    }

    /// Patch the given top-level fields, leaving the rest untouched
    pub async fn patch(&self, collection: &str, id: &str, fields: &Value) -> AppResult<()> {
        let mask: Vec<(&str, String)> = fields
            .as_object()
            .map(|obj| {
                obj.keys()
                    .map(|key| ("updateMask.fieldPaths", key.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let request = self
            .http
            .patch(format!("{}/{}/{}", self.documents_root(), collection, id))
            .query(&mask)
            .json(&json!({ "fields": encode_fields(fields) }));
        self.authorized(request).send().await?.error_for_status()?;
        Ok(())
    }

    /// Delete a document (missing documents are not an error)
    pub async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let request = self
            .http
            .delete(format!("{}/{}/{}", self.documents_root(), collection, id));
        let response = self.authorized(request).send().await?;
        if response.status() != StatusCode::NOT_FOUND {
            response.error_for_status()?;
        }
        Ok(())
    }

    /// Field-equality query over one collection
    pub async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<u32>,
    ) -> AppResult<Vec<Document>> {
        let mut structured = json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            },
        });
        if let Some(limit) = limit {
            structured["limit"] = json!(limit);
        }
        let request = self
            .http
            .post(format!("{}:runQuery", self.documents_root()))
            .json(&json!({ "structuredQuery": structured }));
        let rows: Vec<QueryRow> = self
            .authorized(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(decode_document)
            .collect())
    }

    /// Append values to an array field without clobbering concurrent writers;
    /// also bumps `updatedAt` to the server time.
    pub async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: &[Value],
    ) -> AppResult<()> {
        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.resource_name(collection, id),
                    "fieldTransforms": [
                        {
                            "fieldPath": field,
                            "appendMissingElements": {
                                "values": values.iter().map(encode_value).collect::<Vec<_>>(),
                            }
                        },
                        { "fieldPath": "updatedAt", "setToServerValue": "REQUEST_TIME" }
                    ]
                }
            }]
        });
        let request = self
            .http
            .post(format!("{}:commit", self.documents_root()))
            .json(&body);
        self.authorized(request).send().await?.error_for_status()?;
        Ok(())
    }
}

/// Strip the resource prefix off a document name
fn document_id_from_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn decode_document(document: WireDocument) -> Document {
    let fields = document
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect();
    (document_id_from_name(&document.name), Value::Object(fields))
}

/// Wire-typed value -> plain JSON
fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => {
            inner.clone()
        }
        // integers arrive as decimal strings on the wire
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner.clone(),
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map(|values| Value::Array(values.iter().map(decode_value).collect()))
            .unwrap_or_else(|| Value::Array(Vec::new())),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map(|fields| {
                Value::Object(
                    fields
                        .iter()
                        .map(|(key, value)| (key.clone(), decode_value(value)))
                        .collect(),
                )
            })
            .unwrap_or_else(|| json!({})),
        _ => Value::Null,
    }
}

/// Plain JSON -> wire-typed value. RFC 3339 strings are written as store
/// timestamps so `createdAt`/`updatedAt` keep their native type.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if n.is_f64() {
                json!({ "doubleValue": n })
            } else {
                json!({ "integerValue": n.to_string() })
            }
        }
        Value::String(s) => {
            if DateTime::parse_from_rfc3339(s).is_ok() {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({
            "mapValue": {
                "fields": map
                    .iter()
                    .map(|(key, value)| (key.clone(), encode_value(value)))
                    .collect::<Map<String, Value>>(),
            }
        }),
    }
}

fn encode_fields(fields: &Value) -> Map<String, Value> {
    fields
        .as_object()
        .map(|obj| {
            obj.iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalar_values() {
        assert_eq!(decode_value(&json!({ "stringValue": "abc" })), json!("abc"));
        assert_eq!(decode_value(&json!({ "integerValue": "42" })), json!(42));
        assert_eq!(decode_value(&json!({ "booleanValue": true })), json!(true));
        assert_eq!(decode_value(&json!({ "nullValue": null })), Value::Null);
    }

    #[test]
    fn test_decode_nested_map() {
        let wire = json!({
            "mapValue": { "fields": { "isActive": { "booleanValue": true } } }
        });
        assert_eq!(decode_value(&wire), json!({ "isActive": true }));
    }

    #[test]
    fn test_encode_round_trip() {
        let plain = json!({ "name": "Optika", "count": 3, "tags": ["a", "b"] });
        let encoded = encode_fields(&plain);
        let decoded: Map<String, Value> = encoded
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect();
        assert_eq!(Value::Object(decoded), plain);
    }

    #[test]
    fn test_encode_timestamp_string() {
        let encoded = encode_value(&json!("2026-01-02T03:04:05Z"));
        assert_eq!(
            encoded,
            json!({ "timestampValue": "2026-01-02T03:04:05Z" })
        );
    }
}
