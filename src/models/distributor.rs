//! Distributor partner accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use utoipa::ToSchema;
use validator::Validate;

/// One distributor document; the id doubles as the identity-provider uid
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Distributor {
    /// Document id (injected from the document name)
    #[serde(default)]
    pub id: String,
    /// Partner category (e.g. "clinic", "shop")
    #[serde(rename = "type", default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub kind: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub phone: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub city: Option<String>,
    /// Login email; immutable through the plain update endpoint
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub login: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Ids of promo codes attached to this distributor
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub promocodes: Vec<String>,
}

/// Create distributor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDistributor {
    /// Partner category
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub kind: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    /// Login email; must belong to the configured distributor domain
    #[validate(email(message = "Invalid email format"))]
    pub login: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Update distributor request (login cannot be changed here)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDistributor {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    /// Rejected if present; email changes go through the dedicated endpoint
    pub login: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Admin-only email change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDistributorEmail {
    #[validate(email(message = "Invalid email format"))]
    pub new_email: String,
}

/// Admin-only password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDistributorPassword {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Attach an existing promo code to a distributor
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachPromoCode {
    pub promocode_id: String,
}
