//! Promo code entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::UserRecord;

/// One promo code document
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Document id
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub code: Option<String>,
    /// EAN-style barcode printed on retail cards
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub barcode: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set when a player redeems the code
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub used_by_user_id: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub activated_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    pub fn is_used(&self) -> bool {
        self.used_by_user_id.is_some()
    }
}

/// Promo code with the redeeming user embedded (distributor detail view)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromoCodeWithUser {
    #[serde(flatten)]
    pub promocode: PromoCode,
    /// Present when the code has been redeemed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

/// Usage counters reported alongside the full promo code list
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeStats {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

/// Batch-generate promo codes
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromoCodes {
    /// How many codes to generate
    #[validate(range(min = 1, max = 500, message = "Count must be between 1 and 500"))]
    pub count: u32,
    /// Optional prefix stamped on every generated code
    pub prefix: Option<String>,
}

/// Find a promo code by its code or barcode
#[derive(Debug, Deserialize, ToSchema)]
pub struct FindPromoCode {
    pub code: String,
}
