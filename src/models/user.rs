//! User account records from the document store
//!
//! User documents are written by several app versions and by clinic imports,
//! so most fields are optional and a few arrive with the wrong type. The
//! deserializers coalesce anything unusable into defaults instead of
//! rejecting the document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};
use utoipa::ToSchema;

/// Subscription sub-document; anything but `isActive: true` counts as inactive
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub is_active: bool,
}

/// Per-user display settings
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Binocular display mode; absent means monocular
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub is_binocular_mode: bool,
}

/// Per-game progress entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct GameRecord {
    /// Attempt counter; wrong-typed values count as zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub attempts: Option<Value>,
}

impl GameRecord {
    /// Attempts as an integer, coercing anything non-numeric to zero.
    pub fn attempt_count(&self) -> i64 {
        match &self.attempts {
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            None => 0,
        }
    }
}

/// One registered account, as stored in the `users` collection
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document id (injected from the document name, not stored in fields)
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub email: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,
    /// Raw birthday string; see [`crate::models::birthday`] for the formats
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub birthday: Option<String>,
    /// "Male", "Female" or absent/empty for "not specified"
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub gender: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub is_clinic: bool,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub settings: Option<UserSettings>,
    /// Game id -> progress entry
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[schema(value_type = Object)]
    pub game_records: IndexMap<String, GameRecord>,
    /// Day key -> minutes played that day (loosely typed)
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[schema(value_type = Object)]
    pub daily_play_times: IndexMap<String, Value>,
}

impl UserRecord {
    /// Active subscription check; absent subscription counts as inactive.
    pub fn is_active(&self) -> bool {
        self.subscription.as_ref().map(|s| s.is_active).unwrap_or(false)
    }

    /// Binocular mode check; absent settings count as monocular.
    pub fn is_binocular(&self) -> bool {
        self.settings
            .as_ref()
            .map(|s| s.is_binocular_mode)
            .unwrap_or(false)
    }
}
