//! Identity-provider token claims and role checks

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Role claim assigned through the identity provider's custom claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Distributor,
    #[serde(other)]
    Unknown,
}

/// Verified ID-token claims for an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Identity-provider uid
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    /// Set for distributor accounts; equals their document id
    #[serde(default, rename = "distributorId")]
    pub distributor_id: Option<String>,
    pub exp: i64,
}

impl AuthClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Require the admin role
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Admins see everything; distributors only their own record
    pub fn require_admin_or_distributor(&self, distributor_id: &str) -> Result<(), AppError> {
        if self.is_admin() || self.distributor_id.as_deref() == Some(distributor_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights for this distributor".to_string(),
            ))
        }
    }
}
