//! Role administration endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::auth::Role};

use super::{distributors::OkResponse, AuthenticatedUser};

/// Grant the admin role to an identity-provider account
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAdminRole {
    /// Identity-provider uid
    pub uid: String,
}

/// Assign the admin role claim to an account
#[utoipa::path(
    post,
    path = "/admin/roles",
    tag = "roles",
    security(("bearer_auth" = [])),
    request_body = SetAdminRole,
    responses(
        (status = 200, description = "Role assigned", body = OkResponse),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn set_admin_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<SetAdminRole>,
) -> AppResult<Json<OkResponse>> {
    claims.require_admin()?;

    state
        .services
        .identity
        .set_role_claims(&payload.uid, Role::Admin, None)
        .await?;

    Ok(Json(OkResponse {
        success: true,
        message: Some(format!("Admin role assigned to {}", payload.uid)),
    }))
}
