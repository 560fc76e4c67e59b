//! User browsing endpoints (admin only)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::UserRecord};

use super::AuthenticatedUser;

/// Query parameters for the paged user listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    /// Page size (defaults to the configured scan page size)
    pub page_size: Option<u32>,
    /// Continuation token from the previous page
    pub page_token: Option<String>,
}

/// One page of user accounts
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<UserRecord>,
    /// Token for the next page, absent on the last one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Single user response
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub data: UserRecord,
}

/// Clinic accounts response
#[derive(Serialize, ToSchema)]
pub struct ClinicUsersResponse {
    pub success: bool,
    pub data: Vec<UserRecord>,
}

/// Page through the user collection
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<UserListResponse>> {
    claims.require_admin()?;

    let (users, next_page_token) = state
        .services
        .users
        .list(query.page_size, query.page_token.as_deref())
        .await?;

    Ok(Json(UserListResponse {
        success: true,
        data: users,
        next_page_token,
    }))
}

/// Clinic accounts only
#[utoipa::path(
    get,
    path = "/users/clinics",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Clinic accounts", body = ClinicUsersResponse),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_clinic_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ClinicUsersResponse>> {
    claims.require_admin()?;

    let users = state.services.users.list_clinics().await?;
    Ok(Json(ClinicUsersResponse {
        success: true,
        data: users,
    }))
}

/// Get one user document by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User document id")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    claims.require_admin()?;

    let user = state.services.users.get(&id).await?;
    Ok(Json(UserResponse {
        success: true,
        data: user,
    }))
}
