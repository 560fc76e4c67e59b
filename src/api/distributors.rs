//! Distributor management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        distributor::{
            AttachPromoCode, ChangeDistributorEmail, CreateDistributor, SetDistributorPassword,
            UpdateDistributor,
        },
        Distributor, PromoCodeWithUser,
    },
};

use super::AuthenticatedUser;

/// Distributor list response
#[derive(Serialize, ToSchema)]
pub struct DistributorListResponse {
    pub success: bool,
    pub data: Vec<Distributor>,
}

/// Single distributor response
#[derive(Serialize, ToSchema)]
pub struct DistributorResponse {
    pub success: bool,
    pub data: Distributor,
}

/// Creation response carrying the new document id / account uid
#[derive(Serialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: String,
}

/// Plain success acknowledgement
#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Attached promo codes response
#[derive(Serialize, ToSchema)]
pub struct DistributorPromoCodesResponse {
    pub success: bool,
    pub data: Vec<PromoCodeWithUser>,
}

/// List all distributors, newest first
#[utoipa::path(
    get,
    path = "/distributors",
    tag = "distributors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All distributors", body = DistributorListResponse),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_distributors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DistributorListResponse>> {
    claims.require_admin()?;

    let distributors = state.services.distributors.list().await?;
    Ok(Json(DistributorListResponse {
        success: true,
        data: distributors,
    }))
}

/// Get one distributor; admins see everyone, distributors only themselves
#[utoipa::path(
    get,
    path = "/distributors/{id}",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    responses(
        (status = 200, description = "Distributor details", body = DistributorResponse),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Distributor not found")
    )
)]
pub async fn get_distributor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<DistributorResponse>> {
    claims.require_admin_or_distributor(&id)?;

    let distributor = state.services.distributors.get(&id).await?;
    Ok(Json(DistributorResponse {
        success: true,
        data: distributor,
    }))
}

/// Create a distributor account plus its document
#[utoipa::path(
    post,
    path = "/distributors",
    tag = "distributors",
    security(("bearer_auth" = [])),
    request_body = CreateDistributor,
    responses(
        (status = 201, description = "Distributor created", body = CreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_distributor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateDistributor>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    claims.require_admin()?;

    let id = state.services.distributors.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { success: true, id }),
    ))
}

/// Update distributor profile fields (login is immutable here)
#[utoipa::path(
    put,
    path = "/distributors/{id}",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    request_body = UpdateDistributor,
    responses(
        (status = 200, description = "Distributor updated", body = OkResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Distributor not found")
    )
)]
pub async fn update_distributor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDistributor>,
) -> AppResult<Json<OkResponse>> {
    claims.require_admin()?;

    state.services.distributors.update(&id, payload).await?;
    Ok(Json(OkResponse {
        success: true,
        message: None,
    }))
}

/// Change a distributor's login email in both systems
#[utoipa::path(
    put,
    path = "/distributors/{id}/email",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    request_body = ChangeDistributorEmail,
    responses(
        (status = 200, description = "Email changed", body = OkResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Distributor not found")
    )
)]
pub async fn change_distributor_email(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<ChangeDistributorEmail>,
) -> AppResult<Json<OkResponse>> {
    claims.require_admin()?;

    state
        .services
        .distributors
        .change_email(&id, &payload.new_email)
        .await?;
    Ok(Json(OkResponse {
        success: true,
        message: None,
    }))
}

/// Set a distributor's password, provisioning the account when missing
#[utoipa::path(
    put,
    path = "/distributors/{id}/password",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    request_body = SetDistributorPassword,
    responses(
        (status = 200, description = "Password set", body = OkResponse),
        (status = 404, description = "Distributor not found")
    )
)]
pub async fn set_distributor_password(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<SetDistributorPassword>,
) -> AppResult<Json<OkResponse>> {
    claims.require_admin()?;

    state
        .services
        .distributors
        .set_password(&id, &payload.password)
        .await?;
    Ok(Json(OkResponse {
        success: true,
        message: Some("Password updated".to_string()),
    }))
}

/// Promo codes attached to a distributor, redeeming users embedded
#[utoipa::path(
    get,
    path = "/distributors/{id}/promocodes",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    responses(
        (status = 200, description = "Attached promo codes", body = DistributorPromoCodesResponse),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Distributor not found")
    )
)]
pub async fn list_distributor_promocodes(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<DistributorPromoCodesResponse>> {
    claims.require_admin_or_distributor(&id)?;

    let promocodes = state.services.distributors.promocodes_with_users(&id).await?;
    Ok(Json(DistributorPromoCodesResponse {
        success: true,
        data: promocodes,
    }))
}

/// Attach an existing promo code to a distributor
#[utoipa::path(
    post,
    path = "/distributors/{id}/promocodes",
    tag = "distributors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Distributor id")
    ),
    request_body = AttachPromoCode,
    responses(
        (status = 200, description = "Promo code attached", body = OkResponse),
        (status = 404, description = "Promo code not found")
    )
)]
pub async fn attach_promocode(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<AttachPromoCode>,
) -> AppResult<Json<OkResponse>> {
    claims.require_admin()?;

    state
        .services
        .distributors
        .attach_promocode(&id, &payload.promocode_id)
        .await?;
    Ok(Json(OkResponse {
        success: true,
        message: Some("Promo code attached".to_string()),
    }))
}
