//! Promo code endpoints (admin only)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        promocode::{CreatePromoCodes, FindPromoCode},
        PromoCode, PromoCodeStats,
    },
};

use super::AuthenticatedUser;

/// Full promo code listing with usage counters
#[derive(Serialize, ToSchema)]
pub struct PromoCodeListResponse {
    pub success: bool,
    pub data: Vec<PromoCode>,
    pub stats: PromoCodeStats,
}

/// Single promo code response
#[derive(Serialize, ToSchema)]
pub struct PromoCodeResponse {
    pub success: bool,
    pub data: PromoCode,
}

/// Batch generation response
#[derive(Serialize, ToSchema)]
pub struct CreatePromoCodesResponse {
    pub success: bool,
    /// Document ids of the generated codes
    pub ids: Vec<String>,
}

/// List all promo codes with usage stats
#[utoipa::path(
    get,
    path = "/promocodes",
    tag = "promocodes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All promo codes", body = PromoCodeListResponse),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_promocodes(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<PromoCodeListResponse>> {
    claims.require_admin()?;

    let (promocodes, stats) = state.services.promocodes.list().await?;
    Ok(Json(PromoCodeListResponse {
        success: true,
        data: promocodes,
        stats,
    }))
}

/// Generate a batch of promo codes
#[utoipa::path(
    post,
    path = "/promocodes",
    tag = "promocodes",
    security(("bearer_auth" = [])),
    request_body = CreatePromoCodes,
    responses(
        (status = 201, description = "Promo codes generated", body = CreatePromoCodesResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_promocodes(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreatePromoCodes>,
) -> AppResult<(StatusCode, Json<CreatePromoCodesResponse>)> {
    claims.require_admin()?;

    let ids = state.services.promocodes.create_batch(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePromoCodesResponse { success: true, ids }),
    ))
}

/// Find a promo code by code or barcode
#[utoipa::path(
    post,
    path = "/promocodes/find",
    tag = "promocodes",
    security(("bearer_auth" = [])),
    request_body = FindPromoCode,
    responses(
        (status = 200, description = "Promo code found", body = PromoCodeResponse),
        (status = 404, description = "Promo code not found")
    )
)]
pub async fn find_promocode(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<FindPromoCode>,
) -> AppResult<Json<PromoCodeResponse>> {
    claims.require_admin()?;

    let promocode = state.services.promocodes.find(&payload.code).await?;
    Ok(Json(PromoCodeResponse {
        success: true,
        data: promocode,
    }))
}
