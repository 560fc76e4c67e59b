//! API handlers for Visiotrain REST endpoints

pub mod distributors;
pub mod health;
pub mod openapi;
pub mod promocodes;
pub mod roles;
pub mod stats;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};

use crate::{error::AppError, models::AuthClaims, AppState};

/// Extractor for an authenticated caller, verified against the identity
/// provider's signing keys
pub struct AuthenticatedUser(pub AuthClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Authentication("Missing or invalid authorization header".to_string())
                })?;

        let claims = state.services.identity.verify_token(bearer.token()).await?;

        Ok(AuthenticatedUser(claims))
    }
}
