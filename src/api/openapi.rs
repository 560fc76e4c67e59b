//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{distributors, health, promocodes, roles, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visiotrain Admin API",
        version = "1.0.0",
        description = "Vision Therapy Platform administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Visiotrain Team", email = "dev@visiotrain.app")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::list_clinic_users,
        users::get_user,
        // Stats
        stats::get_statistics,
        // Distributors
        distributors::list_distributors,
        distributors::get_distributor,
        distributors::create_distributor,
        distributors::update_distributor,
        distributors::change_distributor_email,
        distributors::set_distributor_password,
        distributors::list_distributor_promocodes,
        distributors::attach_promocode,
        // Promo codes
        promocodes::list_promocodes,
        promocodes::create_promocodes,
        promocodes::find_promocode,
        // Roles
        roles::set_admin_role,
    ),
    components(
        schemas(
            // Users
            crate::models::user::UserRecord,
            crate::models::user::Subscription,
            crate::models::user::UserSettings,
            crate::models::user::GameRecord,
            users::UserListResponse,
            users::UserResponse,
            users::ClinicUsersResponse,
            // Stats
            stats::StatsRequest,
            stats::StatsFilter,
            stats::StatisticsResponse,
            stats::StatisticsData,
            stats::ModeTotals,
            stats::AgeBucket,
            stats::GameStat,
            stats::GameLeaderboards,
            stats::PlayTimeStats,
            // Distributors
            crate::models::distributor::Distributor,
            crate::models::distributor::CreateDistributor,
            crate::models::distributor::UpdateDistributor,
            crate::models::distributor::ChangeDistributorEmail,
            crate::models::distributor::SetDistributorPassword,
            crate::models::distributor::AttachPromoCode,
            distributors::DistributorListResponse,
            distributors::DistributorResponse,
            distributors::CreatedResponse,
            distributors::OkResponse,
            distributors::DistributorPromoCodesResponse,
            // Promo codes
            crate::models::promocode::PromoCode,
            crate::models::promocode::PromoCodeWithUser,
            crate::models::promocode::PromoCodeStats,
            crate::models::promocode::CreatePromoCodes,
            crate::models::promocode::FindPromoCode,
            promocodes::PromoCodeListResponse,
            promocodes::PromoCodeResponse,
            promocodes::CreatePromoCodesResponse,
            // Roles
            roles::SetAdminRole,
            // Health
            health::HealthResponse,
            health::ReadyResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User account browsing"),
        (name = "stats", description = "Play statistics"),
        (name = "distributors", description = "Distributor management"),
        (name = "promocodes", description = "Promo code management"),
        (name = "roles", description = "Role administration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
