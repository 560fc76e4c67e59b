//! Statistics endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Filters accepted by the statistics endpoint; absent fields mean "no
/// constraint"
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsFilter {
    /// Minimum age in whole years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_from: Option<i32>,
    /// Maximum age in whole years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_to: Option<i32>,
    /// "Male", "Female" or "Not specified"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Subscription state; false also matches accounts without a subscription
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Include clinic accounts (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_clinic: Option<bool>,
}

/// Statistics request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatsRequest {
    #[serde(default)]
    pub filters: StatsFilter,
}

/// Users split by display mode
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
pub struct ModeTotals {
    pub binocular: u64,
    pub monocular: u64,
}

/// One age-chart bucket
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct AgeBucket {
    /// Age in whole years
    pub age: i32,
    pub binocular: u64,
    pub monocular: u64,
    pub total: u64,
}

/// One game leaderboard row
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct GameStat {
    /// Game id
    pub id: String,
    /// Total attempts accumulated by matching users
    pub attempts: i64,
    /// Display name from the game catalogue (raw id when unknown)
    pub name: String,
    /// Share of the group total, percent, 2 decimals
    pub percentage: f64,
}

/// The three game popularity leaderboards (top 10 each)
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
pub struct GameLeaderboards {
    pub total: Vec<GameStat>,
    pub binocular: Vec<GameStat>,
    pub monocular: Vec<GameStat>,
}

/// Aggregate play-time statistics over users that played at least one day
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayTimeStats {
    /// Mean of per-user total minutes
    pub total_average_minutes: f64,
    /// Mean of per-user daily averages
    pub average_per_day: f64,
    /// Users that contributed play time
    pub users_count: u64,
}

/// Computed statistics payload
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsData {
    /// Number of users matching the filters
    pub total_users: u64,
    /// Mode split over all matching users
    pub binocular_stats: ModeTotals,
    /// Age chart series, ascending by age
    pub age_stats: Vec<AgeBucket>,
    pub game_stats: GameLeaderboards,
    pub play_time_stats: PlayTimeStats,
    /// Birthday strings no format recognized, for operator review
    pub unknown_birthday_formats: Vec<String>,
}

/// Statistics response envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub success: bool,
    pub data: StatisticsData,
    /// Echo of the filters the report was computed with
    pub filters: StatsFilter,
}

/// Compute play statistics over the whole user collection
#[utoipa::path(
    post,
    path = "/admin/statistics",
    tag = "stats",
    security(("bearer_auth" = [])),
    request_body = StatsRequest,
    responses(
        (status = 200, description = "Computed statistics", body = StatisticsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn get_statistics(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<StatsRequest>,
) -> AppResult<Json<StatisticsResponse>> {
    claims.require_admin()?;

    let filters = request.filters;
    tracing::info!("Fetching statistics with filters: {:?}", filters);

    let data = state.services.stats.get_statistics(&filters).await?;

    Ok(Json(StatisticsResponse {
        success: true,
        data,
        filters,
    }))
}
