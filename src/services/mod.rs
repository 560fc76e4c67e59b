//! Business logic services

pub mod distributors;
pub mod identity;
pub mod promocodes;
pub mod stats;
pub mod users;

use crate::{
    config::{DistributorsConfig, IdentityConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub identity: identity::IdentityService,
    pub users: users::UsersService,
    pub distributors: distributors::DistributorsService,
    pub promocodes: promocodes::PromoCodesService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        identity_config: IdentityConfig,
        distributors_config: DistributorsConfig,
    ) -> Self {
        let identity = identity::IdentityService::new(identity_config);
        Self {
            users: users::UsersService::new(repository.clone()),
            distributors: distributors::DistributorsService::new(
                repository.clone(),
                identity.clone(),
                distributors_config,
            ),
            promocodes: promocodes::PromoCodesService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            identity,
        }
    }
}
