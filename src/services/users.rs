//! User account read services
//!
//! Player accounts are created and updated by the apps themselves; the admin
//! dashboard only browses them, so this service is read-only.

use crate::{
    error::{AppError, AppResult},
    models::UserRecord,
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One page of accounts plus the continuation token for the next call
    pub async fn list(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> AppResult<(Vec<UserRecord>, Option<String>)> {
        self.repository.users.list_page(page_size, page_token).await
    }

    pub async fn get(&self, id: &str) -> AppResult<UserRecord> {
        self.repository
            .users
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Clinic accounts only
    pub async fn list_clinics(&self) -> AppResult<Vec<UserRecord>> {
        self.repository.users.list_clinics().await
    }
}
