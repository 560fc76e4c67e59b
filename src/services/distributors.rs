//! Distributor management service
//!
//! Distributors exist in two systems at once: an identity-provider account
//! (for login and role claims) and a document in the store (for profile data
//! and attached promo codes). The document id always equals the account uid.

use chrono::Utc;
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::{
    config::DistributorsConfig,
    error::{AppError, AppResult},
    models::{
        auth::Role,
        distributor::{CreateDistributor, UpdateDistributor},
        Distributor, PromoCodeWithUser,
    },
    repository::Repository,
    services::identity::IdentityService,
};

#[derive(Clone)]
pub struct DistributorsService {
    repository: Repository,
    identity: IdentityService,
    config: DistributorsConfig,
}

impl DistributorsService {
    pub fn new(
        repository: Repository,
        identity: IdentityService,
        config: DistributorsConfig,
    ) -> Self {
        Self {
            repository,
            identity,
            config,
        }
    }

    /// All distributors, newest first
    pub async fn list(&self) -> AppResult<Vec<Distributor>> {
        self.repository.distributors.list().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Distributor> {
        self.repository
            .distributors
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Distributor not found".to_string()))
    }

    /// Create the identity account with role claims, then the document.
    /// The account is rolled back when the document write fails so the email
    /// is not left orphaned.
    pub async fn create(&self, mut payload: CreateDistributor) -> AppResult<String> {
        payload.login = payload.login.trim().to_lowercase();
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_email_domain(&payload.login)?;

        if self
            .repository
            .users
            .find_by_email(&payload.login)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This email is already used by a player account".to_string(),
            ));
        }

        let uid = self
            .identity
            .create_account(None, &payload.login, &payload.password, &payload.name)
            .await?;
        self.identity
            .set_role_claims(&uid, Role::Distributor, Some(&uid))
            .await?;

        let now = Utc::now().to_rfc3339();
        let fields = json!({
            "type": &payload.kind,
            "name": &payload.name,
            "phone": &payload.phone,
            "city": &payload.city,
            "login": &payload.login,
            "createdAt": &now,
            "updatedAt": &now,
            "promocodes": [],
        });

        if let Err(error) = self.repository.distributors.create(&uid, &fields).await {
            if let Err(cleanup) = self.identity.delete_account(&uid).await {
                tracing::error!("Failed to roll back identity account {}: {}", uid, cleanup);
            }
            return Err(error);
        }

        tracing::info!("Created distributor {} ({})", uid, payload.login);
        Ok(uid)
    }

    /// Update profile fields; the login is immutable here and password
    /// changes are forwarded to the identity provider.
    pub async fn update(&self, id: &str, payload: UpdateDistributor) -> AppResult<()> {
        if payload.login.is_some() {
            return Err(AppError::Validation(
                "Distributor email cannot be changed".to_string(),
            ));
        }
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.get(id).await?;

        let mut fields = Map::new();
        if let Some(kind) = &payload.kind {
            fields.insert("type".to_string(), json!(kind));
        }
        if let Some(name) = &payload.name {
            fields.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = &payload.phone {
            fields.insert("phone".to_string(), json!(phone));
        }
        if let Some(city) = &payload.city {
            fields.insert("city".to_string(), json!(city));
        }
        fields.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));
        self.repository
            .distributors
            .update(id, &Value::Object(fields))
            .await?;

        if let Some(password) = &payload.password {
            // profile update already landed; a password failure is logged,
            // not surfaced
            if let Err(error) = self.identity.update_password(id, password).await {
                tracing::error!("Failed to update password for {}: {}", id, error);
            }
        }

        Ok(())
    }

    /// Admin-only email change, applied to both systems
    pub async fn change_email(&self, id: &str, new_email: &str) -> AppResult<()> {
        let email = new_email.trim().to_lowercase();
        self.check_email_domain(&email)?;
        self.get(id).await?;

        self.identity.update_email(id, &email).await?;
        self.repository
            .distributors
            .update(
                id,
                &json!({ "login": email, "updatedAt": Utc::now().to_rfc3339() }),
            )
            .await?;
        Ok(())
    }

    /// Admin-only password reset; creates the identity account on demand for
    /// distributors imported before account provisioning existed.
    pub async fn set_password(&self, id: &str, password: &str) -> AppResult<()> {
        let distributor = self.get(id).await?;
        let login = distributor
            .login
            .ok_or_else(|| AppError::Validation("Distributor has no email".to_string()))?;

        if !self.identity.account_exists(id).await? {
            let name = distributor.name.as_deref().unwrap_or("Distributor");
            self.identity
                .create_account(Some(id), &login, password, name)
                .await?;
            self.identity
                .set_role_claims(id, Role::Distributor, Some(id))
                .await?;
            tracing::info!("Provisioned identity account for distributor {}", id);
            return Ok(());
        }

        self.identity.update_password(id, password).await
    }

    /// The distributor's attached promo codes, with the redeeming user
    /// embedded for codes that have been activated.
    pub async fn promocodes_with_users(&self, id: &str) -> AppResult<Vec<PromoCodeWithUser>> {
        let distributor = self.get(id).await?;
        let promocodes = self
            .repository
            .promocodes
            .get_many(&distributor.promocodes)
            .await?;

        let mut detailed = Vec::with_capacity(promocodes.len());
        for promocode in promocodes {
            let user = match &promocode.used_by_user_id {
                Some(user_id) => self.repository.users.get(user_id).await?,
                None => None,
            };
            detailed.push(PromoCodeWithUser { promocode, user });
        }
        Ok(detailed)
    }

    /// Attach an existing promo code to the distributor's list
    pub async fn attach_promocode(&self, id: &str, promocode_id: &str) -> AppResult<()> {
        if self.repository.promocodes.get(promocode_id).await?.is_none() {
            return Err(AppError::NotFound("Promo code not found".to_string()));
        }
        self.repository
            .distributors
            .attach_promocode(id, promocode_id)
            .await
    }

    fn check_email_domain(&self, email: &str) -> AppResult<()> {
        let suffix = format!("@{}", self.config.email_domain);
        if !email.ends_with(&suffix) {
            return Err(AppError::Validation(format!(
                "Distributor email must belong to {}",
                suffix
            )));
        }
        Ok(())
    }
}
