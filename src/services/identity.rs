//! Identity provider client
//!
//! Wraps the provider's account-admin REST endpoints (create/update/delete,
//! custom role claims) and verifies the RS256 ID tokens it issues.
//! Verification keys come from the published JWKS and are cached; a token
//! with an unknown key id forces a refetch.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::{
    config::IdentityConfig,
    error::{AppError, AppResult},
    models::auth::{AuthClaims, Role},
};

const JWKS_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Default)]
struct KeyCache {
    /// kid -> RSA (n, e) components, base64url-encoded as published
    keys: HashMap<String, (String, String)>,
    fetched_at: Option<Instant>,
}

#[derive(Clone)]
pub struct IdentityService {
    http: reqwest::Client,
    config: IdentityConfig,
    keys: Arc<RwLock<KeyCache>>,
}

impl IdentityService {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            keys: Arc::new(RwLock::new(KeyCache::default())),
        }
    }

    /// Verify an ID token and return its claims.
    pub async fn verify_token(&self, token: &str) -> AppResult<AuthClaims> {
        let header = decode_header(token)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Authentication("Token has no key id".to_string()))?;

        let (n, e) = self.verification_key(&kid).await?;
        let key = DecodingKey::from_rsa_components(&n, &e)
            .map_err(|e| AppError::Internal(format!("Bad verification key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.project_id.as_str()]);
        validation.set_issuer(&[self.config.issuer.as_str()]);

        let data = decode::<AuthClaims>(token, &key, &validation)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))?;
        Ok(data.claims)
    }

    /// RSA components for a key id, refetching the JWKS when the id is
    /// unknown or the cache is stale.
    async fn verification_key(&self, kid: &str) -> AppResult<(String, String)> {
        {
            let cache = self.keys.read().await;
            let fresh = cache
                .fetched_at
                .map(|at| at.elapsed() < JWKS_REFRESH_INTERVAL)
                .unwrap_or(false);
            if fresh {
                if let Some(components) = cache.keys.get(kid) {
                    return Ok(components.clone());
                }
            }
        }

        let jwks: Jwks = self
            .http
            .get(&self.config.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut cache = self.keys.write().await;
        cache.keys = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid, (key.n, key.e)))
            .collect();
        cache.fetched_at = Some(Instant::now());

        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AppError::Authentication("Unknown token key id".to_string()))
    }

    /// POST one account-admin action and surface provider error codes.
    async fn account_action(&self, action: &str, body: &Value) -> AppResult<Value> {
        let url = format!(
            "{}/accounts:{}?key={}",
            self.config.base_url, action, self.config.api_key
        );
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown identity provider error")
                .to_string();
            return Err(match message.as_str() {
                "EMAIL_EXISTS" => {
                    AppError::Conflict("An account with this email already exists".to_string())
                }
                _ => AppError::Identity(message),
            });
        }
        Ok(payload)
    }

    /// Create an account, optionally under a caller-chosen uid; returns the uid.
    pub async fn create_account(
        &self,
        uid: Option<&str>,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<String> {
        let mut body = json!({
            "email": email,
            "password": password,
            "displayName": display_name,
        });
        if let Some(uid) = uid {
            body["localId"] = json!(uid);
        }
        let payload = self.account_action("signUp", &body).await?;
        payload
            .get("localId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Identity("Account creation returned no uid".to_string()))
    }

    /// Stamp role claims onto an account; they surface in later ID tokens.
    pub async fn set_role_claims(
        &self,
        uid: &str,
        role: Role,
        distributor_id: Option<&str>,
    ) -> AppResult<()> {
        let mut claims = json!({ "role": role });
        if let Some(distributor_id) = distributor_id {
            claims["distributorId"] = json!(distributor_id);
        }
        self.account_action(
            "update",
            &json!({ "localId": uid, "customAttributes": claims.to_string() }),
        )
        .await?;
        Ok(())
    }

    pub async fn update_password(&self, uid: &str, password: &str) -> AppResult<()> {
        self.account_action("update", &json!({ "localId": uid, "password": password }))
            .await?;
        Ok(())
    }

    pub async fn update_email(&self, uid: &str, email: &str) -> AppResult<()> {
        self.account_action(
            "update",
            &json!({ "localId": uid, "email": email, "emailVerified": true }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_account(&self, uid: &str) -> AppResult<()> {
        self.account_action("delete", &json!({ "localId": uid }))
            .await?;
        Ok(())
    }

    /// Whether an account exists for the given uid.
    pub async fn account_exists(&self, uid: &str) -> AppResult<bool> {
        let payload = self
            .account_action("lookup", &json!({ "localId": [uid] }))
            .await?;
        Ok(payload
            .get("users")
            .and_then(Value::as_array)
            .map(|users| !users.is_empty())
            .unwrap_or(false))
    }
}
