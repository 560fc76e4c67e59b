//! Promo code management service

use chrono::Utc;
use rand::Rng;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{promocode::CreatePromoCodes, PromoCode, PromoCodeStats},
    repository::Repository,
};

/// Code alphabet without visually ambiguous characters
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 10;
const BARCODE_LENGTH: usize = 13;

#[derive(Clone)]
pub struct PromoCodesService {
    repository: Repository,
}

impl PromoCodesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All promo codes plus usage counters
    pub async fn list(&self) -> AppResult<(Vec<PromoCode>, PromoCodeStats)> {
        let promocodes = self.repository.promocodes.list_all().await?;
        let total = promocodes.len() as u64;
        let used = promocodes.iter().filter(|p| p.is_used()).count() as u64;
        let stats = PromoCodeStats {
            total,
            used,
            available: total - used,
        };
        Ok((promocodes, stats))
    }

    /// Lookup by code, falling back to barcode
    pub async fn find(&self, code: &str) -> AppResult<PromoCode> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation("Missing code".to_string()));
        }
        self.repository
            .promocodes
            .find_by_code_or_barcode(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo code not found".to_string()))
    }

    /// Generate a batch of fresh codes; returns their document ids.
    pub async fn create_batch(&self, payload: CreatePromoCodes) -> AppResult<Vec<String>> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let created_at = Utc::now().to_rfc3339();
        let mut ids = Vec::with_capacity(payload.count as usize);
        for _ in 0..payload.count {
            let fields = json!({
                "code": generate_code(payload.prefix.as_deref()),
                "barcode": generate_barcode(),
                "createdAt": &created_at,
            });
            let id = Uuid::new_v4().to_string();
            self.repository.promocodes.create(&id, &fields).await?;
            ids.push(id);
        }
        tracing::info!("Generated {} promo codes", ids.len());
        Ok(ids)
    }
}

fn generate_code(prefix: Option<&str>) -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..CODE_LENGTH)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect();
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}-{}", prefix, body),
        _ => body,
    }
}

fn generate_barcode() -> String {
    let mut rng = rand::thread_rng();
    // leading digit non-zero so the printed length is stable
    let mut barcode = String::with_capacity(BARCODE_LENGTH);
    barcode.push(char::from(b'1' + rng.gen_range(0..9u8)));
    for _ in 1..BARCODE_LENGTH {
        barcode.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    barcode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code(None);
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_generated_code_with_prefix() {
        let code = generate_code(Some("VIS"));
        assert!(code.starts_with("VIS-"));
        assert_eq!(code.len(), CODE_LENGTH + 4);
    }

    #[test]
    fn test_generated_barcode_is_numeric() {
        let barcode = generate_barcode();
        assert_eq!(barcode.len(), BARCODE_LENGTH);
        assert!(barcode.bytes().all(|b| b.is_ascii_digit()));
        assert_ne!(barcode.as_bytes()[0], b'0');
    }
}
