//! Data models for Visiotrain

pub mod auth;
pub mod birthday;
pub mod distributor;
pub mod game;
pub mod promocode;
pub mod user;

// Re-export commonly used types
pub use auth::AuthClaims;
pub use distributor::Distributor;
pub use promocode::{PromoCode, PromoCodeStats, PromoCodeWithUser};
pub use user::UserRecord;
