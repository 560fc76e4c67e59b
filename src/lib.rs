//! Visiotrain Admin Server
//!
//! A Rust backend for the Visiotrain vision-therapy platform dashboard,
//! providing a REST JSON API for browsing player accounts, computing play
//! statistics and managing distributor partners and promo codes.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
