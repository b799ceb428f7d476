//! Atrium Community Resource & Collaboration Server
//!
//! A REST JSON API for a shared community platform: a lending library
//! (books, members, borrow records) and a project marketplace (projects,
//! team memberships, applications, reviews).

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
