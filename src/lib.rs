//! Shelfmark Library Management System
//!
//! A terminal-driven library management tool: members search, borrow,
//! return, and reserve catalog items; librarians manage the catalog and
//! decide reservation requests; admins manage accounts and library rules.
//! State lives in two independent SQLite stores (accounts, library).

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across the menus
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
