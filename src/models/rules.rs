//! Library rules persisted in the library store

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Single-row settings record driving the Lifecycle Engine
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LibraryRules {
    pub borrow_limit: i64,
    pub loan_period_days: i64,
    pub late_penalty_per_day: f64,
}

/// Admin update; `None` keeps the current value
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateRules {
    pub borrow_limit: Option<i64>,
    pub loan_period_days: Option<i64>,
    pub late_penalty_per_day: Option<f64>,
}
