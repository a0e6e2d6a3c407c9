//! Library rules repository for the library store

use sqlx::{Pool, Sqlite};

use crate::{
    config::RulesConfig,
    error::AppResult,
    models::rules::{LibraryRules, UpdateRules},
};

#[derive(Clone)]
pub struct RulesRepository {
    pool: Pool<Sqlite>,
}

impl RulesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Insert the configured defaults if no rules row exists yet.
    pub async fn seed(&self, defaults: &RulesConfig) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO rules (id, borrow_limit, loan_period_days, late_penalty_per_day)
            VALUES (1, ?, ?, ?)
            "#,
        )
        .bind(defaults.borrow_limit)
        .bind(defaults.loan_period_days)
        .bind(defaults.late_penalty_per_day)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Current library rules
    pub async fn get(&self) -> AppResult<LibraryRules> {
        let rules = sqlx::query_as::<_, LibraryRules>(
            "SELECT borrow_limit, loan_period_days, late_penalty_per_day FROM rules WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(rules)
    }

    /// Update rules, keeping current values for unspecified fields
    pub async fn update(&self, update: UpdateRules) -> AppResult<LibraryRules> {
        let current = self.get().await?;

        let borrow_limit = update.borrow_limit.unwrap_or(current.borrow_limit);
        let loan_period_days = update.loan_period_days.unwrap_or(current.loan_period_days);
        let late_penalty_per_day = update
            .late_penalty_per_day
            .unwrap_or(current.late_penalty_per_day);

        sqlx::query(
            r#"
            UPDATE rules
            SET borrow_limit = ?, loan_period_days = ?, late_penalty_per_day = ?
            WHERE id = 1
            "#,
        )
        .bind(borrow_limit)
        .bind(loan_period_days)
        .bind(late_penalty_per_day)
        .execute(&self.pool)
        .await?;

        self.get().await
    }
}
