//! Accounts repository for the accounts store

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::account::{Account, CreateAccount, UpdateAccount},
};

/// Map a unique-constraint violation on the email column to the domain error.
fn map_duplicate(err: sqlx::Error, email: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            AppError::DuplicateAccount(format!("email {} is already registered", email))
        }
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Sqlite>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))
    }

    /// Get account by email, if registered
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    /// List all accounts in insertion order
    pub async fn list(&self) -> AppResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    /// Create an account with an already-hashed credential
    pub async fn create(&self, account: &CreateAccount, password_hash: &str) -> AppResult<Account> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (full_name, date_of_birth, phone, email, password, role)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&account.full_name)
        .bind(&account.date_of_birth)
        .bind(&account.phone)
        .bind(&account.email)
        .bind(password_hash)
        .bind(account.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_duplicate(e, &account.email))?;

        self.get_by_id(id).await
    }

    /// Update an account, keeping current values for unspecified fields
    pub async fn update(
        &self,
        id: i64,
        update: &UpdateAccount,
        password_hash: Option<String>,
    ) -> AppResult<Account> {
        let current = self.get_by_id(id).await?;

        let full_name = update.full_name.clone().unwrap_or(current.full_name);
        let date_of_birth = update.date_of_birth.clone().or(current.date_of_birth);
        let phone = update.phone.clone().or(current.phone);
        let email = update.email.clone().unwrap_or(current.email);
        let password = password_hash.unwrap_or(current.password);
        let role = update.role.unwrap_or(current.role);

        sqlx::query(
            r#"
            UPDATE accounts
            SET full_name = ?, date_of_birth = ?, phone = ?, email = ?, password = ?, role = ?
            WHERE id = ?
            "#,
        )
        .bind(&full_name)
        .bind(&date_of_birth)
        .bind(&phone)
        .bind(&email)
        .bind(&password)
        .bind(role)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_duplicate(e, &email))?;

        self.get_by_id(id).await
    }

    /// Delete an account
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account with id {} not found", id)));
        }
        Ok(())
    }

    /// Full name lookup for cross-store joins (overdue report)
    pub async fn full_name(&self, id: i64) -> AppResult<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT full_name FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }
}
