//! Account management and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::{
    config::SignupConfig,
    error::{AppError, AppResult},
    models::{
        account::{Account, CreateAccount, UpdateAccount},
        Role,
    },
    repository::Repository,
    services::Session,
};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0?[1-9]|1[012])-(0?[1-9]|[12][0-9]|3[01])$").unwrap());

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    signup: SignupConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, signup: SignupConfig) -> Self {
        Self { repository, signup }
    }

    /// Register a new account.
    ///
    /// Librarian and Admin signups must present the matching role key; a
    /// duplicate email fails with `DuplicateAccount`.
    pub async fn signup(
        &self,
        account: CreateAccount,
        role_key: Option<&str>,
    ) -> AppResult<Account> {
        validate_create(&account)?;

        match account.role {
            Role::Member => {}
            Role::Librarian => {
                if role_key != Some(self.signup.librarian_key.as_str()) {
                    return Err(AppError::Authorization(
                        "Invalid librarian key".to_string(),
                    ));
                }
            }
            Role::Admin => {
                if role_key != Some(self.signup.admin_key.as_str()) {
                    return Err(AppError::Authorization("Invalid admin key".to_string()));
                }
            }
        }

        let hash = hash_password(&account.password)?;
        let created = self.repository.accounts.create(&account, &hash).await?;
        tracing::info!(account_id = created.id, role = %created.role, "account created");
        Ok(created)
    }

    /// Authenticate by email and password.
    ///
    /// A single error covers both unknown email and wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Account> {
        let invalid = || AppError::Authentication("Invalid login credentials".to_string());

        let account = self
            .repository
            .accounts
            .get_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&account.password, password)? {
            return Err(invalid());
        }

        tracing::info!(account_id = account.id, role = %account.role, "login");
        Ok(account)
    }

    /// List all accounts (admin only)
    pub async fn list_accounts(&self, session: &Session) -> AppResult<Vec<Account>> {
        session.require(Role::Admin)?;
        self.repository.accounts.list().await
    }

    /// Get account by ID (admin only)
    pub async fn get_account(&self, session: &Session, id: i64) -> AppResult<Account> {
        session.require(Role::Admin)?;
        self.repository.accounts.get_by_id(id).await
    }

    /// Create an account on behalf of someone else (admin only); no role
    /// key is needed on this path
    pub async fn add_account(&self, session: &Session, account: CreateAccount) -> AppResult<Account> {
        session.require(Role::Admin)?;
        validate_create(&account)?;
        let hash = hash_password(&account.password)?;
        let created = self.repository.accounts.create(&account, &hash).await?;
        tracing::info!(account_id = created.id, role = %created.role, "account added by admin");
        Ok(created)
    }

    /// Update an account, keeping current values for unspecified fields
    /// (admin only). Email uniqueness is re-validated on this path too.
    pub async fn update_account(
        &self,
        session: &Session,
        id: i64,
        update: UpdateAccount,
    ) -> AppResult<Account> {
        session.require(Role::Admin)?;

        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(ref dob) = update.date_of_birth {
            validate_date(dob)?;
        }

        let hash = match update.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let updated = self.repository.accounts.update(id, &update, hash).await?;
        tracing::info!(account_id = id, "account updated");
        Ok(updated)
    }

    /// Delete an account (admin only); requires an explicit confirm signal.
    /// Returns whether the account was deleted.
    pub async fn delete_account(&self, session: &Session, id: i64, confirm: bool) -> AppResult<bool> {
        session.require(Role::Admin)?;
        if !confirm {
            tracing::debug!(account_id = id, "account deletion cancelled");
            return Ok(false);
        }
        self.repository.accounts.delete(id).await?;
        tracing::info!(account_id = id, "account deleted");
        Ok(true)
    }
}

fn validate_create(account: &CreateAccount) -> AppResult<()> {
    account
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if account.full_name.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Full name must not contain numbers".to_string(),
        ));
    }
    validate_date(&account.date_of_birth)
}

fn validate_date(date: &str) -> AppResult<()> {
    if DATE_RE.is_match(date) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            date
        )))
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Validation(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| AppError::Authentication("Invalid stored credential".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_regex_accepts_iso_dates() {
        assert!(validate_date("2004-02-29").is_ok());
        assert!(validate_date("1999-1-9").is_ok());
        assert!(validate_date("2004-13-01").is_err());
        assert!(validate_date("04-02-2004").is_err());
        assert!(validate_date("not a date").is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2").unwrap());
        assert!(!verify_password(&hash, "hunter3").unwrap());
    }
}
