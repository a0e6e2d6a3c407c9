//! Account model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account roles, stored as their variant name in the accounts store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    Member,
    Librarian,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Librarian => "Librarian",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "librarian" => Ok(Role::Librarian),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Account record from the accounts store
///
/// A single tagged struct covers all three roles; role-specific behaviour is
/// dispatched on [`Role`] by pure functions such as [`describe`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    /// Argon2 hash, never the plain credential
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

/// Signup / admin-create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccount {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    /// Expected format YYYY-MM-DD, checked by the accounts service
    pub date_of_birth: String,
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub role: Role,
}

/// Admin-driven account update; `None` keeps the current value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAccount {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Plain password, re-hashed by the accounts service when supplied
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Render an account profile header for terminal display.
pub fn describe(account: &Account) -> String {
    match account.role {
        Role::Member => format!(
            "Member ID: {}\nName: {}\nEmail: {}",
            account.id, account.full_name, account.email
        ),
        Role::Librarian | Role::Admin => format!(
            "{} ID: {}\nName: {}\nEmail: {}\nAccount Type: {}",
            account.role, account.id, account.full_name, account.email, account.role
        ),
    }
}
