//! Business logic services

pub mod accounts;
pub mod catalog;
pub mod lifecycle;

use crate::{
    config::SignupConfig,
    error::{AppError, AppResult},
    models::{Account, Role},
    repository::Repository,
};

/// Authenticated session passed explicitly into role-gated operations.
///
/// There is no process-wide current user; whoever holds a `Session` value is
/// the actor.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
}

impl Session {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account_id(&self) -> i64 {
        self.account.id
    }

    /// Fail unless the session holds exactly the given role.
    pub fn require(&self, role: Role) -> AppResult<()> {
        if self.account.role == role {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "{} role required, session is {}",
                role, self.account.role
            )))
        }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub catalog: catalog::CatalogService,
    pub lifecycle: lifecycle::LifecycleService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, signup_config: SignupConfig) -> Self {
        Self {
            accounts: accounts::AccountsService::new(repository.clone(), signup_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            lifecycle: lifecycle::LifecycleService::new(repository),
        }
    }
}
