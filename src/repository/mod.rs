//! Repository layer for the two relational stores
//!
//! The accounts store and the library store are independent SQLite
//! databases; nothing enforces referential integrity between them, matching
//! the deployed data layout.

pub mod accounts;
pub mod items;
pub mod requests;
pub mod rules;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::StoresConfig, error::AppResult};

/// Main repository struct holding both store pools
#[derive(Clone)]
pub struct Repository {
    pub accounts_pool: Pool<Sqlite>,
    pub library_pool: Pool<Sqlite>,
    pub accounts: accounts::AccountsRepository,
    pub items: items::ItemsRepository,
    pub requests: requests::RequestsRepository,
    pub rules: rules::RulesRepository,
}

impl Repository {
    /// Create a repository from two already-connected pools
    pub fn new(accounts_pool: Pool<Sqlite>, library_pool: Pool<Sqlite>) -> Self {
        Self {
            accounts: accounts::AccountsRepository::new(accounts_pool.clone()),
            items: items::ItemsRepository::new(library_pool.clone()),
            requests: requests::RequestsRepository::new(library_pool.clone()),
            rules: rules::RulesRepository::new(library_pool.clone()),
            accounts_pool,
            library_pool,
        }
    }

    /// Open both stores, creating the database files when missing
    pub async fn connect(config: &StoresConfig) -> AppResult<Self> {
        let accounts_pool = open_pool(&config.accounts_url, config.max_connections).await?;
        let library_pool = open_pool(&config.library_url, config.max_connections).await?;
        Ok(Self::new(accounts_pool, library_pool))
    }

    /// Create tables in both stores when they do not exist yet
    pub async fn setup_schema(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                date_of_birth TEXT,
                phone TEXT,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                role TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.accounts_pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                item_id INTEGER PRIMARY KEY,
                isbn TEXT NOT NULL,
                title TEXT NOT NULL,
                author TEXT,
                publisher TEXT,
                publication_date TEXT,
                edition TEXT,
                language TEXT,
                genre TEXT,
                available INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.library_pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS requests (
                request_id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                item_id INTEGER NOT NULL,
                request_type TEXT NOT NULL,
                status TEXT NOT NULL,
                due_date TEXT
            )
            "#,
        )
        .execute(&self.library_pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rules (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                borrow_limit INTEGER NOT NULL,
                loan_period_days INTEGER NOT NULL,
                late_penalty_per_day REAL NOT NULL
            )
            "#,
        )
        .execute(&self.library_pool)
        .await?;

        Ok(())
    }
}

async fn open_pool(url: &str, max_connections: u32) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}
