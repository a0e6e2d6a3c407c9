//! Shared test harness: real services over in-memory SQLite stores

use sqlx::sqlite::SqlitePoolOptions;

use shelfmark::{
    config::{RulesConfig, SignupConfig},
    models::{account::CreateAccount, item::CreateItem, Role},
    repository::Repository,
    services::{Services, Session},
};

pub const LIBRARIAN_KEY: &str = "test-librarian-key";
pub const ADMIN_KEY: &str = "test-admin-key";

/// Fresh services over two in-memory stores with default rules seeded.
///
/// `max_connections(1)` keeps each `sqlite::memory:` database alive and
/// shared for the whole pool.
pub async fn setup() -> (Services, Repository) {
    let accounts_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("accounts store");
    let library_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("library store");

    let repository = Repository::new(accounts_pool, library_pool);
    repository.setup_schema().await.expect("schema");
    repository
        .rules
        .seed(&RulesConfig::default())
        .await
        .expect("rules seed");

    let signup = SignupConfig {
        librarian_key: LIBRARIAN_KEY.to_string(),
        admin_key: ADMIN_KEY.to_string(),
    };
    (Services::new(repository.clone(), signup), repository)
}

/// Sign up an account of the given role and open a session for it.
pub async fn signup(services: &Services, email: &str, role: Role) -> Session {
    let key = match role {
        Role::Member => None,
        Role::Librarian => Some(LIBRARIAN_KEY),
        Role::Admin => Some(ADMIN_KEY),
    };
    let account = services
        .accounts
        .signup(
            CreateAccount {
                full_name: "Test Person".to_string(),
                date_of_birth: "1990-01-01".to_string(),
                phone: "555-0100".to_string(),
                email: email.to_string(),
                password: "secret".to_string(),
                role,
            },
            key,
        )
        .await
        .expect("signup");
    Session::new(account)
}

/// Add a catalog item through the librarian session.
pub async fn add_item(
    services: &Services,
    librarian: &Session,
    item_id: i64,
    isbn: &str,
    title: &str,
) -> i64 {
    services
        .catalog
        .add_item(
            librarian,
            CreateItem {
                item_id,
                isbn: isbn.to_string(),
                title: title.to_string(),
                author: Some("Test Author".to_string()),
                publisher: None,
                publication_date: None,
                edition: None,
                language: None,
                genre: Some("Fiction".to_string()),
            },
        )
        .await
        .expect("add item")
        .item_id
}
