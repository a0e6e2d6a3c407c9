//! Catalog item model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Catalog item record from the library store
///
/// `available` is derived state: false exactly while an open Borrow request
/// exists for the item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogItem {
    pub item_id: i64,
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub genre: Option<String>,
    pub available: bool,
}

impl CatalogItem {
    /// Multi-line details block shown before borrow/reserve confirmation.
    pub fn details(&self) -> String {
        format!(
            "ISBN: {}\nTitle: {}\nAuthor: {}\nPublisher: {}\nPublication Date: {}\n\
             Edition: {}\nLanguage: {}\nGenre: {}\nAvailable: {}",
            self.isbn,
            self.title,
            self.author.as_deref().unwrap_or("-"),
            self.publisher.as_deref().unwrap_or("-"),
            self.publication_date.as_deref().unwrap_or("-"),
            self.edition.as_deref().unwrap_or("-"),
            self.language.as_deref().unwrap_or("-"),
            self.genre.as_deref().unwrap_or("-"),
            if self.available { "Yes" } else { "No" }
        )
    }

    /// One-line summary for search result listings.
    pub fn summary(&self) -> String {
        format!(
            "ISBN: {}, Title: {}, Author: {}, Publisher: {}, Genre: {}, Available: {}",
            self.isbn,
            self.title,
            self.author.as_deref().unwrap_or("-"),
            self.publisher.as_deref().unwrap_or("-"),
            self.genre.as_deref().unwrap_or("-"),
            if self.available { "Yes" } else { "No" }
        )
    }
}

/// Librarian create payload; new items always start available
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    pub item_id: i64,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub genre: Option<String>,
}

/// Librarian update payload; `None` keeps the current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub genre: Option<String>,
}
