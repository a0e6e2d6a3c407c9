//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{CatalogItem, CreateItem, UpdateItem},
        Role,
    },
    repository::Repository,
    services::Session,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search items by title or author substring; open to all roles
    pub async fn search(&self, term: &str) -> AppResult<Vec<CatalogItem>> {
        self.repository.items.search(term).await
    }

    /// Resolve an ISBN to a catalog item, used by the menus before
    /// borrow/reserve confirmation
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<CatalogItem>> {
        self.repository.items.get_by_isbn(isbn).await
    }

    /// Get item by ID
    pub async fn get_item(&self, item_id: i64) -> AppResult<CatalogItem> {
        self.repository.items.get_by_id(item_id).await
    }

    /// Add a catalog item (librarian only)
    pub async fn add_item(&self, session: &Session, item: CreateItem) -> AppResult<CatalogItem> {
        session.require(Role::Librarian)?;
        item.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let created = self.repository.items.create(&item).await?;
        tracing::info!(item_id = created.item_id, title = %created.title, "item added");
        Ok(created)
    }

    /// Update a catalog item, keeping current values for fields the caller
    /// leaves unset (librarian only)
    pub async fn update_item(
        &self,
        session: &Session,
        item_id: i64,
        update: UpdateItem,
    ) -> AppResult<CatalogItem> {
        session.require(Role::Librarian)?;
        let updated = self.repository.items.update(item_id, &update).await?;
        tracing::info!(item_id, "item updated");
        Ok(updated)
    }

    /// Remove a catalog item (librarian only).
    ///
    /// Deletion only happens when the caller passes an explicit confirm
    /// signal; returns whether the item was removed.
    pub async fn remove_item(
        &self,
        session: &Session,
        item_id: i64,
        confirm: bool,
    ) -> AppResult<bool> {
        session.require(Role::Librarian)?;
        if !confirm {
            tracing::debug!(item_id, "item removal cancelled");
            return Ok(false);
        }
        self.repository.items.delete(item_id).await?;
        tracing::info!(item_id, "item removed");
        Ok(true)
    }
}
