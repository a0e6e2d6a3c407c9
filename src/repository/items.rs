//! Catalog items repository for the library store

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::item::{CatalogItem, CreateItem, UpdateItem},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Sqlite>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, item_id: i64) -> AppResult<CatalogItem> {
        sqlx::query_as::<_, CatalogItem>("SELECT * FROM items WHERE item_id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))
    }

    /// Get item by ISBN, if present in the catalog
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<CatalogItem>> {
        let item = sqlx::query_as::<_, CatalogItem>("SELECT * FROM items WHERE isbn = ?")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Search items by title or author substring
    pub async fn search(&self, term: &str) -> AppResult<Vec<CatalogItem>> {
        let pattern = format!("%{}%", term);
        let items = sqlx::query_as::<_, CatalogItem>(
            "SELECT * FROM items WHERE title LIKE ? OR author LIKE ? ORDER BY item_id",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Create a new catalog item, available by default
    pub async fn create(&self, item: &CreateItem) -> AppResult<CatalogItem> {
        sqlx::query(
            r#"
            INSERT INTO items
                (item_id, isbn, title, author, publisher, publication_date,
                 edition, language, genre, available)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(item.item_id)
        .bind(&item.isbn)
        .bind(&item.title)
        .bind(&item.author)
        .bind(&item.publisher)
        .bind(&item.publication_date)
        .bind(&item.edition)
        .bind(&item.language)
        .bind(&item.genre)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                AppError::Validation(format!("Item with id {} already exists", item.item_id))
            }
            other => other.into(),
        })?;

        self.get_by_id(item.item_id).await
    }

    /// Update an item, keeping current values for unspecified fields
    ///
    /// The availability flag is owned by the Lifecycle Engine and is never
    /// touched here.
    pub async fn update(&self, item_id: i64, update: &UpdateItem) -> AppResult<CatalogItem> {
        let current = self.get_by_id(item_id).await?;

        let title = update.title.clone().unwrap_or(current.title);
        let author = update.author.clone().or(current.author);
        let publisher = update.publisher.clone().or(current.publisher);
        let publication_date = update.publication_date.clone().or(current.publication_date);
        let edition = update.edition.clone().or(current.edition);
        let language = update.language.clone().or(current.language);
        let genre = update.genre.clone().or(current.genre);

        sqlx::query(
            r#"
            UPDATE items
            SET title = ?, author = ?, publisher = ?, publication_date = ?,
                edition = ?, language = ?, genre = ?
            WHERE item_id = ?
            "#,
        )
        .bind(&title)
        .bind(&author)
        .bind(&publisher)
        .bind(&publication_date)
        .bind(&edition)
        .bind(&language)
        .bind(&genre)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(item_id).await
    }

    /// Delete an item
    pub async fn delete(&self, item_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", item_id)));
        }
        Ok(())
    }
}
