//! Request log repository for the library store
//!
//! Owns every borrow/return/reserve/decision state transition. Each mutation
//! runs inside a single transaction so that a failed precondition leaves no
//! partial state behind.

use chrono::{Duration, NaiveDate};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{BorrowReceipt, BorrowedItem, Decision, Request, ReservedItem},
        rules::LibraryRules,
        RequestStatus, RequestType,
    },
};

/// Open Borrow row joined with catalog fields, before the cross-store
/// borrower lookup
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OverdueBorrow {
    pub account_id: i64,
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub due_date: NaiveDate,
}

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Sqlite>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Borrow an item: flips availability and records an open Borrow request.
    ///
    /// Availability, the borrow limit, and the loan period are all read
    /// inside the same transaction that performs the writes.
    pub async fn borrow(
        &self,
        account_id: i64,
        item_id: i64,
        today: NaiveDate,
    ) -> AppResult<BorrowReceipt> {
        let mut tx = self.pool.begin().await?;

        let rules = sqlx::query_as::<_, LibraryRules>(
            "SELECT borrow_limit, loan_period_days, late_penalty_per_day FROM rules WHERE id = 1",
        )
        .fetch_one(&mut *tx)
        .await?;

        let item = sqlx::query_as::<_, crate::models::CatalogItem>(
            "SELECT * FROM items WHERE item_id = ?",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if !item.available {
            return Err(AppError::Unavailable(item.title));
        }

        let held = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM requests WHERE account_id = ? AND request_type = ? AND status = ?",
        )
        .bind(account_id)
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .fetch_one(&mut *tx)
        .await?;

        if held >= rules.borrow_limit {
            return Err(AppError::LimitExceeded {
                held,
                limit: rules.borrow_limit,
            });
        }

        let due_date = today + Duration::days(rules.loan_period_days);

        sqlx::query("UPDATE items SET available = 0 WHERE item_id = ?")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let request_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO requests (account_id, item_id, request_type, status, due_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING request_id
            "#,
        )
        .bind(account_id)
        .bind(item_id)
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BorrowReceipt {
            request_id,
            due_date,
        })
    }

    /// Return a borrowed item: frees it and deletes the open Borrow row.
    pub async fn return_item(&self, account_id: i64, item_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let request_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT request_id FROM requests
            WHERE account_id = ? AND item_id = ? AND request_type = ? AND status = ?
            "#,
        )
        .bind(account_id)
        .bind(item_id)
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotBorrowedByAccount { item_id })?;

        sqlx::query("UPDATE items SET available = 1 WHERE item_id = ?")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM requests WHERE request_id = ?")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Reserve an unavailable item: records a Pending Reserve request.
    pub async fn reserve(&self, account_id: i64, item_id: i64) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, crate::models::CatalogItem>(
            "SELECT * FROM items WHERE item_id = ?",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if item.available {
            return Err(AppError::AlreadyAvailable(item.title));
        }

        let request_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO requests (account_id, item_id, request_type, status, due_date)
            VALUES (?, ?, ?, ?, NULL)
            RETURNING request_id
            "#,
        )
        .bind(account_id)
        .bind(item_id)
        .bind(RequestType::Reserve)
        .bind(RequestStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(request_id)
    }

    /// Decide a pending request. Approval never touches item availability;
    /// the member still has to borrow the item separately.
    pub async fn decide(&self, request_id: i64, decision: Decision) -> AppResult<Request> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE request_id = ?",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", request_id)))?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "request {} is {}, only Pending requests can be decided",
                request_id, request.status
            )));
        }

        let status = match decision {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        };

        sqlx::query("UPDATE requests SET status = ? WHERE request_id = ?")
            .bind(status)
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Request { status, ..request })
    }

    /// All pending requests, oldest first
    pub async fn pending(&self) -> AppResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE status = ? ORDER BY request_id",
        )
        .bind(RequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Open Borrow requests of an account, joined with catalog fields
    pub async fn borrowed_items(&self, account_id: i64) -> AppResult<Vec<BorrowedItem>> {
        let items = sqlx::query_as::<_, BorrowedItem>(
            r#"
            SELECT i.isbn, i.title, i.author, r.due_date
            FROM requests r
            JOIN items i ON r.item_id = i.item_id
            WHERE r.account_id = ? AND r.request_type = ? AND r.status = ?
            ORDER BY r.request_id
            "#,
        )
        .bind(account_id)
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Approved Reserve requests of an account, joined with catalog fields
    pub async fn reserved_items(&self, account_id: i64) -> AppResult<Vec<ReservedItem>> {
        let items = sqlx::query_as::<_, ReservedItem>(
            r#"
            SELECT i.isbn, i.title, i.author
            FROM requests r
            JOIN items i ON r.item_id = i.item_id
            WHERE r.account_id = ? AND r.request_type = ? AND r.status = ?
            ORDER BY r.request_id
            "#,
        )
        .bind(account_id)
        .bind(RequestType::Reserve)
        .bind(RequestStatus::Approved)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Open Borrows with a due date strictly before `as_of`, insertion order
    pub async fn overdue_borrows(&self, as_of: NaiveDate) -> AppResult<Vec<OverdueBorrow>> {
        let rows = sqlx::query_as::<_, OverdueBorrow>(
            r#"
            SELECT r.account_id, i.isbn, i.title, i.author, r.due_date
            FROM requests r
            JOIN items i ON r.item_id = i.item_id
            WHERE r.request_type = ? AND r.status = ? AND r.due_date < ?
            ORDER BY r.request_id
            "#,
        )
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Whether any open Borrow request exists for the item
    pub async fn has_open_borrow(&self, item_id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM requests WHERE item_id = ? AND request_type = ? AND status = ?)",
        )
        .bind(item_id)
        .bind(RequestType::Borrow)
        .bind(RequestStatus::Borrowed)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
