//! Request lifecycle engine
//!
//! Owns the borrow/return/reserve/decision transitions on catalog items and
//! the views derived from the request log (notifications, overdue report,
//! borrowed/reserved projections). The repository executes each transition
//! in a single transaction; this layer adds role gating and the cross-store
//! borrower lookup.

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        request::{
            BorrowReceipt, BorrowedItem, Decision, Notification, OverdueEntry, Request,
            ReservedItem,
        },
        rules::{LibraryRules, UpdateRules},
        Role,
    },
    repository::Repository,
    services::Session,
};

#[derive(Clone)]
pub struct LifecycleService {
    repository: Repository,
}

impl LifecycleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow an item for the session's account.
    ///
    /// Fails with `NotFound`, `Unavailable`, or `LimitExceeded`; on success
    /// the due date is `today` plus the configured loan period.
    pub async fn borrow_item(
        &self,
        session: &Session,
        item_id: i64,
        today: NaiveDate,
    ) -> AppResult<BorrowReceipt> {
        let receipt = self
            .repository
            .requests
            .borrow(session.account_id(), item_id, today)
            .await?;
        tracing::info!(
            account_id = session.account_id(),
            item_id,
            due_date = %receipt.due_date,
            "item borrowed"
        );
        Ok(receipt)
    }

    /// Return an item borrowed by the session's account.
    pub async fn return_item(&self, session: &Session, item_id: i64) -> AppResult<()> {
        self.repository
            .requests
            .return_item(session.account_id(), item_id)
            .await?;
        tracing::info!(account_id = session.account_id(), item_id, "item returned");
        Ok(())
    }

    /// Reserve an item that is currently unavailable.
    pub async fn reserve_item(&self, session: &Session, item_id: i64) -> AppResult<i64> {
        let request_id = self
            .repository
            .requests
            .reserve(session.account_id(), item_id)
            .await?;
        tracing::info!(
            account_id = session.account_id(),
            item_id,
            request_id,
            "reservation submitted"
        );
        Ok(request_id)
    }

    /// Approve or reject a pending request (librarian only).
    pub async fn handle_request(
        &self,
        session: &Session,
        request_id: i64,
        decision: Decision,
    ) -> AppResult<Request> {
        session.require(Role::Librarian)?;
        let request = self.repository.requests.decide(request_id, decision).await?;
        tracing::info!(request_id, status = %request.status, "request decided");
        Ok(request)
    }

    /// All pending requests awaiting a librarian decision.
    pub async fn pending_requests(&self, session: &Session) -> AppResult<Vec<Request>> {
        session.require(Role::Librarian)?;
        self.repository.requests.pending().await
    }

    /// Notifications for an account, derived fresh from the request log on
    /// every call: due-today and overdue reminders for each open Borrow, and
    /// one entry per approved reservation.
    pub async fn notifications(
        &self,
        account_id: i64,
        as_of: NaiveDate,
    ) -> AppResult<Vec<Notification>> {
        let mut notifications = Vec::new();

        for borrowed in self.repository.requests.borrowed_items(account_id).await? {
            if borrowed.due_date == as_of {
                notifications.push(Notification::DueToday {
                    title: borrowed.title,
                });
            } else if borrowed.due_date < as_of {
                notifications.push(Notification::Overdue {
                    title: borrowed.title,
                });
            }
        }

        for reserved in self.repository.requests.reserved_items(account_id).await? {
            notifications.push(Notification::ReservationApproved {
                title: reserved.title,
            });
        }

        Ok(notifications)
    }

    /// Overdue report as of the given date (librarian only).
    ///
    /// Joins open Borrows against the catalog in the library store, then
    /// resolves borrower names from the accounts store in application code;
    /// a deleted account leaves the entry with no borrower name.
    pub async fn overdue_report(
        &self,
        session: &Session,
        as_of: NaiveDate,
    ) -> AppResult<Vec<OverdueEntry>> {
        session.require(Role::Librarian)?;

        let mut entries = Vec::new();
        for row in self.repository.requests.overdue_borrows(as_of).await? {
            let borrower = self.repository.accounts.full_name(row.account_id).await?;
            entries.push(OverdueEntry {
                isbn: row.isbn,
                title: row.title,
                author: row.author,
                due_date: row.due_date,
                borrower,
            });
        }
        Ok(entries)
    }

    /// Open borrows of an account, for the member profile
    pub async fn borrowed_items(&self, account_id: i64) -> AppResult<Vec<BorrowedItem>> {
        self.repository.requests.borrowed_items(account_id).await
    }

    /// Approved reservations of an account, for the member profile
    pub async fn reserved_items(&self, account_id: i64) -> AppResult<Vec<ReservedItem>> {
        self.repository.requests.reserved_items(account_id).await
    }

    /// Current library rules
    pub async fn rules(&self) -> AppResult<LibraryRules> {
        self.repository.rules.get().await
    }

    /// Update library rules (admin only)
    pub async fn set_rules(&self, session: &Session, update: UpdateRules) -> AppResult<LibraryRules> {
        session.require(Role::Admin)?;
        let rules = self.repository.rules.update(update).await?;
        tracing::info!(
            borrow_limit = rules.borrow_limit,
            loan_period_days = rules.loan_period_days,
            "library rules updated"
        );
        Ok(rules)
    }
}
