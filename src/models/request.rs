//! Borrow/reservation request model and derived views

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of action recorded against a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RequestType {
    Borrow,
    Reserve,
}

/// Request lifecycle status
///
/// A returned Borrow has no status of its own: returning deletes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RequestStatus {
    Borrowed,
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestStatus::Borrowed => "Borrowed",
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        };
        write!(f, "{}", s)
    }
}

/// Librarian decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            _ => Err(format!("Invalid decision: {}", s)),
        }
    }
}

/// Request record from the library store
///
/// The only durable record of the borrow/reservation lifecycle; loan state
/// is reconstructed by querying open Borrow rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub request_id: i64,
    pub account_id: i64,
    pub item_id: i64,
    pub request_type: RequestType,
    pub status: RequestStatus,
    /// Set only for Borrow requests
    pub due_date: Option<NaiveDate>,
}

/// Receipt returned by a successful borrow
#[derive(Debug, Clone, Copy)]
pub struct BorrowReceipt {
    pub request_id: i64,
    pub due_date: NaiveDate,
}

/// Open borrow joined with catalog fields, for the member profile
#[derive(Debug, Clone, FromRow)]
pub struct BorrowedItem {
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub due_date: NaiveDate,
}

/// Approved reservation joined with catalog fields
#[derive(Debug, Clone, FromRow)]
pub struct ReservedItem {
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
}

/// Member notification derived from the request log; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    DueToday { title: String },
    Overdue { title: String },
    ReservationApproved { title: String },
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::DueToday { title } => {
                write!(f, "Reminder: '{}' is due today.", title)
            }
            Notification::Overdue { title } => {
                write!(
                    f,
                    "Overdue: '{}' is overdue. Please return it as soon as possible.",
                    title
                )
            }
            Notification::ReservationApproved { title } => {
                write!(f, "Your reservation for '{}' has been approved.", title)
            }
        }
    }
}

/// One line of the overdue report: open Borrow past its due date, joined
/// against both stores
#[derive(Debug, Clone)]
pub struct OverdueEntry {
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub due_date: NaiveDate,
    /// None when the account was deleted after borrowing (no enforced
    /// referential integrity across the two stores)
    pub borrower: Option<String>,
}

impl std::fmt::Display for OverdueEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ISBN: {}, Title: {}, Author: {}, Due Date: {}, Borrower: {}",
            self.isbn,
            self.title,
            self.author.as_deref().unwrap_or("-"),
            self.due_date,
            self.borrower.as_deref().unwrap_or("[Account not found]")
        )
    }
}
