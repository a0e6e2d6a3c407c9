//! Lifecycle engine integration tests: borrow/return/reserve/decide
//! transitions and the views derived from the request log

mod common;

use chrono::NaiveDate;
use shelfmark::{
    error::AppError,
    models::{
        request::{Decision, Notification},
        Role,
    },
};

use common::{add_item, setup, signup};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn availability_tracks_open_borrows() {
    let (services, repository) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let member = signup(&services, "member@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    assert!(services.catalog.get_item(item_id).await.unwrap().available);
    assert!(!repository.requests.has_open_borrow(item_id).await.unwrap());

    let receipt = services
        .lifecycle
        .borrow_item(&member, item_id, day(2026, 1, 10))
        .await
        .unwrap();
    assert_eq!(receipt.due_date, day(2026, 1, 24));
    assert!(!services.catalog.get_item(item_id).await.unwrap().available);
    assert!(repository.requests.has_open_borrow(item_id).await.unwrap());

    services.lifecycle.return_item(&member, item_id).await.unwrap();
    assert!(services.catalog.get_item(item_id).await.unwrap().available);
    assert!(!repository.requests.has_open_borrow(item_id).await.unwrap());
}

#[tokio::test]
async fn borrowing_twice_fails_until_returned() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    let today = day(2026, 1, 10);
    services.lifecycle.borrow_item(&alice, item_id, today).await.unwrap();

    let err = services
        .lifecycle
        .borrow_item(&bob, item_id, today)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    services.lifecycle.return_item(&alice, item_id).await.unwrap();
    services.lifecycle.borrow_item(&bob, item_id, today).await.unwrap();
}

#[tokio::test]
async fn borrow_of_unknown_item_fails() {
    let (services, _) = setup().await;
    let member = signup(&services, "member@example.org", Role::Member).await;

    let err = services
        .lifecycle
        .borrow_item(&member, 999, day(2026, 1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn sixth_borrow_hits_the_limit_and_leaves_no_partial_state() {
    let (services, repository) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let member = signup(&services, "member@example.org", Role::Member).await;

    let today = day(2026, 1, 10);
    for i in 1..=6 {
        add_item(&services, &librarian, i, &format!("isbn-{}", i), &format!("Book {}", i)).await;
    }
    for i in 1..=5 {
        services.lifecycle.borrow_item(&member, i, today).await.unwrap();
    }

    let err = services
        .lifecycle
        .borrow_item(&member, 6, today)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LimitExceeded { held: 5, limit: 5 }));

    // The failed borrow left no request row and did not flip availability
    let open: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
        .fetch_one(&repository.library_pool)
        .await
        .unwrap();
    assert_eq!(open, 5);
    assert!(services.catalog.get_item(6).await.unwrap().available);
}

#[tokio::test]
async fn reserving_an_available_item_is_rejected() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let member = signup(&services, "member@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    let err = services
        .lifecycle
        .reserve_item(&member, item_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyAvailable(_)));
}

#[tokio::test]
async fn returning_an_item_not_borrowed_by_the_account_fails() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    services
        .lifecycle
        .borrow_item(&alice, item_id, day(2026, 1, 10))
        .await
        .unwrap();

    let err = services.lifecycle.return_item(&bob, item_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotBorrowedByAccount { .. }));
}

#[tokio::test]
async fn a_request_can_only_be_decided_once() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    services
        .lifecycle
        .borrow_item(&alice, item_id, day(2026, 1, 10))
        .await
        .unwrap();
    let request_id = services.lifecycle.reserve_item(&bob, item_id).await.unwrap();

    services
        .lifecycle
        .handle_request(&librarian, request_id, Decision::Approve)
        .await
        .unwrap();

    let err = services
        .lifecycle
        .handle_request(&librarian, request_id, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // Unknown request IDs are reported as missing, not invalid
    let err = services
        .lifecycle
        .handle_request(&librarian, 999, Decision::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn lifecycle_scenario_with_notifications() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "978-0-00-000001-0", "Dune").await;

    let today = day(2026, 1, 10);

    // Alice borrows; due in 14 days; item becomes unavailable
    let receipt = services
        .lifecycle
        .borrow_item(&alice, item_id, today)
        .await
        .unwrap();
    assert_eq!(receipt.due_date, day(2026, 1, 24));
    assert!(!services.catalog.get_item(item_id).await.unwrap().available);

    // Bob cannot borrow but can reserve
    assert!(matches!(
        services.lifecycle.borrow_item(&bob, item_id, today).await,
        Err(AppError::Unavailable(_))
    ));
    let request_id = services.lifecycle.reserve_item(&bob, item_id).await.unwrap();

    // No notifications for Alice before the due date
    let notifications = services
        .lifecycle
        .notifications(alice.account_id(), today)
        .await
        .unwrap();
    assert!(notifications.is_empty());

    // Due today on the due date, overdue after it
    let notifications = services
        .lifecycle
        .notifications(alice.account_id(), receipt.due_date)
        .await
        .unwrap();
    assert_eq!(
        notifications,
        vec![Notification::DueToday { title: "Dune".to_string() }]
    );
    let notifications = services
        .lifecycle
        .notifications(alice.account_id(), day(2026, 1, 25))
        .await
        .unwrap();
    assert_eq!(
        notifications,
        vec![Notification::Overdue { title: "Dune".to_string() }]
    );

    // Approval notifies Bob without touching availability
    services
        .lifecycle
        .handle_request(&librarian, request_id, Decision::Approve)
        .await
        .unwrap();
    assert!(!services.catalog.get_item(item_id).await.unwrap().available);
    let notifications = services
        .lifecycle
        .notifications(bob.account_id(), today)
        .await
        .unwrap();
    assert_eq!(
        notifications,
        vec![Notification::ReservationApproved { title: "Dune".to_string() }]
    );

    // Returning frees the item and clears Alice's overdue state
    services.lifecycle.return_item(&alice, item_id).await.unwrap();
    assert!(services.catalog.get_item(item_id).await.unwrap().available);
    let notifications = services
        .lifecycle
        .notifications(alice.account_id(), day(2026, 1, 25))
        .await
        .unwrap();
    assert!(notifications.is_empty());
}

#[tokio::test]
async fn overdue_report_joins_borrower_names_across_stores() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let admin = signup(&services, "admin@example.org", Role::Admin).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    add_item(&services, &librarian, 1, "isbn-1", "Dune").await;
    add_item(&services, &librarian, 2, "isbn-2", "Emma").await;
    add_item(&services, &librarian, 3, "isbn-3", "Ulysses").await;

    let today = day(2026, 1, 10);
    services.lifecycle.borrow_item(&alice, 1, today).await.unwrap();
    services.lifecycle.borrow_item(&bob, 2, today).await.unwrap();
    // Borrowed later, not yet overdue at the report date
    services
        .lifecycle
        .borrow_item(&alice, 3, day(2026, 1, 20))
        .await
        .unwrap();

    let report = services
        .lifecycle
        .overdue_report(&librarian, day(2026, 1, 25))
        .await
        .unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].title, "Dune");
    assert_eq!(report[0].borrower.as_deref(), Some("Test Person"));
    assert_eq!(report[1].title, "Emma");

    // Nothing overdue on the due date itself (strictly-before comparison)
    let report = services
        .lifecycle
        .overdue_report(&librarian, day(2026, 1, 24))
        .await
        .unwrap();
    assert!(report.is_empty());

    // Deleting the borrower leaves the entry without a name; the two stores
    // have no enforced referential integrity
    services
        .accounts
        .delete_account(&admin, bob.account_id(), true)
        .await
        .unwrap();
    let report = services
        .lifecycle
        .overdue_report(&librarian, day(2026, 1, 25))
        .await
        .unwrap();
    assert_eq!(report[1].borrower, None);

    // The report is librarian-gated
    assert!(matches!(
        services.lifecycle.overdue_report(&alice, today).await,
        Err(AppError::Authorization(_))
    ));
}

#[tokio::test]
async fn rules_row_drives_the_borrow_limit() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let admin = signup(&services, "admin@example.org", Role::Admin).await;
    let member = signup(&services, "member@example.org", Role::Member).await;
    add_item(&services, &librarian, 1, "isbn-1", "Dune").await;
    add_item(&services, &librarian, 2, "isbn-2", "Emma").await;

    services
        .lifecycle
        .set_rules(
            &admin,
            shelfmark::models::rules::UpdateRules {
                borrow_limit: Some(1),
                loan_period_days: Some(7),
                late_penalty_per_day: None,
            },
        )
        .await
        .unwrap();

    let today = day(2026, 1, 10);
    let receipt = services.lifecycle.borrow_item(&member, 1, today).await.unwrap();
    assert_eq!(receipt.due_date, day(2026, 1, 17));

    let err = services.lifecycle.borrow_item(&member, 2, today).await.unwrap_err();
    assert!(matches!(err, AppError::LimitExceeded { held: 1, limit: 1 }));

    // Members cannot change the rules
    assert!(matches!(
        services
            .lifecycle
            .set_rules(&member, Default::default())
            .await,
        Err(AppError::Authorization(_))
    ));
}

#[tokio::test]
async fn pending_requests_are_listed_for_librarians_only() {
    let (services, _) = setup().await;
    let librarian = signup(&services, "lib@example.org", Role::Librarian).await;
    let alice = signup(&services, "alice@example.org", Role::Member).await;
    let bob = signup(&services, "bob@example.org", Role::Member).await;
    let item_id = add_item(&services, &librarian, 1, "isbn-1", "Dune").await;

    services
        .lifecycle
        .borrow_item(&alice, item_id, day(2026, 1, 10))
        .await
        .unwrap();
    let request_id = services.lifecycle.reserve_item(&bob, item_id).await.unwrap();

    let pending = services.lifecycle.pending_requests(&librarian).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request_id, request_id);
    assert_eq!(pending[0].account_id, bob.account_id());

    assert!(matches!(
        services.lifecycle.pending_requests(&bob).await,
        Err(AppError::Authorization(_))
    ));

    // Rejection also consumes the pending state
    services
        .lifecycle
        .handle_request(&librarian, request_id, Decision::Reject)
        .await
        .unwrap();
    assert!(services
        .lifecycle
        .pending_requests(&librarian)
        .await
        .unwrap()
        .is_empty());
}
