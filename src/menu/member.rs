//! Member menu: profile, search, borrow, return, reserve

use super::{confirm, print_notifications, prompt, report};
use crate::{models::account::describe, services::Session, AppState};

pub(crate) async fn menu(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!(
            "\n-  Library Menu    -\n\n1. View Profile\n2. Search for Books\n3. Borrow a Book\n\
             4. Return a Book\n5. Reserve a Book\n6. Logout"
        );
        match prompt("Enter choice: ")?.as_str() {
            "1" => view_profile(state, session).await?,
            "2" => search(state).await?,
            "3" => borrow(state, session).await?,
            "4" => return_book(state, session).await?,
            "5" => reserve(state, session).await?,
            "6" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

async fn view_profile(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n{}", describe(&session.account));

    println!("Borrowed Books:");
    for book in state
        .services
        .lifecycle
        .borrowed_items(session.account_id())
        .await?
    {
        println!(
            "ISBN: {}, Title: {}, Author: {}, Due Date: {}",
            book.isbn,
            book.title,
            book.author.as_deref().unwrap_or("-"),
            book.due_date
        );
    }

    println!("\nReserved Books:");
    for book in state
        .services
        .lifecycle
        .reserved_items(session.account_id())
        .await?
    {
        println!(
            "ISBN: {}, Title: {}, Author: {}",
            book.isbn,
            book.title,
            book.author.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn search(state: &AppState) -> anyhow::Result<()> {
    loop {
        println!("\n-    Search Books    -\nEnter a title or author, or '0' to go back.");
        let term = prompt("Enter search term: ")?;
        if term == "0" {
            println!("Returning to menu...");
            return Ok(());
        }
        let results = state.services.catalog.search(&term).await?;
        if results.is_empty() {
            println!("No books found matching your search.");
        } else {
            println!("\nSearch results:");
            for item in &results {
                println!("{}", item.summary());
            }
        }
    }
}

async fn borrow(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!("\n-    Borrow a Book    -\nEnter the ISBN to borrow, or '0' to go back.");
        let isbn = prompt("Enter ISBN: ")?;
        if isbn == "0" {
            println!("Returning to the menu...");
            return Ok(());
        }

        let item = match state.services.catalog.get_by_isbn(&isbn).await? {
            Some(item) => item,
            None => {
                println!("Book with this ISBN does not exist.");
                continue;
            }
        };

        println!("\nBook Details:\n{}", item.details());
        if !confirm("\nBorrow this book? (yes/1 to confirm): ")? {
            println!("Borrowing cancelled.");
            continue;
        }

        let today = chrono::Utc::now().date_naive();
        if let Some(receipt) = report(
            state
                .services
                .lifecycle
                .borrow_item(session, item.item_id, today)
                .await,
        )? {
            println!(
                "Book with ISBN {} borrowed successfully. Due date: {}",
                isbn, receipt.due_date
            );
            print_notifications(state, session).await?;
        }
    }
}

async fn return_book(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!("\n-    Return a Book    -");
        let borrowed = state
            .services
            .lifecycle
            .borrowed_items(session.account_id())
            .await?;
        if borrowed.is_empty() {
            println!("You have no books currently borrowed.");
            return Ok(());
        }

        println!("Your currently borrowed books:");
        for book in &borrowed {
            println!(
                "ISBN: {}, Title: {}, Author: {}",
                book.isbn,
                book.title,
                book.author.as_deref().unwrap_or("-")
            );
        }

        let isbn = prompt("\nEnter the ISBN to return (or '0' to go back): ")?;
        if isbn == "0" {
            println!("Returning to the menu...");
            return Ok(());
        }

        let item = match state.services.catalog.get_by_isbn(&isbn).await? {
            Some(item) => item,
            None => {
                println!("You have not borrowed a book with this ISBN.");
                continue;
            }
        };

        if report(state.services.lifecycle.return_item(session, item.item_id).await)?.is_some() {
            println!("Book with ISBN {} returned successfully.", isbn);
        }
    }
}

async fn reserve(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!("\n- Reserve a Book -\nEnter the ISBN to reserve, or '0' to go back.");
        let isbn = prompt("Enter ISBN: ")?;
        if isbn == "0" {
            println!("Returning to the menu...");
            return Ok(());
        }

        let item = match state.services.catalog.get_by_isbn(&isbn).await? {
            Some(item) => item,
            None => {
                println!("Book with this ISBN does not exist.");
                continue;
            }
        };

        println!("\nBook Details:\n{}", item.details());
        if item.available {
            println!("This book is currently available. You can borrow it instead of reserving it.");
            continue;
        }

        if !confirm("\nReserve this book? (yes/1 to confirm): ")? {
            println!("Reservation cancelled.");
            continue;
        }

        if report(state.services.lifecycle.reserve_item(session, item.item_id).await)?.is_some() {
            println!("Reservation request submitted successfully. The librarian will review it.");
        }
    }
}
