//! Librarian menu: catalog management, request handling, overdue report

use super::{confirm, prompt, prompt_optional, prompt_parse, report};
use crate::{
    models::{
        account::describe,
        item::{CreateItem, UpdateItem},
        request::Decision,
    },
    services::Session,
    AppState,
};

pub(crate) async fn menu(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!(
            "\n-  Librarian Menu    -\n\n1. View Profile\n2. Add a Book\n3. Update a Book\n\
             4. Remove a Book\n5. Handle Borrowing/Reservation Requests\n\
             6. Generate Overdue Books Report\n7. Logout"
        );
        match prompt("Enter choice: ")?.as_str() {
            "1" => println!("\n{}", describe(&session.account)),
            "2" => add_book(state, session).await?,
            "3" => update_book(state, session).await?,
            "4" => remove_book(state, session).await?,
            "5" => handle_requests(state, session).await?,
            "6" => overdue_report(state, session).await?,
            "7" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

async fn add_book(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Add a Book -");
    let item_id = match prompt_parse::<i64>("Enter the item ID (or '0' to go back): ")? {
        Some(id) => id,
        None => return Ok(()),
    };

    let item = CreateItem {
        item_id,
        isbn: prompt("Enter the ISBN: ")?,
        title: prompt("Enter the title: ")?,
        author: prompt_optional("Enter the author: ")?,
        publisher: prompt_optional("Enter the publisher: ")?,
        publication_date: prompt_optional("Enter the publication date (YYYY-MM-DD): ")?,
        edition: prompt_optional("Enter the edition: ")?,
        language: prompt_optional("Enter the language: ")?,
        genre: prompt_optional("Enter the genre: ")?,
    };

    if report(state.services.catalog.add_item(session, item).await)?.is_some() {
        println!("Book added successfully!");
    }
    Ok(())
}

async fn update_book(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Update a Book -");
    let isbn = prompt("Enter the ISBN of the book to update: ")?;
    let item = match state.services.catalog.get_by_isbn(&isbn).await? {
        Some(item) => item,
        None => {
            println!("Book with this ISBN does not exist.");
            return Ok(());
        }
    };

    println!("\nCurrent Book Details:\n{}", item.details());

    // Blank answers keep the current value
    let update = UpdateItem {
        title: prompt_optional("\nEnter new title (leave blank to keep current): ")?,
        author: prompt_optional("Enter new author (leave blank to keep current): ")?,
        publisher: prompt_optional("Enter new publisher (leave blank to keep current): ")?,
        publication_date: prompt_optional(
            "Enter new publication date (leave blank to keep current): ",
        )?,
        edition: prompt_optional("Enter new edition (leave blank to keep current): ")?,
        language: prompt_optional("Enter new language (leave blank to keep current): ")?,
        genre: prompt_optional("Enter new genre (leave blank to keep current): ")?,
    };

    if report(
        state
            .services
            .catalog
            .update_item(session, item.item_id, update)
            .await,
    )?
    .is_some()
    {
        println!("Book updated successfully!");
    }
    Ok(())
}

async fn remove_book(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Remove a Book -");
    let isbn = prompt("Enter the ISBN of the book to remove: ")?;
    let item = match state.services.catalog.get_by_isbn(&isbn).await? {
        Some(item) => item,
        None => {
            println!("Book with this ISBN does not exist.");
            return Ok(());
        }
    };

    let confirmed = confirm(&format!(
        "Are you sure you want to remove '{}' by {}? (yes/1 to confirm): ",
        item.title,
        item.author.as_deref().unwrap_or("-")
    ))?;

    match report(
        state
            .services
            .catalog
            .remove_item(session, item.item_id, confirmed)
            .await,
    )? {
        Some(true) => println!("Book removed successfully!"),
        Some(false) => println!("Book removal cancelled."),
        None => {}
    }
    Ok(())
}

async fn handle_requests(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Handle Borrowing and Reservation Requests -");
    let pending = match report(state.services.lifecycle.pending_requests(session).await)? {
        Some(pending) => pending,
        None => return Ok(()),
    };

    if pending.is_empty() {
        println!("No pending requests.");
        return Ok(());
    }

    println!("\nPending Requests:");
    for request in &pending {
        println!(
            "Request ID: {}, Account ID: {}, Item ID: {}, Type: {:?}",
            request.request_id, request.account_id, request.item_id, request.request_type
        );
    }

    let request_id = match prompt_parse::<i64>("Enter the request ID to handle (or '0' to go back): ")? {
        Some(id) => id,
        None => return Ok(()),
    };

    let decision = match prompt("Approve or reject this request? (approve/reject): ")?
        .parse::<Decision>()
    {
        Ok(decision) => decision,
        Err(_) => {
            println!("Invalid action. Please enter 'approve' or 'reject'.");
            return Ok(());
        }
    };

    if let Some(request) = report(
        state
            .services
            .lifecycle
            .handle_request(session, request_id, decision)
            .await,
    )? {
        println!(
            "Request {} for account {} is now {}.",
            request.request_id, request.account_id, request.status
        );
    }
    Ok(())
}

async fn overdue_report(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Generate Overdue Books Report -");
    let today = chrono::Utc::now().date_naive();
    let entries = match report(state.services.lifecycle.overdue_report(session, today).await)? {
        Some(entries) => entries,
        None => return Ok(()),
    };

    if entries.is_empty() {
        println!("No overdue books found.");
    } else {
        println!("\nOverdue Books Report:");
        for entry in &entries {
            println!("{}", entry);
        }
    }
    Ok(())
}
