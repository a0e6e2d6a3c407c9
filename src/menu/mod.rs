//! Terminal role menus
//!
//! Thin dispatch shells over the services: every prompt loop collects input,
//! calls one service operation, and prints the outcome. Recoverable errors
//! are reported and the loop re-prompts; store failures propagate out and
//! end the session.

mod admin;
mod librarian;
mod member;

use std::io::{self, Write};
use std::str::FromStr;

use crate::{
    error::AppResult,
    models::{account::CreateAccount, Role},
    services::Session,
    AppState,
};

/// Run the top-level signup/login/exit menu until the user exits.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    println!("\n-  Library Management System   -");
    loop {
        println!("\n1. Signup\n2. Login\n3. Exit");
        let choice = prompt("Enter choice: ")?;
        match choice.as_str() {
            "1" => signup(&state).await?,
            "2" => login(&state).await?,
            "3" => {
                println!("Exiting system...");
                return Ok(());
            }
            _ => println!("Invalid input. Please enter a valid choice."),
        }
    }
}

async fn signup(state: &AppState) -> anyhow::Result<()> {
    println!("\n-    Signup Menu    -");
    println!("1. Member\n2. Librarian\n3. Admin\n4. Back");
    let role = match prompt("Enter account type: ")?.as_str() {
        "1" => Role::Member,
        "2" => Role::Librarian,
        "3" => Role::Admin,
        "4" => return Ok(()),
        _ => {
            println!("Invalid choice. Please enter a valid option.");
            return Ok(());
        }
    };

    let role_key = match role {
        Role::Member => None,
        Role::Librarian => Some(prompt("Enter librarian key: ")?),
        Role::Admin => Some(prompt("Enter admin key: ")?),
    };

    let account = CreateAccount {
        full_name: prompt("Enter full name: ")?,
        date_of_birth: prompt("Enter date of birth (YYYY-MM-DD): ")?,
        phone: prompt("Enter phone number: ")?,
        email: prompt("Enter email address: ")?,
        password: prompt("Enter password: ")?,
        role,
    };

    if let Some(created) = report(
        state
            .services
            .accounts
            .signup(account, role_key.as_deref())
            .await,
    )? {
        println!(
            "Signup successful for {} ({}). You can now login.",
            created.full_name, created.role
        );
    }
    Ok(())
}

async fn login(state: &AppState) -> anyhow::Result<()> {
    let email = prompt("\nEnter your email address: ")?;
    let password = prompt("Enter your password: ")?;

    let account = match report(state.services.accounts.authenticate(&email, &password).await)? {
        Some(account) => account,
        None => return Ok(()),
    };

    let session = Session::new(account);

    // Members see their notifications right after login
    if session.account.role == Role::Member {
        print_notifications(state, &session).await?;
    }

    match session.account.role {
        Role::Member => member::menu(state, &session).await,
        Role::Librarian => librarian::menu(state, &session).await,
        Role::Admin => admin::menu(state, &session).await,
    }
}

pub(crate) async fn print_notifications(state: &AppState, session: &Session) -> anyhow::Result<()> {
    let today = chrono::Utc::now().date_naive();
    let notifications = state
        .services
        .lifecycle
        .notifications(session.account_id(), today)
        .await?;
    if !notifications.is_empty() {
        println!("\nNotifications:");
        for notification in &notifications {
            println!("- {}", notification);
        }
    }
    Ok(())
}

/// Print a label and read one trimmed line from stdin.
pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

/// Prompt where a blank answer means "keep current".
pub(crate) fn prompt_optional(label: &str) -> io::Result<Option<String>> {
    let line = prompt(label)?;
    Ok(if line.is_empty() { None } else { Some(line) })
}

/// Yes/no confirmation; accepts "yes" or "1".
pub(crate) fn confirm(label: &str) -> io::Result<bool> {
    let answer = prompt(label)?.to_lowercase();
    Ok(answer == "yes" || answer == "1")
}

/// Prompt until the input parses, or return `None` when the user types '0'.
pub(crate) fn prompt_parse<T: FromStr>(label: &str) -> io::Result<Option<T>> {
    loop {
        let line = prompt(label)?;
        if line == "0" {
            return Ok(None);
        }
        match line.parse() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("Invalid input. Please try again (or '0' to go back)."),
        }
    }
}

/// Report a recoverable error and continue, or propagate a fatal one.
pub(crate) fn report<T>(result: AppResult<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            println!("Error: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
