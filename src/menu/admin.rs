//! Admin menu: account management and library rules

use super::{confirm, prompt, prompt_optional, prompt_parse, report};
use crate::{
    models::{
        account::{describe, CreateAccount, UpdateAccount},
        rules::UpdateRules,
        Role,
    },
    services::Session,
    AppState,
};

pub(crate) async fn menu(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!(
            "\n-  Admin Menu    -\n\n1. View Profile\n2. Manage Accounts\n3. Set Library Rules\n4. Logout"
        );
        match prompt("Enter choice: ")?.as_str() {
            "1" => println!("\n{}", describe(&session.account)),
            "2" => manage_accounts(state, session).await?,
            "3" => set_rules(state, session).await?,
            "4" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

async fn manage_accounts(state: &AppState, session: &Session) -> anyhow::Result<()> {
    loop {
        println!(
            "\n- Manage Accounts -\n\n1. View All Accounts\n2. Add an Account\n\
             3. Update an Account\n4. Delete an Account\n5. Back to Admin Menu"
        );
        match prompt("Enter choice: ")?.as_str() {
            "1" => list_accounts(state, session).await?,
            "2" => add_account(state, session).await?,
            "3" => update_account(state, session).await?,
            "4" => delete_account(state, session).await?,
            "5" => return Ok(()),
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

async fn list_accounts(state: &AppState, session: &Session) -> anyhow::Result<()> {
    let accounts = match report(state.services.accounts.list_accounts(session).await)? {
        Some(accounts) => accounts,
        None => return Ok(()),
    };
    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }
    println!("\nAll Accounts:");
    for account in &accounts {
        println!(
            "Account ID: {}, Name: {}, Email: {}, Role: {}",
            account.id, account.full_name, account.email, account.role
        );
    }
    Ok(())
}

async fn add_account(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Add an Account -");
    let role = match prompt("Enter role (Member/Librarian/Admin): ")?.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    let account = CreateAccount {
        full_name: prompt("Enter full name: ")?,
        date_of_birth: prompt("Enter date of birth (YYYY-MM-DD): ")?,
        phone: prompt("Enter phone number: ")?,
        email: prompt("Enter email address: ")?,
        password: prompt("Enter password: ")?,
        role,
    };

    if report(state.services.accounts.add_account(session, account).await)?.is_some() {
        println!("Account added successfully!");
    }
    Ok(())
}

async fn update_account(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Update an Account -");
    let id = match prompt_parse::<i64>("Enter the account ID to update (or '0' to go back): ")? {
        Some(id) => id,
        None => return Ok(()),
    };

    let current = match report(state.services.accounts.get_account(session, id).await)? {
        Some(account) => account,
        None => return Ok(()),
    };
    println!(
        "\nCurrent Account Details:\nAccount ID: {}, Name: {}, Email: {}, Role: {}",
        current.id, current.full_name, current.email, current.role
    );

    // Blank answers keep the current value
    let role = match prompt_optional("Enter new role (leave blank to keep current): ")? {
        Some(text) => match text.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                println!("{}", e);
                return Ok(());
            }
        },
        None => None,
    };

    let update = UpdateAccount {
        full_name: prompt_optional("Enter new full name (leave blank to keep current): ")?,
        date_of_birth: prompt_optional("Enter new date of birth (leave blank to keep current): ")?,
        phone: prompt_optional("Enter new phone number (leave blank to keep current): ")?,
        email: prompt_optional("Enter new email address (leave blank to keep current): ")?,
        password: prompt_optional("Enter new password (leave blank to keep current): ")?,
        role,
    };

    if report(
        state
            .services
            .accounts
            .update_account(session, id, update)
            .await,
    )?
    .is_some()
    {
        println!("Account updated successfully!");
    }
    Ok(())
}

async fn delete_account(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Delete an Account -");
    let id = match prompt_parse::<i64>("Enter the account ID to delete (or '0' to go back): ")? {
        Some(id) => id,
        None => return Ok(()),
    };

    let account = match report(state.services.accounts.get_account(session, id).await)? {
        Some(account) => account,
        None => return Ok(()),
    };

    let confirmed = confirm(&format!(
        "Are you sure you want to delete '{}'? (yes/1 to confirm): ",
        account.full_name
    ))?;

    match report(
        state
            .services
            .accounts
            .delete_account(session, id, confirmed)
            .await,
    )? {
        Some(true) => println!("Account deleted successfully!"),
        Some(false) => println!("Account deletion cancelled."),
        None => {}
    }
    Ok(())
}

async fn set_rules(state: &AppState, session: &Session) -> anyhow::Result<()> {
    println!("\n- Set Library Rules -");
    let current = state.services.lifecycle.rules().await?;
    println!("Current Borrowing Limit: {} books", current.borrow_limit);
    println!("Current Loan Period: {} days", current.loan_period_days);
    println!("Current Late Penalty: {} per day", current.late_penalty_per_day);

    let update = UpdateRules {
        borrow_limit: parse_optional(prompt_optional(
            "Enter new borrowing limit (leave blank to keep current): ",
        )?)?,
        loan_period_days: parse_optional(prompt_optional(
            "Enter new loan period in days (leave blank to keep current): ",
        )?)?,
        late_penalty_per_day: parse_optional(prompt_optional(
            "Enter new late penalty per day (leave blank to keep current): ",
        )?)?,
    };

    if let Some(rules) = report(state.services.lifecycle.set_rules(session, update).await)? {
        println!("\nLibrary rules updated successfully!");
        println!("New Borrowing Limit: {} books", rules.borrow_limit);
        println!("New Loan Period: {} days", rules.loan_period_days);
        println!("New Late Penalty: {} per day", rules.late_penalty_per_day);
    }
    Ok(())
}

fn parse_optional<T: std::str::FromStr>(input: Option<String>) -> anyhow::Result<Option<T>> {
    match input {
        None => Ok(None),
        Some(text) => match text.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                println!("Invalid value '{}', keeping current.", text);
                Ok(None)
            }
        },
    }
}
