//! Session commands: login, logout, whoami, register.

#![allow(clippy::print_stdout)]

use tracing::info;

use hopeflow_client::{HopeFlow, NewUser};
use hopeflow_core::Email;

/// Log in and persist the token for later invocations.
///
/// # Errors
///
/// Returns an error for bad credentials or any API failure.
pub async fn login(
    client: &HopeFlow,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = client.session().login(email, password).await?;
    info!(user = %user.id, "login succeeded");
    println!("Logged in as {} ({})", user.full_name, user.email);
    Ok(())
}

/// Clear the session and the persisted token.
///
/// # Errors
///
/// Returns an error if the persisted token file cannot be removed.
pub fn logout(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    client.session().logout()?;
    println!("Logged out");
    Ok(())
}

/// Show the currently logged-in user, restoring the session from the
/// persisted token if needed.
///
/// # Errors
///
/// Returns an error on token-store I/O failure.
pub async fn whoami(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    match client.session().restore().await? {
        Some(user) => println!("{} ({}) [user {}]", user.full_name, user.email, user.id),
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Create a new account.
///
/// # Errors
///
/// Returns an error for an invalid email, an already-registered email, or
/// any API failure.
pub async fn register(
    client: &HopeFlow,
    email: &str,
    password: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let user = client
        .session()
        .register(&NewUser {
            email,
            password: password.to_string(),
            full_name: name.to_string(),
        })
        .await?;
    println!("Created account {} [user {}]", user.email, user.id);
    println!("Run `hope-cli auth login` to sign in.");
    Ok(())
}
