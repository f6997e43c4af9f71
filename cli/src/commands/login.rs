//! Login command - capture a Logos session token.
//!
//! Logos authenticates its web app through a server-side OAuth component
//! that cannot be replicated here, so login captures the browser session
//! cookie instead: the user copies the `auth` cookie value and this command
//! probes the notes endpoint with it before storing it.

use anyhow::Result;
use clap::Args;
use dialoguer::Password;
use notes_sync::{CredentialStore, LogosClient, SessionCredential, TokenCheck};
use std::sync::Arc;

use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    /// Session token; prompted for interactively when omitted
    #[arg(long)]
    pub token: Option<String>,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    output::header("Login to Logos");
    println!();
    println!("Extract the \"auth\" cookie from the Logos web app:");
    println!("  1. Open https://app.logos.com and sign in");
    println!("  2. DevTools -> Application -> Cookies -> app.logos.com");
    println!("  3. Copy the value of the cookie named \"auth\" (~312 characters)");
    println!();

    let token = match args.token {
        Some(token) => token,
        None => Password::new().with_prompt("Session token").interact()?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("a session token is required");
    }

    let store = Arc::new(CredentialStore::open_default()?);
    let client = LogosClient::new(store.clone())?;

    match client.check_token(&token).await? {
        TokenCheck::Valid => {
            store.put(&SessionCredential::new(token))?;
            output::success("Logged in to Logos");
        }
        TokenCheck::Rejected => {
            store.clear();
            anyhow::bail!("the token was rejected; copy a fresh one and try again");
        }
        TokenCheck::Indeterminate(status) => {
            // The probe failed for an unrelated reason; keep the token and
            // let a real sync decide.
            store.put(&SessionCredential::new(token))?;
            output::warn(&format!("validation probe returned HTTP {status}"));
            output::hint("token saved; verify it with `logos-sync sync`");
        }
    }

    Ok(())
}
