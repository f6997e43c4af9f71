//! Logout command - clear the stored session token.

use anyhow::Result;
use clap::Args;
use notes_sync::CredentialStore;

use crate::output;

#[derive(Args)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs) -> Result<()> {
    let store = CredentialStore::open_default()?;
    store.clear();
    output::success("Logged out of Logos");
    Ok(())
}
