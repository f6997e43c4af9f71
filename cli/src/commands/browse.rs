//! Browse command - read-only list over freshly fetched notes.

use anyhow::Result;
use clap::Args;
use colored::{ColoredString, Colorize};
use notes_core::{ProcessedNote, UNKNOWN_RESOURCE, build_resource_link};
use notes_sync::{CredentialStore, LogosClient, fetch_all_notes, process_notes};
use std::sync::Arc;

use crate::output;

#[derive(Args)]
pub struct BrowseArgs {
    /// Substring filter over note text, reference, and resource title
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only show notes anchored in this resource title
    #[arg(long)]
    pub resource: Option<String>,

    /// Maximum number of notes to display
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub async fn run(args: BrowseArgs) -> Result<()> {
    let store = Arc::new(CredentialStore::open_default()?);
    if store.get().is_none() {
        output::hint("run `logos-sync login` first");
        anyhow::bail!("not logged in");
    }

    let client = LogosClient::new(store)?;
    let raw = fetch_all_notes(&client, None).await?;
    let notes = process_notes(raw);

    let filtered: Vec<&ProcessedNote> = notes
        .iter()
        .filter(|note| matches_search(note, args.search.as_deref()))
        .filter(|note| {
            args.resource
                .as_deref()
                .is_none_or(|resource| note.resource_title == resource)
        })
        .collect();

    if filtered.is_empty() {
        println!("No notes found");
        if args.search.is_some() {
            output::hint("try a different search term");
        }
        return Ok(());
    }

    for note in filtered.iter().take(args.limit) {
        print_note(note);
    }

    println!();
    if filtered.len() > args.limit {
        println!(
            "showing {} of {} matching notes",
            args.limit,
            filtered.len()
        );
        output::hint("raise --limit to see more");
    } else {
        println!("{} matching notes", filtered.len());
    }

    Ok(())
}

fn matches_search(note: &ProcessedNote, search: Option<&str>) -> bool {
    let Some(search) = search else { return true };
    let needle = search.to_lowercase();

    note.text.to_lowercase().contains(&needle)
        || note.resource_title.to_lowercase().contains(&needle)
        || note
            .reference
            .as_ref()
            .is_some_and(|reference| reference.to_lowercase().contains(&needle))
}

fn print_note(note: &ProcessedNote) {
    let mut title: String = note.text.chars().take(100).collect();
    if note.text.chars().count() > 100 {
        title.push_str("...");
    }

    let mut line = format!("{} {}", color_dot(note.color.as_deref()), title);
    if let Some(reference) = &note.reference {
        line.push_str(&format!("  {}", reference.dimmed()));
    }
    println!("{line}");

    let resource: String = note.resource_title.chars().take(60).collect();
    if note.resource_id != UNKNOWN_RESOURCE {
        println!(
            "    {}  {}",
            resource.cyan(),
            build_resource_link(&note.resource_id, None).dimmed()
        );
    } else {
        println!("    {}", resource.cyan());
    }
}

fn color_dot(color: Option<&str>) -> ColoredString {
    match color.map(str::to_lowercase).as_deref() {
        Some("yellow") => "●".yellow(),
        Some("green") => "●".green(),
        Some("blue") => "●".blue(),
        Some("red") => "●".red(),
        Some("orange") => "●".truecolor(255, 165, 0),
        Some("purple") => "●".magenta(),
        _ => "●".dimmed(),
    }
}
