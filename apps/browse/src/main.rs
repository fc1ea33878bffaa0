use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    detail::not_found_message, CollectionPage, DetailOutcome, FocusHandle, Key, SiteClient,
};
use shared::domain::{EntityKind, Event, Partner};
use tracing_subscriber::EnvFilter;

mod render;

use render::{print_detail, print_grid, Listing, TerminalSurface};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Events listing, twelve per page.
    Events(ListArgs),
    /// Partners directory, six per page.
    Partners(ListArgs),
    /// One event by slug.
    Event { slug: String },
    /// One partner by slug or id.
    Partner { key: String },
    /// Known slugs for pre-rendered detail pages.
    Slugs { kind: EntityKind },
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    page: Option<usize>,
    /// Opens the detail overlay of the n-th card on the shown page.
    #[arg(long)]
    open: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let client = SiteClient::new(&cli.server_url)?;

    match cli.command {
        Command::Events(args) => browse::<Event>(&client, args).await,
        Command::Partners(args) => browse::<Partner>(&client, args).await,
        Command::Event { slug } => show::<Event>(&client, &slug).await,
        Command::Partner { key } => show::<Partner>(&client, &key).await,
        Command::Slugs { kind } => {
            for slug in client.static_slugs(kind).await {
                println!("{slug}");
            }
            Ok(())
        }
    }
}

async fn browse<R: Listing>(client: &SiteClient, args: ListArgs) -> Result<()> {
    let mut page = CollectionPage::<R>::mount(client, Arc::new(TerminalSurface)).await;

    if let Some(query) = args.search {
        page.type_query(query);
        page.settle_search().await;
    }
    if let Some(number) = args.page {
        if !page.go_to_page(number) {
            tracing::warn!(page = number, total = page.total_pages(), "page out of range");
        }
    }

    print_grid(&page.render());

    if let Some(position) = args.open {
        let trigger = FocusHandle::new(format!("card-{position}"));
        let opened = card_index(position)
            .is_some_and(|index| page.card_key(index, Key::Enter, trigger));
        if !opened {
            bail!("no card {position} on page {}", page.current_page());
        }
        if let Some(record) = page.modal().selected() {
            println!();
            print_detail(record);
        }
        page.handle_key(Key::Escape);
    }
    Ok(())
}

/// Cards are numbered from 1 on screen.
fn card_index(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

async fn show<R: Listing>(client: &SiteClient, key: &str) -> Result<()> {
    match client.fetch_detail::<R>(key).await {
        DetailOutcome::Found(record) => {
            print_detail(&record);
            Ok(())
        }
        DetailOutcome::NotFound => bail!(not_found_message(R::KIND)),
        DetailOutcome::Failed(message) => bail!(message),
    }
}
