use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use shared::domain::{EntityKind, Event, Partner, Slug};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/catalog.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inserts or replaces events from a JSON array file.
    SeedEvents { file: PathBuf },
    /// Inserts or replaces partners from a JSON array file.
    SeedPartners { file: PathBuf },
    ListSlugs { kind: EntityKind },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::SeedEvents { file } => {
            let events: Vec<Event> = read_records(&file)?;
            let count = seed_events(&storage, &events).await?;
            println!("seeded {count} events");
        }
        Command::SeedPartners { file } => {
            let partners: Vec<Partner> = read_records(&file)?;
            let count = seed_partners(&storage, &partners).await?;
            println!("seeded {count} partners");
        }
        Command::ListSlugs { kind } => {
            let slugs = match kind {
                EntityKind::Event => storage.list_event_slugs().await?,
                EntityKind::Partner => storage.list_partner_slugs().await?,
            };
            for slug in slugs {
                println!("{slug}");
            }
        }
    }

    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Slugs read from JSON are unchecked; the stored value is the parsed one.
fn checked_slug(slug: &Slug) -> Result<Slug> {
    Slug::parse(slug.as_str())
        .with_context(|| format!("refusing to seed record with slug '{slug}'"))
}

async fn seed_events(storage: &Storage, events: &[Event]) -> Result<usize> {
    let events = events
        .iter()
        .map(|event| -> Result<Event> {
            Ok(Event {
                slug: checked_slug(&event.slug)?,
                ..event.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    for event in &events {
        storage.upsert_event(event).await?;
    }
    info!(count = events.len(), "events seeded");
    Ok(events.len())
}

async fn seed_partners(storage: &Storage, partners: &[Partner]) -> Result<usize> {
    let partners = partners
        .iter()
        .map(|partner| -> Result<Partner> {
            Ok(Partner {
                slug: partner.slug.as_ref().map(checked_slug).transpose()?,
                ..partner.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    for partner in &partners {
        storage.upsert_partner(partner).await?;
    }
    info!(count = partners.len(), "partners seeded");
    Ok(partners.len())
}
