use anyhow::{anyhow, Context, Result};
use chrono::SecondsFormat;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::{parse_event_date, Event, Partner, PartnerId, Slug};

const EVENT_COLUMNS: &str =
    "slug, title, date, location, type, price, description, image, link";
const PARTNER_COLUMNS: &str =
    "id, slug, name, type, logo_url, website_url, description, contact_person, email, phone";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All events, ascending by date. Ties keep insertion order.
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list events")?;
        rows.iter().map(event_from_row).collect()
    }

    pub async fn event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load event '{slug}'"))?;
        row.as_ref().map(event_from_row).transpose()
    }

    pub async fn list_event_slugs(&self) -> Result<Vec<Slug>> {
        let slugs: Vec<String> = sqlx::query_scalar("SELECT slug FROM events ORDER BY date ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list event slugs")?;
        Ok(slugs.into_iter().map(Slug::from_store).collect())
    }

    /// Inserts or replaces the event keyed by its slug.
    pub async fn upsert_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (slug, title, date, location, type, price, description, image, link)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(slug) DO UPDATE SET
                title = excluded.title,
                date = excluded.date,
                location = excluded.location,
                type = excluded.type,
                price = excluded.price,
                description = excluded.description,
                image = excluded.image,
                link = excluded.link
            "#,
        )
        .bind(event.slug.as_str())
        .bind(&event.title)
        .bind(event.date.to_rfc3339_opts(SecondsFormat::Secs, true))
        .bind(&event.location)
        .bind(&event.category)
        .bind(&event.price)
        .bind(&event.description)
        .bind(event.image.as_deref())
        .bind(event.link.as_deref())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to store event '{}'", event.slug))?;
        debug!(slug = %event.slug, "stored event");
        Ok(())
    }

    /// All partners in store order.
    pub async fn list_partners(&self) -> Result<Vec<Partner>> {
        let rows = sqlx::query(&format!("SELECT {PARTNER_COLUMNS} FROM partners ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .context("failed to list partners")?;
        Ok(rows.iter().map(partner_from_row).collect())
    }

    pub async fn partner_by_slug(&self, slug: &str) -> Result<Option<Partner>> {
        let row = sqlx::query(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partners WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load partner '{slug}'"))?;
        Ok(row.as_ref().map(partner_from_row))
    }

    pub async fn partner_by_id(&self, id: PartnerId) -> Result<Option<Partner>> {
        let row = sqlx::query(&format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load partner {}", id.0))?;
        Ok(row.as_ref().map(partner_from_row))
    }

    /// Slugs of partners that have one; partners without a slug are only
    /// reachable by id.
    pub async fn list_partner_slugs(&self) -> Result<Vec<Slug>> {
        let slugs: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM partners WHERE slug IS NOT NULL AND slug != '' ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list partner slugs")?;
        Ok(slugs.into_iter().map(Slug::from_store).collect())
    }

    pub async fn upsert_partner(&self, partner: &Partner) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO partners (
                id, slug, name, type, logo_url, website_url,
                description, contact_person, email, phone
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                slug = excluded.slug,
                name = excluded.name,
                type = excluded.type,
                logo_url = excluded.logo_url,
                website_url = excluded.website_url,
                description = excluded.description,
                contact_person = excluded.contact_person,
                email = excluded.email,
                phone = excluded.phone
            "#,
        )
        .bind(partner.id.0)
        .bind(partner.slug.as_ref().map(Slug::as_str))
        .bind(&partner.name)
        .bind(&partner.category)
        .bind(&partner.logo_url)
        .bind(partner.website_url.as_deref())
        .bind(partner.description.as_deref())
        .bind(partner.contact_person.as_deref())
        .bind(partner.email.as_deref())
        .bind(partner.phone.as_deref())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to store partner {}", partner.id.0))?;
        debug!(partner_id = partner.id.0, "stored partner");
        Ok(())
    }
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    let slug: String = row.get("slug");
    let raw_date: String = row.get("date");
    let date = parse_event_date(&raw_date)
        .ok_or_else(|| anyhow!("event '{slug}' has an unreadable date '{raw_date}'"))?;
    Ok(Event {
        slug: Slug::from_store(slug),
        title: row.get("title"),
        date,
        location: row.get("location"),
        category: row.get("type"),
        price: row.get("price"),
        description: row.get("description"),
        image: row.get("image"),
        link: row.get("link"),
    })
}

fn partner_from_row(row: &SqliteRow) -> Partner {
    Partner {
        id: PartnerId(row.get("id")),
        slug: row
            .get::<Option<String>, _>("slug")
            .filter(|slug| !slug.is_empty())
            .map(Slug::from_store),
        name: row.get("name"),
        category: row.get("type"),
        logo_url: row.get("logo_url"),
        website_url: row.get("website_url"),
        description: row.get("description"),
        contact_person: row.get("contact_person"),
        email: row.get("email"),
        phone: row.get("phone"),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
