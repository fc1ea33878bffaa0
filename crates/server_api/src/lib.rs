use shared::{
    domain::{EntityKind, Event, Partner, PartnerId, Slug},
    error::ApiError,
};
use storage::Storage;
use tracing::{error, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_events(ctx: &ApiContext) -> Result<Vec<Event>, ApiError> {
    ctx.storage.list_events().await.map_err(internal)
}

pub async fn list_partners(ctx: &ApiContext) -> Result<Vec<Partner>, ApiError> {
    ctx.storage.list_partners().await.map_err(internal)
}

pub async fn event_by_slug(ctx: &ApiContext, slug: &str) -> Result<Event, ApiError> {
    ctx.storage
        .event_by_slug(slug)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(format!("event '{slug}' not found")))
}

/// Resolves a partner by slug first, then by numeric id.
pub async fn partner_by_key(ctx: &ApiContext, key: &str) -> Result<Partner, ApiError> {
    if let Some(partner) = ctx.storage.partner_by_slug(key).await.map_err(internal)? {
        return Ok(partner);
    }

    if let Ok(id) = key.parse::<i64>() {
        if let Some(partner) = ctx
            .storage
            .partner_by_id(PartnerId(id))
            .await
            .map_err(internal)?
        {
            return Ok(partner);
        }
    }

    Err(ApiError::not_found(format!("partner '{key}' not found")))
}

/// Known slugs for pre-rendering detail pages.
pub async fn static_slugs(ctx: &ApiContext, kind: EntityKind) -> Result<Vec<Slug>, ApiError> {
    let slugs = match kind {
        EntityKind::Event => ctx.storage.list_event_slugs().await,
        EntityKind::Partner => ctx.storage.list_partner_slugs().await,
    };
    slugs.map_err(|err| {
        warn!(%kind, "slug enumeration failed");
        internal(err)
    })
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "catalog store error");
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
