//! Detail-by-key lookups and slug enumeration for pre-rendered detail pages.

use reqwest::StatusCode;
use shared::{
    domain::{EntityKind, Slug},
    protocol::{collection_route, static_params_route},
};
use tracing::warn;

use crate::{decode, error::FetchError, record::CollectionRecord, SiteClient};

/// Result of reading one record. `NotFound` is a regular outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome<R> {
    Found(R),
    NotFound,
    Failed(String),
}

impl<R> DetailOutcome<R> {
    pub fn found(self) -> Option<R> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }
}

pub fn not_found_message(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Event => "Event not found.",
        EntityKind::Partner => "Partner not found.",
    }
}

impl SiteClient {
    pub async fn fetch_detail<R: CollectionRecord>(&self, key: &str) -> DetailOutcome<R> {
        match self.read_detail::<R>(key).await {
            Ok(Some(record)) => DetailOutcome::Found(record),
            Ok(None) => DetailOutcome::NotFound,
            Err(err) => {
                let kind = R::KIND;
                warn!(%kind, %key, error = %err, "detail lookup failed");
                DetailOutcome::Failed(err.user_message())
            }
        }
    }

    async fn read_detail<R: CollectionRecord>(&self, key: &str) -> Result<Option<R>, FetchError> {
        let mut url = self.endpoint(collection_route(R::KIND))?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        let (status, body) = self.get_bytes(R::KIND, url).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(R::KIND, status, &body).map(Some)
    }

    /// Every known slug for `kind`. Any failure degrades to an empty list so
    /// detail pages fall back to on-demand rendering.
    pub async fn static_slugs(&self, kind: EntityKind) -> Vec<Slug> {
        self.read_static_slugs(kind).await.unwrap_or_else(|err| {
            warn!(%kind, error = %err, "static slug enumeration failed; rendering on demand");
            Vec::new()
        })
    }

    async fn read_static_slugs(&self, kind: EntityKind) -> Result<Vec<Slug>, FetchError> {
        let url = self.endpoint(&static_params_route(kind))?;
        let (status, body) = self.get_bytes(kind, url).await?;
        decode(kind, status, &body)
    }
}
