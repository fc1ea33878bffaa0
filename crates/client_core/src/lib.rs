//! Client side of the association site: fetches catalog collections and
//! drives the searchable, paginated listing pages with their detail overlays.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::EntityKind,
    protocol::{collection_route, ErrorPayload},
};
use url::Url;

pub mod detail;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod modal;
pub mod page;
pub mod paginator;
pub mod present;
pub mod record;
pub mod surface;

pub use detail::DetailOutcome;
pub use error::FetchError;
pub use fetcher::{fetch_state, CollectionSource, FetchState};
pub use modal::{CloseTrigger, Key, ModalController, ModalState};
pub use page::{CollectionPage, GridView};
pub use paginator::{PageControls, PageNav, Paginator};
pub use record::CollectionRecord;
pub use surface::{DetachedSurface, FocusHandle, ScrollLock, Surface};

#[derive(Clone)]
pub struct SiteClient {
    http: Client,
    base_url: Url,
}

impl SiteClient {
    pub fn new(server_url: &str) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// One request for every record of `R`, in the order the store returns.
    pub async fn fetch_collection<R: CollectionRecord>(&self) -> Result<Vec<R>, FetchError> {
        let url = self.endpoint(collection_route(R::KIND))?;
        let (status, body) = self.get_bytes(R::KIND, url).await?;
        decode(R::KIND, status, &body)
    }

    pub(crate) fn endpoint(&self, route: &str) -> Result<Url, FetchError> {
        Ok(self.base_url.join(route.trim_start_matches('/'))?)
    }

    pub(crate) async fn get_bytes(
        &self,
        kind: EntityKind,
        url: Url,
    ) -> Result<(StatusCode, Vec<u8>), FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network { kind, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network { kind, source })?;
        Ok((status, body.to_vec()))
    }
}

/// Turns a response into `T`, preferring the store's own error text whenever
/// the body carries one.
pub(crate) fn decode<T: DeserializeOwned>(
    kind: EntityKind,
    status: StatusCode,
    body: &[u8],
) -> Result<T, FetchError> {
    if !status.is_success() {
        return Err(match error_text(body) {
            Some(message) => FetchError::Store { kind, message },
            None => FetchError::Http {
                kind,
                status: status.as_u16(),
            },
        });
    }

    serde_json::from_slice(body).map_err(|err| match error_text(body) {
        Some(message) => FetchError::Store { kind, message },
        None => FetchError::Malformed {
            kind,
            reason: err.to_string(),
        },
    })
}

fn error_text(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.error)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
