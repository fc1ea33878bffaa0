//! Collection fetcher: one read per page activation, folded into a view state.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{error::FetchError, record::CollectionRecord, SiteClient};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<R> {
    Loading,
    Failed(String),
    Loaded(Vec<R>),
}

impl<R> FetchState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn records(&self) -> &[R] {
        match self {
            Self::Loaded(records) => records,
            _ => &[],
        }
    }
}

impl<R> From<Result<Vec<R>, FetchError>> for FetchState<R> {
    fn from(result: Result<Vec<R>, FetchError>) -> Self {
        match result {
            Ok(records) => Self::Loaded(records),
            Err(err) => Self::Failed(err.user_message()),
        }
    }
}

/// Where a collection comes from. The HTTP client is the default; a store
/// with its own query capability can stand in without touching filtering or
/// paging.
#[async_trait]
pub trait CollectionSource<R: CollectionRecord>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<R>, FetchError>;
}

#[async_trait]
impl<R: CollectionRecord> CollectionSource<R> for SiteClient {
    async fn fetch_all(&self) -> Result<Vec<R>, FetchError> {
        self.fetch_collection::<R>().await
    }
}

/// Issues the single read for a page and never fails: errors become
/// [`FetchState::Failed`].
pub async fn fetch_state<R: CollectionRecord>(source: &dyn CollectionSource<R>) -> FetchState<R> {
    let kind = R::KIND;
    let result = source.fetch_all().await;
    match &result {
        Ok(records) => info!(%kind, count = records.len(), "collection loaded"),
        Err(err) => warn!(%kind, error = %err, "collection fetch failed"),
    }
    result.into()
}
