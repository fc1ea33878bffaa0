use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{
    event_by_slug, list_events, list_partners, partner_by_key, static_slugs, ApiContext,
};
use shared::{
    domain::{EntityKind, Event, Partner, Slug},
    error::{ApiError, ErrorCode},
    protocol::{EVENTS_ROUTE, HEALTH_ROUTE, PARTNERS_ROUTE, STATIC_PARAMS_ROUTE},
};
use storage::Storage;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "catalog server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(EVENTS_ROUTE, get(http_list_events))
        .route(&format!("{EVENTS_ROUTE}/:slug"), get(http_event_detail))
        .route(PARTNERS_ROUTE, get(http_list_partners))
        .route(&format!("{PARTNERS_ROUTE}/:key"), get(http_partner_detail))
        .route(&format!("{STATIC_PARAMS_ROUTE}/:kind"), get(http_static_params))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            error!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn http_list_events(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Event>> {
    let events = list_events(&state.api).await.map_err(reject)?;
    Ok(Json(events))
}

async fn http_list_partners(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Partner>> {
    let partners = list_partners(&state.api).await.map_err(reject)?;
    Ok(Json(partners))
}

async fn http_event_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Event> {
    let event = event_by_slug(&state.api, &slug).await.map_err(reject)?;
    Ok(Json(event))
}

async fn http_partner_detail(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<Partner> {
    let partner = partner_by_key(&state.api, &key).await.map_err(reject)?;
    Ok(Json(partner))
}

async fn http_static_params(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> ApiResult<Vec<Slug>> {
    let kind: EntityKind = kind
        .parse()
        .map_err(|message: String| reject(ApiError::not_found(message)))?;
    let slugs = static_slugs(&state.api, kind).await.map_err(reject)?;
    Ok(Json(slugs))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
