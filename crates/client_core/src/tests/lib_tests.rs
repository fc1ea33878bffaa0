use super::*;
use anyhow::Result;
use axum::{extract::Path, http::StatusCode as HttpStatus, routing::get, Json, Router};
use serde_json::{json, Value};
use shared::domain::{Event, Partner, PartnerId};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_site_server(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn event_json(index: usize, title: &str) -> Value {
    json!({
        "slug": format!("event-{index}"),
        "title": title,
        "date": format!("2025-03-{:02}", index % 28 + 1),
        "location": "Beirut",
        "type": "Lecture",
        "price": "Free",
        "description": "Respiratory care update",
        "image": null,
        "registerLink": "https://example.org/register"
    })
}

fn events_json(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|index| event_json(index, &format!("Event {index}")))
            .collect(),
    )
}

#[tokio::test]
async fn twenty_five_events_load_into_three_pages() -> Result<()> {
    let app = Router::new().route("/api/events", get(|| async { Json(events_json(25)) }));
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let mut page = CollectionPage::<Event>::mount(&client, Arc::new(DetachedSurface)).await;
    assert_eq!(page.total_pages(), 3);
    assert!(page.go_to_page(3));
    let GridView::Page { records, .. } = page.render() else {
        panic!("expected a page");
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].slug.as_str(), "event-24");
    assert_eq!(
        records[0].link.as_deref(),
        Some("https://example.org/register")
    );
    assert!(!page.go_to_page(4));
    Ok(())
}

#[tokio::test]
async fn store_error_text_becomes_the_page_message() -> Result<()> {
    let app = Router::new().route(
        "/api/events",
        get(|| async {
            (
                HttpStatus::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "database unavailable" })),
            )
        }),
    );
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let page = CollectionPage::<Event>::mount(&client, Arc::new(DetachedSurface)).await;
    assert!(!page.fetch_state().is_loading());
    assert_eq!(
        page.render(),
        GridView::Failed {
            message: "database unavailable"
        }
    );
    Ok(())
}

#[tokio::test]
async fn bare_server_error_gets_generic_message() -> Result<()> {
    let app = Router::new().route(
        "/api/events",
        get(|| async { HttpStatus::INTERNAL_SERVER_ERROR }),
    );
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let err = client
        .fetch_collection::<Event>()
        .await
        .expect_err("500 must fail");
    assert!(matches!(err, FetchError::Http { status: 500, .. }));
    assert_eq!(err.user_message(), "Failed to load events (HTTP 500).");
    Ok(())
}

#[tokio::test]
async fn unreadable_body_is_reported_as_malformed() -> Result<()> {
    let app = Router::new().route("/api/events", get(|| async { "<html>oops</html>" }));
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let state = fetch_state::<Event>(&client).await;
    assert_eq!(
        state,
        FetchState::Failed("Received an unreadable list of events.".into())
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = SiteClient::new(&format!("http://{addr}"))?;

    let err = client
        .fetch_collection::<Partner>()
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.user_message().contains("partners"));
    Ok(())
}

#[tokio::test]
async fn partners_tolerate_missing_optional_fields() -> Result<()> {
    let app = Router::new().route(
        "/api/partners",
        get(|| async {
            Json(json!([
                { "id": 1, "slug": "lung-clinic", "name": "Lung Clinic", "type": "Clinic",
                  "logo_url": "/logos/1.png", "website_url": "lungclinic.org",
                  "email": "info@lungclinic.org" },
                { "id": 2, "name": "Breath Lab", "type": "Research", "logo_url": "/logos/2.png",
                  "website_url": null, "description": null }
            ]))
        }),
    );
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let partners = client.fetch_collection::<Partner>().await?;
    assert_eq!(partners.len(), 2);
    assert_eq!(partners[0].key(), "lung-clinic");
    assert_eq!(partners[1].id, PartnerId(2));
    assert_eq!(partners[1].key(), "2");
    assert!(partners[1].website_url.is_none());
    Ok(())
}

#[tokio::test]
async fn detail_distinguishes_not_found_from_failure() -> Result<()> {
    let app = Router::new()
        .route(
            "/api/events/:slug",
            get(|Path(slug): Path<String>| async move {
                if slug == "event-3" {
                    Ok(Json(event_json(3, "Asthma Awareness Day")))
                } else {
                    Err((
                        HttpStatus::NOT_FOUND,
                        Json(json!({ "code": "not_found", "error": "event not found" })),
                    ))
                }
            }),
        )
        .route(
            "/api/partners/:key",
            get(|| async { HttpStatus::BAD_GATEWAY }),
        );
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let found = client.fetch_detail::<Event>("event-3").await;
    assert_eq!(
        found.found().map(|event| event.title),
        Some("Asthma Awareness Day".to_string())
    );
    assert_eq!(
        client.fetch_detail::<Event>("missing").await,
        DetailOutcome::NotFound
    );
    assert_eq!(
        client.fetch_detail::<Partner>("lung-clinic").await,
        DetailOutcome::Failed("Failed to load partners (HTTP 502).".into())
    );
    Ok(())
}

#[tokio::test]
async fn static_slugs_degrade_to_empty() -> Result<()> {
    let app = Router::new()
        .route(
            "/api/static-params/events",
            get(|| async { Json(json!(["asthma-day", "cpd-workshop"])) }),
        )
        .route(
            "/api/static-params/partners",
            get(|| async { HttpStatus::INTERNAL_SERVER_ERROR }),
        );
    let server_url = spawn_site_server(app).await?;
    let client = SiteClient::new(&server_url)?;

    let events = client.static_slugs(EntityKind::Event).await;
    let names: Vec<&str> = events.iter().map(|slug| slug.as_str()).collect();
    assert_eq!(names, vec!["asthma-day", "cpd-workshop"]);
    assert!(client.static_slugs(EntityKind::Partner).await.is_empty());
    Ok(())
}

#[test]
fn endpoints_keep_the_base_path() -> Result<()> {
    let client = SiteClient::new("http://localhost:3000/site")?;
    assert_eq!(client.base_url().as_str(), "http://localhost:3000/site/");
    assert_eq!(
        client.endpoint("/api/events")?.as_str(),
        "http://localhost:3000/site/api/events"
    );
    assert!(matches!(
        SiteClient::new("not a url"),
        Err(FetchError::InvalidUrl(_))
    ));
    Ok(())
}
