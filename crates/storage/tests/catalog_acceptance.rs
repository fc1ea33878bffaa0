use chrono::{TimeZone, Utc};
use shared::domain::{Event, Partner, PartnerId, Slug};
use storage::Storage;

#[tokio::test]
async fn seeded_catalog_is_readable_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        dir.path().join("catalog.db").to_string_lossy().replace('\\', "/")
    );

    {
        let storage = Storage::new(&database_url).await.expect("seed db");
        for day in 1..=25u32 {
            storage
                .upsert_event(&Event {
                    slug: Slug::parse(&format!("event-{day:02}")).expect("slug"),
                    title: format!("Event {day}"),
                    date: Utc
                        .with_ymd_and_hms(2025, 3, day, 18, 0, 0)
                        .single()
                        .expect("date"),
                    location: "Beirut".into(),
                    category: "Lecture".into(),
                    price: "Free".into(),
                    description: "Respiratory care lecture".into(),
                    image: None,
                    link: None,
                })
                .await
                .expect("event");
        }
        storage
            .upsert_partner(&Partner {
                id: PartnerId(1),
                slug: Some(Slug::parse("acme-health").expect("slug")),
                name: "Acme Health".into(),
                category: "Hospital".into(),
                logo_url: "/logos/acme.png".into(),
                website_url: Some("acme.example".into()),
                description: None,
                contact_person: Some("Rita".into()),
                email: Some("rita@acme.example".into()),
                phone: None,
            })
            .await
            .expect("partner");
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let events = reopened.list_events().await.expect("events");
    assert_eq!(events.len(), 25);
    assert_eq!(events.first().map(|e| e.slug.as_str()), Some("event-01"));
    assert_eq!(events.last().map(|e| e.slug.as_str()), Some("event-25"));

    let partner = reopened
        .partner_by_slug("acme-health")
        .await
        .expect("lookup")
        .expect("partner");
    assert_eq!(partner.contact_person.as_deref(), Some("Rita"));
}
