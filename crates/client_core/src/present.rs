//! Display helpers shared by the listing cards, overlays and detail pages.

use chrono::{DateTime, Utc};
use shared::domain::{Event, Partner};

/// `June 3, 2025`
pub fn format_event_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Adds `https://` when the scheme is missing. Blank values mean no website.
pub fn normalize_website_url(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http") {
        Some(raw.to_string())
    } else {
        Some(format!("https://{raw}"))
    }
}

pub fn mailto_link(email: &str) -> String {
    format!("mailto:{}", email.trim())
}

pub fn tel_link(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect();
    format!("tel:{digits}")
}

/// Caption shown on an event card when there is no image to carry it.
pub fn event_card_caption(event: &Event) -> Option<String> {
    if event.image.is_some() {
        return None;
    }
    Some(format!(
        "{} · {}",
        event.category,
        format_event_date(&event.date)
    ))
}

/// Label/value rows of the event detail page.
pub fn event_facts(event: &Event) -> Vec<(&'static str, String)> {
    vec![
        ("Date", format_event_date(&event.date)),
        ("Location", event.location.clone()),
        ("Type", event.category.clone()),
        ("Price", event.price.clone()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLine {
    pub label: &'static str,
    pub text: String,
    pub href: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn contact_lines(partner: &Partner) -> Vec<ContactLine> {
    let mut lines = Vec::new();
    if let Some(person) = non_blank(&partner.contact_person) {
        lines.push(ContactLine {
            label: "Contact",
            text: person.to_string(),
            href: None,
        });
    }
    if let Some(email) = non_blank(&partner.email) {
        lines.push(ContactLine {
            label: "Email",
            text: email.to_string(),
            href: Some(mailto_link(email)),
        });
    }
    if let Some(phone) = non_blank(&partner.phone) {
        lines.push(ContactLine {
            label: "Phone",
            text: phone.to_string(),
            href: Some(tel_link(phone)),
        });
    }
    lines
}

pub fn has_contact(partner: &Partner) -> bool {
    !contact_lines(partner).is_empty()
}

/// Whether the partner overlay has anything beyond name and logo.
pub fn has_extra_info(partner: &Partner) -> bool {
    non_blank(&partner.description).is_some()
        || has_contact(partner)
        || normalize_website_url(partner.website_url.as_deref()).is_some()
}
