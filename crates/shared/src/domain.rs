use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug '{slug}' contains invalid character '{ch}'")]
    InvalidCharacter { slug: String, ch: char },
}

/// URL-safe record key: lowercase ASCII letters, digits and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(ch) = raw
            .chars()
            .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-'))
        {
            return Err(SlugError::InvalidCharacter {
                slug: raw.to_string(),
                ch,
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// Wraps a value read back from the store without re-validating it.
    pub fn from_store(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Event,
    Partner,
}

impl EntityKind {
    pub fn plural(self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Partner => "partners",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" | "events" => Ok(Self::Event),
            "partner" | "partners" => Ok(Self::Partner),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub slug: Slug,
    pub title: String,
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        alias = "registerLink",
        alias = "register_link",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Parses either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_event_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid event date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rejects_uppercase_and_spaces() {
        assert!(Slug::parse("cpd-workshop-2025").is_ok());
        assert!(matches!(
            Slug::parse("CPD Workshop"),
            Err(SlugError::InvalidCharacter { ch: 'C', .. })
        ));
        assert_eq!(Slug::parse("   "), Err(SlugError::Empty));
    }

    #[test]
    fn event_tolerates_missing_optional_fields_and_legacy_link_name() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "slug": "asthma-day",
            "title": "Asthma Day",
            "date": "2025-05-06",
            "registerLink": "https://example.org/register",
            "image": null
        }))
        .expect("event");

        assert_eq!(event.location, "");
        assert_eq!(event.category, "");
        assert!(event.image.is_none());
        assert_eq!(event.link.as_deref(), Some("https://example.org/register"));
        assert_eq!(event.date.to_rfc3339(), "2025-05-06T00:00:00+00:00");
    }

    #[test]
    fn event_accepts_rfc3339_dates_and_type_field() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "slug": "cpd",
            "title": "CPD Workshop",
            "date": "2025-06-01T09:30:00+03:00",
            "type": "Workshop",
            "price": "Free"
        }))
        .expect("event");

        assert_eq!(event.category, "Workshop");
        assert_eq!(event.date.to_rfc3339(), "2025-06-01T06:30:00+00:00");
    }

    #[test]
    fn partner_round_trips_type_field() {
        let partner: Partner = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Acme Health",
            "type": "Hospital",
            "logo_url": "/logos/acme.png",
            "website_url": "acme.example"
        }))
        .expect("partner");
        assert_eq!(partner.id, PartnerId(7));
        assert!(partner.slug.is_none());

        let json = serde_json::to_value(&partner).expect("json");
        assert_eq!(json["type"], "Hospital");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn entity_kind_parses_singular_and_plural() {
        assert_eq!("Events".parse::<EntityKind>(), Ok(EntityKind::Event));
        assert_eq!("partner".parse::<EntityKind>(), Ok(EntityKind::Partner));
        assert!("news".parse::<EntityKind>().is_err());
    }
}
