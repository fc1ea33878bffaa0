//! Per-entity parameters of the collection view.

use serde::de::DeserializeOwned;
use shared::domain::{EntityKind, Event, Partner};

pub const EVENTS_PER_PAGE: usize = 12;
pub const PARTNERS_PER_PAGE: usize = 6;

/// A record type that can be fetched as a whole collection, searched, paged
/// and drilled into.
pub trait CollectionRecord: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;
    const PAGE_SIZE: usize;
    const LOADING_PLACEHOLDERS: usize = 6;
    const EMPTY_MESSAGE: &'static str;

    /// Stable list key.
    fn key(&self) -> String;

    /// Fields the free-text search looks at.
    fn searchable_fields(&self) -> Vec<&str>;

    /// Accessible label for the card that opens the detail overlay.
    fn card_label(&self) -> String;
}

impl CollectionRecord for Event {
    const KIND: EntityKind = EntityKind::Event;
    const PAGE_SIZE: usize = EVENTS_PER_PAGE;
    const EMPTY_MESSAGE: &'static str = "No events match your search. Try a different keyword.";

    fn key(&self) -> String {
        self.slug.to_string()
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
        ]
    }

    fn card_label(&self) -> String {
        format!("View details for event: {}", self.title)
    }
}

impl CollectionRecord for Partner {
    const KIND: EntityKind = EntityKind::Partner;
    const PAGE_SIZE: usize = PARTNERS_PER_PAGE;
    const LOADING_PLACEHOLDERS: usize = PARTNERS_PER_PAGE;
    const EMPTY_MESSAGE: &'static str = "No partners found.";

    fn key(&self) -> String {
        match &self.slug {
            Some(slug) => slug.to_string(),
            None => self.id.0.to_string(),
        }
    }

    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.category.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }

    fn card_label(&self) -> String {
        format!("View details for {}", self.name)
    }
}
