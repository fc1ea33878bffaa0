//! Free-text search over a collection, plus the keystroke debouncer.

use std::time::Duration;

use tokio::time::Instant;

use crate::record::CollectionRecord;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn matches<R: CollectionRecord>(record: &R, needle: &str) -> bool {
    record
        .searchable_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Positions in `collection` that match `query`, in collection order.
/// A blank query keeps every position.
pub fn filter_positions<R: CollectionRecord>(collection: &[R], query: &str) -> Vec<usize> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return (0..collection.len()).collect();
    }
    collection
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(*record, &needle))
        .map(|(index, _)| index)
        .collect()
}

pub fn filter<'a, R: CollectionRecord>(collection: &'a [R], query: &str) -> Vec<&'a R> {
    filter_positions(collection, query)
        .into_iter()
        .map(|index| &collection[index])
        .collect()
}

/// Single-slot trailing debouncer: every push cancels the pending value and
/// restarts the delay.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.cancel(),
            _ => None,
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::domain::{Event, Partner, PartnerId, Slug};

    fn event(title: &str, description: &str, category: &str) -> Event {
        Event {
            slug: Slug::parse(&title.to_lowercase().replace(' ', "-")).expect("slug"),
            title: title.into(),
            date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("date"),
            location: "Workshop Hall".into(),
            category: category.into(),
            price: String::new(),
            description: description.into(),
            image: None,
            link: None,
        }
    }

    #[test]
    fn blank_query_is_identity() {
        let events = vec![event("A", "", "Talk"), event("B", "", "Talk")];
        assert_eq!(filter(&events, "").len(), 2);
        assert_eq!(filter(&events, "   ").len(), 2);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let events = vec![
            event("CPD Workshop on Asthma", "breathing exercises", "Training"),
            event("Annual Gala", "dinner", "Social"),
        ];
        let found = filter(&events, "WORKSHOP");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "CPD Workshop on Asthma");
    }

    #[test]
    fn location_is_not_searched() {
        let events = vec![event("Gala", "dinner", "Social")];
        assert!(filter(&events, "workshop").is_empty());
    }

    #[test]
    fn partner_without_match_is_excluded() {
        let partners = vec![Partner {
            id: PartnerId(1),
            slug: None,
            name: "Acme Health".into(),
            category: "Hospital".into(),
            logo_url: String::new(),
            website_url: Some("workshop.example".into()),
            description: Some("Pulmonary rehab".into()),
            contact_person: None,
            email: None,
            phone: None,
        }];
        assert!(filter(&partners, "workshop").is_empty());
        assert_eq!(filter(&partners, "rehab").len(), 1);
    }

    #[test]
    fn every_result_contains_the_needle_somewhere() {
        let events = vec![
            event("Spirometry", "lung function", "Lab"),
            event("Lung Day", "awareness", "Public"),
            event("Gala", "fundraiser", "Social"),
        ];
        for record in filter(&events, "Lung") {
            assert!(record
                .searchable_fields()
                .iter()
                .any(|f| f.to_lowercase().contains("lung")));
        }
        assert_eq!(filter_positions(&events, "lung"), vec![0, 1]);
    }

    #[test]
    fn debouncer_restarts_on_each_push() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.push("w", start);
        debouncer.push("wo", start + Duration::from_millis(200));

        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(500))
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), Some("wo"));
        assert!(!debouncer.is_pending());
    }
}
