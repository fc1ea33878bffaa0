//! One listing page: fetched collection → search → pages → detail overlay.

use std::sync::Arc;

use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::{
    fetcher::{fetch_state, CollectionSource, FetchState},
    filter::{filter_positions, Debouncer},
    modal::{CloseTrigger, Key, ModalController},
    paginator::{PageControls, PageNav, Paginator},
    record::CollectionRecord,
    surface::{FocusHandle, Surface},
};

/// What the grid area shows.
#[derive(Debug, PartialEq)]
pub enum GridView<'a, R> {
    Loading {
        placeholders: usize,
    },
    Failed {
        message: &'a str,
    },
    Empty {
        message: &'static str,
    },
    Page {
        records: Vec<&'a R>,
        controls: Option<PageControls>,
    },
}

pub struct CollectionPage<R: CollectionRecord> {
    surface: Arc<dyn Surface>,
    fetch: FetchState<R>,
    search_input: String,
    applied_query: String,
    debouncer: Debouncer<String>,
    matches: Vec<usize>,
    paginator: Paginator,
    modal: ModalController<R>,
}

impl<R: CollectionRecord> CollectionPage<R> {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            modal: ModalController::new(surface.clone()),
            surface,
            fetch: FetchState::Loading,
            search_input: String::new(),
            applied_query: String::new(),
            debouncer: Debouncer::default(),
            matches: Vec::new(),
            paginator: Paginator::new(R::PAGE_SIZE),
        }
    }

    /// Starts on a page other than 1, e.g. from a `?page=` link.
    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub async fn mount(source: &dyn CollectionSource<R>, surface: Arc<dyn Surface>) -> Self {
        let mut page = Self::new(surface);
        page.load(source).await;
        page
    }

    pub async fn load(&mut self, source: &dyn CollectionSource<R>) {
        let state = fetch_state(source).await;
        self.finish_fetch(state);
    }

    pub fn finish_fetch(&mut self, state: FetchState<R>) {
        self.fetch = state;
        self.recompute();
        self.paginator.clamp(self.matches.len());
    }

    pub fn fetch_state(&self) -> &FetchState<R> {
        &self.fetch
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn type_query(&mut self, text: impl Into<String>) {
        self.type_query_at(text, Instant::now());
    }

    /// Records a keystroke; the filter only reruns once input has been idle
    /// for the debounce delay.
    pub fn type_query_at(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_input = text.clone();
        self.debouncer.push(text, now);
    }

    /// Applies the pending query if its delay has elapsed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.apply_query(query);
                true
            }
            None => false,
        }
    }

    /// Waits out the pending debounce, if any, and applies it.
    pub async fn settle_search(&mut self) -> bool {
        let Some(deadline) = self.debouncer.deadline() else {
            return false;
        };
        sleep_until(deadline).await;
        self.poll_search(deadline)
    }

    /// Clearing skips the debounce.
    pub fn clear_search(&mut self) {
        self.debouncer.cancel();
        self.search_input.clear();
        self.apply_query(String::new());
        self.paginator.reset();
    }

    fn apply_query(&mut self, query: String) {
        if query == self.applied_query {
            return;
        }
        let kind = R::KIND;
        debug!(%kind, query = %query, "search applied");
        self.applied_query = query;
        self.recompute();
        self.paginator.reset();
    }

    fn recompute(&mut self) {
        self.matches = filter_positions(self.fetch.records(), &self.applied_query);
    }

    pub fn filtered(&self) -> Vec<&R> {
        let records = self.fetch.records();
        self.matches.iter().map(|&index| &records[index]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.matches.len()
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.matches.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.navigate(PageNav::To(page))
    }

    /// Out-of-range requests are ignored; accepted ones scroll to the top.
    pub fn navigate(&mut self, nav: PageNav) -> bool {
        let moved = self.paginator.navigate(nav, self.matches.len());
        if moved {
            let kind = R::KIND;
            debug!(%kind, page = self.paginator.current_page(), "page changed");
            self.surface.scroll_to_top();
        }
        moved
    }

    fn page_records(&self) -> Vec<&R> {
        let records = self.fetch.records();
        self.paginator
            .slice(&self.matches)
            .iter()
            .map(|&index| &records[index])
            .collect()
    }

    pub fn render(&self) -> GridView<'_, R> {
        match &self.fetch {
            FetchState::Loading => GridView::Loading {
                placeholders: R::LOADING_PLACEHOLDERS,
            },
            FetchState::Failed(message) => GridView::Failed {
                message: message.as_str(),
            },
            FetchState::Loaded(_) if self.matches.is_empty() => GridView::Empty {
                message: R::EMPTY_MESSAGE,
            },
            FetchState::Loaded(_) => GridView::Page {
                records: self.page_records(),
                controls: self.paginator.controls(self.matches.len()),
            },
        }
    }

    pub fn modal(&self) -> &ModalController<R> {
        &self.modal
    }

    /// Opens the overlay for the card at `position` on the current page.
    pub fn open_detail(&mut self, position: usize, trigger: FocusHandle) -> bool {
        let Some(record) = self.page_records().get(position).map(|r| (*r).clone()) else {
            return false;
        };
        self.modal.select(record, trigger);
        true
    }

    /// Keyboard activation of a focused card: Enter or Space opens it.
    pub fn card_key(&mut self, position: usize, key: Key, trigger: FocusHandle) -> bool {
        match key {
            Key::Enter | Key::Space => self.open_detail(position, trigger),
            _ => false,
        }
    }

    pub fn close_detail(&mut self, trigger: CloseTrigger) -> Option<R> {
        self.modal.close(trigger)
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        self.modal.handle_key(key)
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
