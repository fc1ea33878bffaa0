//! Fixed-size, 1-indexed pages over the filtered set.

use std::ops::Range;

/// Pages shown either side of the current one in the numbered window.
const WINDOW_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Previous,
    Next,
    Last,
    To(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current: usize,
    pub total: usize,
    pub window: Vec<usize>,
    pub first_enabled: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    /// Starts on the page named by a `?page=` value; missing or junk means 1.
    pub fn from_query_param(page_size: usize, raw: Option<&str>) -> Self {
        let current = raw
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|page| usize::try_from(page.max(1)).unwrap_or(usize::MAX))
            .unwrap_or(1);
        Self {
            current,
            ..Self::new(page_size)
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size)
    }

    pub fn page_range(&self, item_count: usize) -> Range<usize> {
        let start = (self.current - 1)
            .saturating_mul(self.page_size)
            .min(item_count);
        let end = self.current.saturating_mul(self.page_size).min(item_count);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    /// Moves to `page` if it lies in `1..=total`; anything else is ignored.
    pub fn go_to(&mut self, page: usize, item_count: usize) -> bool {
        if page < 1 || page > self.total_pages(item_count) {
            return false;
        }
        self.current = page;
        true
    }

    pub fn navigate(&mut self, nav: PageNav, item_count: usize) -> bool {
        let target = match nav {
            PageNav::First => 1,
            PageNav::Previous => self.current.saturating_sub(1),
            PageNav::Next => self.current.saturating_add(1),
            PageNav::Last => self.total_pages(item_count),
            PageNav::To(page) => page,
        };
        self.go_to(target, item_count)
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Pulls a stale page back to 1 when it points past the end.
    pub fn clamp(&mut self, item_count: usize) {
        if self.current > self.total_pages(item_count).max(1) {
            self.current = 1;
        }
    }

    /// `None` when there is nothing to page through.
    pub fn controls(&self, item_count: usize) -> Option<PageControls> {
        let total = self.total_pages(item_count);
        if total == 0 {
            return None;
        }
        let current = self.current.min(total);
        let start = current.saturating_sub(WINDOW_RADIUS).max(1);
        let end = (current + WINDOW_RADIUS).min(total);
        Some(PageControls {
            current,
            total,
            window: (start..=end).collect(),
            first_enabled: current > 1,
            previous_enabled: current > 1,
            next_enabled: current < total,
            last_enabled: current < total,
        })
    }
}
