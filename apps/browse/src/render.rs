//! Plain-text rendering of listing grids and detail overlays.

use client_core::{
    present::{contact_lines, event_card_caption, event_facts, normalize_website_url},
    CollectionRecord, FocusHandle, GridView, PageControls, Surface,
};
use shared::domain::{Event, Partner};
use tracing::debug;

/// Terminal output has no viewport; surface calls are only traced.
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn scroll_to_top(&self) {
        debug!("scroll to top");
    }

    fn set_scroll_locked(&self, locked: bool) {
        debug!(locked, "scroll lock");
    }

    fn focus(&self, target: &FocusHandle) {
        debug!(%target, "focus returned");
    }
}

pub trait Listing: CollectionRecord {
    fn card(&self) -> Vec<String>;
    fn detail(&self) -> Vec<String>;
}

impl Listing for Event {
    fn card(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        if let Some(caption) = event_card_caption(self) {
            lines.push(caption);
        }
        lines
    }

    fn detail(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        lines.extend(
            event_facts(self)
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(label, value)| format!("{label}: {value}")),
        );
        if !self.description.is_empty() {
            lines.push(String::new());
            lines.push(self.description.clone());
        }
        if let Some(link) = &self.link {
            lines.push(format!("Register: {link}"));
        }
        lines
    }
}

impl Listing for Partner {
    fn card(&self) -> Vec<String> {
        vec![self.name.clone(), self.category.clone()]
    }

    fn detail(&self) -> Vec<String> {
        let mut lines = vec![format!("{} ({})", self.name, self.category)];
        if let Some(description) = &self.description {
            lines.push(description.clone());
        }
        if let Some(website) = normalize_website_url(self.website_url.as_deref()) {
            lines.push(format!("Website: {website}"));
        }
        for line in contact_lines(self) {
            match line.href {
                Some(href) => lines.push(format!("{}: {} <{href}>", line.label, line.text)),
                None => lines.push(format!("{}: {}", line.label, line.text)),
            }
        }
        lines
    }
}

pub fn grid_lines<R: Listing>(view: &GridView<'_, R>) -> Vec<String> {
    match view {
        GridView::Loading { placeholders } => vec!["░░░░░░░░".to_string(); *placeholders],
        GridView::Failed { message } => vec![format!("error: {message}")],
        GridView::Empty { message } => vec![message.to_string()],
        GridView::Page { records, controls } => {
            let mut lines = Vec::new();
            for (index, record) in records.iter().enumerate() {
                let mut card = record.card().into_iter();
                if let Some(first) = card.next() {
                    lines.push(format!("[{}] {first}", index + 1));
                }
                lines.extend(card.map(|line| format!("    {line}")));
            }
            if let Some(controls) = controls {
                lines.push(String::new());
                lines.push(controls_line(controls));
            }
            lines
        }
    }
}

pub fn controls_line(controls: &PageControls) -> String {
    let arrow = |enabled: bool, text: &str| {
        if enabled {
            text.to_string()
        } else {
            " ".repeat(text.chars().count())
        }
    };
    let numbers: Vec<String> = controls
        .window
        .iter()
        .map(|&page| {
            if page == controls.current {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    format!(
        "{}{} {} {}{}   page {} of {}",
        arrow(controls.first_enabled, "«"),
        arrow(controls.previous_enabled, "‹"),
        numbers.join(" "),
        arrow(controls.next_enabled, "›"),
        arrow(controls.last_enabled, "»"),
        controls.current,
        controls.total,
    )
}

pub fn print_grid<R: Listing>(view: &GridView<'_, R>) {
    for line in grid_lines(view) {
        println!("{line}");
    }
}

pub fn print_detail<R: Listing>(record: &R) {
    println!("── {} ──", record.card_label());
    for line in record.detail() {
        println!("{line}");
    }
}
