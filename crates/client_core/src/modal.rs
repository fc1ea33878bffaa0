//! Single-slot detail overlay.
//!
//! `Closed --select--> Open`, `Open --select--> Open` (replaces record and
//! focus target), `Open --close--> Closed`. Scroll is locked while open and
//! focus returns to the latest trigger on close.

use std::sync::Arc;

use tracing::debug;

use crate::surface::{FocusHandle, ScrollLock, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState<R> {
    Closed,
    Open { record: R, return_focus: FocusHandle },
}

pub struct ModalController<R> {
    surface: Arc<dyn Surface>,
    state: ModalState<R>,
    // Some exactly while the state is Open.
    scroll_lock: Option<ScrollLock>,
}

impl<R> ModalController<R> {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            surface,
            state: ModalState::Closed,
            scroll_lock: None,
        }
    }

    pub fn state(&self) -> &ModalState<R> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn selected(&self) -> Option<&R> {
        match &self.state {
            ModalState::Open { record, .. } => Some(record),
            ModalState::Closed => None,
        }
    }

    pub fn return_focus(&self) -> Option<&FocusHandle> {
        match &self.state {
            ModalState::Open { return_focus, .. } => Some(return_focus),
            ModalState::Closed => None,
        }
    }

    pub fn select(&mut self, record: R, trigger: FocusHandle) {
        if self.scroll_lock.is_none() {
            self.scroll_lock = Some(ScrollLock::acquire(self.surface.clone()));
        }
        debug!(trigger = %trigger, replaced = self.is_open(), "detail overlay opened");
        self.state = ModalState::Open {
            record,
            return_focus: trigger,
        };
    }

    /// Closes the overlay from any trigger. Returns the record that was shown.
    pub fn close(&mut self, trigger: CloseTrigger) -> Option<R> {
        let ModalState::Open {
            record,
            return_focus,
        } = std::mem::replace(&mut self.state, ModalState::Closed)
        else {
            return None;
        };
        self.scroll_lock = None;
        self.surface.focus(&return_focus);
        debug!(?trigger, focus = %return_focus, "detail overlay closed");
        Some(record)
    }

    /// Escape closes an open overlay; other keys are left to the page.
    pub fn handle_key(&mut self, key: Key) -> bool {
        key == Key::Escape && self.close(CloseTrigger::Escape).is_some()
    }
}
