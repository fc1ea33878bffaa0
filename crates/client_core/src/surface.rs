//! The host surface a collection page draws on: viewport scroll, scroll
//! locking and keyboard focus.

use std::{fmt, sync::Arc};

/// Opaque reference to the element that triggered an action, so focus can be
/// handed back to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusHandle(String);

impl FocusHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FocusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Surface: Send + Sync {
    fn scroll_to_top(&self);
    fn set_scroll_locked(&self, locked: bool);
    fn focus(&self, target: &FocusHandle);
}

/// Surface with no viewport, for headless callers.
pub struct DetachedSurface;

impl Surface for DetachedSurface {
    fn scroll_to_top(&self) {}

    fn set_scroll_locked(&self, _locked: bool) {}

    fn focus(&self, _target: &FocusHandle) {}
}

/// Page scroll stays locked for as long as this guard lives.
pub struct ScrollLock {
    surface: Arc<dyn Surface>,
}

impl ScrollLock {
    pub fn acquire(surface: Arc<dyn Surface>) -> Self {
        surface.set_scroll_locked(true);
        Self { surface }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.surface.set_scroll_locked(false);
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock").finish_non_exhaustive()
    }
}
