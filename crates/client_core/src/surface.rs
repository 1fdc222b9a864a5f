//! Output side of the page: the slots the orchestrator is allowed to touch.

use std::sync::{Mutex, MutexGuard};

use crate::render::{render_error_html, render_placeholder_html, ResultView};

/// Page slots driven by the orchestrator. Calls happen in cycle order and
/// never concurrently for the same submission.
pub trait UiSurface: Send + Sync {
    /// Blocking notification for problems found before a request is sent.
    fn notify(&self, message: &str);
    fn set_submit_enabled(&self, enabled: bool);
    fn set_loading(&self, visible: bool);
    fn set_placeholder_visible(&self, visible: bool);
    fn clear_results(&self);
    fn render_result(&self, view: &ResultView);
    fn render_error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub submit_enabled: bool,
    pub loading_visible: bool,
    pub placeholder_html: Option<String>,
    pub results_html: String,
    pub notifications: Vec<String>,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            submit_enabled: true,
            loading_visible: false,
            placeholder_html: Some(render_placeholder_html()),
            results_html: String::new(),
            notifications: Vec::new(),
        }
    }
}

/// In-memory page: each slot is a flag or an HTML fragment.
#[derive(Debug, Default)]
pub struct PageSlots {
    inner: Mutex<PageSnapshot>,
}

impl PageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UiSurface for PageSlots {
    fn notify(&self, message: &str) {
        self.lock().notifications.push(message.to_string());
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.lock().submit_enabled = enabled;
    }

    fn set_loading(&self, visible: bool) {
        self.lock().loading_visible = visible;
    }

    fn set_placeholder_visible(&self, visible: bool) {
        self.lock().placeholder_html = visible.then(render_placeholder_html);
    }

    fn clear_results(&self) {
        self.lock().results_html.clear();
    }

    fn render_result(&self, view: &ResultView) {
        self.lock().results_html = view.to_html();
    }

    fn render_error(&self, message: &str) {
        self.lock().results_html = render_error_html(message);
    }
}
